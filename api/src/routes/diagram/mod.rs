pub mod generate_diagram_request;
pub mod generate_diagram_route;
