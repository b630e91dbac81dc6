pub mod load_repository_request;
pub mod load_repository_route;
