pub mod ask;
pub mod chat_history_route;
pub mod diagram;
pub mod diagram_route;
pub mod file_tree_route;
pub mod health_route;
pub mod repository;
pub mod reset_session_route;
