use std::sync::Arc;

use axum::{Json, extract::State};
use repo_agent::DiagramResult;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

/// Handler: GET /diagram
///
/// Returns the most recently generated diagram; 404 before the first
/// POST /generate_diagram and after a reset.
pub async fn last_diagram(State(state): State<Arc<AppState>>) -> AppResult<Json<DiagramResult>> {
    let session = state.session.lock().await;

    match session.last_diagram() {
        Some(result) => Ok(Json(result.clone())),
        None => Err(AppError::NotFound),
    }
}
