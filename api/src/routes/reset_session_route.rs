use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

/// Response payload for /reset_session.
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub reset: bool,
}

/// Handler: POST /reset_session
///
/// Drops the loaded index, summary, chat history, cached diagram, and any
/// clone directory.
pub async fn reset_session(State(state): State<Arc<AppState>>) -> Json<ResetResponse> {
    let mut session = state.session.lock().await;
    session.reset();

    Json(ResetResponse { reset: true })
}
