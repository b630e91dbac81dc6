use std::sync::Arc;

use axum::{Json, extract::State};
use repo_agent::ChatTurn;

use crate::core::app_state::AppState;

/// Handler: GET /chat_history
///
/// Returns every question/answer turn since the last load or reset, in
/// order, including no-repository and error answers.
pub async fn chat_history(State(state): State<Arc<AppState>>) -> Json<Vec<ChatTurn>> {
    let session = state.session.lock().await;

    Json(session.chat_history().to_vec())
}
