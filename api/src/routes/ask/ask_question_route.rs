//! POST /ask_question — asks the LLM about the loaded repository.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    routes::ask::ask_request::{AskRequest, AskResponse},
};

/// Handler: POST /ask_question
///
/// Always answers 200: without a loaded repository the answer is the
/// no-repository notice, and LLM failures come back as `Error: ...` text.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/ask_question \
///   -H 'content-type: application/json' \
///   -d '{"question":"Where is the HTTP router built?"}'
/// ```
#[instrument(skip_all)]
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskRequest>,
) -> Json<AskResponse> {
    let mut session = state.session.lock().await;
    let answer = session.ask(&body.question).await;

    Json(AskResponse { answer })
}
