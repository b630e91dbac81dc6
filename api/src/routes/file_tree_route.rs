use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

/// Response payload for /file_tree.
#[derive(Debug, Serialize)]
pub struct FileTreeResponse {
    /// Newline-joined sorted relative paths; empty without a repository.
    pub tree: String,
}

/// Handler: GET /file_tree
pub async fn file_tree(State(state): State<Arc<AppState>>) -> Json<FileTreeResponse> {
    let session = state.session.lock().await;

    Json(FileTreeResponse {
        tree: session.file_tree(),
    })
}
