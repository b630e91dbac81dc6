//! POST /load_repository — scans a local path or shallow-clones a Git URL.

use std::path::Path;
use std::sync::Arc;

use axum::{Json, extract::State};
use repo_agent::LoadReport;
use repo_fetcher::is_git_url;
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::repository::load_repository_request::LoadRepositoryRequest,
};

/// Handler: POST /load_repository
///
/// The `source` field is routed by shape: recognizable Git URLs are cloned
/// shallowly, everything else is treated as a local directory path.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/load_repository \
///   -H 'content-type: application/json' \
///   -d '{"source":"https://github.com/pallets/flask","branch":"main"}'
/// ```
#[instrument(skip_all, fields(source = %body.source))]
pub async fn load_repository(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoadRepositoryRequest>,
) -> AppResult<Json<LoadReport>> {
    let mut session = state.session.lock().await;

    let report = if is_git_url(&body.source) {
        session
            .load_url(&body.source, body.branch.as_deref())
            .await?
    } else {
        session.load_path(Path::new(&body.source)).await?
    };

    debug!(total_files = report.total_files, "load_repository: success");
    Ok(Json(report))
}
