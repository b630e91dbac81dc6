//! POST /generate_diagram — renders a Mermaid diagram of the repository.

use std::sync::Arc;

use axum::{Json, extract::State};
use diagram_engine::DiagramType;
use repo_agent::DiagramResult;
use tracing::instrument;

use crate::{
    core::app_state::AppState,
    routes::diagram::generate_diagram_request::GenerateDiagramRequest,
};

/// Handler: POST /generate_diagram
///
/// LLM failures and malformed blueprints are absorbed into the
/// deterministic fallback, so this route answers 200 whenever the body
/// parses. The result is also cached for GET /diagram.
#[instrument(skip_all, fields(diagram_type = %body.diagram_type))]
pub async fn generate_diagram(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GenerateDiagramRequest>,
) -> Json<DiagramResult> {
    let diagram_type = DiagramType::parse(&body.diagram_type).unwrap_or_default();
    let focus = body.focus.as_deref().unwrap_or("");

    let mut session = state.session.lock().await;
    let result = session.generate_diagram(diagram_type, focus).await;

    Json(result)
}
