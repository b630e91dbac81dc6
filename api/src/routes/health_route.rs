use std::sync::Arc;

use axum::{Json, extract::State};
use llm_gateway::HealthStatus;

use crate::core::app_state::AppState;

/// Handler: GET /health
///
/// Probes the configured provider endpoint. Unreachable upstreams report
/// `ok: false` in the body instead of failing the route.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.health.check(&state.cfg).await)
}
