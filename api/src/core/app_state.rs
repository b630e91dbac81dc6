use std::sync::Arc;

use llm_gateway::{GatewayConfig, HealthService, LlmGateway, config_from_env};
use repo_agent::RepoSession;
use tokio::sync::Mutex;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// The single analysis session; one repository loaded at a time.
    pub session: Mutex<RepoSession>,
    /// Resilient provider probe behind GET /health.
    pub health: HealthService,
    /// Gateway configuration snapshot taken at startup.
    pub cfg: GatewayConfig,
}

impl AppState {
    /// Load shared state from environment variables.
    ///
    /// # Errors
    /// Propagates gateway configuration problems: unknown `LLM_PROVIDER`,
    /// missing API key, malformed numeric overrides.
    pub fn from_env() -> Result<Self, AppError> {
        let cfg = config_from_env()?;
        let gateway = Arc::new(LlmGateway::new(cfg.clone())?);

        Ok(Self {
            session: Mutex::new(RepoSession::new(gateway)),
            health: HealthService::new(None)?,
            cfg,
        })
    }
}
