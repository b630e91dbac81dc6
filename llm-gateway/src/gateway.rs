//! Shared LLM gateway with one active provider.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - The provider is fixed at construction; switching providers means
//!   building a new gateway from a new config.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use llm_gateway::config::{GatewayConfig, LlmProvider};
//! use llm_gateway::gateway::LlmGateway;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), llm_gateway::GatewayError> {
//!     let cfg = GatewayConfig {
//!         provider: LlmProvider::OpenAi,
//!         model: "gpt-5.2".into(),
//!         endpoint: "https://api.openai.com".into(),
//!         api_key: Some("sk-...".into()),
//!         max_tokens: 4096,
//!         temperature: 0.7,
//!         timeout_secs: None,
//!     };
//!
//!     let gateway = Arc::new(LlmGateway::new(cfg)?);
//!     let txt = gateway.generate("Hello world", None).await?;
//!     println!("{txt}");
//!
//!     Ok(())
//! }
//! ```

use tracing::info;

use crate::{
    config::{config_from_env, GatewayConfig, LlmProvider},
    error_handler::{GatewayError, Result},
    services::{hf_inference_service::HfInferenceService, open_ai_service::OpenAiService},
};

/// Facade over the configured LLM provider.
///
/// The underlying HTTP client is built once in [`LlmGateway::new`] and
/// reused for every request.
pub struct LlmGateway {
    service: ActiveService,
    provider: LlmProvider,
    model: String,
}

enum ActiveService {
    OpenAi(OpenAiService),
    HuggingFace(HfInferenceService),
}

impl LlmGateway {
    /// Builds a gateway from environment variables.
    ///
    /// Reads `LLM_PROVIDER` plus the provider-specific variables
    /// described in [`crate::config`].
    ///
    /// # Errors
    /// Returns [`GatewayError`] if the environment is incomplete or the
    /// client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        Self::new(config_from_env()?)
    }

    /// Builds a gateway for the provider named in `cfg`.
    ///
    /// # Errors
    /// Returns [`GatewayError`] if the provider-specific client rejects
    /// the config (missing key, bad endpoint).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let provider = cfg.provider;
        let model = cfg.model.clone();

        let service = match provider {
            LlmProvider::OpenAi => ActiveService::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::HuggingFace => {
                ActiveService::HuggingFace(HfInferenceService::new(cfg)?)
            }
        };

        info!(provider = %provider, model = %model, "LlmGateway ready");

        Ok(Self {
            service,
            provider,
            model,
        })
    }

    /// Generates text with the active provider.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `temperature_override`: replaces the configured temperature for
    ///   this call only.
    ///
    /// # Errors
    /// Returns [`GatewayError`] if the request fails or the response
    /// cannot be decoded.
    pub async fn generate(
        &self,
        prompt: &str,
        temperature_override: Option<f32>,
    ) -> std::result::Result<String, GatewayError> {
        match &self.service {
            ActiveService::OpenAi(svc) => svc.generate(prompt, temperature_override).await,
            ActiveService::HuggingFace(svc) => svc.generate(prompt, temperature_override).await,
        }
    }

    /// Returns the active provider.
    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    /// Returns the active model id.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Human-readable provider label, e.g. `OpenAI (gpt-5.2)`.
    pub fn provider_display(&self) -> String {
        format!("{} ({})", self.provider, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn openai_cfg() -> GatewayConfig {
        GatewayConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-5.2".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: Some("sk-test".into()),
            max_tokens: 256,
            temperature: 0.7,
            timeout_secs: None,
        }
    }

    #[test]
    fn dispatches_by_provider() {
        let gw = LlmGateway::new(openai_cfg()).unwrap();
        assert_eq!(gw.provider(), LlmProvider::OpenAi);
        assert_eq!(gw.model(), "gpt-5.2");

        let hf = LlmGateway::new(GatewayConfig {
            provider: LlmProvider::HuggingFace,
            model: "org/model".into(),
            endpoint: "https://api-inference.huggingface.co/models/".into(),
            api_key: Some("hf-test".into()),
            max_tokens: 256,
            temperature: 0.7,
            timeout_secs: Some(120),
        })
        .unwrap();
        assert_eq!(hf.provider(), LlmProvider::HuggingFace);
    }

    #[test]
    fn provider_display_includes_model() {
        let gw = LlmGateway::new(openai_cfg()).unwrap();
        assert_eq!(gw.provider_display(), "OpenAI (gpt-5.2)");
    }

    #[test]
    fn constructor_rejects_incomplete_config() {
        let mut cfg = openai_cfg();
        cfg.api_key = None;
        assert!(LlmGateway::new(cfg).is_err());
    }
}
