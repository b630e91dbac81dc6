//! LLM gateway over interchangeable hosted backends.
//!
//! One configured provider serves all text generation for the application.
//! Supported backends:
//! - **OpenAI** chat completions (`POST /v1/chat/completions`)
//! - **Hugging Face** Inference API (`POST {base}/{model}`)
//!
//! The provider is selected once from the environment (`LLM_PROVIDER`) and
//! wrapped in [`gateway::LlmGateway`]; callers never branch on the backend.
//!
//! # Env
//! - `LLM_PROVIDER`: `openai` (default) or `huggingface`
//! - `OPENAI_API_KEY` / `OPENAI_MODEL_ID` for OpenAI
//! - `HF_API_KEY` / `HF_MODEL_ID` / `HF_API_URL` for Hugging Face
//! - `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`: shared generation limits

pub mod config;
pub mod error_handler;
pub mod gateway;
pub mod health_service;
pub mod services;

pub use config::{GatewayConfig, LlmProvider, config_from_env};
pub use error_handler::{GatewayError, Result};
pub use gateway::LlmGateway;
pub use health_service::{HealthService, HealthStatus};
