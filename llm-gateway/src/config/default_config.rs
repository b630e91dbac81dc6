//! Gateway configs loaded strictly from environment variables.
//!
//! Convenience constructors for [`GatewayConfig`], grouped by provider. The
//! generic [`config_from_env`] reads `LLM_PROVIDER` and dispatches.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`    = `openai` (default) | `huggingface`
//! - `LLM_MAX_TOKENS`  = generation ceiling (u32, default 4096)
//! - `LLM_TEMPERATURE` = default sampling temperature (f32, default 0.7)
//!
//! OpenAI:
//! - `OPENAI_API_KEY`  (required)
//! - `OPENAI_MODEL_ID` (default `gpt-5.2`)
//!
//! Hugging Face:
//! - `HF_API_KEY`  (required)
//! - `HF_MODEL_ID` (default `mistralai/Mistral-7B-Instruct-v0.3`)
//! - `HF_API_URL`  (default `https://api-inference.huggingface.co/models/`)

use crate::{
    config::{gateway_config::GatewayConfig, llm_provider::LlmProvider},
    error_handler::{Result, env_f32_or, env_or, env_u32_or, must_env},
};

const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const HF_DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/";

/// Builds the config for whichever provider `LLM_PROVIDER` selects.
///
/// # Errors
/// Propagates missing/invalid variables from the provider constructors and
/// rejects unknown provider names.
pub fn config_from_env() -> Result<GatewayConfig> {
    match LlmProvider::parse(&env_or("LLM_PROVIDER", "openai"))? {
        LlmProvider::OpenAi => config_openai(),
        LlmProvider::HuggingFace => config_huggingface(),
    }
}

/// Config for the OpenAI chat-completions backend.
///
/// No client timeout is set for this path; the request relies on the
/// transport default.
///
/// # Env
/// `OPENAI_API_KEY` (required), `OPENAI_MODEL_ID`, `LLM_MAX_TOKENS`,
/// `LLM_TEMPERATURE`
pub fn config_openai() -> Result<GatewayConfig> {
    Ok(GatewayConfig {
        provider: LlmProvider::OpenAi,
        model: env_or("OPENAI_MODEL_ID", "gpt-5.2"),
        endpoint: OPENAI_ENDPOINT.to_string(),
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_u32_or("LLM_MAX_TOKENS", 4096)?,
        temperature: env_f32_or("LLM_TEMPERATURE", 0.7)?,
        timeout_secs: None,
    })
}

/// Config for the Hugging Face Inference API backend.
///
/// Requests get a fixed 120 s timeout.
///
/// # Env
/// `HF_API_KEY` (required), `HF_MODEL_ID`, `HF_API_URL`, `LLM_MAX_TOKENS`,
/// `LLM_TEMPERATURE`
pub fn config_huggingface() -> Result<GatewayConfig> {
    Ok(GatewayConfig {
        provider: LlmProvider::HuggingFace,
        model: env_or("HF_MODEL_ID", "mistralai/Mistral-7B-Instruct-v0.3"),
        endpoint: env_or("HF_API_URL", HF_DEFAULT_ENDPOINT),
        api_key: Some(must_env("HF_API_KEY")?),
        max_tokens: env_u32_or("LLM_MAX_TOKENS", 4096)?,
        temperature: env_f32_or("LLM_TEMPERATURE", 0.7)?,
        timeout_secs: Some(120),
    })
}
