use std::fmt;

use crate::error_handler::{ConfigError, Result};

/// The provider (backend) used for LLM inference.
///
/// The provider is fixed once at startup from `LLM_PROVIDER`; there is no
/// per-request switching. Adding a backend means extending this enum plus a
/// service for it under `services/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI chat-completions API.
    OpenAi,
    /// Hugging Face Inference API.
    HuggingFace,
}

impl LlmProvider {
    /// Parses the `LLM_PROVIDER` value (`openai` | `huggingface`).
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedProvider`] for anything else.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "huggingface" => Ok(Self::HuggingFace),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => f.write_str("OpenAI"),
            Self::HuggingFace => f.write_str("Hugging Face"),
        }
    }
}
