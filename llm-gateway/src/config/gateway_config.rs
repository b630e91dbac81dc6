use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM backend, built once at startup.
///
/// # Fields
///
/// - `provider`: Which backend to use (OpenAI or Hugging Face).
/// - `model`: Model identifier (e.g., `"gpt-5.2"`,
///   `"mistralai/Mistral-7B-Instruct-v0.3"`).
/// - `endpoint`: API base URL. For Hugging Face the model id is appended to
///   this base when building the request URL.
/// - `api_key`: Bearer credential; both supported providers require one.
/// - `max_tokens`: Shared generation ceiling for both backends.
/// - `temperature`: Default sampling temperature; callers may override per
///   request.
/// - `timeout_secs`: Optional request timeout. `None` leaves the transport
///   default in place (the OpenAI path); Hugging Face uses a fixed 120 s.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: Option<u64>,
}
