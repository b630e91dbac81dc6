//! OpenAI chat-completions service.
//!
//! Minimal, non-streaming client around the OpenAI REST API:
//! - POST {endpoint}/v1/chat/completions
//!
//! Constructor validation:
//! - `cfg.provider` must be [`LlmProvider::OpenAi`]
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! No client-side timeout is configured on this path; requests rely on the
//! transport default. Errors are normalized via `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{gateway_config::GatewayConfig, llm_provider::LlmProvider},
    error_handler::{GatewayError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the OpenAI chat-completions API.
///
/// Constructed from a complete [`GatewayConfig`]; keeps a preconfigured
/// `reqwest::Client` with default headers.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: GatewayConfig,
    chat_url: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`GatewayError::Provider`] with `InvalidProvider` if `cfg.provider` is not OpenAI
    /// - [`GatewayError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`GatewayError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`GatewayError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: GatewayConfig) -> Result<Self, GatewayError> {
        // 1) Refuse configs meant for another backend.
        if cfg.provider != LlmProvider::OpenAi {
            return Err(openai_error(ProviderErrorKind::InvalidProvider));
        }

        // 2) A credential is mandatory here.
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| openai_error(ProviderErrorKind::MissingApiKey))?;

        // 3) Endpoint sanity.
        let endpoint = cfg.endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(openai_error(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        // 4) Client with auth baked into the default headers.
        let mut builder = reqwest::Client::builder().default_headers(auth_headers(&api_key)?);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let chat_url = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            chat_url,
        })
    }

    /// Performs a **non-streaming** chat completion with a single user
    /// message, returning the first choice's content.
    ///
    /// `temperature_override` replaces the configured default for this call.
    ///
    /// # Errors
    /// - [`GatewayError::Provider`] with `Auth`/`RateLimited`/`Upstream`/`HttpStatus`
    ///   for non-2xx responses, classified by status code
    /// - [`GatewayError::HttpTransport`] for client/network failures
    /// - [`GatewayError::Provider`] with `Decode` if the JSON cannot be parsed
    /// - [`GatewayError::Provider`] with `EmptyChoices` if no choices come back
    pub async fn generate(
        &self,
        prompt: &str,
        temperature_override: Option<f32>,
    ) -> Result<String, GatewayError> {
        let start = Instant::now();
        let temperature = temperature_override.unwrap_or(self.cfg.temperature);
        let body = CompletionRequest::single_user(&self.cfg, prompt, temperature);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            temperature,
            "POST {}", self.chat_url
        );

        let resp = self.client.post(&self.chat_url).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                %status,
                url = %self.chat_url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = start.elapsed().as_millis(),
                "chat completion returned non-success status"
            );
            return Err(openai_error(ProviderErrorKind::from_status(
                status,
                self.chat_url.clone(),
                snippet,
            )));
        }

        let parsed: CompletionResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = start.elapsed().as_millis(),
                "chat completion response did not decode"
            );
            openai_error(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            )))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| openai_error(ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %self.cfg.model,
            latency_ms = start.elapsed().as_millis(),
            "chat completion finished"
        );

        Ok(content)
    }
}

fn openai_error(kind: ProviderErrorKind) -> GatewayError {
    ProviderError::new(LlmProvider::OpenAi, kind).into()
}

/// Authorization and content-type defaults shared by every request.
fn auth_headers(api_key: &str) -> Result<header::HeaderMap, GatewayError> {
    let bearer = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
        openai_error(ProviderErrorKind::Decode(format!(
            "invalid API key header: {e}"
        )))
    })?;

    let mut headers = header::HeaderMap::new();
    headers.insert(header::AUTHORIZATION, bearer);
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(headers)
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for `/v1/chat/completions`, non-streaming.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_completion_tokens: u32,
    temperature: f32,
}

impl<'a> CompletionRequest<'a> {
    /// One user message carrying the whole prompt.
    fn single_user(cfg: &'a GatewayConfig, prompt: &'a str, temperature: f32) -> Self {
        Self {
            model: &cfg.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_completion_tokens: cfg.max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// The slice of the response this client reads.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
