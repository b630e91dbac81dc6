//! Hugging Face Inference API service.
//!
//! Thin client for hosted text-generation models:
//! - POST {endpoint}/{model_id} with `{"inputs", "parameters"}`
//!
//! The Inference API answers in more than one shape; responses are
//! normalized in this order:
//! 1. list of objects  -> first element's `generated_text` (or empty)
//! 2. single object    -> its `generated_text`, else the raw payload
//! 3. anything else    -> stringified payload
//!
//! Requests carry a fixed timeout (120 s unless the config overrides it).

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    config::{gateway_config::GatewayConfig, llm_provider::LlmProvider},
    error_handler::{GatewayError, ProviderError, ProviderErrorKind, make_snippet},
};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Thin client for the Hugging Face Inference API.
#[derive(Debug)]
pub struct HfInferenceService {
    client: reqwest::Client,
    cfg: GatewayConfig,
    model_url: String,
}

impl HfInferenceService {
    /// Creates a new [`HfInferenceService`] from the given config.
    ///
    /// # Errors
    /// - [`GatewayError::Provider`] with `InvalidProvider` if `cfg.provider` is not Hugging Face
    /// - [`GatewayError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`GatewayError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`GatewayError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: GatewayConfig) -> Result<Self, GatewayError> {
        // 1) Refuse configs meant for another backend.
        if cfg.provider != LlmProvider::HuggingFace {
            return Err(hf_error(ProviderErrorKind::InvalidProvider));
        }

        // 2) A credential is mandatory here.
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| hf_error(ProviderErrorKind::MissingApiKey))?;

        // 3) Endpoint sanity.
        let endpoint = cfg.endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(hf_error(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        // 4) Client with auth baked in; inference calls always get a timeout.
        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(auth_headers(&api_key)?)
            .build()?;

        let model_url = format!("{}/{}", endpoint.trim_end_matches('/'), cfg.model);

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "HfInferenceService initialized"
        );

        Ok(Self {
            client,
            cfg,
            model_url,
        })
    }

    /// Runs one text-generation request and normalizes the response.
    ///
    /// `temperature_override` replaces the configured default for this call.
    ///
    /// # Errors
    /// - [`GatewayError::Provider`] with `Auth`/`RateLimited`/`Upstream`/`HttpStatus`
    ///   for non-2xx responses, classified by status code
    /// - [`GatewayError::HttpTransport`] for client/network failures and timeouts
    /// - [`GatewayError::Provider`] with `Decode` if the body is not JSON
    pub async fn generate(
        &self,
        prompt: &str,
        temperature_override: Option<f32>,
    ) -> Result<String, GatewayError> {
        let start = Instant::now();
        let temperature = temperature_override.unwrap_or(self.cfg.temperature);
        let body = InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.cfg.max_tokens,
                temperature,
                return_full_text: false,
            },
        };

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            temperature,
            "POST {}", self.model_url
        );

        let resp = self.client.post(&self.model_url).json(&body).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                %status,
                url = %self.model_url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = start.elapsed().as_millis(),
                "inference returned non-success status"
            );
            return Err(hf_error(ProviderErrorKind::from_status(
                status,
                self.model_url.clone(),
                snippet,
            )));
        }

        let value: Value = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                model = %self.cfg.model,
                latency_ms = start.elapsed().as_millis(),
                "inference response was not JSON"
            );
            hf_error(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected JSON body"
            )))
        })?;

        let text = normalize_response(&value);

        info!(
            model = %self.cfg.model,
            latency_ms = start.elapsed().as_millis(),
            "inference finished"
        );

        Ok(text)
    }
}

fn hf_error(kind: ProviderErrorKind) -> GatewayError {
    ProviderError::new(LlmProvider::HuggingFace, kind).into()
}

/// Authorization and content-type defaults shared by every request.
fn auth_headers(api_key: &str) -> Result<header::HeaderMap, GatewayError> {
    let bearer = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
        hf_error(ProviderErrorKind::Decode(format!(
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

/// Extracts generated text from the known Inference API response shapes.
fn normalize_response(value: &Value) -> String {
    match value {
        Value::Array(items) if !items.is_empty() => items[0]
            .get("generated_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
        Value::Object(map) => map
            .get("generated_text")
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| value.to_string().trim().to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Request body for the Inference API text-generation task.
#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    return_full_text: bool,
}
