//! Provider health probes for a `/health` endpoint.
//!
//! [`HealthService::check`] never fails: probe errors collapse into a
//! [`HealthStatus`] with `ok = false`, so the endpoint always has something
//! to serialize. The provider-specific probes themselves are strict and
//! return real errors internally.
//!
//! Probes:
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, then a best-effort
//!   lookup of the configured model in the listing
//! - Hugging Face: `GET {endpoint}/{model}`, status only

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::gateway_config::GatewayConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{GatewayError, HealthError, HttpError, make_snippet};

/// One JSON-serializable probe outcome.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Display name of the probed backend.
    pub provider: String,
    /// Base URL the probe hit.
    pub endpoint: String,
    /// Model the probe was scoped to.
    pub model: Option<String>,
    /// Whether the backend looks usable.
    pub ok: bool,
    /// Wall-clock latency of the probe request.
    pub latency_ms: u128,
    /// One-line outcome summary.
    pub message: String,
}

impl HealthStatus {
    fn report(
        cfg: &GatewayConfig,
        ok: bool,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: cfg.provider.to_string(),
            endpoint: cfg.endpoint.clone(),
            model: Some(cfg.model.clone()),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker sharing one HTTP client across probes.
pub struct HealthService {
    client: reqwest::Client,
    base_timeout: Duration,
}

impl HealthService {
    /// Builds the checker; `timeout_secs` replaces the 10 s client default.
    ///
    /// # Errors
    /// [`GatewayError::HttpTransport`] when the client cannot be constructed.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, GatewayError> {
        let base_timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(base_timeout).build()?;
        info!(timeout_secs = base_timeout.as_secs(), "health service ready");
        Ok(Self {
            client,
            base_timeout,
        })
    }

    /// Probes the configured provider and always returns a status.
    pub async fn check(&self, cfg: &GatewayConfig) -> HealthStatus {
        let endpoint = cfg.endpoint.trim();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            warn!(provider = %cfg.provider, endpoint, "endpoint is not an http(s) URL");
            return HealthStatus::report(cfg, false, 0, "endpoint is empty or missing http/https");
        }

        let start = Instant::now();
        let outcome = match cfg.provider {
            LlmProvider::OpenAi => self.probe_openai(cfg).await,
            LlmProvider::HuggingFace => self.probe_huggingface(cfg).await,
        };
        let latency_ms = start.elapsed().as_millis();

        match outcome {
            Ok(status) => {
                info!(
                    provider = %status.provider,
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe finished"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::report(cfg, false, latency_ms, err.to_string());
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// OpenAI probe: list models with Bearer auth, then look for `cfg.model`.
    async fn probe_openai(&self, cfg: &GatewayConfig) -> Result<HealthStatus, GatewayError> {
        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        let key = cfg.api_key.as_deref().ok_or_else(|| {
            GatewayError::Health(HealthError::Decode("missing OpenAI API key".into()))
        })?;
        let auth = bearer_header(key)?;

        debug!(model = %cfg.model, "GET {url}");
        let start = Instant::now();
        let resp = self
            .client
            .get(&url)
            .timeout(self.probe_timeout(cfg))
            .header(header::AUTHORIZATION, auth)
            .send()
            .await?;
        let latency = start.elapsed().as_millis();
        let resp = require_success("OpenAI", &url, resp, latency).await?;

        // Minimal slice of the listing: { "data": [ { "id": ".." }, .. ] }
        #[derive(serde::Deserialize)]
        struct ModelEntry {
            id: String,
        }
        #[derive(serde::Deserialize)]
        struct ModelsPage {
            data: Vec<ModelEntry>,
        }

        Ok(match resp.json::<ModelsPage>().await {
            Ok(page) if page.data.iter().any(|m| m.id == cfg.model) => {
                HealthStatus::report(cfg, true, latency, "OpenAI is healthy; model is available")
            }
            Ok(_) => HealthStatus::report(
                cfg,
                false,
                latency,
                "OpenAI is up, but model not found in /v1/models",
            ),
            Err(err) => {
                // A 2xx with an undecodable body still proves the server answers.
                warn!(model = %cfg.model, error = %err, "could not decode /v1/models");
                HealthStatus::report(
                    cfg,
                    true,
                    latency,
                    format!("OpenAI is reachable; failed to decode /v1/models: {err}"),
                )
            }
        })
    }

    /// Hugging Face probe: GET the model URL, 2xx is healthy, body ignored.
    async fn probe_huggingface(&self, cfg: &GatewayConfig) -> Result<HealthStatus, GatewayError> {
        let url = format!("{}/{}", cfg.endpoint.trim_end_matches('/'), cfg.model);

        debug!(model = %cfg.model, "GET {url}");
        let mut req = self.client.get(&url).timeout(self.probe_timeout(cfg));
        if let Some(key) = cfg.api_key.as_deref() {
            req = req.header(header::AUTHORIZATION, bearer_header(key)?);
        }

        let start = Instant::now();
        let resp = req.send().await?;
        let latency = start.elapsed().as_millis();
        require_success("Hugging Face", &url, resp, latency).await?;

        Ok(HealthStatus::report(
            cfg,
            true,
            latency,
            "Hugging Face Inference API is reachable",
        ))
    }

    /// Per-config timeout, falling back to the client-wide default.
    fn probe_timeout(&self, cfg: &GatewayConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.base_timeout)
    }
}

/// Builds a Bearer header value; keys with control characters are rejected.
fn bearer_header(key: &str) -> Result<header::HeaderValue, GatewayError> {
    header::HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
        GatewayError::Health(HealthError::Decode(format!("invalid API key header: {e}")))
    })
}

/// Turns a non-2xx probe response into [`HealthError::HttpStatus`].
async fn require_success(
    provider: &str,
    url: &str,
    resp: reqwest::Response,
    latency_ms: u128,
) -> Result<reqwest::Response, GatewayError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    error!(provider, url, %status, %snippet, latency_ms, "health probe got non-success status");
    Err(GatewayError::Health(HealthError::HttpStatus(HttpError {
        status,
        url: url.to_string(),
        snippet,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cfg(provider: LlmProvider, endpoint: String) -> GatewayConfig {
        GatewayConfig {
            provider,
            model: "gpt-5.2".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: 256,
            temperature: 0.7,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn invalid_endpoint_fails_without_error() {
        let svc = HealthService::new(Some(1)).unwrap();
        let status = svc
            .check(&cfg(LlmProvider::OpenAi, "not-a-url".into()))
            .await;
        assert!(!status.ok);
        assert!(status.message.contains("http"));
    }

    #[tokio::test]
    async fn openai_probe_verifies_model_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"id": "gpt-5.2"}, {"id": "other"}]})),
            )
            .mount(&server)
            .await;

        let svc = HealthService::new(Some(5)).unwrap();
        let status = svc.check(&cfg(LlmProvider::OpenAi, server.uri())).await;
        assert!(status.ok);
        assert_eq!(status.provider, "OpenAI");
        assert!(status.message.contains("model is available"));
    }

    #[tokio::test]
    async fn huggingface_probe_is_status_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gpt-5.2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let svc = HealthService::new(Some(5)).unwrap();
        let status = svc
            .check(&cfg(LlmProvider::HuggingFace, server.uri()))
            .await;
        assert!(status.ok);
        assert_eq!(status.provider, "Hugging Face");
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let svc = HealthService::new(Some(5)).unwrap();
        let status = svc.check(&cfg(LlmProvider::OpenAi, server.uri())).await;
        assert!(!status.ok);
        assert!(status.message.contains("HTTP 500"));
    }
}
