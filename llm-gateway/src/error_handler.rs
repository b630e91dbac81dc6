//! Unified error handling for `llm-gateway`.
//!
//! One top-level error type [`GatewayError`] for the whole crate, with
//! domain-specific enums nested under it ([`ConfigError`], [`ProviderError`],
//! [`HealthError`]). Small helpers for reading environment variables return
//! the unified [`Result<T>`] alias.
//!
//! All messages carry the `[LLM Gateway]` prefix to simplify attribution in
//! logs.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Top-level error for the `llm-gateway` crate.
///
/// Variants wrap domain-specific enums; prefer adding new sub-enums for
/// distinct domains instead of growing this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Request-level errors from a concrete provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Health probe errors.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Underlying HTTP transport error, including client-side timeouts.
    #[error("[LLM Gateway] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors that realistically happen while loading configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[LLM Gateway] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, temperatures).
    #[error("[LLM Gateway] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_PROVIDER`.
    #[error("[LLM Gateway] unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// A request-level failure attributed to one provider.
#[derive(Debug, Error)]
#[error("[LLM Gateway] {provider} error: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

/// What went wrong inside a provider call.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    /// The config names a different provider than this service handles.
    #[error("configured provider does not match this service")]
    InvalidProvider,

    /// No API key was configured for a provider that requires one.
    #[error("missing API key")]
    MissingApiKey,

    /// Endpoint is empty or does not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Upstream rejected the credential (401/403).
    #[error("authentication rejected: {0}")]
    Auth(HttpError),

    /// Upstream rate limit hit (429).
    #[error("rate limited: {0}")]
    RateLimited(HttpError),

    /// Upstream server failure (5xx).
    #[error("upstream failure: {0}")]
    Upstream(HttpError),

    /// Any other non-2xx response.
    #[error("unexpected status: {0}")]
    HttpStatus(HttpError),

    /// Response payload could not be decoded as expected.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The completion response carried no usable choice.
    #[error("no choices in completion response")]
    EmptyChoices,
}

impl ProviderErrorKind {
    /// Classifies a non-2xx response by status code.
    pub fn from_status(status: StatusCode, url: String, snippet: String) -> Self {
        let http = HttpError {
            status,
            url,
            snippet,
        };
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(http),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(http),
            s if s.is_server_error() => Self::Upstream(http),
            _ => Self::HttpStatus(http),
        }
    }
}

/// Status, URL, and a short body snippet of a failed HTTP exchange.
#[derive(Debug, Error)]
#[error("HTTP {status} from {url}: {snippet}")]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    pub snippet: String,
}

/* ------------------------------------------------------------------------- */
/* Health errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors from strict provider health probes.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[LLM Gateway] {0}")]
    HttpStatus(HttpError),

    /// Probe response could not be decoded.
    #[error("[LLM Gateway] decode error: {0}")]
    Decode(String),
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Fetches an optional environment variable, falling back to `default`.
pub fn env_or(name: &'static str, default: &str) -> String {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

/// Parses an optional `u32` from env, falling back to `default`.
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if the variable is set but not a `u32`.
pub fn env_u32_or(name: &'static str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<u32>().map_err(|_| {
            GatewayError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        _ => Ok(default),
    }
}

/// Parses an optional `f32` from env, falling back to `default`.
///
/// # Errors
/// [`ConfigError::InvalidNumber`] if the variable is set but not an `f32`.
pub fn env_f32_or(name: &'static str, default: f32) -> Result<f32> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.trim().parse::<f32>().map_err(|_| {
            GatewayError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected f32",
            })
        }),
        _ => Ok(default),
    }
}

/// Trims a response body down to a short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.len() <= MAX {
        return trimmed.to_string();
    }
    let mut end = MAX;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}
