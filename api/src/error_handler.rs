//! HTTP error surface.
//!
//! Handlers return [`AppResult`]; every failure serializes as a small
//! `{ error, message }` JSON body with a matching status code. Repository
//! load failures are classified here so callers can tell their own
//! mistakes (bad path, bad URL) from upstream clone trouble.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm_gateway::GatewayError;
use repo_agent::AgentError;
use repo_fetcher::FetchError;
use repo_indexer::ScanError;
use serde::Serialize;
use thiserror::Error;

/// Application-level error for the HTTP surface.
#[derive(Debug, Error)]
pub enum AppError {
    // startup
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    // serving
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // per-request
    #[error("not found")]
    NotFound,

    /// Classified HTTP error carrying its own status and code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    /// Status and machine-readable code, decided in one place per variant.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MissingEnv(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MISSING_ENV"),
            AppError::Gateway(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GATEWAY_CONFIG_ERROR"),
            AppError::Bind(_) => (StatusCode::INTERNAL_SERVER_ERROR, "BIND_ERROR"),
            AppError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Http { status, code, .. } => (*status, code),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        let body = ErrorBody {
            error: code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Converts load failures to `AppError::Http` with precise status & code.
/// Git failures fall back to text heuristics since libgit2 reports most
/// remote conditions as a single error class.
impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        let message = err.to_string();
        let (status, code) = match &err {
            AgentError::Scan(ScanError::InvalidRoot(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ROOT")
            }
            AgentError::Scan(ScanError::Io { .. }) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR")
            }
            AgentError::Fetch(FetchError::InvalidUrl(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_URL")
            }
            AgentError::Fetch(FetchError::Timeout(_)) => {
                (StatusCode::BAD_GATEWAY, "CLONE_TIMEOUT")
            }
            AgentError::Fetch(FetchError::Git(_)) => {
                let lower = message.to_lowercase();
                if lower.contains("auth")
                    || lower.contains("denied")
                    || lower.contains("permission")
                {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
                } else if lower.contains("not found") {
                    (StatusCode::NOT_FOUND, "REPO_NOT_FOUND")
                } else {
                    (StatusCode::BAD_GATEWAY, "GIT_REMOTE_ERROR")
                }
            }
            AgentError::Fetch(FetchError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR")
            }
            AgentError::Fetch(FetchError::Join(_)) | AgentError::Join(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "JOIN_ERROR")
            }
        };

        AppError::Http {
            status,
            code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classified(err: AgentError) -> (StatusCode, &'static str) {
        match AppError::from(err) {
            AppError::Http { status, code, .. } => (status, code),
            other => panic!("expected Http variant, got {other:?}"),
        }
    }

    #[test]
    fn bad_inputs_map_to_client_errors() {
        let scan = AgentError::Scan(ScanError::InvalidRoot(PathBuf::from("/missing")));
        assert_eq!(classified(scan), (StatusCode::BAD_REQUEST, "INVALID_ROOT"));

        let fetch = AgentError::Fetch(FetchError::InvalidUrl("ftp://nope".into()));
        assert_eq!(classified(fetch), (StatusCode::BAD_REQUEST, "INVALID_URL"));
    }

    #[test]
    fn clone_problems_map_to_upstream_errors() {
        let timeout = AgentError::Fetch(FetchError::Timeout(120));
        assert_eq!(
            classified(timeout),
            (StatusCode::BAD_GATEWAY, "CLONE_TIMEOUT")
        );

        let remote = AgentError::Fetch(FetchError::Git(git2::Error::from_str("early EOF")));
        assert_eq!(
            classified(remote),
            (StatusCode::BAD_GATEWAY, "GIT_REMOTE_ERROR")
        );
    }

    #[test]
    fn git_messages_drive_auth_and_missing_repo_statuses() {
        let auth = AgentError::Fetch(FetchError::Git(git2::Error::from_str(
            "authentication required but no callback set",
        )));
        assert_eq!(classified(auth), (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"));

        let missing = AgentError::Fetch(FetchError::Git(git2::Error::from_str(
            "repository not found",
        )));
        assert_eq!(classified(missing), (StatusCode::NOT_FOUND, "REPO_NOT_FOUND"));
    }

    #[test]
    fn not_found_renders_404() {
        let response = AppError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
