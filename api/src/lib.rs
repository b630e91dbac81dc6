//! HTTP surface of the repository analysis service.
//!
//! [`start`] reads the environment once, builds the shared
//! [`AppState`](core::app_state::AppState), and serves the JSON API until a
//! shutdown signal arrives. All state lives behind one async mutex; the
//! service analyzes one repository at a time.
//!
//! # Env
//! - `API_ADDRESS` (required), e.g. `127.0.0.1:8080`.
//! - Gateway variables read by [`llm_gateway::config_from_env`].

use std::env;
use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

use crate::core::app_state::AppState;
use crate::error_handler::AppError;
use crate::routes::{
    ask::ask_question_route::ask_question, chat_history_route::chat_history,
    diagram::generate_diagram_route::generate_diagram, diagram_route::last_diagram,
    file_tree_route::file_tree, health_route::health,
    repository::load_repository_route::load_repository, reset_session_route::reset_session,
};

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/load_repository", post(load_repository))
        .route("/ask_question", post(ask_question))
        .route("/generate_diagram", post(generate_diagram))
        .route("/file_tree", get(file_tree))
        .route("/chat_history", get(chat_history))
        .route("/diagram", get(last_diagram))
        .route("/reset_session", post(reset_session))
        .route("/health", get(health))
        .with_state(state)
}

/// Binds `API_ADDRESS` and serves the API until Ctrl+C.
///
/// # Errors
/// Missing `API_ADDRESS`, gateway misconfiguration, bind failures, and
/// fatal serve errors.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").map_err(|_| AppError::MissingEnv("API_ADDRESS"))?;

    let state = Arc::new(AppState::from_env()?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "shutdown signal listener failed");
        // Returning here would begin graceful shutdown immediately, so
        // park this future and leave stopping to the supervisor.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::Json;
    use axum::extract::State;
    use axum::http::StatusCode;
    use llm_gateway::{GatewayConfig, HealthService, LlmGateway, LlmProvider};
    use repo_agent::RepoSession;
    use serde_json::json;
    use tokio::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::ask::ask_request::AskRequest;
    use crate::routes::diagram::generate_diagram_request::GenerateDiagramRequest;
    use crate::routes::repository::load_repository_request::LoadRepositoryRequest;

    fn test_state(endpoint: String) -> Arc<AppState> {
        let cfg = GatewayConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-5.2".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: 256,
            temperature: 0.7,
            timeout_secs: Some(5),
        };
        let gateway = Arc::new(LlmGateway::new(cfg.clone()).unwrap());

        Arc::new(AppState {
            session: Mutex::new(RepoSession::new(gateway)),
            health: HealthService::new(Some(2)).unwrap(),
            cfg,
        })
    }

    async fn mock_completions(server: &MockServer, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"choices": [{"message": {"role": "assistant", "content": text}}]}),
            ))
            .mount(server)
            .await;
    }

    fn demo_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.py"), "print('x')").unwrap();
        std::fs::write(dir.path().join("README.md"), "# Demo").unwrap();
        dir
    }

    #[tokio::test]
    async fn load_route_reports_index_stats() {
        let server = MockServer::start().await;
        mock_completions(&server, "A small demo.").await;
        let state = test_state(server.uri());

        let dir = demo_repo();
        let Json(report) = load_repository(
            State(state.clone()),
            Json(LoadRepositoryRequest {
                source: dir.path().display().to_string(),
                branch: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.summary, "A small demo.");

        let Json(tree) = file_tree(State(state)).await;
        assert_eq!(tree.tree, "README.md\nsrc/main.py");
    }

    #[tokio::test]
    async fn load_route_rejects_bad_paths_as_client_errors() {
        let state = test_state("http://127.0.0.1:9".into());

        let err = load_repository(
            State(state),
            Json(LoadRepositoryRequest {
                source: "/definitely/missing".into(),
                branch: None,
            }),
        )
        .await
        .unwrap_err();

        match err {
            AppError::Http { status, code, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(code, "INVALID_ROOT");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ask_and_history_round_trip() {
        let server = MockServer::start().await;
        mock_completions(&server, "It is a demo script.").await;
        let state = test_state(server.uri());

        let dir = demo_repo();
        load_repository(
            State(state.clone()),
            Json(LoadRepositoryRequest {
                source: dir.path().display().to_string(),
                branch: None,
            }),
        )
        .await
        .unwrap();

        let Json(response) = ask_question(
            State(state.clone()),
            Json(AskRequest {
                question: "What does main.py do?".into(),
            }),
        )
        .await;
        assert_eq!(response.answer, "It is a demo script.");

        let Json(history) = chat_history(State(state)).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].question, "What does main.py do?");
    }

    #[tokio::test]
    async fn diagram_is_cached_for_get() {
        let state = test_state("http://127.0.0.1:9".into());

        let before = last_diagram(State(state.clone())).await;
        assert!(matches!(before, Err(AppError::NotFound)));

        let Json(result) = generate_diagram(
            State(state.clone()),
            Json(GenerateDiagramRequest {
                diagram_type: "SEQUENCE_DIAGRAM".into(),
                focus: None,
            }),
        )
        .await;
        assert_eq!(result.diagram_type, "SEQUENCE_DIAGRAM");
        assert_eq!(result.description, "No repository loaded.");

        let Json(cached) = last_diagram(State(state)).await.unwrap();
        assert_eq!(cached.diagram_type, "SEQUENCE_DIAGRAM");
    }

    #[tokio::test]
    async fn unknown_diagram_types_render_as_architecture() {
        let state = test_state("http://127.0.0.1:9".into());

        let Json(result) = generate_diagram(
            State(state),
            Json(GenerateDiagramRequest {
                diagram_type: "PIE_CHART".into(),
                focus: None,
            }),
        )
        .await;

        assert_eq!(result.diagram_type, "ARCHITECTURE_DIAGRAM");
    }

    #[tokio::test]
    async fn reset_route_clears_state() {
        let server = MockServer::start().await;
        mock_completions(&server, "summary").await;
        let state = test_state(server.uri());

        let dir = demo_repo();
        load_repository(
            State(state.clone()),
            Json(LoadRepositoryRequest {
                source: dir.path().display().to_string(),
                branch: None,
            }),
        )
        .await
        .unwrap();

        let Json(reset) = reset_session(State(state.clone())).await;
        assert!(reset.reset);

        let Json(tree) = file_tree(State(state.clone())).await;
        assert_eq!(tree.tree, "");
        let Json(history) = chat_history(State(state)).await;
        assert!(history.is_empty());
    }
}
