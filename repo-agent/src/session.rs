//! The repository analysis session.
//!
//! One [`RepoSession`] owns everything tied to the currently loaded
//! repository: the file index, the cached project summary, the chat
//! history, the last generated diagram, and (for remote loads) the
//! temporary clone directory. Loading replaces all of it wholesale;
//! [`RepoSession::reset`] drops all of it.
//!
//! Failure policy: loading fails loudly with [`AgentError`], but questions
//! and diagrams never do. A failed LLM call during Q&A becomes an
//! `Error: ...` answer, a failed call or unparseable response during
//! diagram generation falls back to the deterministic module blueprint,
//! and a failed summary becomes a parenthesized placeholder.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task;
use tracing::{info, instrument, warn};

use diagram_engine::{Blueprint, DiagramType, fallback_blueprint, parse_blueprint, render};
use llm_gateway::LlmGateway;
use repo_fetcher::{CloneHandle, clone_repository};
use repo_indexer::{RepositoryIndex, scan_repository};

use crate::context;
use crate::errors::Result;
use crate::prompts;

/// Answer given when questions or diagrams are requested with no files loaded.
pub const NO_REPOSITORY_MESSAGE: &str = "No repository loaded. Please load a repository first.";

const SUMMARY_TEMPERATURE: f32 = 0.3;
const QUESTION_TEMPERATURE: f32 = 0.4;
const BLUEPRINT_TEMPERATURE: f32 = 0.3;

/// Where a load came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Local,
    Remote,
}

/// Statistics and summary returned by a successful load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub root: String,
    pub source: LoadSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    pub total_files: usize,
    pub languages: BTreeMap<String, usize>,
    pub summary: String,
    pub loaded_at: DateTime<Utc>,
}

/// One question/answer exchange.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

/// A generated diagram plus the blueprint it was rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramResult {
    pub diagram_type: String,
    pub diagram: String,
    pub description: String,
    pub blueprint: Blueprint,
}

/// Mutable per-process analysis state over one repository at a time.
pub struct RepoSession {
    gateway: Arc<LlmGateway>,
    index: Option<RepositoryIndex>,
    summary: String,
    chat: Vec<ChatTurn>,
    clone_handle: Option<CloneHandle>,
    last_diagram: Option<DiagramResult>,
}

impl RepoSession {
    pub fn new(gateway: Arc<LlmGateway>) -> Self {
        Self {
            gateway,
            index: None,
            summary: String::new(),
            chat: Vec::new(),
            clone_handle: None,
            last_diagram: None,
        }
    }

    /// Scans a local directory and makes it the current repository.
    ///
    /// On success the previous index, chat history, and diagram are
    /// replaced; on failure the session keeps whatever was loaded before.
    ///
    /// # Errors
    /// [`AgentError::Scan`](crate::errors::AgentError) if the path is not a
    /// readable directory; [`AgentError::Join`](crate::errors::AgentError)
    /// if the blocking scan task dies.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn load_path(&mut self, path: &Path) -> Result<LoadReport> {
        let root = path.to_path_buf();
        let index = task::spawn_blocking(move || scan_repository(&root)).await??;
        Ok(self.install_index(index, LoadSource::Local, None).await)
    }

    /// Shallow-clones a remote repository and makes it the current one.
    ///
    /// Any previous clone directory is removed first. The clone itself is
    /// bounded by the fetcher's 120 s ceiling.
    ///
    /// # Errors
    /// [`AgentError::Fetch`](crate::errors::AgentError) for invalid URLs and
    /// clone failures; scan errors as in [`RepoSession::load_path`].
    #[instrument(skip_all, fields(url = %url))]
    pub async fn load_url(&mut self, url: &str, branch: Option<&str>) -> Result<LoadReport> {
        if let Some(previous) = self.clone_handle.take() {
            previous.cleanup();
        }

        let handle = clone_repository(url, branch).await?;
        let root = handle.path().to_path_buf();
        let index = task::spawn_blocking(move || scan_repository(&root)).await??;

        let git_url = handle.url().to_string();
        self.clone_handle = Some(handle);
        Ok(self
            .install_index(index, LoadSource::Remote, Some(git_url))
            .await)
    }

    /// Answers a question about the loaded repository.
    ///
    /// Never fails: without loaded files the answer is
    /// [`NO_REPOSITORY_MESSAGE`] and the gateway is not called; a gateway
    /// failure becomes an `Error: ...` answer. The exchange is appended to
    /// the chat history either way.
    #[instrument(skip_all)]
    pub async fn ask(&mut self, question: &str) -> String {
        let answer = match self.loaded_index() {
            None => NO_REPOSITORY_MESSAGE.to_string(),
            Some(index) => {
                let ctx = context::question_context(
                    index,
                    question,
                    context::QUESTION_CONTEXT_BUDGET,
                );
                let prompt = prompts::question_prompt(&self.summary, &ctx, question);
                match self
                    .gateway
                    .generate(&prompt, Some(QUESTION_TEMPERATURE))
                    .await
                {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(error = %err, "question answering failed");
                        format!("Error: {err}")
                    }
                }
            }
        };

        self.chat.push(ChatTurn {
            question: question.to_string(),
            answer: answer.clone(),
            asked_at: Utc::now(),
        });
        answer
    }

    /// Generates a Mermaid diagram for the loaded repository.
    ///
    /// Always produces a result: without loaded files it is an empty diagram
    /// with a "No repository loaded." description; when the LLM call or the
    /// blueprint parse fails, the deterministic fallback blueprint is
    /// rendered instead. The result is cached for later retrieval.
    #[instrument(skip_all, fields(diagram_type = %diagram_type))]
    pub async fn generate_diagram(
        &mut self,
        diagram_type: DiagramType,
        focus: &str,
    ) -> DiagramResult {
        let result = match self.loaded_index() {
            None => DiagramResult {
                diagram_type: diagram_type.as_str().to_string(),
                diagram: String::new(),
                description: "No repository loaded.".to_string(),
                blueprint: Blueprint::default(),
            },
            Some(index) => {
                let tree = context::file_tree(index);
                let snippets = context::key_snippets(index, context::DIAGRAM_SNIPPET_BUDGET);
                let prompt = prompts::blueprint_prompt(
                    diagram_type.as_str(),
                    focus,
                    &self.summary,
                    &tree,
                    &snippets,
                );

                let mut blueprint = match self
                    .gateway
                    .generate(&prompt, Some(BLUEPRINT_TEMPERATURE))
                    .await
                {
                    Ok(response) => match parse_blueprint(&response) {
                        Ok(bp) => bp,
                        Err(err) => {
                            warn!(error = %err, "blueprint parse failed, using fallback");
                            fallback_blueprint(index)
                        }
                    },
                    Err(err) => {
                        warn!(error = %err, "blueprint generation failed, using fallback");
                        fallback_blueprint(index)
                    }
                };
                blueprint.refresh_metadata();

                let diagram = render(&blueprint, diagram_type);
                DiagramResult {
                    diagram_type: diagram_type.as_str().to_string(),
                    diagram,
                    description: blueprint.description.clone(),
                    blueprint,
                }
            }
        };

        self.last_diagram = Some(result.clone());
        result
    }

    /// Drops the loaded repository, summary, history, diagram, and clone.
    pub fn reset(&mut self) {
        self.index = None;
        self.summary.clear();
        self.chat.clear();
        self.last_diagram = None;
        if let Some(handle) = self.clone_handle.take() {
            handle.cleanup();
        }
        info!("session reset");
    }

    /// Sorted newline-joined paths of the loaded repository, or empty.
    pub fn file_tree(&self) -> String {
        self.index
            .as_ref()
            .map(context::file_tree)
            .unwrap_or_default()
    }

    pub fn chat_history(&self) -> &[ChatTurn] {
        &self.chat
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn last_diagram(&self) -> Option<&DiagramResult> {
        self.last_diagram.as_ref()
    }

    /// Index with at least one file; questions and diagrams need content,
    /// not just a successful (possibly empty) scan.
    fn loaded_index(&self) -> Option<&RepositoryIndex> {
        self.index.as_ref().filter(|i| !i.is_empty())
    }

    /// Replaces the session state with a freshly scanned index.
    async fn install_index(
        &mut self,
        index: RepositoryIndex,
        source: LoadSource,
        git_url: Option<String>,
    ) -> LoadReport {
        let summary = self.build_summary(&index).await;
        let languages = index
            .language_counts
            .iter()
            .map(|(lang, count)| ((*lang).to_string(), *count))
            .collect();

        let report = LoadReport {
            root: index.root.display().to_string(),
            source,
            git_url,
            total_files: index.total_files(),
            languages,
            summary: summary.clone(),
            loaded_at: Utc::now(),
        };

        info!(
            total_files = report.total_files,
            source = ?report.source,
            "repository loaded"
        );

        self.index = Some(index);
        self.summary = summary;
        self.chat.clear();
        self.last_diagram = None;
        report
    }

    async fn build_summary(&self, index: &RepositoryIndex) -> String {
        let tree = context::file_tree(index);
        let snippets = context::key_snippets(index, context::SUMMARY_SNIPPET_BUDGET);
        let prompt = prompts::summary_prompt(&tree, &snippets);
        match self
            .gateway
            .generate(&prompt, Some(SUMMARY_TEMPERATURE))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "summary generation failed");
                format!("(Could not generate summary: {err})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AgentError;

    use llm_gateway::{GatewayConfig, LlmProvider};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(endpoint: String) -> Arc<LlmGateway> {
        let cfg = GatewayConfig {
            provider: LlmProvider::OpenAi,
            model: "gpt-5.2".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: 512,
            temperature: 0.7,
            timeout_secs: Some(5),
        };
        Arc::new(LlmGateway::new(cfg).unwrap())
    }

    fn unreachable_gateway() -> Arc<LlmGateway> {
        gateway_for("http://127.0.0.1:9".into())
    }

    fn completion(text: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": text}}]})
    }

    async fn mock_completions(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    fn demo_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("src/app.py"), "print('hi')").unwrap();
        std::fs::write(dir.path().join("docs/readme.md"), "# Demo").unwrap();
        dir
    }

    #[tokio::test]
    async fn loading_a_directory_builds_index_and_summary() {
        let server = MockServer::start().await;
        mock_completions(&server, completion("A tidy project.")).await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        let report = session.load_path(dir.path()).await.unwrap();

        assert_eq!(report.total_files, 2);
        assert_eq!(report.languages.get("python"), Some(&1));
        assert_eq!(report.languages.get("markdown"), Some(&1));
        assert_eq!(report.summary, "A tidy project.");
        assert_eq!(report.source, LoadSource::Local);
        assert!(report.git_url.is_none());
        assert!(session.is_loaded());
        assert_eq!(session.file_tree(), "docs/readme.md\nsrc/app.py");
        assert!(session.chat_history().is_empty());
    }

    #[tokio::test]
    async fn empty_directory_loads_but_questions_stay_local() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = RepoSession::new(unreachable_gateway());

        let report = session.load_path(dir.path()).await.unwrap();
        assert_eq!(report.total_files, 0);
        assert!(report.languages.is_empty());
        assert!(report.summary.starts_with("(Could not generate summary:"));

        // Exact placeholder equality shows the gateway was never reached;
        // a call against the unroutable endpoint would answer "Error: ...".
        let answer = session.ask("what is this?").await;
        assert_eq!(answer, NO_REPOSITORY_MESSAGE);
        assert_eq!(session.chat_history().len(), 1);
        assert_eq!(session.chat_history()[0].answer, NO_REPOSITORY_MESSAGE);
    }

    #[tokio::test]
    async fn ask_answers_and_appends_history() {
        let server = MockServer::start().await;
        mock_completions(&server, completion("It prints a greeting.")).await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        session.load_path(dir.path()).await.unwrap();

        let answer = session.ask("What does app.py do?").await;
        assert_eq!(answer, "It prints a greeting.");

        let turns = session.chat_history();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].question, "What does app.py do?");
        assert_eq!(turns[0].answer, "It prints a greeting.");
    }

    #[tokio::test]
    async fn gateway_failures_become_error_answers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        session.load_path(dir.path()).await.unwrap();

        let answer = session.ask("anything substantial").await;
        assert!(answer.starts_with("Error: "), "got: {answer}");
        assert_eq!(session.chat_history().len(), 1);
    }

    #[tokio::test]
    async fn diagram_falls_back_to_module_blueprint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        session.load_path(dir.path()).await.unwrap();

        let result = session.generate_diagram(DiagramType::Architecture, "").await;
        assert_eq!(result.diagram_type, "ARCHITECTURE_DIAGRAM");
        assert_eq!(result.description, "Fallback: top-level directory modules.");

        // Scan order is sorted, so docs precedes src in the chain.
        let ids: Vec<&str> = result.blueprint.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["docs", "src"]);
        assert_eq!(result.blueprint.metadata.node_count, 2);
        assert_eq!(result.blueprint.metadata.edge_count, 1);
        assert!(result.diagram.starts_with("graph TB"));
        assert!(result.diagram.contains("docs --> src"));
        assert!(session.last_diagram().is_some());
    }

    #[tokio::test]
    async fn diagram_renders_llm_blueprint_in_requested_dialect() {
        let blueprint_json = r#"```json
{"diagram_type": "FLOWCHART", "title": "Flow", "description": "Main flow.",
 "layout": "top-down",
 "nodes": [{"id": "ui", "label": "UI", "type": "component"},
           {"id": "db", "label": "Store", "type": "database"}],
 "edges": [{"from": "ui", "to": "db", "label": "saves"}]}
```"#;
        let server = MockServer::start().await;
        mock_completions(&server, completion(blueprint_json)).await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        session.load_path(dir.path()).await.unwrap();

        let result = session.generate_diagram(DiagramType::Flowchart, "storage").await;
        assert!(result.diagram.starts_with("flowchart TD"));
        assert!(result.diagram.contains("db[(Store)]"));
        assert!(result.diagram.contains("ui -->|saves| db"));
        assert_eq!(result.description, "Main flow.");
        assert_eq!(result.blueprint.metadata.node_count, 2);
        assert_eq!(result.blueprint.metadata.edge_count, 1);
    }

    #[tokio::test]
    async fn diagram_without_repository_is_a_placeholder() {
        let mut session = RepoSession::new(unreachable_gateway());
        let result = session.generate_diagram(DiagramType::Sequence, "").await;

        assert_eq!(result.diagram_type, "SEQUENCE_DIAGRAM");
        assert_eq!(result.diagram, "");
        assert_eq!(result.description, "No repository loaded.");
        assert!(result.blueprint.nodes.is_empty());
    }

    #[tokio::test]
    async fn reset_clears_all_session_state() {
        let server = MockServer::start().await;
        mock_completions(&server, completion("fine")).await;

        let dir = demo_repo();
        let mut session = RepoSession::new(gateway_for(server.uri()));
        session.load_path(dir.path()).await.unwrap();
        session.ask("q").await;
        session.generate_diagram(DiagramType::Architecture, "").await;

        session.reset();
        assert!(!session.is_loaded());
        assert!(session.chat_history().is_empty());
        assert!(session.last_diagram().is_none());
        assert_eq!(session.file_tree(), "");
        assert_eq!(session.summary(), "");
    }

    #[tokio::test]
    async fn load_path_propagates_scan_errors() {
        let mut session = RepoSession::new(unreachable_gateway());
        let err = session
            .load_path(Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Scan(_)));
        assert!(!session.is_loaded());
    }

    #[tokio::test]
    async fn load_url_rejects_non_git_inputs() {
        let mut session = RepoSession::new(unreachable_gateway());
        let err = session.load_url("/definitely/local", None).await.unwrap_err();
        assert!(matches!(err, AgentError::Fetch(_)));
        assert!(!session.is_loaded());
    }

    #[test]
    fn load_report_serializes_without_null_git_url() {
        let report = LoadReport {
            root: "/tmp/x".into(),
            source: LoadSource::Local,
            git_url: None,
            total_files: 1,
            languages: BTreeMap::new(),
            summary: "s".into(),
            loaded_at: Utc::now(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["source"], "local");
        assert!(value.get("git_url").is_none());
        assert!(value.get("loaded_at").is_some());
    }
}
