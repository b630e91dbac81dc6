//! Repository analysis agent.
//!
//! Ties the indexer, fetcher, gateway, and diagram engine together into a
//! single stateful [`RepoSession`]: load a repository (local path or git
//! URL), get an LLM-written summary, ask questions grounded in scored file
//! context, and generate Mermaid diagrams from LLM blueprints with a
//! deterministic fallback.

pub mod context;
pub mod errors;
pub mod prompts;
pub mod session;

pub use errors::{AgentError, Result};
pub use session::{
    ChatTurn, DiagramResult, LoadReport, LoadSource, NO_REPOSITORY_MESSAGE, RepoSession,
};
