use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors a load attempt can surface to the caller.
///
/// Only loading fails loudly. Question answering and diagram generation
/// absorb their failures into placeholder answers and fallback blueprints,
/// so they return plain values instead of this type.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Scanning the repository root failed.
    #[error(transparent)]
    Scan(#[from] repo_indexer::ScanError),

    /// Cloning the remote repository failed.
    #[error(transparent)]
    Fetch(#[from] repo_fetcher::FetchError),

    /// The blocking scan task was cancelled or panicked.
    #[error("scan task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
