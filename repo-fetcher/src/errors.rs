use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The input does not look like a Git clone URL.
    #[error("not a recognizable git URL: {0}")]
    InvalidUrl(String),

    #[error("git clone failed: {0}")]
    Git(#[from] git2::Error),

    /// The clone did not finish inside the fixed ceiling. The underlying
    /// work is not cancelled; its temp directory is reclaimed when it ends.
    #[error("git clone timed out after {0} seconds")]
    Timeout(u64),

    /// Creating the temporary clone directory failed.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("clone task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
