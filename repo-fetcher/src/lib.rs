//! Async shallow Git cloning built on `git2` (libgit2).
//!
//! - One repository per call, cloned with depth 1 (optionally a branch) into
//!   a fresh temporary directory.
//! - The blocking libgit2 work runs under `spawn_blocking`, bounded by a
//!   fixed 120 s ceiling via `tokio::time::timeout`.
//! - The returned [`CloneHandle`] owns the directory; it is removed on
//!   [`CloneHandle::cleanup`] or at drop.
//! - Auth is best-effort for SSH remotes: ssh-agent, then libgit2 defaults.

use std::path::Path;
use std::time::Duration;

use git2::{Cred, CredentialType, FetchOptions, RemoteCallbacks, build::RepoBuilder};
use tempfile::TempDir;
use tokio::{task, time};
use tracing::{debug, info, instrument, warn};

pub mod errors;

pub use errors::{FetchError, Result};

/// Hard ceiling for a single clone attempt.
const CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// A cloned checkout living in a temporary directory.
///
/// The directory is deleted when the handle is dropped; [`CloneHandle::cleanup`]
/// deletes it eagerly and reports failures instead of silently leaking.
#[derive(Debug)]
pub struct CloneHandle {
    dir: TempDir,
    url: String,
}

impl CloneHandle {
    /// Local path of the checkout, valid until cleanup/drop.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The URL this checkout was cloned from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Removes the temporary checkout now instead of at drop time.
    pub fn cleanup(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "removed temporary clone"),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to remove temporary clone")
            }
        }
    }
}

/// Heuristic check that an input names a remote Git repository rather than a
/// local path: a known scheme prefix or a well-known hosting domain.
pub fn is_git_url(input: &str) -> bool {
    let input = input.trim();
    if ["http://", "https://", "git@", "ssh://", "git://"]
        .iter()
        .any(|p| input.starts_with(p))
    {
        return true;
    }
    ["github.com", "gitlab.com", "bitbucket.org"]
        .iter()
        .any(|d| input.contains(d))
}

/// Clones `url` (depth 1, optionally `branch`) into a fresh temp directory.
///
/// The clone runs on the blocking pool and must finish within 120 s. On
/// timeout the background task keeps running to completion; it owns the temp
/// directory at that point, so the partial checkout is removed once the task
/// ends.
///
/// # Errors
/// - [`FetchError::InvalidUrl`] if `url` fails [`is_git_url`]
/// - [`FetchError::Git`] if libgit2 rejects the clone
/// - [`FetchError::Timeout`] after 120 s
/// - [`FetchError::Io`] if the temp directory cannot be created
#[instrument(skip_all, fields(url = %url))]
pub async fn clone_repository(url: &str, branch: Option<&str>) -> Result<CloneHandle> {
    let url = url.trim().trim_end_matches('/').to_string();
    if !is_git_url(&url) {
        return Err(FetchError::InvalidUrl(url));
    }

    let dir = TempDir::with_prefix("repolens_")?;
    info!(path = %dir.path().display(), "start clone");

    let task_url = url.clone();
    let task_branch = branch.map(str::to_string);
    let task = task::spawn_blocking(move || -> Result<TempDir> {
        clone_blocking(&task_url, task_branch.as_deref(), dir.path())?;
        Ok(dir)
    });

    match time::timeout(CLONE_TIMEOUT, task).await {
        Ok(joined) => {
            let dir = joined??;
            info!(path = %dir.path().display(), "clone completed");
            Ok(CloneHandle { dir, url })
        }
        Err(_) => {
            warn!(timeout_secs = CLONE_TIMEOUT.as_secs(), "clone timed out");
            Err(FetchError::Timeout(CLONE_TIMEOUT.as_secs()))
        }
    }
}

/// Blocking clone (runs inside `spawn_blocking`).
fn clone_blocking(url: &str, branch: Option<&str>, target: &Path) -> Result<()> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed| {
        let user = username_from_url.unwrap_or("git");
        if allowed.contains(CredentialType::SSH_KEY) {
            if let Ok(cred) = Cred::ssh_key_from_agent(user) {
                return Ok(cred);
            }
        }
        if allowed.contains(CredentialType::DEFAULT) {
            if let Ok(cred) = Cred::default() {
                return Ok(cred);
            }
        }
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(user);
        }
        Err(git2::Error::from_str("no usable credentials"))
    });

    let mut fetch_opts = FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    fetch_opts.depth(1);

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    if let Some(branch) = branch {
        builder.branch(branch);
    }

    builder.clone(url, target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_git_urls() {
        assert!(is_git_url("https://github.com/user/repo"));
        assert!(is_git_url("http://internal.host/repo.git"));
        assert!(is_git_url("git@github.com:user/repo.git"));
        assert!(is_git_url("ssh://git@host/org/repo"));
        assert!(is_git_url("git://host/repo"));
        assert!(is_git_url("gitlab.com/group/project"));
        assert!(is_git_url("  https://bitbucket.org/x  "));
    }

    #[test]
    fn rejects_local_paths() {
        assert!(!is_git_url("/home/me/project"));
        assert!(!is_git_url("./relative/dir"));
        assert!(!is_git_url("C:\\code\\project"));
        assert!(!is_git_url("just-a-name"));
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_any_clone() {
        let err = clone_repository("/some/local/dir", None).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn clones_a_small_public_repository() {
        let handle = clone_repository("https://github.com/octocat/Hello-World", None)
            .await
            .unwrap();
        assert!(handle.path().join(".git").is_dir());
        handle.cleanup();
    }
}
