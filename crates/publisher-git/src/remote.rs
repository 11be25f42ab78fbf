//! Pushing release tags

use std::process::Command;

use tracing::{info, instrument, warn};

use publisher_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// URL of a configured remote, if it exists
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Push a tag through the git CLI so the user's credential helpers apply
    pub fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        if self.remote_url(remote)?.is_none() {
            return Err(GitError::PushFailed(format!("no remote named '{}'", remote)));
        }
        git_push_tag(self.path(), remote, tag)
    }
}

/// Run `git push <remote> <tag>` in `dir`
#[instrument(skip(dir))]
pub fn git_push_tag(dir: &std::path::Path, remote: &str, tag: &str) -> Result<()> {
    let start = std::time::Instant::now();
    let output = Command::new("git")
        .current_dir(dir)
        .args(["push", remote, tag])
        .output()
        .map_err(|e| GitError::PushFailed(e.to_string()))?;

    info!(
        remote,
        tag,
        duration_ms = start.elapsed().as_millis(),
        success = output.status.success(),
        "git push tag"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(remote, tag, %stderr, "git push failed");
        return Err(GitError::PushFailed(stderr));
    }
    Ok(())
}
