//! Commit history

use chrono::{TimeZone, Utc};
use git2::{Oid, Sort};
use tracing::{debug, instrument};

use publisher_core::error::GitError;
use publisher_core::types::Commit;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Commits reachable from HEAD but not from `since`, oldest first.
    ///
    /// `since` is a tag name or any revision git understands; `None` walks
    /// the whole history (first release).
    #[instrument(skip(self))]
    pub fn commits_since(&self, since: Option<&str>) -> Result<Vec<Commit>> {
        let hide = match since {
            Some(rev) => Some(self.resolve_commit(rev)?),
            None => None,
        };
        let commits = self.walk(hide)?;
        debug!(count = commits.len(), since, "collected commits");
        Ok(commits)
    }

    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|_| GitError::TagNotFound(rev.to_string()))?;
        Ok(object.peel_to_commit()?.id())
    }

    fn walk(&self, hide: Option<Oid>) -> Result<Vec<Commit>> {
        let head = self.head_commit()?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)?;
        revwalk.push(head.id())?;
        if let Some(oid) = hide {
            revwalk.hide(oid)?;
        }

        revwalk
            .map(|oid| -> Result<Commit> {
                let commit = self.repo.find_commit(oid?)?;
                Ok(to_commit(&commit))
            })
            .collect()
    }
}

fn to_commit(commit: &git2::Commit<'_>) -> Commit {
    let committed = Utc
        .timestamp_opt(commit.committer().when().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    let message = commit
        .message()
        .map(|m| m.trim_end().to_string())
        .unwrap_or_default();

    Commit::new(
        commit.id().to_string(),
        message,
        commit.author().name().unwrap_or("Unknown"),
        committed,
    )
}
