//! Repository handle

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::{debug, instrument};

use publisher_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// An opened git repository
pub struct GitRepo {
    pub(crate) repo: Repository,
    root: PathBuf,
}

impl std::fmt::Debug for GitRepo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepo").field("root", &self.root).finish_non_exhaustive()
    }
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::RepositoryNotFound(path.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;
        Ok(Self::from_repository(repo))
    }

    /// Open the repository containing `start_path`, searching upward
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = Repository::discover(start_path).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::NotARepository(start_path.to_path_buf()),
            _ => GitError::OpenFailed(e.to_string()),
        })?;
        Ok(Self::from_repository(repo))
    }

    fn from_repository(repo: Repository) -> Self {
        let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(root = %root.display(), "opened git repository");
        Self { repo, root }
    }

    /// Working tree root (the git dir for bare repositories)
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Hash of the commit HEAD points to
    pub fn head_hash(&self) -> Result<String> {
        Ok(self.head_commit()?.id().to_string())
    }

    pub(crate) fn head_commit(&self) -> Result<git2::Commit<'_>> {
        self.repo.head()?.peel_to_commit().map_err(GitError::Git2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_from_subdirectory() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();

        let subdir = temp.path().join("src").join("nested");
        std::fs::create_dir_all(&subdir).unwrap();

        let repo = GitRepo::discover(&subdir).unwrap();
        // Canonicalize both paths to handle macOS /var -> /private/var symlink
        assert_eq!(
            repo.path().canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_open_outside_repository() {
        let temp = TempDir::new().unwrap();
        let result = GitRepo::open(temp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_head_hash_without_commits() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(repo.head_hash().is_err());
    }
}
