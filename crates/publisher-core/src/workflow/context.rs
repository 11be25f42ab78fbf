//! Per-run state

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::types::{Commit, ReleaseInfo, ReleaseLevel};

/// State shared by the steps of one release run.
///
/// Created at the start of a run and dropped when it ends; nothing here
/// outlives the run.
#[derive(Debug)]
pub struct RunContext<'a> {
    /// Validated configuration
    pub config: &'a Config,
    /// Directory the project files live in
    pub project_dir: PathBuf,
    /// Last published release, if there is one
    pub last_release: Option<ReleaseInfo>,
    /// Release being prepared
    pub next_release: Option<ReleaseInfo>,
    /// Commits since the last release, in release order
    pub commits: Vec<Commit>,
    /// Classifier verdict
    pub level: Option<ReleaseLevel>,
    /// Whether the changelog file did not exist when the run started
    pub changelog_is_new: bool,
    /// Compute everything, write nothing
    pub dry_run: bool,
    /// Release id returned by the GitHub release channel
    pub github_release_id: Option<u64>,
    /// Registry location of the published npm package
    pub npm_location: Option<String>,
    /// Script hooks already run in this pass
    pub processed_scripts: HashSet<String>,
}

impl<'a> RunContext<'a> {
    /// Create a context for a run in `project_dir`
    pub fn new(config: &'a Config, project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let changelog_is_new = !project_dir.join(config.changelog_path()).exists();
        Self {
            config,
            project_dir,
            last_release: None,
            next_release: None,
            commits: Vec::new(),
            level: None,
            changelog_is_new,
            dry_run: config.tasks.dry_run,
            github_release_id: None,
            npm_location: None,
            processed_scripts: HashSet::new(),
        }
    }

    /// Set the last release
    pub fn with_last_release(mut self, release: ReleaseInfo) -> Self {
        self.last_release = Some(release);
        self
    }

    /// Set the next release
    pub fn with_next_release(mut self, release: ReleaseInfo) -> Self {
        self.next_release = Some(release);
        self
    }

    /// Set the commits of this run
    pub fn with_commits(mut self, commits: Vec<Commit>) -> Self {
        self.commits = commits;
        self
    }

    /// Resolve a configured path against the project directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Absolute path of the persisted changelog
    pub fn changelog_path(&self) -> PathBuf {
        self.resolve(self.config.changelog_path())
    }

    /// Record that a script hook ran; returns false if it already had
    pub fn mark_script_processed(&mut self, name: &str) -> bool {
        self.processed_scripts.insert(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VersionInfo;
    use tempfile::TempDir;

    #[test]
    fn test_context_detects_new_changelog() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        let ctx = RunContext::new(&config, temp.path());
        assert!(ctx.changelog_is_new);

        std::fs::write(temp.path().join("CHANGELOG.md"), "# APP CHANGE LOG\n").unwrap();
        let ctx = RunContext::new(&config, temp.path());
        assert!(!ctx.changelog_is_new);
        assert_eq!(ctx.changelog_path(), temp.path().join("CHANGELOG.md"));
    }

    #[test]
    fn test_context_builders() {
        let config = Config::default();
        let ctx = RunContext::new(&config, "/work/app")
            .with_last_release(ReleaseInfo::new(VersionInfo::new("1.2.3")))
            .with_next_release(ReleaseInfo::new(VersionInfo::new("1.3.0")));

        assert_eq!(ctx.last_release.unwrap().version, "1.2.3");
        assert_eq!(ctx.next_release.unwrap().version, "1.3.0");
    }

    #[test]
    fn test_scripts_processed_once() {
        let config = Config::default();
        let mut ctx = RunContext::new(&config, "/work/app");
        assert!(ctx.mark_script_processed("postVersion"));
        assert!(!ctx.mark_script_processed("postVersion"));
    }
}
