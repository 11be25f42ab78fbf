//! Steps shared by the version, changelog and release commands

use std::path::{Path, PathBuf};

use publisher_adapters::VersionResolver;
use publisher_changelog::{
    sort_commits, ChangelogStore, CommitParser, ConventionalParser, ReleaseLevelClassifier,
    Vocabulary,
};
use publisher_core::config::{load_config_or_default, Config, RepoType};
use publisher_core::error::{GitError, Result};
use publisher_core::types::{Commit, ReleaseInfo, ReleaseLevel, VersionInfo, VersionSystem};
use publisher_core::RunContext;
use publisher_git::{GitRepo, TagInfo};
use publisher_strategies::{next_version, validate_next_version};
use tracing::{debug, info, instrument};

/// A loaded configuration and the directory it applies to
#[derive(Debug)]
pub struct Project {
    /// Validated configuration, defaults applied
    pub config: Config,
    /// Config file the settings came from
    pub config_path: Option<PathBuf>,
    /// Directory the project files live in
    pub dir: PathBuf,
}

impl Project {
    /// Load the configuration found from `dir` upward, or defaults
    pub fn load(dir: &Path) -> Result<Self> {
        let (config, config_path) = load_config_or_default(dir)?;
        let dir = config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
        Ok(Self {
            config,
            config_path,
            dir,
        })
    }

    /// Open the project's repository
    pub fn repo(&self) -> Result<GitRepo> {
        if self.config.repo_type == Some(RepoType::Svn) {
            return Err(GitError::UnsupportedRepoType(RepoType::Svn.to_string()).into());
        }
        Ok(GitRepo::discover(&self.dir)?)
    }

    /// Store for the configured changelog
    pub fn store(&self) -> ChangelogStore {
        ChangelogStore::for_config(&self.config, &self.dir)
    }
}

/// Everything known about a release before anything is written
#[derive(Debug)]
pub struct ReleasePlan {
    /// Version the project files carry now
    pub current: VersionInfo,
    /// Tag of the last release
    pub last_tag: Option<TagInfo>,
    /// Whether nothing has been released yet
    pub first_release: bool,
    /// Commits since the last release, annotated and sorted
    pub commits: Vec<Commit>,
    /// Classifier verdict
    pub level: Option<ReleaseLevel>,
}

impl ReleasePlan {
    /// Resolve the current version and classify the commits since the last tag.
    ///
    /// A project counts as unreleased when no tag matches the tag format and
    /// the changelog holds no section yet.
    #[instrument(skip(project), fields(dir = %project.dir.display()))]
    pub fn gather(project: &Project) -> Result<Self> {
        let config = &project.config;
        let current = VersionResolver::for_config(config).resolve(&project.dir)?;

        let repo = project.repo()?;
        let last_tag = repo.find_latest_tag(&config.versioning.tag_format)?;
        let first_release =
            last_tag.is_none() && project.store().latest_version()?.is_none();

        let parser = ConventionalParser::new();
        let mut commits = repo.commits_since(last_tag.as_ref().map(|t| t.name.as_str()))?;
        for commit in &mut commits {
            parser.annotate(commit);
        }
        sort_commits(&mut commits);

        let level = ReleaseLevelClassifier::new(Vocabulary::from_config(&config.changelog))
            .classify(&commits);

        info!(
            current = %current.version,
            last_tag = last_tag.as_ref().map(|t| t.name.as_str()),
            commit_count = commits.len(),
            level = level.map(|l| l.as_str()),
            first_release,
            "release plan gathered"
        );

        Ok(Self {
            current,
            last_tag,
            first_release,
            commits,
            level,
        })
    }

    /// Version of the last release, `None` before the first one
    pub fn last_version(&self) -> Option<&VersionInfo> {
        (!self.first_release).then_some(&self.current)
    }

    /// Compute and validate the next version
    pub fn next_version(&self, config: &Config) -> Result<String> {
        let last = self.last_version();
        let next = next_version(last, self.level, &config.versioning)?;
        let system = config
            .versioning
            .forced_system()
            .unwrap_or(self.current.version_system);
        validate_next_version(last, &next, system)?;
        debug!(next = %next, "next version validated");
        Ok(next)
    }

    /// Per-run context for writing the release
    pub fn context<'a>(&self, project: &'a Project, next: &str, dry_run: bool) -> RunContext<'a> {
        let system = match self.current.version_system {
            VersionSystem::Manual => VersionSystem::Manual,
            _ => VersionSystem::infer(next),
        };
        let mut next_release = ReleaseInfo::new(VersionInfo::new(next).with_system(system))
            .with_tag(project.config.format_tag(next));
        if let Some(level) = self.level {
            next_release = next_release.with_level(level);
        }

        let mut ctx = RunContext::new(&project.config, &project.dir)
            .with_commits(self.commits.clone())
            .with_next_release(next_release);
        if let Some(last) = self.last_version() {
            let mut release = ReleaseInfo::new(last.clone());
            if let Some(tag) = &self.last_tag {
                release = release.with_tag(&tag.name).with_head(&tag.commit_hash);
            }
            ctx = ctx.with_last_release(release);
        }
        ctx.level = self.level;
        ctx.dry_run = ctx.dry_run || dry_run;
        ctx
    }
}
