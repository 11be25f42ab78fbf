//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::VersionSystem;

/// Main configuration for publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name, used in changelog titles and notification headers
    pub project_name: Option<String>,

    /// Repository URL
    pub repo: Option<String>,

    /// Repository type
    pub repo_type: Option<RepoType>,

    /// Versioning configuration
    pub versioning: VersioningConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Output mode flags for changelog tasks
    pub tasks: TasksConfig,

    /// Release notes / notification header configuration
    pub notes: NotesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: None,
            repo: None,
            repo_type: Some(RepoType::Git),
            versioning: VersioningConfig::default(),
            git: GitConfig::default(),
            changelog: ChangelogConfig::default(),
            tasks: TasksConfig::default(),
            notes: NotesConfig::default(),
        }
    }
}

impl Config {
    /// Fill in values derived from the project directory.
    ///
    /// This is the only place a loaded config is mutated.
    pub fn apply_defaults(&mut self, project_dir: &Path) {
        if self.project_name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            self.project_name = project_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string());
        }
        if self.changelog.line_len < MIN_LINE_LEN {
            self.changelog.line_len = MIN_LINE_LEN;
        }
        if self.changelog.version_text.trim().is_empty() {
            self.changelog.version_text = default_version_text();
        }
    }

    /// Project name, or a placeholder when none could be derived
    pub fn project_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or("PROJECT")
    }

    /// Path of the persisted changelog for the configured format
    pub fn changelog_path(&self) -> &Path {
        match self.changelog.format {
            ChangelogFormat::Markdown => &self.changelog.file,
            ChangelogFormat::Text => &self.changelog.history_file,
        }
    }

    /// Render a tag name for a version
    pub fn format_tag(&self, version: &str) -> String {
        self.versioning.tag_format.replace("{version}", version)
    }
}

/// Narrowest line width the text renderer accepts
pub const MIN_LINE_LEN: usize = 40;

fn default_version_text() -> String {
    "Version".to_string()
}

/// Repository type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    /// Git repository
    Git,
    /// Subversion repository
    Svn,
}

impl std::fmt::Display for RepoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Git => write!(f, "git"),
            Self::Svn => write!(f, "svn"),
        }
    }
}

/// Versioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Version system ("auto" infers it from the version found)
    pub system: String,

    /// Tag format (e.g., "v{version}")
    pub tag_format: String,

    /// Pre-release identifier
    pub prerelease_id: Option<String>,

    /// Explicit current version, the last source consulted
    pub current_version: Option<String>,

    /// Explicit next version
    pub next_version: Option<String>,

    /// Release a patch when no commit is releasable
    pub patch_on_undetermined: bool,

    /// Extra files whose version strings are replaced on release
    pub files: Vec<PathBuf>,
}

impl VersioningConfig {
    /// Version system forced by configuration, if any
    pub fn forced_system(&self) -> Option<VersionSystem> {
        match self.system.as_str() {
            "auto" | "" => None,
            other => other.parse().ok(),
        }
    }
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            system: "auto".to_string(),
            tag_format: "v{version}".to_string(),
            prerelease_id: None,
            current_version: None,
            next_version: None,
            patch_on_undetermined: false,
            files: Vec::new(),
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote name
    pub remote: String,

    /// Whether to push the release tag
    pub push_tags: bool,

    /// Tag message template
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            push_tags: false,
            tag_message: "chore(release): {version}".to_string(),
        }
    }
}

/// Persisted changelog format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangelogFormat {
    /// Markdown changelog, newest section first
    #[default]
    Markdown,
    /// Fixed-width text history, newest section last
    Text,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Persisted format
    pub format: ChangelogFormat,

    /// Markdown changelog path
    pub file: PathBuf,

    /// Text history path
    pub history_file: PathBuf,

    /// File whose contents title a new text history file
    pub header_file: Option<PathBuf>,

    /// Word preceding the version in section headers
    pub version_text: String,

    /// Line width of the text history file
    pub line_len: usize,

    /// User-supplied commit type map
    pub commit_msg_map: Vec<CommitTypeEntry>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            format: ChangelogFormat::Markdown,
            file: PathBuf::from("CHANGELOG.md"),
            history_file: PathBuf::from("history.txt"),
            header_file: None,
            version_text: default_version_text(),
            line_len: 80,
            commit_msg_map: Vec::new(),
        }
    }
}

/// One entry of the commit type map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTypeEntry {
    /// Lowercase header type this entry applies to
    #[serde(rename = "type")]
    pub commit_type: String,

    /// Subject and heading text
    pub format_text: String,

    /// "none", "patch", "minor" or "major"
    #[serde(default = "default_bump")]
    pub version_bump: String,

    /// Whether commits of this type are rendered and classified
    #[serde(default = "default_include")]
    pub include: bool,

    /// Icon class used by HTML consumers
    #[serde(default)]
    pub icon_cls: Option<String>,
}

fn default_bump() -> String {
    "none".to_string()
}

fn default_include() -> bool {
    true
}

/// Changelog task flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Print the new section to stdout instead of writing a file
    pub changelog_print: bool,

    /// Export the new section to this file
    pub changelog_file: Option<PathBuf>,

    /// Write an HTML preview of the new section to this file
    pub changelog_html: Option<PathBuf>,

    /// Open the written changelog in an editor
    pub changelog_view: bool,

    /// Compute everything, write nothing
    pub dry_run: bool,
}

/// Release notes header configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Network share the distribution is copied to
    pub dist_release_path: Option<String>,

    /// npm registry base URL
    pub npm_registry: Option<String>,

    /// npm package name
    pub npm_package: Option<String>,

    /// MantisBT base URL
    pub mantisbt_url: Option<String>,

    /// MantisBT project name
    pub mantisbt_project: Option<String>,

    /// Extra links in "label|url" form
    pub hrefs: Vec<String>,
}
