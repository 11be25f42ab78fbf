//! Core types for publisher

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Release level produced by commit classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseLevel {
    /// Patch version bump (bug fixes)
    Patch,
    /// Minor version bump (new features)
    Minor,
    /// Major version bump (breaking changes)
    Major,
}

impl ReleaseLevel {
    /// Returns the string representation of the release level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        }
    }
}

impl std::fmt::Display for ReleaseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReleaseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            _ => Err(format!("Unknown release level: {}", s)),
        }
    }
}

/// Bump value accepted in a commit message map entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    /// Type never triggers a release
    None,
    /// Triggers a release at the given level
    Level(ReleaseLevel),
}

impl std::str::FromStr for VersionBump {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            other => other.parse::<ReleaseLevel>().map(Self::Level),
        }
    }
}

/// Numbering scheme of a project's versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSystem {
    /// Semantic versioning (1.2.3)
    #[serde(rename = "semver")]
    Semver,
    /// Integer build counter (100, 101, ...)
    #[serde(rename = "incremental")]
    Incremental,
    /// Versions supplied by hand
    #[serde(rename = "manual")]
    Manual,
    /// Four-part .NET assembly versions (1.2.3.0)
    #[serde(rename = ".net")]
    DotNet,
}

impl VersionSystem {
    /// Returns the string representation of the version system
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semver => "semver",
            Self::Incremental => "incremental",
            Self::Manual => "manual",
            Self::DotNet => ".net",
        }
    }

    /// Guess the system from the shape of a version string
    pub fn infer(version: &str) -> Self {
        let version = version.trim();
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            Self::Incremental
        } else if version.split('.').count() == 4
            && version.split('.').all(|p| p.parse::<u64>().is_ok())
        {
            Self::DotNet
        } else {
            Self::Semver
        }
    }
}

impl std::fmt::Display for VersionSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VersionSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "semver" => Ok(Self::Semver),
            "incremental" => Ok(Self::Incremental),
            "manual" => Ok(Self::Manual),
            ".net" | "dotnet" => Ok(Self::DotNet),
            _ => Err(format!("Unknown version system: {}", s)),
        }
    }
}

/// A version read from one of the project's version sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// The version string as found
    pub version: String,
    /// Numbering scheme the version belongs to
    pub version_system: VersionSystem,
    /// Name of the source that produced it
    pub source: Option<String>,
}

impl VersionInfo {
    /// Create a version info, inferring the version system
    pub fn new(version: impl Into<String>) -> Self {
        let version = version.into();
        let version_system = VersionSystem::infer(&version);
        Self {
            version,
            version_system,
            source: None,
        }
    }

    /// Force the version system
    pub fn with_system(mut self, system: VersionSystem) -> Self {
        self.version_system = system;
        self
    }

    /// Record the source name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A commit as read from the VCS for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash (full)
    pub hash: String,
    /// Author name
    pub author: String,
    /// Committer timestamp
    pub committer_date: DateTime<Utc>,
    /// Raw message, possibly multi-line
    pub message: String,
    /// Lowercased header type, when a header was recognized
    pub subject: Option<String>,
    /// Lowercased header scope, when present
    pub scope: Option<String>,
}

impl Commit {
    /// Create a new commit with no derived header fields
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author: impl Into<String>,
        committer_date: DateTime<Utc>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author: author.into(),
            committer_date,
            message: message.into(),
            subject: None,
            scope: None,
        }
    }

    /// Short hash (first 7 characters)
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.hash.len());
        &self.hash[..end]
    }
}

/// A release, either the last published one or the one being prepared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Version string
    pub version: String,
    /// Where the version came from and how it is numbered
    pub version_info: VersionInfo,
    /// VCS tag name
    pub tag: Option<String>,
    /// Commit the tag points to
    pub head: Option<String>,
    /// Level that produced this release (next release only)
    pub level: Option<ReleaseLevel>,
}

impl ReleaseInfo {
    /// Create release info from a resolved version
    pub fn new(version_info: VersionInfo) -> Self {
        Self {
            version: version_info.version.clone(),
            version_info,
            tag: None,
            head: None,
            level: None,
        }
    }

    /// Set the tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the tag head
    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    /// Set the release level
    pub fn with_level(mut self, level: ReleaseLevel) -> Self {
        self.level = Some(level);
        self
    }
}
