//! Error types for publisher
//!
//! Every error carries a short numeric code (see [`PublisherError::code`]) that
//! is printed next to the message and written to the log for correlation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using PublisherError
pub type Result<T> = std::result::Result<T, PublisherError>;

/// Main error type for publisher operations
#[derive(Debug, Error)]
pub enum PublisherError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Version source errors
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// No version source could determine the current version
    #[error("Current version cannot be determined")]
    CurrentVersionUnknown,

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Tag not found
    #[error("Tag not found: {0}")]
    TagNotFound(String),

    /// Tag already exists
    #[error("Tag already exists: {0}")]
    TagExists(String),

    /// Failed to push
    #[error("Failed to push to remote: {0}")]
    PushFailed(String),

    /// Repository type has no backend in this build
    #[error("Unsupported repository type: {0}")]
    UnsupportedRepoType(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidFormat(String),

    /// No version bump required
    #[error("No version bump required - no releasable commits found")]
    NoBumpRequired,

    /// Next version is not greater than the last one
    #[error("Next version {next} is not greater than last version {last}")]
    NotGreater { last: String, next: String },

    /// Manual versioning without an explicit next version
    #[error("Version system 'manual' requires versioning.next_version")]
    ManualVersionRequired,

    /// Semver error
    #[error("Semver error: {0}")]
    Semver(#[from] semver::Error),
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Requested version section is absent from the file
    #[error("Section for version {version} not found in {path}")]
    SectionNotFound { version: String, path: PathBuf },

    /// Version marker present but unusable
    #[error("Malformed section marker at line {line} of {path}: {reason}")]
    MalformedSection {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Headings and entries could not be paired up
    #[error("Section entry mismatch: {subjects} subjects for {messages} messages")]
    EntryMismatch { subjects: usize, messages: usize },

    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Editor could not be launched
    #[error("Failed to open editor '{editor}': {reason}")]
    EditorFailed { editor: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by version sources and writers
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Project file not found
    #[error("Project file not found at {0}")]
    ManifestNotFound(PathBuf),

    /// Failed to parse project file
    #[error("Failed to parse {path}: {reason}")]
    ManifestParseError { path: PathBuf, reason: String },

    /// Failed to update project file
    #[error("Failed to update {path}: {reason}")]
    ManifestUpdateError { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PublisherError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Numeric code used for log correlation
    pub fn code(&self) -> u16 {
        match self {
            Self::Config(e) => match e {
                ConfigError::NotFound(_) => 101,
                ConfigError::InvalidValue { .. } => 102,
                ConfigError::MissingField(_) => 103,
                ConfigError::CurrentVersionUnknown => 104,
                ConfigError::YamlError(_) | ConfigError::TomlError(_) => 105,
                ConfigError::Io(_) => 106,
            },
            Self::Git(e) => match e {
                GitError::RepositoryNotFound(_) | GitError::NotARepository(_) => 201,
                GitError::OpenFailed(_) => 202,
                GitError::TagNotFound(_) => 203,
                GitError::TagExists(_) => 204,
                GitError::PushFailed(_) => 205,
                GitError::UnsupportedRepoType(_) => 206,
                GitError::Git2(_) => 299,
            },
            Self::Version(e) => match e {
                VersionError::ParseFailed(..) => 301,
                VersionError::InvalidFormat(_) => 302,
                VersionError::NoBumpRequired => 303,
                VersionError::NotGreater { .. } => 304,
                VersionError::ManualVersionRequired => 305,
                VersionError::Semver(_) => 306,
            },
            Self::Changelog(e) => match e {
                ChangelogError::SectionNotFound { .. } => 401,
                ChangelogError::MalformedSection { .. } => 402,
                ChangelogError::EntryMismatch { .. } => 403,
                ChangelogError::WriteFailed { .. } => 404,
                ChangelogError::EditorFailed { .. } => 405,
                ChangelogError::Io(_) => 406,
            },
            Self::Adapter(e) => match e {
                AdapterError::ManifestNotFound(_) => 501,
                AdapterError::ManifestParseError { .. } => 502,
                AdapterError::ManifestUpdateError { .. } => 503,
                AdapterError::Io(_) => 504,
            },
            Self::Io(_) => 901,
            Self::Toml(_) => 902,
            Self::Json(_) => 903,
            Self::Other(_) => 999,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_group_by_concern() {
        let err: PublisherError = ChangelogError::SectionNotFound {
            version: "1.0.0".to_string(),
            path: PathBuf::from("CHANGELOG.md"),
        }
        .into();
        assert_eq!(err.code(), 401);

        let err: PublisherError = ConfigError::CurrentVersionUnknown.into();
        assert_eq!(err.code(), 104);

        let err: PublisherError = VersionError::NotGreater {
            last: "1.0.0".to_string(),
            next: "0.9.0".to_string(),
        }
        .into();
        assert_eq!(err.code(), 304);
    }

    #[test]
    fn test_transparent_display() {
        let err: PublisherError = ChangelogError::EntryMismatch {
            subjects: 1,
            messages: 2,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Section entry mismatch: 1 subjects for 2 messages"
        );
    }
}
