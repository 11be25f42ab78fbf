//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A release tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name
    pub name: String,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Tag message (annotated tags)
    pub message: Option<String>,
    /// Tag timestamp (annotated tags)
    pub timestamp: Option<DateTime<Utc>>,
    /// Version encoded in the tag name
    pub version: Option<String>,
}

impl TagInfo {
    /// Create a tag, reading the version with the default `v{version}` format
    pub fn new(name: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let name = name.into();
        let version = version_from_tag(&name, "v{version}");
        Self {
            name,
            commit_hash: commit_hash.into(),
            message: None,
            timestamp: None,
            version,
        }
    }

    /// Re-read the version with a configured tag format
    pub fn with_tag_format(mut self, tag_format: &str) -> Self {
        self.version = version_from_tag(&self.name, tag_format);
        self
    }

    /// Set the tag message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Extract the version part of a tag name given a `{version}` template.
///
/// Tags that do not fit the template yield `None`.
pub fn version_from_tag(tag: &str, tag_format: &str) -> Option<String> {
    let (prefix, suffix) = tag_format.split_once("{version}")?;
    let version = tag.strip_prefix(prefix)?.strip_suffix(suffix)?;
    looks_like_version(version).then(|| version.to_string())
}

/// Integer build numbers and dotted numeric versions both qualify
fn looks_like_version(s: &str) -> bool {
    let core = s.split(['-', '+']).next().unwrap_or_default();
    !core.is_empty()
        && core
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_tag() {
        assert_eq!(version_from_tag("v1.0.0", "v{version}"), Some("1.0.0".to_string()));
        assert_eq!(version_from_tag("1.0.0", "{version}"), Some("1.0.0".to_string()));
        assert_eq!(version_from_tag("v101", "v{version}"), Some("101".to_string()));
        assert_eq!(
            version_from_tag("app-v2.1.0-beta.0", "app-v{version}"),
            Some("2.1.0-beta.0".to_string())
        );
        assert_eq!(version_from_tag("release-1.0", "v{version}"), None);
        assert_eq!(version_from_tag("vnext", "v{version}"), None);
    }

    #[test]
    fn test_with_tag_format() {
        let tag = TagInfo::new("build-42", "abc").with_tag_format("build-{version}");
        assert_eq!(tag.version.as_deref(), Some("42"));
    }
}
