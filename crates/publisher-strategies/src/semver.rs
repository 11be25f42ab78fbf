//! SemVer version strategy

use std::cmp::Ordering;

use publisher_core::error::{Result, VersionError};
use publisher_core::types::{ReleaseLevel, VersionSystem};
use semver::{BuildMetadata, Prerelease, Version};
use tracing::instrument;

use crate::traits::VersionStrategy;

/// Semantic Versioning strategy
///
/// Increments follow npm's `semver.inc`: releasing from a pre-release of the
/// same line drops the pre-release instead of bumping again.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemVerStrategy;

impl SemVerStrategy {
    /// Create a new SemVer strategy
    pub fn new() -> Self {
        Self
    }

    /// Parse a version, tolerating a leading `v`
    pub fn parse(&self, version: &str) -> Result<Version> {
        let trimmed = version.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Version::parse(trimmed)
            .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()).into())
    }

    /// Apply a release level
    pub fn bump(&self, current: &Version, level: ReleaseLevel) -> Version {
        let mut next = current.clone();
        let is_pre = !current.pre.is_empty();

        match level {
            ReleaseLevel::Major => {
                if current.minor != 0 || current.patch != 0 || !is_pre {
                    next.major += 1;
                }
                next.minor = 0;
                next.patch = 0;
            }
            ReleaseLevel::Minor => {
                if current.patch != 0 || !is_pre {
                    next.minor += 1;
                }
                next.patch = 0;
            }
            ReleaseLevel::Patch => {
                if !is_pre {
                    next.patch += 1;
                }
            }
        }
        next.pre = Prerelease::EMPTY;
        next.build = BuildMetadata::EMPTY;
        next
    }

    /// Advance the pre-release counter for `id`
    pub fn bump_prerelease(&self, current: &Version, id: &str) -> Result<Version> {
        let mut next = current.clone();
        next.build = BuildMetadata::EMPTY;

        let pre = if current.pre.is_empty() {
            next.patch += 1;
            format!("{}.0", id)
        } else {
            match current.pre.as_str().rsplit_once('.') {
                Some((prefix, counter)) if prefix == id => match counter.parse::<u64>() {
                    Ok(n) => format!("{}.{}", id, n + 1),
                    Err(_) => format!("{}.0", id),
                },
                _ => format!("{}.0", id),
            }
        };

        next.pre = Prerelease::new(&pre)
            .map_err(|e| VersionError::ParseFailed(pre.clone(), e.to_string()))?;
        Ok(next)
    }
}

impl VersionStrategy for SemVerStrategy {
    fn name(&self) -> &'static str {
        "semver"
    }

    fn system(&self) -> VersionSystem {
        VersionSystem::Semver
    }

    fn first_release(&self) -> &'static str {
        "1.0.0"
    }

    #[instrument(skip(self), fields(strategy = "semver"))]
    fn next(&self, current: &str, level: ReleaseLevel, prerelease_id: Option<&str>) -> Result<String> {
        let current = self.parse(current)?;
        let next = match prerelease_id {
            Some(id) => self.bump_prerelease(&current, id)?,
            None => self.bump(&current, level),
        };
        Ok(next.to_string())
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        Ok(self.parse(a)?.cmp_precedence(&self.parse(b)?))
    }

    fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(current: &str, level: ReleaseLevel) -> String {
        SemVerStrategy::new().next(current, level, None).unwrap()
    }

    fn next_pre(current: &str, id: &str) -> String {
        SemVerStrategy::new()
            .next(current, ReleaseLevel::Patch, Some(id))
            .unwrap()
    }

    #[test]
    fn test_minor_from_release() {
        assert_eq!(next("1.2.3", ReleaseLevel::Minor), "1.3.0");
    }

    #[test]
    fn test_levels() {
        assert_eq!(next("1.2.3", ReleaseLevel::Major), "2.0.0");
        assert_eq!(next("1.2.3", ReleaseLevel::Patch), "1.2.4");
        assert_eq!(next("v0.9.1", ReleaseLevel::Minor), "0.10.0");
    }

    #[test]
    fn test_release_from_prerelease() {
        assert_eq!(next("2.0.0-beta.3", ReleaseLevel::Major), "2.0.0");
        assert_eq!(next("1.3.0-beta.3", ReleaseLevel::Minor), "1.3.0");
        assert_eq!(next("1.2.4-rc.1", ReleaseLevel::Patch), "1.2.4");
        assert_eq!(next("1.2.4-rc.1", ReleaseLevel::Minor), "1.3.0");
    }

    #[test]
    fn test_prerelease_counter() {
        assert_eq!(next_pre("1.2.3", "beta"), "1.2.4-beta.0");
        assert_eq!(next_pre("1.2.4-beta.0", "beta"), "1.2.4-beta.1");
        assert_eq!(next_pre("1.2.4-alpha.3", "beta"), "1.2.4-beta.0");
    }

    #[test]
    fn test_compare() {
        let strategy = SemVerStrategy::new();
        assert_eq!(strategy.compare("1.0.0", "1.0.1").unwrap(), Ordering::Less);
        assert_eq!(strategy.compare("1.0.0-alpha", "1.0.0").unwrap(), Ordering::Less);
        assert_eq!(strategy.compare("v1.1.0", "1.0.9").unwrap(), Ordering::Greater);
        assert!(strategy.compare("1.0", "1.0.0").is_err());
    }
}
