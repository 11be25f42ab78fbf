//! Incremental versioning strategy
//!
//! Versions are a single build counter: 100, 101, 102...

use std::cmp::Ordering;

use publisher_core::error::{Result, VersionError};
use publisher_core::types::{ReleaseLevel, VersionSystem};
use tracing::{debug, instrument};

use crate::traits::VersionStrategy;

/// Build counter strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalStrategy;

impl IncrementalStrategy {
    /// Create a new incremental strategy
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, version: &str) -> Result<u64> {
        version.trim().parse().map_err(|_| {
            VersionError::ParseFailed(version.to_string(), "Invalid build number".to_string())
                .into()
        })
    }
}

impl VersionStrategy for IncrementalStrategy {
    fn name(&self) -> &'static str {
        "incremental"
    }

    fn system(&self) -> VersionSystem {
        VersionSystem::Incremental
    }

    fn first_release(&self) -> &'static str {
        "100"
    }

    #[instrument(skip(self), fields(strategy = "incremental"))]
    fn next(&self, current: &str, _level: ReleaseLevel, prerelease_id: Option<&str>) -> Result<String> {
        if prerelease_id.is_some() {
            debug!("pre-release id ignored for incremental versions");
        }
        Ok((self.parse(current)? + 1).to_string())
    }

    fn compare(&self, a: &str, b: &str) -> Result<Ordering> {
        Ok(self.parse(a)?.cmp(&self.parse(b)?))
    }

    fn is_valid(&self, version: &str) -> bool {
        self.parse(version).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_ignores_level() {
        let strategy = IncrementalStrategy::new();
        assert_eq!(strategy.next("100", ReleaseLevel::Major, None).unwrap(), "101");
        assert_eq!(strategy.next("9", ReleaseLevel::Patch, Some("beta")).unwrap(), "10");
    }

    #[test]
    fn test_compare_numerically() {
        let strategy = IncrementalStrategy::new();
        assert_eq!(strategy.compare("99", "100").unwrap(), Ordering::Less);
        assert!(!strategy.is_valid("1.0.0"));
    }
}
