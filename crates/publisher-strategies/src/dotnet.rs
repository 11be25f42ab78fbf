//! Four-part .NET assembly version strategy

use std::cmp::Ordering;

use publisher_core::error::{Result, VersionError};
use publisher_core::types::{ReleaseLevel, VersionSystem};
use semver::Version;

use crate::semver::SemVerStrategy;
use crate::traits::VersionStrategy;

/// `major.minor.build.revision`; the first three parts bump like semver and
/// the revision resets to 0
#[derive(Debug, Clone, Copy, Default)]
pub struct DotNetStrategy;

impl DotNetStrategy {
    /// Create a new .NET strategy
    pub fn new() -> Self {
        Self
    }

    fn parse(&self, version: &str) -> Result<[u64; 4]> {
        let parts: Vec<&str> = version.trim().split('.').collect();
        if parts.len() != 4 {
            return Err(VersionError::InvalidFormat(format!(
                "Expected MAJOR.MINOR.BUILD.REVISION, got: {}",
                version
            ))
            .into());
        }
        let mut out = [0u64; 4];
        for (slot, part) in out.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                VersionError::ParseFailed(version.to_string(), format!("Invalid part '{}'", part))
            })?;
        }
        Ok(out)
    }
}

impl VersionStrategy for DotNetStrategy {
    fn name(&self) -> &'static str {
        ".net"
    }

    fn system(&self) -> VersionSystem {
        VersionSystem::DotNet
    }

    fn first_release(&self) -> &'static str {
        "1.0.0.0"
    }

    fn next(&self, current: &str, level: ReleaseLevel, _prerelease_id: Option<&str>) -> Result<String> {
        let [major, minor, build, _] = self.parse(current)?;
        let next = SemVerStrategy::new().bump(&Version::new(major, minor, build), level);
        Ok(format!("{}.{}.{}.0", next.major, next.minor, next.patch))
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
    fn test_revision_resets() {
        let strategy = DotNetStrategy::new();
        assert_eq!(strategy.next("1.2.3.45", ReleaseLevel::Minor, None).unwrap(), "1.3.0.0");
        assert_eq!(strategy.next("1.2.3.0", ReleaseLevel::Patch, None).unwrap(), "1.2.4.0");
    }

    #[test]
    fn test_requires_four_parts() {
        let strategy = DotNetStrategy::new();
        assert!(strategy.next("1.2.3", ReleaseLevel::Patch, None).is_err());
        assert_eq!(strategy.compare("1.2.3.9", "1.2.4.0").unwrap(), Ordering::Less);
    }
}
