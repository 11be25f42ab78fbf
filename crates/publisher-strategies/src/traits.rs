//! Version strategy traits

use std::cmp::Ordering;

use publisher_core::error::Result;
use publisher_core::types::{ReleaseLevel, VersionSystem};

/// Trait for version strategies
pub trait VersionStrategy: Send + Sync {
    /// Get the name of this strategy
    fn name(&self) -> &'static str;

    /// Version system this strategy numbers
    fn system(&self) -> VersionSystem;

    /// Version used when the project has never been released
    fn first_release(&self) -> &'static str;

    /// Compute the version following `current`.
    ///
    /// A pre-release id takes precedence over the level where the system
    /// supports pre-releases.
    fn next(&self, current: &str, level: ReleaseLevel, prerelease_id: Option<&str>) -> Result<String>;

    /// Compare two versions
    fn compare(&self, a: &str, b: &str) -> Result<Ordering>;

    /// Check if a version string is valid for this strategy
    fn is_valid(&self, version: &str) -> bool;
}
