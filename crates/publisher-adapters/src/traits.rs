//! Version source traits

use std::path::Path;

use publisher_core::error::Result;
use publisher_core::types::VersionInfo;

/// A project file format the current version can be read from
pub trait VersionSource: Send + Sync {
    /// Get the source name (e.g., "npm", "maven")
    fn name(&self) -> &'static str;

    /// Check if this source applies to the project directory
    fn detect(&self, dir: &Path) -> bool;

    /// Read the current version; `None` when the file carries none
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>>;

    /// Replace the version in the source's files
    fn write_version(&self, dir: &Path, version: &str) -> Result<()>;

    /// Whether a release bumps this source
    fn writable(&self) -> bool {
        true
    }
}
