//! npm package.json

use std::path::{Path, PathBuf};

use publisher_core::error::{AdapterError, Result};
use publisher_core::types::VersionInfo;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::files::{read, write};
use crate::traits::VersionSource;

/// First `"version": "..."` member
static VERSION_MEMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>"version"\s*:\s*")(?P<version>[^"]*)(?P<tail>")"#)
        .expect("Invalid regex")
});

/// The parts of package.json the release reads
#[derive(Debug, Clone, Deserialize)]
pub struct PackageJson {
    /// Package name
    pub name: Option<String>,
    /// Package version
    pub version: Option<String>,
    /// Whether package is private
    #[serde(default)]
    pub private: bool,
}

impl PackageJson {
    /// Load package.json from path
    pub fn load(path: &Path) -> Result<Self> {
        let content = read(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AdapterError::ManifestParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Reads and bumps `package.json` (and `package-lock.json` when present)
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmSource;

impl NpmSource {
    /// Create a new npm source
    pub fn new() -> Self {
        Self
    }

    fn manifest_path(&self, dir: &Path) -> PathBuf {
        dir.join("package.json")
    }

    /// Rewrite the first version member, leaving the rest of the file as is
    fn set_version(&self, path: &Path, version: &str) -> Result<()> {
        let content = read(path)?;
        if !VERSION_MEMBER.is_match(&content) {
            return Err(AdapterError::ManifestUpdateError {
                path: path.to_path_buf(),
                reason: "no version member".to_string(),
            }
            .into());
        }
        let updated = VERSION_MEMBER.replacen(&content, 1, |caps: &regex::Captures| {
            format!("{}{}{}", &caps["head"], version, &caps["tail"])
        });
        write(path, &updated)
    }
}

impl VersionSource for NpmSource {
    fn name(&self) -> &'static str {
        "npm"
    }

    fn detect(&self, dir: &Path) -> bool {
        self.manifest_path(dir).exists()
    }

    #[instrument(skip(self), fields(source = "npm"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        let manifest = PackageJson::load(&self.manifest_path(dir))?;
        debug!(name = ?manifest.name, version = ?manifest.version, "package.json read");
        Ok(manifest
            .version
            .filter(|v| !v.trim().is_empty())
            .map(|v| VersionInfo::new(v).with_source(self.name())))
    }

    fn write_version(&self, dir: &Path, version: &str) -> Result<()> {
        self.set_version(&self.manifest_path(dir), version)?;
        let lock = dir.join("package-lock.json");
        if lock.exists() {
            self.set_version(&lock, version)?;
        }
        Ok(())
    }
}
