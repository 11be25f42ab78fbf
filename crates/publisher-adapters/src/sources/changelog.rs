//! The changelog file itself, plus the configured override

use std::path::Path;

use publisher_changelog::ChangelogStore;
use publisher_core::config::Config;
use publisher_core::error::Result;
use publisher_core::types::VersionInfo;
use tracing::instrument;

use crate::traits::VersionSource;

/// Latest version recorded in the changelog or history file
pub struct ChangelogSource {
    config: Config,
}

impl ChangelogSource {
    /// Create a source for a project's configured changelog
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl VersionSource for ChangelogSource {
    fn name(&self) -> &'static str {
        "changelog"
    }

    fn detect(&self, dir: &Path) -> bool {
        dir.join(self.config.changelog_path()).exists()
    }

    #[instrument(skip(self), fields(source = "changelog"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        let store = ChangelogStore::for_config(&self.config, dir);
        Ok(store
            .latest_version()?
            .map(|v| VersionInfo::new(v).with_source(self.name())))
    }

    /// The changelog gains its new section through the changelog edit
    fn write_version(&self, _dir: &Path, _version: &str) -> Result<()> {
        Ok(())
    }

    fn writable(&self) -> bool {
        false
    }
}

/// `versioning.current_version` from the configuration
pub struct OverrideSource {
    version: Option<String>,
}

impl OverrideSource {
    /// Create an override source
    pub fn new(version: Option<String>) -> Self {
        Self {
            version: version.filter(|v| !v.trim().is_empty()),
        }
    }
}

impl VersionSource for OverrideSource {
    fn name(&self) -> &'static str {
        "override"
    }

    fn detect(&self, _dir: &Path) -> bool {
        self.version.is_some()
    }

    fn read_version(&self, _dir: &Path) -> Result<Option<VersionInfo>> {
        Ok(self
            .version
            .as_ref()
            .map(|v| VersionInfo::new(v.trim()).with_source(self.name())))
    }

    fn write_version(&self, _dir: &Path, _version: &str) -> Result<()> {
        Ok(())
    }

    fn writable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use publisher_core::types::VersionSystem;
    use tempfile::TempDir;

    #[test]
    fn test_changelog_latest_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("CHANGELOG.md"),
            "# APP CHANGE LOG\n\n## Version 1.1.0 (May 2nd, 2026)\n\n- b\n\n## Version 1.0.0 (May 1st, 2026)\n\n- a\n",
        )
        .unwrap();

        let source = ChangelogSource::new(&Config::default());
        assert!(source.detect(temp.path()));
        let info = source.read_version(temp.path()).unwrap().unwrap();
        assert_eq!(info.version, "1.1.0");
        assert!(!source.writable());
    }

    #[test]
    fn test_override() {
        let temp = TempDir::new().unwrap();
        let source = OverrideSource::new(Some("57".to_string()));
        let info = source.read_version(temp.path()).unwrap().unwrap();
        assert_eq!(info.version_system, VersionSystem::Incremental);

        assert!(!OverrideSource::new(Some("  ".to_string())).detect(temp.path()));
    }
}
