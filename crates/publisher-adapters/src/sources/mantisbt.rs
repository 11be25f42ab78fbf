//! MantisBT plugin header (`$this->version = '...';`)

use std::path::{Path, PathBuf};

use publisher_core::error::Result;
use publisher_core::types::VersionInfo;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

use crate::files::{first_candidate, glob_sorted, read, write};
use crate::traits::VersionSource;

static PLUGIN_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>\$this->version\s*=\s*)(?P<quote>['"])(?P<version>[^'"]*)['"](?P<tail>\s*;)"#)
        .expect("Invalid regex")
});

/// Reads and bumps the version of a MantisBT plugin class
#[derive(Debug, Clone, Copy, Default)]
pub struct MantisBtSource;

impl MantisBtSource {
    /// Create a new MantisBT source
    pub fn new() -> Self {
        Self
    }

    /// Root PHP files declaring a plugin version
    fn plugin_files(&self, dir: &Path) -> Vec<PathBuf> {
        glob_sorted(dir, "*.php")
            .into_iter()
            .filter(|p| read(p).is_ok_and(|c| PLUGIN_VERSION.is_match(&c)))
            .collect()
    }
}

impl VersionSource for MantisBtSource {
    fn name(&self) -> &'static str {
        "mantisbt"
    }

    fn detect(&self, dir: &Path) -> bool {
        !self.plugin_files(dir).is_empty()
    }

    #[instrument(skip(self), fields(source = "mantisbt"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        let Some(path) = first_candidate(self.name(), &self.plugin_files(dir)) else {
            return Ok(None);
        };
        let content = read(&path)?;
        Ok(PLUGIN_VERSION
            .captures(&content)
            .map(|caps| caps["version"].to_string())
            .filter(|v| !v.is_empty())
            .map(|v| VersionInfo::new(v).with_source(self.name())))
    }

    fn write_version(&self, dir: &Path, version: &str) -> Result<()> {
        for path in self.plugin_files(dir) {
            let content = read(&path)?;
            let updated = PLUGIN_VERSION.replace(&content, |caps: &regex::Captures| {
                format!(
                    "{}{q}{}{q}{}",
                    &caps["head"],
                    version,
                    &caps["tail"],
                    q = &caps["quote"]
                )
            });
            write(&path, &updated)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLUGIN: &str = "<?php\nclass ReleasesPlugin extends MantisPlugin {\n    function register() {\n        $this->name = 'Releases';\n        $this->version = '1.4.2';\n    }\n}\n";

    #[test]
    fn test_read_and_write() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Releases.php"), PLUGIN).unwrap();
        std::fs::write(temp.path().join("index.php"), "<?php echo 'hi';\n").unwrap();

        let source = MantisBtSource::new();
        assert!(source.detect(temp.path()));
        assert_eq!(source.read_version(temp.path()).unwrap().unwrap().version, "1.4.2");

        source.write_version(temp.path(), "1.5.0").unwrap();
        let content = std::fs::read_to_string(temp.path().join("Releases.php")).unwrap();
        assert!(content.contains("$this->version = '1.5.0';"));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("index.php")).unwrap(),
            "<?php echo 'hi';\n"
        );
    }

    #[test]
    fn test_no_plugin_files() {
        let temp = TempDir::new().unwrap();
        assert!(!MantisBtSource::new().detect(temp.path()));
    }
}
