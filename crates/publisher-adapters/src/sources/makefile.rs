//! Makefile `VERSION =` and Windows resource (.rc) files

use std::path::{Path, PathBuf};

use publisher_core::error::Result;
use publisher_core::types::VersionInfo;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use crate::files::{first_candidate, glob_sorted, read, write};
use crate::traits::VersionSource;

static MAKE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<head>VERSION\s*[:?]?=\s*)(?P<version>\S+)").expect("Invalid regex")
});

static RC_STRING_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>"(?:File|Product)Version"\s*,\s*")(?P<version>[^"]*)(?P<tail>")"#)
        .expect("Invalid regex")
});

static RC_NUMERIC_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<head>\s*(?:FILEVERSION|PRODUCTVERSION)\s+)(?P<version>\d+(?:\s*,\s*\d+)*)")
        .expect("Invalid regex")
});

/// Reads and bumps a Makefile and Windows resource scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct MakefileSource;

impl MakefileSource {
    /// Create a new Makefile/RC source
    pub fn new() -> Self {
        Self
    }

    fn makefile(&self, dir: &Path) -> Option<PathBuf> {
        let path = dir.join("Makefile");
        path.is_file().then_some(path)
    }

    fn rc_files(&self, dir: &Path) -> Vec<PathBuf> {
        glob_sorted(dir, "**/*.rc")
    }

    fn read_rc(&self, path: &Path) -> Result<Option<String>> {
        let content = read(path)?;
        if let Some(caps) = RC_STRING_VERSION.captures(&content) {
            return Ok(Some(caps["version"].to_string()));
        }
        Ok(RC_NUMERIC_VERSION.captures(&content).map(|caps| {
            caps["version"]
                .split(',')
                .map(str::trim)
                .take(3)
                .collect::<Vec<_>>()
                .join(".")
        }))
    }
}

/// Numeric version parts padded to four, comma separated
fn rc_numeric(version: &str) -> String {
    let mut parts: Vec<String> = version
        .split(['.', '-', '+'])
        .take_while(|p| p.chars().all(|c| c.is_ascii_digit()) && !p.is_empty())
        .take(4)
        .map(str::to_string)
        .collect();
    while parts.len() < 4 {
        parts.push("0".to_string());
    }
    parts.join(",")
}

impl VersionSource for MakefileSource {
    fn name(&self) -> &'static str {
        "makefile"
    }

    fn detect(&self, dir: &Path) -> bool {
        self.makefile(dir).is_some() || !self.rc_files(dir).is_empty()
    }

    #[instrument(skip(self), fields(source = "makefile"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        if let Some(path) = self.makefile(dir) {
            let content = read(&path)?;
            if let Some(caps) = MAKE_VERSION.captures(&content) {
                debug!(path = %path.display(), "version read from Makefile");
                return Ok(Some(
                    VersionInfo::new(&caps["version"]).with_source(self.name()),
                ));
            }
        }

        let Some(path) = first_candidate("rc", &self.rc_files(dir)) else {
            return Ok(None);
        };
        let version = self.read_rc(&path)?;
        debug!(path = %path.display(), version = ?version, "version read from resource file");
        Ok(version.map(|v| VersionInfo::new(v).with_source(self.name())))
    }

    fn write_version(&self, dir: &Path, version: &str) -> Result<()> {
        if let Some(path) = self.makefile(dir) {
            let content = read(&path)?;
            let updated = MAKE_VERSION.replacen(&content, 1, |caps: &regex::Captures| {
                format!("{}{}", &caps["head"], version)
            });
            write(&path, &updated)?;
        }

        let numeric = rc_numeric(version);
        for path in self.rc_files(dir) {
            let content = read(&path)?;
            let updated = RC_STRING_VERSION.replace_all(&content, |caps: &regex::Captures| {
                format!("{}{}{}", &caps["head"], version, &caps["tail"])
            });
            let updated = RC_NUMERIC_VERSION.replace_all(&updated, |caps: &regex::Captures| {
                format!("{}{}", &caps["head"], numeric)
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

    const RC: &str = "1 VERSIONINFO\n FILEVERSION 1,2,3,0\n PRODUCTVERSION 1,2,3,0\nBEGIN\n  VALUE \"FileVersion\", \"1.2.3\"\n  VALUE \"ProductVersion\", \"1.2.3\"\nEND\n";

    #[test]
    fn test_makefile_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Makefile"), "NAME = app\nVERSION = 2.4.1\n\nall:\n\tcc main.c\n").unwrap();

        let source = MakefileSource::new();
        assert_eq!(source.read_version(temp.path()).unwrap().unwrap().version, "2.4.1");

        source.write_version(temp.path(), "2.5.0").unwrap();
        let content = std::fs::read_to_string(temp.path().join("Makefile")).unwrap();
        assert!(content.contains("VERSION = 2.5.0\n"));
        assert!(content.contains("\tcc main.c"));
    }

    #[test]
    fn test_rc_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("app.rc"), RC).unwrap();

        let source = MakefileSource::new();
        assert!(source.detect(temp.path()));
        assert_eq!(source.read_version(temp.path()).unwrap().unwrap().version, "1.2.3");

        source.write_version(temp.path(), "1.3.0").unwrap();
        let content = std::fs::read_to_string(temp.path().join("app.rc")).unwrap();
        assert!(content.contains(" FILEVERSION 1,3,0,0\n"));
        assert!(content.contains("\"ProductVersion\", \"1.3.0\""));
    }

    #[test]
    fn test_rc_numeric_padding() {
        assert_eq!(rc_numeric("1.3.0"), "1,3,0,0");
        assert_eq!(rc_numeric("2.0.0-beta.1"), "2,0,0,0");
        assert_eq!(rc_numeric("101"), "101,0,0,0");
    }
}
