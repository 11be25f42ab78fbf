//! Ordered version source probing

use std::path::{Path, PathBuf};
use std::sync::Arc;

use publisher_core::config::Config;
use publisher_core::error::{ConfigError, Result};
use publisher_core::types::{VersionInfo, VersionSystem};
use tracing::{debug, info, instrument, warn};

use crate::files::replace_version_in_file;
use crate::sources::{
    ChangelogSource, DotNetSource, MakefileSource, MantisBtSource, MavenSource, NpmSource,
    OverrideSource,
};
use crate::traits::VersionSource;

/// Resolves the current version from the first source that yields one
pub struct VersionResolver {
    sources: Vec<Arc<dyn VersionSource>>,
    forced_system: Option<VersionSystem>,
}

impl VersionResolver {
    /// Resolver with the project file sources only
    pub fn new() -> Self {
        Self {
            sources: vec![
                Arc::new(NpmSource::new()),
                Arc::new(DotNetSource::new()),
                Arc::new(MakefileSource::new()),
                Arc::new(MavenSource::new()),
                Arc::new(MantisBtSource::new()),
            ],
            forced_system: None,
        }
    }

    /// Resolver with every source, the changelog and configured override last
    pub fn for_config(config: &Config) -> Self {
        let mut resolver = Self::new();
        resolver.register(ChangelogSource::new(config));
        resolver.register(OverrideSource::new(config.versioning.current_version.clone()));
        resolver.forced_system = config.versioning.forced_system();
        resolver
    }

    /// Create an empty resolver
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            forced_system: None,
        }
    }

    /// Force the version system of every resolved version
    pub fn with_system(mut self, system: VersionSystem) -> Self {
        self.forced_system = Some(system);
        self
    }

    /// Append a source after the existing ones
    pub fn register<S: VersionSource + 'static>(&mut self, source: S) {
        self.sources.push(Arc::new(source));
    }

    /// Get source by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn VersionSource>> {
        self.sources.iter().find(|s| s.name() == name).cloned()
    }

    /// Source names in lookup order
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Sources that apply to a directory, in lookup order
    pub fn detected(&self, dir: &Path) -> Vec<Arc<dyn VersionSource>> {
        self.sources
            .iter()
            .filter(|s| s.detect(dir))
            .cloned()
            .collect()
    }

    /// Current version of the project in `dir`
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn resolve(&self, dir: &Path) -> Result<VersionInfo> {
        for source in &self.sources {
            if !source.detect(dir) {
                continue;
            }
            match source.read_version(dir)? {
                Some(info) if !info.version.trim().is_empty() => {
                    let info = match self.forced_system {
                        Some(system) => info.with_system(system),
                        None => info,
                    };
                    info!(
                        source = source.name(),
                        version = %info.version,
                        system = %info.version_system,
                        "resolved current version"
                    );
                    return Ok(info);
                }
                _ => debug!(source = source.name(), "source carries no version"),
            }
        }
        Err(ConfigError::CurrentVersionUnknown.into())
    }

    /// Write `new` into every detected writable source and the extra files.
    ///
    /// Returns a description of each updated target. Nothing is touched when
    /// `dry_run` is set.
    #[instrument(skip(self, extra_files), fields(dir = %dir.display()))]
    pub fn bump_versions(
        &self,
        dir: &Path,
        old: &str,
        new: &str,
        extra_files: &[PathBuf],
        dry_run: bool,
    ) -> Result<Vec<String>> {
        let mut updated = Vec::new();

        for source in self.detected(dir) {
            if !source.writable() {
                continue;
            }
            if !dry_run {
                source.write_version(dir, new)?;
            }
            info!(source = source.name(), version = new, dry_run, "bumped version");
            updated.push(source.name().to_string());
        }

        for file in extra_files {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                dir.join(file)
            };
            if !path.exists() {
                warn!(path = %path.display(), "version file not found");
                continue;
            }
            let changed = if dry_run {
                std::fs::read_to_string(&path).is_ok_and(|c| !old.is_empty() && c.contains(old))
            } else {
                replace_version_in_file(&path, old, new)?
            };
            if changed {
                updated.push(path.display().to_string());
            }
        }

        Ok(updated)
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lookup_order() {
        let resolver = VersionResolver::for_config(&Config::default());
        assert_eq!(
            resolver.names(),
            vec!["npm", ".net", "makefile", "maven", "mantisbt", "changelog", "override"]
        );
        assert!(resolver.get("maven").is_some());
        assert!(resolver.get("cargo").is_none());
    }

    #[test]
    fn test_first_source_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"name": "app", "version": "2.1.0"}"#,
        )
        .unwrap();
        std::fs::write(
            temp.path().join("pom.xml"),
            "<project>\n  <version>9.0.0</version>\n</project>\n",
        )
        .unwrap();

        let info = VersionResolver::new().resolve(temp.path()).unwrap();
        assert_eq!(info.version, "2.1.0");
        assert_eq!(info.source.as_deref(), Some("npm"));
    }

    #[test]
    fn test_empty_manifest_falls_through() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("package.json"), r#"{"name": "app"}"#).unwrap();
        let mut config = Config::default();
        config.versioning.current_version = Some("41".to_string());

        let info = VersionResolver::for_config(&config).resolve(temp.path()).unwrap();
        assert_eq!(info.version, "41");
        assert_eq!(info.version_system, VersionSystem::Incremental);
        assert_eq!(info.source.as_deref(), Some("override"));
    }

    #[test]
    fn test_forced_system() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.versioning.current_version = Some("1.2.3".to_string());
        config.versioning.system = "manual".to_string();

        let info = VersionResolver::for_config(&config).resolve(temp.path()).unwrap();
        assert_eq!(info.version_system, VersionSystem::Manual);
    }

    #[test]
    fn test_unknown_version_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = VersionResolver::for_config(&Config::default())
            .resolve(temp.path())
            .unwrap_err();
        assert_eq!(err.code(), 104);
    }

    #[test]
    fn test_bump_versions() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            "{\n  \"name\": \"app\",\n  \"version\": \"1.0.0\"\n}\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("version.h"), "#define V \"1.0.0\"\n").unwrap();
        let mut config = Config::default();
        config.versioning.current_version = Some("1.0.0".to_string());

        let resolver = VersionResolver::for_config(&config);
        let extra = vec![PathBuf::from("version.h"), PathBuf::from("missing.h")];

        let planned = resolver
            .bump_versions(temp.path(), "1.0.0", "1.1.0", &extra, true)
            .unwrap();
        assert_eq!(planned.len(), 2);
        assert!(std::fs::read_to_string(temp.path().join("package.json"))
            .unwrap()
            .contains("\"1.0.0\""));

        let updated = resolver
            .bump_versions(temp.path(), "1.0.0", "1.1.0", &extra, false)
            .unwrap();
        assert_eq!(updated[0], "npm");
        assert!(std::fs::read_to_string(temp.path().join("package.json"))
            .unwrap()
            .contains("\"version\": \"1.1.0\""));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("version.h")).unwrap(),
            "#define V \"1.1.0\"\n"
        );
    }
}
