//! .NET AssemblyInfo.cs

use std::path::{Path, PathBuf};

use publisher_core::error::Result;
use publisher_core::types::{VersionInfo, VersionSystem};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::files::{first_candidate, read, write};
use crate::traits::VersionSource;

static ASSEMBLY_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?P<head>Assembly(?:File|Informational)?Version\s*\(\s*")(?P<version>[^"]*)(?P<tail>"\s*\))"#)
        .expect("Invalid regex")
});

/// Directories never searched for assembly info
const SKIP_DIRS: &[&str] = &["node_modules", "bin", "obj", "packages"];

/// Reads and bumps `AssemblyVersion` attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct DotNetSource;

impl DotNetSource {
    /// Create a new .NET source
    pub fn new() -> Self {
        Self
    }

    fn assembly_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0 || !(name.starts_with('.') || SKIP_DIRS.contains(&name.as_ref()))
            })
            .flatten()
            .filter(|e| e.file_type().is_file() && e.file_name() == "AssemblyInfo.cs")
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }
}

impl VersionSource for DotNetSource {
    fn name(&self) -> &'static str {
        ".net"
    }

    fn detect(&self, dir: &Path) -> bool {
        !self.assembly_files(dir).is_empty()
    }

    #[instrument(skip(self), fields(source = ".net"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        let Some(path) = first_candidate(self.name(), &self.assembly_files(dir)) else {
            return Ok(None);
        };
        let content = read(&path)?;
        let version = ASSEMBLY_VERSION
            .captures_iter(&content)
            .find(|caps| caps["head"].starts_with("AssemblyVersion"))
            .map(|caps| caps["version"].to_string());
        debug!(path = %path.display(), version = ?version, "assembly info read");
        Ok(version.map(|v| {
            VersionInfo::new(v)
                .with_system(VersionSystem::DotNet)
                .with_source(self.name())
        }))
    }

    fn write_version(&self, dir: &Path, version: &str) -> Result<()> {
        for path in self.assembly_files(dir) {
            let content = read(&path)?;
            let updated = ASSEMBLY_VERSION.replace_all(&content, |caps: &regex::Captures| {
                format!("{}{}{}", &caps["head"], version, &caps["tail"])
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

    const ASSEMBLY_INFO: &str = "using System.Reflection;\n[assembly: AssemblyTitle(\"App\")]\n[assembly: AssemblyVersion(\"1.2.3.0\")]\n[assembly: AssemblyFileVersion(\"1.2.3.0\")]\n";

    #[test]
    fn test_read_and_write() {
        let temp = TempDir::new().unwrap();
        let props = temp.path().join("src").join("App").join("Properties");
        std::fs::create_dir_all(&props).unwrap();
        std::fs::write(props.join("AssemblyInfo.cs"), ASSEMBLY_INFO).unwrap();

        let source = DotNetSource::new();
        assert!(source.detect(temp.path()));
        let info = source.read_version(temp.path()).unwrap().unwrap();
        assert_eq!(info.version, "1.2.3.0");
        assert_eq!(info.version_system, VersionSystem::DotNet);

        source.write_version(temp.path(), "1.3.0.0").unwrap();
        let content = std::fs::read_to_string(props.join("AssemblyInfo.cs")).unwrap();
        assert_eq!(content, ASSEMBLY_INFO.replace("1.2.3.0", "1.3.0.0"));
    }

    #[test]
    fn test_skips_build_output() {
        let temp = TempDir::new().unwrap();
        let obj = temp.path().join("obj");
        std::fs::create_dir_all(&obj).unwrap();
        std::fs::write(obj.join("AssemblyInfo.cs"), ASSEMBLY_INFO).unwrap();

        assert!(!DotNetSource::new().detect(temp.path()));
    }
}
