//! Maven pom.xml

use std::path::{Path, PathBuf};

use publisher_core::error::{AdapterError, Result};
use publisher_core::types::VersionInfo;
use tracing::{debug, instrument};

use crate::files::{read, write};
use crate::traits::VersionSource;

/// Reads and bumps the project `<version>` of a pom.xml
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenSource;

impl MavenSource {
    /// Create a new Maven source
    pub fn new() -> Self {
        Self
    }

    fn pom_path(&self, dir: &Path) -> PathBuf {
        dir.join("pom.xml")
    }
}

/// Index of the line holding the project's own `<version>` element.
///
/// Versions nested in `<parent>`, `<dependencies>`, `<plugins>` and similar
/// blocks belong to other artifacts and are skipped.
fn project_version_line(content: &str) -> Option<usize> {
    const NESTED: &[&str] = &[
        "parent",
        "dependencies",
        "dependencyManagement",
        "build",
        "profiles",
        "reporting",
    ];
    let mut depth = 0usize;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        for tag in NESTED {
            if trimmed.starts_with(&format!("<{}>", tag)) || trimmed.starts_with(&format!("<{} ", tag)) {
                depth += 1;
            }
        }
        if depth == 0 && trimmed.starts_with("<version>") && trimmed.contains("</version>") {
            return Some(index);
        }
        for tag in NESTED {
            if trimmed.contains(&format!("</{}>", tag)) {
                depth = depth.saturating_sub(1);
            }
        }
    }
    None
}

fn element_text<'a>(line: &'a str, element: &str) -> Option<&'a str> {
    let start_tag = format!("<{}>", element);
    let end_tag = format!("</{}>", element);
    let start = line.find(&start_tag)? + start_tag.len();
    let end = line[start..].find(&end_tag)? + start;
    Some(line[start..end].trim())
}

impl VersionSource for MavenSource {
    fn name(&self) -> &'static str {
        "maven"
    }

    fn detect(&self, dir: &Path) -> bool {
        self.pom_path(dir).exists()
    }

    #[instrument(skip(self), fields(source = "maven"))]
    fn read_version(&self, dir: &Path) -> Result<Option<VersionInfo>> {
        let content = read(&self.pom_path(dir))?;
        let version = project_version_line(&content)
            .and_then(|i| content.lines().nth(i))
            .and_then(|line| element_text(line, "version"))
            .filter(|v| !v.is_empty());
        debug!(version = ?version, "pom.xml read");
        Ok(version.map(|v| VersionInfo::new(v).with_source(self.name())))
    }

    fn write_version(&self, dir: &Path, version: &str) -> Result<()> {
        let path = self.pom_path(dir);
        let content = read(&path)?;
        let Some(target) = project_version_line(&content) else {
            return Err(AdapterError::ManifestUpdateError {
                path,
                reason: "could not find project version".to_string(),
            }
            .into());
        };

        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let line = &lines[target];
        let replacement = format!(
            "{}<version>{}</version>",
            &line[..line.len() - line.trim_start().len()],
            version
        );
        lines[target] = replacement;

        let mut updated = lines.join("\n");
        if content.ends_with('\n') {
            updated.push('\n');
        }
        write(&path, &updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
    <parent>
        <groupId>com.example</groupId>
        <version>9.9.9</version>
    </parent>
    <artifactId>my-project</artifactId>
    <version>1.0.0</version>
    <dependencies>
        <dependency>
            <groupId>org.lib</groupId>
            <version>3.1.0</version>
        </dependency>
    </dependencies>
</project>
"#;

    #[test]
    fn test_reads_project_version_not_parent() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pom.xml"), POM).unwrap();

        let info = MavenSource::new().read_version(temp.path()).unwrap().unwrap();
        assert_eq!(info.version, "1.0.0");
    }

    #[test]
    fn test_write_version_only_touches_project() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pom.xml"), POM).unwrap();

        MavenSource::new().write_version(temp.path(), "1.1.0").unwrap();
        let content = std::fs::read_to_string(temp.path().join("pom.xml")).unwrap();
        assert!(content.contains("    <version>1.1.0</version>\n    <dependencies>"));
        assert!(content.contains("<version>9.9.9</version>"));
        assert!(content.contains("<version>3.1.0</version>"));
        assert!(content.ends_with("</project>\n"));
    }

    #[test]
    fn test_pom_without_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pom.xml"), "<project>\n</project>\n").unwrap();

        let source = MavenSource::new();
        assert!(source.read_version(temp.path()).unwrap().is_none());
        assert!(source.write_version(temp.path(), "1.0.0").is_err());
    }
}
