//! File helpers shared by version sources

use std::path::{Path, PathBuf};

use publisher_core::error::{AdapterError, Result};
use tracing::{debug, warn};

/// Files matching `pattern` inside `dir`, sorted
pub(crate) fn glob_sorted(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let mut paths: Vec<PathBuf> = match glob::glob(&full) {
        Ok(paths) => paths.flatten().filter(|p| p.is_file()).collect(),
        Err(e) => {
            warn!(pattern = %full, error = %e, "invalid glob pattern");
            Vec::new()
        }
    };
    paths.sort();
    paths
}

/// First candidate; more than one is worth a warning
pub(crate) fn first_candidate(source: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
    if candidates.len() > 1 {
        warn!(
            source,
            count = candidates.len(),
            using = %candidates[0].display(),
            "multiple candidate files found, using the first"
        );
    }
    candidates.first().cloned()
}

pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AdapterError::ManifestNotFound(path.to_path_buf()).into()
        } else {
            AdapterError::Io(e).into()
        }
    })
}

pub(crate) fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| {
        AdapterError::ManifestUpdateError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Replace every literal occurrence of `old` with `new`.
///
/// Returns whether the file changed.
pub fn replace_version_in_file(path: &Path, old: &str, new: &str) -> Result<bool> {
    let content = read(path)?;
    if old.is_empty() || !content.contains(old) {
        debug!(path = %path.display(), old, "version string not present");
        return Ok(false);
    }
    write(path, &content.replace(old, new))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_sorted() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("b.rc"), "").unwrap();
        std::fs::write(temp.path().join("a.rc"), "").unwrap();
        std::fs::write(temp.path().join("c.txt"), "").unwrap();

        let found = glob_sorted(temp.path(), "*.rc");
        assert_eq!(found, vec![temp.path().join("a.rc"), temp.path().join("b.rc")]);
        assert_eq!(first_candidate("rc", &found), Some(temp.path().join("a.rc")));
    }

    #[test]
    fn test_replace_version_in_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("version.h");
        std::fs::write(&path, "#define VERSION \"1.2.3\"\n").unwrap();

        assert!(replace_version_in_file(&path, "1.2.3", "1.3.0").unwrap());
        assert!(!replace_version_in_file(&path, "1.2.3", "1.3.0").unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#define VERSION \"1.3.0\"\n");
    }

    #[test]
    fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = read(&temp.path().join("missing")).unwrap_err();
        assert_eq!(err.code(), 501);
    }
}
