//! Tag operations

use std::cmp::Ordering;

use chrono::{TimeZone, Utc};
use semver::Version;
use tracing::{debug, info, instrument};

use publisher_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// All tags, with versions read through `tag_format`
    #[instrument(skip(self))]
    pub fn tags(&self, tag_format: &str) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag
                let mut info = TagInfo::new(&name, tag.target_id().to_string());
                if let Some(msg) = tag.message() {
                    info = info.with_message(msg.trim_end());
                }
                if let Some(when) = tag
                    .tagger()
                    .and_then(|t| Utc.timestamp_opt(t.when().seconds(), 0).single())
                {
                    info = info.with_timestamp(when);
                }
                tags.push(info.with_tag_format(tag_format));
            } else {
                tags.push(TagInfo::new(&name, oid.to_string()).with_tag_format(tag_format));
            }

            true
        })?;

        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    /// The tag carrying the highest version for `tag_format`
    #[instrument(skip(self))]
    pub fn find_latest_tag(&self, tag_format: &str) -> Result<Option<TagInfo>> {
        let mut versioned: Vec<TagInfo> = self
            .tags(tag_format)?
            .into_iter()
            .filter(|t| t.version.is_some())
            .collect();

        versioned.sort_by(|a, b| {
            compare_versions(
                a.version.as_deref().unwrap_or_default(),
                b.version.as_deref().unwrap_or_default(),
            )
        });

        let latest = versioned.pop();
        debug!(latest = ?latest.as_ref().map(|t| &t.name), "found latest tag");
        Ok(latest)
    }

    /// Find a tag by exact name
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(reference) => {
                let target = reference.peel_to_commit()?;
                Ok(Some(TagInfo::new(name, target.id().to_string())))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Commit hash a tag points to
    pub fn tag_head(&self, name: &str) -> Result<String> {
        self.find_tag(name)?
            .map(|t| t.commit_hash)
            .ok_or_else(|| GitError::TagNotFound(name.to_string()))
    }

    /// Tag HEAD, annotated when a message is given
    #[instrument(skip(self), fields(name, annotated = message.is_some()))]
    pub fn create_tag(&self, name: &str, message: Option<&str>) -> Result<TagInfo> {
        if self.find_tag(name)?.is_some() {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.head_commit()?;
        match message {
            Some(msg) => {
                let sig = self.repo.signature()?;
                self.repo.tag(name, head.as_object(), &sig, msg, false)?;
            }
            None => {
                self.repo.tag_lightweight(name, head.as_object(), false)?;
            }
        }

        info!(name, "created tag");
        Ok(TagInfo::new(name, head.id().to_string()))
    }
}

/// Semver versions order by precedence, build numbers numerically, and
/// semver sorts above build numbers when the two are mixed.
fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo_with_tags(tags: &[&str]) -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("file.txt"), "content").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let commit = repo.find_commit(oid).unwrap();
        for tag in tags {
            repo.tag_lightweight(tag, commit.as_object(), false).unwrap();
        }

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_latest_tag_by_semver_precedence() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.2.0", "v1.10.0", "v1.9.9", "misc"]);
        let latest = repo.find_latest_tag("v{version}").unwrap().unwrap();
        assert_eq!(latest.name, "v1.10.0");
    }

    #[test]
    fn test_latest_tag_incremental() {
        let (_temp, repo) = setup_repo_with_tags(&["v99", "v100", "v101"]);
        let latest = repo.find_latest_tag("v{version}").unwrap().unwrap();
        assert_eq!(latest.version.as_deref(), Some("101"));
    }

    #[test]
    fn test_tag_head() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        assert_eq!(repo.tag_head("v1.0.0").unwrap(), repo.head_hash().unwrap());
        assert!(matches!(repo.tag_head("v2.0.0"), Err(GitError::TagNotFound(_))));
    }

    #[test]
    fn test_create_tag() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let tag = repo.create_tag("v1.1.0", Some("chore(release): 1.1.0")).unwrap();
        assert_eq!(tag.version.as_deref(), Some("1.1.0"));

        let annotated = repo
            .tags("v{version}")
            .unwrap()
            .into_iter()
            .find(|t| t.name == "v1.1.0")
            .unwrap();
        assert_eq!(annotated.message.as_deref(), Some("chore(release): 1.1.0"));
    }

    #[test]
    fn test_tag_already_exists() {
        let (_temp, repo) = setup_repo_with_tags(&["v1.0.0"]);
        let result = repo.create_tag("v1.0.0", None);
        assert!(matches!(result, Err(GitError::TagExists(_))));
    }
}
