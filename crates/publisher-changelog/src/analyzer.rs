//! Release level classification

use publisher_core::types::{Commit, ReleaseLevel, VersionBump};
use tracing::{debug, instrument, warn};

use crate::parser::{CommitParser, ConventionalParser};
use crate::vocabulary::{builtin_level, Vocabulary};

/// Reduces a batch of commits to a single release level
pub struct ReleaseLevelClassifier {
    parser: Box<dyn CommitParser>,
    vocabulary: Vocabulary,
}

impl ReleaseLevelClassifier {
    /// Create a classifier with the default parser
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            parser: Box::new(ConventionalParser::new()),
            vocabulary,
        }
    }

    /// Use a custom parser
    pub fn with_parser<P: CommitParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    fn commit_type(&self, commit: &Commit) -> Option<String> {
        commit
            .subject
            .clone()
            .or_else(|| self.parser.parse(&commit.message).map(|h| h.commit_type))
    }

    /// Classify commits; `None` means no commit is releasable.
    ///
    /// Scanning stops at the first major commit. Patch never lowers a level
    /// already recorded, minor always raises one.
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn classify(&self, commits: &[Commit]) -> Option<ReleaseLevel> {
        let mut level = None;

        for commit in commits {
            if commit.message.to_lowercase().contains("breaking change") {
                debug!(hash = commit.short_hash(), "breaking change");
                level = Some(ReleaseLevel::Major);
                break;
            }

            let Some(commit_type) = self.commit_type(commit) else {
                continue;
            };

            let found = match builtin_level(&commit_type) {
                Some(found) => Some(found),
                None => self.map_level(&commit_type, level),
            };

            match found {
                Some(ReleaseLevel::Major) => {
                    level = Some(ReleaseLevel::Major);
                    break;
                }
                Some(ReleaseLevel::Minor) => level = Some(ReleaseLevel::Minor),
                Some(ReleaseLevel::Patch) if level.is_none() => {
                    level = Some(ReleaseLevel::Patch)
                }
                _ => {}
            }
        }

        debug!(level = ?level, "commits classified");
        level
    }

    /// Apply every matching map entry in order, starting from `current`
    fn map_level(&self, commit_type: &str, current: Option<ReleaseLevel>) -> Option<ReleaseLevel> {
        let mut level = current;
        for entry in self.vocabulary.map() {
            if !entry.include || !entry.commit_type.eq_ignore_ascii_case(commit_type) {
                continue;
            }
            match entry.version_bump.parse::<VersionBump>() {
                Ok(VersionBump::Level(ReleaseLevel::Patch)) => {
                    if level.is_none() {
                        level = Some(ReleaseLevel::Patch);
                    }
                }
                Ok(VersionBump::Level(ReleaseLevel::Major)) => return Some(ReleaseLevel::Major),
                Ok(VersionBump::Level(found)) => level = Some(found),
                Ok(VersionBump::None) => {}
                Err(_) => warn!(
                    commit_type,
                    version_bump = %entry.version_bump,
                    "invalid versionBump in commit type map, ignored"
                ),
            }
        }
        level
    }
}
