//! Commit header parsing

mod conventional;

pub use conventional::ConventionalParser;

use publisher_core::types::Commit;

use crate::types::ParsedHeader;

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Parse the header of a raw commit message
    fn parse(&self, message: &str) -> Option<ParsedHeader>;

    /// Fill in the derived `subject` and `scope` fields of a commit
    fn annotate(&self, commit: &mut Commit) {
        match self.parse(&commit.message) {
            Some(header) => {
                commit.subject = Some(header.commit_type);
                commit.scope = header.scope;
            }
            None => {
                commit.subject = None;
                commit.scope = None;
            }
        }
    }
}
