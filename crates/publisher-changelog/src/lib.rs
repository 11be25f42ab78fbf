//! Publisher Changelog - commit classification and changelog rendering
//!
//! Parses commit headers, reduces a batch of commits to a release level, and
//! renders, stores and re-reads changelog sections in Markdown or fixed-width
//! text form.

pub mod analyzer;
pub mod formatter;
pub mod html;
pub mod parser;
pub mod release_notes;
pub mod sort;
pub mod store;
pub mod tickets;
pub mod types;
pub mod vocabulary;

pub use analyzer::ReleaseLevelClassifier;
pub use formatter::{
    entries_from_commits, format_release_date, ChangelogFormatter, FormatterRegistry,
    MarkdownFormatter, TextFormatter,
};
pub use parser::{CommitParser, ConventionalParser};
pub use release_notes::ReleaseNotes;
pub use sort::sort_commits;
pub use store::{ChangelogStore, EditOutcome, SectionMode};
pub use types::{ChangelogEntry, ParsedHeader, SectionMarker};
pub use vocabulary::Vocabulary;
