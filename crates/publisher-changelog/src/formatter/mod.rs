//! Changelog formatters
//!
//! A formatter owns one persisted layout: how entries are rendered into a
//! section body, how a section body is parsed back, and where section headers
//! sit in the file.

mod markdown;
mod registry;
mod text;

pub use markdown::MarkdownFormatter;
pub use registry::FormatterRegistry;
pub use text::TextFormatter;

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use publisher_core::config::ChangelogFormat;
use publisher_core::types::Commit;
use publisher_core::Result;

use crate::parser::CommitParser;
use crate::tickets::extract_tickets;
use crate::types::{ChangelogEntry, SectionMarker};
use crate::vocabulary::{format_scope, Vocabulary, OTHER_NOTES};

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Formatter name
    fn name(&self) -> &'static str;

    /// Persisted format this formatter writes
    fn format(&self) -> ChangelogFormat;

    /// Render entries into a section body
    fn render(&self, entries: &[ChangelogEntry]) -> String;

    /// Parse a section body back into entries
    fn parse(&self, section: &str) -> Result<Vec<ChangelogEntry>>;

    /// Title written at the top of a new file
    fn title(&self, project_name: &str) -> String;

    /// Header line(s) opening a version's section
    fn section_header(&self, version: &str, date: NaiveDate) -> String;

    /// Locate every version section in a file, in file order
    fn find_versions(&self, content: &str, path: &Path) -> Result<Vec<SectionMarker>>;

    /// Marker of the most recent version
    fn latest<'m>(&self, markers: &'m [SectionMarker]) -> Option<&'m SectionMarker>;

    /// Place a complete section (header and body) into existing file content
    fn merge(&self, existing: &str, section: &str) -> String;

    /// Convert a section body to HTML
    fn to_html(&self, section: &str) -> String;
}

/// Turn commits into changelog entries.
///
/// Commits keep their order; commits without a header are moved to a trailing
/// "Other Notes" group. Skipped types produce nothing.
pub fn entries_from_commits(
    commits: &[Commit],
    parser: &dyn CommitParser,
    vocabulary: &Vocabulary,
) -> Vec<ChangelogEntry> {
    let mut entries = Vec::new();
    let mut other_notes = Vec::new();

    for commit in commits {
        let header = parser.parse(&commit.message);
        let Some(section) = vocabulary.section(header.as_ref().map(|h| h.commit_type.as_str()))
        else {
            continue;
        };

        let raw = header
            .as_ref()
            .map_or(commit.message.as_str(), |h| h.body.as_str());
        let (message, tickets) = extract_tickets(raw);
        let message = clean_message(&message);
        if message.is_empty() && tickets.is_none() {
            continue;
        }

        let entry = ChangelogEntry {
            subject: section.subject,
            scope: header
                .and_then(|h| h.scope)
                .map(|s| format_scope(&s))
                .filter(|s| !s.is_empty()),
            message,
            tickets,
        };

        if entry.subject == OTHER_NOTES {
            other_notes.push(entry);
        } else {
            entries.push(entry);
        }
    }

    entries.extend(other_notes);
    entries
}

/// Drop blank lines and trailing whitespace; trim the first line
fn clean_message(message: &str) -> String {
    let lines: Vec<&str> = message
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    match lines.split_first() {
        Some((first, rest)) => std::iter::once(first.trim_start())
            .chain(rest.iter().copied())
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}

/// Release date as printed in section headers ("October 17th, 2026")
pub fn format_release_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ConventionalParser;
    use chrono::Utc;

    fn commit(message: &str) -> Commit {
        Commit::new("abc1234", message, "dev", Utc::now())
    }

    #[test]
    fn test_entries_from_commits() {
        let commits = vec![
            commit("Merge branch 'main'"),
            commit("fix(ui): crash on close [fixed #12, #13]"),
            commit("chore: bump deps"),
            commit("feat(parser): nested scopes\n\nsupports a(b(c))\n"),
        ];
        let entries =
            entries_from_commits(&commits, &ConventionalParser::new(), &Vocabulary::default());

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].subject, "Bug Fix");
        assert_eq!(entries[0].scope.as_deref(), Some("UI"));
        assert_eq!(entries[0].message, "crash on close");
        assert_eq!(entries[0].tickets.as_deref(), Some("Fixes #12, #13"));
        assert_eq!(entries[1].scope.as_deref(), Some("Parser"));
        assert_eq!(entries[1].message, "nested scopes\nsupports a(b(c))");
        assert_eq!(entries[2].subject, OTHER_NOTES);
        assert_eq!(entries[2].message, "Merge branch 'main'");
    }

    #[test]
    fn test_release_date_suffixes() {
        let date = |d| NaiveDate::from_ymd_opt(2026, 10, d).unwrap();
        assert_eq!(format_release_date(date(17)), "October 17th, 2026");
        assert_eq!(format_release_date(date(1)), "October 1st, 2026");
        assert_eq!(format_release_date(date(22)), "October 22nd, 2026");
        assert_eq!(format_release_date(date(23)), "October 23rd, 2026");
        assert_eq!(format_release_date(date(11)), "October 11th, 2026");
        assert_eq!(format_release_date(date(12)), "October 12th, 2026");
    }
}
