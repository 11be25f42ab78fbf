//! Commit type vocabulary
//!
//! Ordered lookup from a lowercase header type to the subject printed on each
//! entry, the Markdown heading grouping those entries, and the release level
//! the type triggers. A user-supplied commit type map extends the table.

use publisher_core::config::{ChangelogConfig, CommitTypeEntry};
use publisher_core::types::ReleaseLevel;

/// Types never rendered
pub const SKIP_TYPES: &[&str] = &["chore", "progress", "style", "project"];

/// Subject of header types missing from the table
pub const GENERAL: &str = "General";

/// Subject of commits without a recognized header
pub const OTHER_NOTES: &str = "Other Notes";

struct BuiltinType {
    types: &'static [&'static str],
    subject: &'static str,
    heading: &'static str,
    level: Option<ReleaseLevel>,
}

const BUILTIN_TYPES: &[BuiltinType] = &[
    BuiltinType {
        types: &["featmaj", "majfeat"],
        subject: "Feature",
        heading: "Features",
        level: Some(ReleaseLevel::Major),
    },
    BuiltinType {
        types: &["feat"],
        subject: "Feature",
        heading: "Features",
        level: Some(ReleaseLevel::Minor),
    },
    BuiltinType {
        types: &["featmin", "minfeat"],
        subject: "Feature",
        heading: "Features",
        level: Some(ReleaseLevel::Patch),
    },
    BuiltinType {
        types: &["perf"],
        subject: "Performance Enhancement",
        heading: "Performance Enhancements",
        level: Some(ReleaseLevel::Minor),
    },
    BuiltinType {
        types: &["perfmin", "minperf"],
        subject: "Performance Enhancement",
        heading: "Performance Enhancements",
        level: Some(ReleaseLevel::Patch),
    },
    BuiltinType {
        types: &["fix"],
        subject: "Bug Fix",
        heading: "Bug Fixes",
        level: Some(ReleaseLevel::Patch),
    },
    BuiltinType {
        types: &["refactor"],
        subject: "Refactoring",
        heading: "Refactoring",
        level: Some(ReleaseLevel::Patch),
    },
    BuiltinType {
        types: &["docs", "doc"],
        subject: "Documentation",
        heading: "Documentation",
        level: None,
    },
    BuiltinType {
        types: &["test", "tests"],
        subject: "Tests",
        heading: "Tests",
        level: None,
    },
    BuiltinType {
        types: &["build"],
        subject: "Build System",
        heading: "Build System",
        level: None,
    },
    BuiltinType {
        types: &["ci"],
        subject: "Continuous Integration",
        heading: "Continuous Integration",
        level: None,
    },
    BuiltinType {
        types: &["revert"],
        subject: "Reverts",
        heading: "Reverts",
        level: None,
    },
    BuiltinType {
        types: &["deps"],
        subject: "Dependencies",
        heading: "Dependencies",
        level: None,
    },
    BuiltinType {
        types: &["visual", "layout"],
        subject: "Visual Enhancement",
        heading: "Visual Enhancements",
        level: None,
    },
];

fn builtin(commit_type: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|b| b.types.contains(&commit_type))
}

/// Release level a built-in type triggers, if it triggers one
pub fn builtin_level(commit_type: &str) -> Option<ReleaseLevel> {
    builtin(commit_type).and_then(|b| b.level)
}

/// Subject and heading a commit is rendered under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Printed on each entry
    pub subject: String,
    /// Groups entries in Markdown output
    pub heading: String,
}

impl Section {
    fn new(subject: &str, heading: &str) -> Self {
        Self {
            subject: subject.to_string(),
            heading: heading.to_string(),
        }
    }
}

/// Built-in type table extended by a user commit type map
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    map: Vec<CommitTypeEntry>,
}

impl Vocabulary {
    /// Create a vocabulary with a user map
    pub fn new(map: Vec<CommitTypeEntry>) -> Self {
        Self { map }
    }

    /// Create a vocabulary from the changelog configuration
    pub fn from_config(config: &ChangelogConfig) -> Self {
        Self::new(config.commit_msg_map.clone())
    }

    /// User map entries, in configured order
    pub fn map(&self) -> &[CommitTypeEntry] {
        &self.map
    }

    /// Last user map entry for a type
    pub fn map_entry(&self, commit_type: &str) -> Option<&CommitTypeEntry> {
        self.map
            .iter()
            .rev()
            .find(|e| e.commit_type.eq_ignore_ascii_case(commit_type))
    }

    /// Section for a header type; `None` means the commit is not rendered.
    ///
    /// Pass `None` for commits without a recognized header.
    pub fn section(&self, commit_type: Option<&str>) -> Option<Section> {
        let Some(commit_type) = commit_type else {
            return Some(Section::new(OTHER_NOTES, OTHER_NOTES));
        };
        let commit_type = commit_type.to_lowercase();

        if let Some(entry) = self.map_entry(&commit_type) {
            if !entry.include {
                return None;
            }
            return Some(Section::new(&entry.format_text, &entry.format_text));
        }
        if SKIP_TYPES.contains(&commit_type.as_str()) {
            return None;
        }
        Some(match builtin(&commit_type) {
            Some(b) => Section::new(b.subject, b.heading),
            None => Section::new(GENERAL, GENERAL),
        })
    }

    /// Markdown heading for an entry subject
    pub fn heading_for_subject(&self, subject: &str) -> String {
        if self.map.iter().any(|e| e.format_text == subject) {
            return subject.to_string();
        }
        BUILTIN_TYPES
            .iter()
            .find(|b| b.subject == subject)
            .map_or_else(|| subject.to_string(), |b| b.heading.to_string())
    }

    /// Entry subject for a Markdown heading
    pub fn subject_for_heading(&self, heading: &str) -> String {
        if self.map.iter().any(|e| e.format_text == heading) {
            return heading.to_string();
        }
        BUILTIN_TYPES
            .iter()
            .find(|b| b.heading == heading)
            .map_or_else(|| heading.to_string(), |b| b.subject.to_string())
    }
}

/// Render a parsed scope: short scopes are acronyms, longer ones are words
pub fn format_scope(scope: &str) -> String {
    let scope = scope.trim();
    if scope.chars().count() <= 3 {
        return scope.to_uppercase();
    }
    let mut chars = scope.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(commit_type: &str, text: &str, include: bool) -> CommitTypeEntry {
        CommitTypeEntry {
            commit_type: commit_type.to_string(),
            format_text: text.to_string(),
            version_bump: "none".to_string(),
            include,
            icon_cls: None,
        }
    }

    #[test]
    fn test_builtin_sections() {
        let vocab = Vocabulary::default();
        let section = vocab.section(Some("feat")).unwrap();
        assert_eq!(section.subject, "Feature");
        assert_eq!(section.heading, "Features");
        assert_eq!(vocab.section(Some("FIX")).unwrap().subject, "Bug Fix");
        assert_eq!(vocab.section(Some("minperf")).unwrap().heading, "Performance Enhancements");
    }

    #[test]
    fn test_skip_set_and_fallbacks() {
        let vocab = Vocabulary::default();
        for t in SKIP_TYPES {
            assert!(vocab.section(Some(t)).is_none());
        }
        assert_eq!(vocab.section(Some("wip")).unwrap().subject, GENERAL);
        assert_eq!(vocab.section(None).unwrap().subject, OTHER_NOTES);
    }

    #[test]
    fn test_map_overrides_and_hides() {
        let vocab = Vocabulary::new(vec![
            entry("ui", "User Interface", true),
            entry("docs", "Docs", false),
            entry("ui", "Look and Feel", true),
        ]);
        assert_eq!(vocab.section(Some("ui")).unwrap().subject, "Look and Feel");
        assert!(vocab.section(Some("docs")).is_none());
        assert_eq!(vocab.heading_for_subject("Look and Feel"), "Look and Feel");
    }

    #[test]
    fn test_heading_subject_inverse() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.heading_for_subject("Bug Fix"), "Bug Fixes");
        assert_eq!(vocab.subject_for_heading("Bug Fixes"), "Bug Fix");
        assert_eq!(vocab.subject_for_heading(OTHER_NOTES), OTHER_NOTES);
    }

    #[test]
    fn test_builtin_levels() {
        assert_eq!(builtin_level("majfeat"), Some(ReleaseLevel::Major));
        assert_eq!(builtin_level("perf"), Some(ReleaseLevel::Minor));
        assert_eq!(builtin_level("refactor"), Some(ReleaseLevel::Patch));
        assert_eq!(builtin_level("docs"), None);
        assert_eq!(builtin_level("ui"), None);
    }

    #[test]
    fn test_format_scope() {
        assert_eq!(format_scope("ui"), "UI");
        assert_eq!(format_scope("api"), "API");
        assert_eq!(format_scope("parser"), "Parser");
        assert_eq!(format_scope(""), "");
    }
}
