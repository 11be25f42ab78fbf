//! Parser for `type(scope): text` and `type: text` headers

use regex::Regex;
use std::sync::LazyLock;

use super::CommitParser;
use crate::types::ParsedHeader;

/// `type(scope): ` anchored at the start of the message
static SCOPED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<type>[a-z]+)\((?P<scope>[^)\n]*)\):\s").expect("Invalid regex")
});

/// `type: ` anchored at the start of the message
static PLAIN_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?P<type>[a-z]+):\s").expect("Invalid regex"));

/// Parser for conventional-commit style headers
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalParser;

impl ConventionalParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }
}

impl CommitParser for ConventionalParser {
    fn parse(&self, message: &str) -> Option<ParsedHeader> {
        let (caps, scope) = match SCOPED_HEADER.captures(message) {
            Some(caps) => {
                let scope = caps
                    .name("scope")
                    .map(|m| m.as_str().trim().to_lowercase())
                    .filter(|s| !s.is_empty());
                (caps, scope)
            }
            None => (PLAIN_HEADER.captures(message)?, None),
        };

        let header_end = caps.get(0)?.end();
        let commit_type = caps.name("type")?.as_str().to_lowercase();
        let body = message[header_end..]
            .trim_start_matches([' ', '\t'])
            .trim_end()
            .to_string();

        Some(ParsedHeader {
            commit_type,
            scope,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use publisher_core::types::Commit;

    #[test]
    fn test_scoped_header() {
        let header = ConventionalParser::new()
            .parse("fix( UI ): crash on close")
            .unwrap();
        assert_eq!(header.commit_type, "fix");
        assert_eq!(header.scope.as_deref(), Some("ui"));
        assert_eq!(header.body, "crash on close");
    }

    #[test]
    fn test_plain_header_is_case_insensitive() {
        let header = ConventionalParser::new()
            .parse("FEAT: add dark mode\n\nmore detail")
            .unwrap();
        assert_eq!(header.commit_type, "feat");
        assert!(header.scope.is_none());
        assert_eq!(header.body, "add dark mode\n\nmore detail");
    }

    #[test]
    fn test_empty_scope_is_none() {
        let header = ConventionalParser::new().parse("docs(): readme").unwrap();
        assert!(header.scope.is_none());
    }

    #[test]
    fn test_header_must_be_anchored() {
        let parser = ConventionalParser::new();
        assert!(parser.parse("update parser (core): no header here").is_none());
        assert!(parser.parse("Merge branch 'main'\n\nfix(ui): inner").is_none());
        assert!(parser.parse(" fix: leading space").is_none());
        assert!(parser.parse("fix:missing space").is_none());
    }

    #[test]
    fn test_body_keeps_embedded_colons() {
        let header = ConventionalParser::new()
            .parse("refactor: split parse(): now two passes")
            .unwrap();
        assert_eq!(header.commit_type, "refactor");
        assert_eq!(header.body, "split parse(): now two passes");
    }

    #[test]
    fn test_annotate_sets_derived_fields() {
        let parser = ConventionalParser::new();
        let mut commit = Commit::new("abc", "perf(db): faster", "dev", Utc::now());
        parser.annotate(&mut commit);
        assert_eq!(commit.subject.as_deref(), Some("perf"));
        assert_eq!(commit.scope.as_deref(), Some("db"));

        let mut commit = Commit::new("def", "just words", "dev", Utc::now());
        parser.annotate(&mut commit);
        assert!(commit.subject.is_none());
    }
}
