//! Markdown changelog formatter

use std::path::Path;

use chrono::NaiveDate;
use publisher_core::config::{ChangelogConfig, ChangelogFormat};
use publisher_core::error::ChangelogError;
use publisher_core::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use super::{format_release_date, ChangelogFormatter};
use crate::html::markdown_to_html;
use crate::tickets::split_rendered_tickets;
use crate::types::{ChangelogEntry, SectionMarker};
use crate::vocabulary::Vocabulary;

static BOLD_SCOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*(?P<scope>[^*]+?):\*\*\s*").expect("Invalid regex"));

/// Markdown changelog formatter, newest section first
pub struct MarkdownFormatter {
    version_text: String,
    vocabulary: Vocabulary,
}

impl MarkdownFormatter {
    /// Create a formatter for a changelog configuration
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            version_text: config.version_text.clone(),
            vocabulary: Vocabulary::from_config(config),
        }
    }

    /// `Some(version token)` for a `## <versionText> ...` line
    fn header_version<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        let rest = line.strip_prefix("##")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let rest = rest.trim_start().strip_prefix(self.version_text.as_str())?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.split_whitespace().next().filter(|t| !t.starts_with('(')))
    }

    fn bullet(entry: &ChangelogEntry) -> String {
        let mut lines = entry.message.lines();
        let mut out = String::from("- ");
        if let Some(scope) = &entry.scope {
            out.push_str(&format!("**{}:** ", scope));
        }
        out.push_str(lines.next().unwrap_or(""));
        for line in lines {
            out.push_str("\n\t");
            out.push_str(line);
        }
        if let Some(tickets) = &entry.tickets {
            out.push_str(&format!(" [{}]", tickets));
        }
        out.push('\n');
        out
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new(&ChangelogConfig::default())
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn format(&self) -> ChangelogFormat {
        ChangelogFormat::Markdown
    }

    #[instrument(skip(self, entries), fields(entry_count = entries.len()))]
    fn render(&self, entries: &[ChangelogEntry]) -> String {
        let mut output = String::new();
        let mut last_subject: Option<&str> = None;

        for entry in entries {
            if last_subject != Some(entry.subject.as_str()) {
                if !output.is_empty() {
                    output.push('\n');
                }
                let heading = self.vocabulary.heading_for_subject(&entry.subject);
                output.push_str(&format!("### {}\n\n", heading));
                last_subject = Some(&entry.subject);
            }
            output.push_str(&Self::bullet(entry));
        }

        debug!(output_len = output.len(), "markdown section rendered");
        output
    }

    fn parse(&self, section: &str) -> Result<Vec<ChangelogEntry>> {
        let mut entries: Vec<ChangelogEntry> = Vec::new();
        let mut subject: Option<String> = None;
        let mut subjects = 0;

        for line in section.lines() {
            if let Some(heading) = line.strip_prefix("### ") {
                subject = Some(self.vocabulary.subject_for_heading(heading.trim()));
                subjects += 1;
            } else if let Some(bullet) = line.strip_prefix("- ") {
                let Some(subject) = &subject else {
                    return Err(ChangelogError::EntryMismatch {
                        subjects,
                        messages: entries.len() + 1,
                    }
                    .into());
                };
                let (scope, message) = match BOLD_SCOPE.captures(bullet) {
                    Some(caps) => {
                        let end = caps.get(0).map_or(0, |m| m.end());
                        (Some(caps["scope"].to_string()), &bullet[end..])
                    }
                    None => (None, bullet),
                };
                entries.push(ChangelogEntry {
                    subject: subject.clone(),
                    scope,
                    message: message.trim_end().to_string(),
                    tickets: None,
                });
            } else if !line.trim().is_empty() {
                // continuation of the current bullet
                if let Some(entry) = entries.last_mut() {
                    entry.message.push('\n');
                    entry.message.push_str(line.strip_prefix('\t').unwrap_or(line.trim()).trim_end());
                }
            }
        }

        for entry in &mut entries {
            let (message, tickets) = split_rendered_tickets(&entry.message);
            entry.message = message;
            entry.tickets = tickets;
        }
        Ok(entries)
    }

    fn title(&self, project_name: &str) -> String {
        format!("# {} CHANGE LOG\n", project_name.to_uppercase())
    }

    fn section_header(&self, version: &str, date: NaiveDate) -> String {
        format!(
            "## {} {} ({})",
            self.version_text,
            version,
            format_release_date(date)
        )
    }

    fn find_versions(&self, content: &str, path: &Path) -> Result<Vec<SectionMarker>> {
        let lines: Vec<&str> = content.lines().collect();
        let mut markers: Vec<SectionMarker> = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let Some(token) = self.header_version(line) else {
                continue;
            };
            let Some(version) = token else {
                return Err(ChangelogError::MalformedSection {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("'{}' header without a version", self.version_text),
                }
                .into());
            };
            if let Some(previous) = markers.last_mut() {
                previous.body_end = index;
            }
            markers.push(SectionMarker {
                version: version.to_string(),
                header_line: index,
                body_start: index + 1,
                body_end: lines.len(),
            });
        }

        Ok(markers)
    }

    fn latest<'m>(&self, markers: &'m [SectionMarker]) -> Option<&'m SectionMarker> {
        markers.first()
    }

    fn merge(&self, existing: &str, section: &str) -> String {
        let section = format!("{}\n", section.trim_end());
        let first_header = existing
            .split_inclusive('\n')
            .scan(0usize, |offset, line| {
                let start = *offset;
                *offset += line.len();
                Some((start, line))
            })
            .find(|(_, line)| line.trim_end_matches(['\r', '\n']).starts_with("## "))
            .map(|(start, _)| start);

        match first_header {
            Some(start) => {
                format!("{}{}\n{}", &existing[..start], section, &existing[start..])
            }
            _ => {
                let head = existing.trim_end();
                if head.is_empty() {
                    section
                } else {
                    format!("{}\n\n{}", head, section)
                }
            }
        }
    }

    fn to_html(&self, section: &str) -> String {
        markdown_to_html(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::entries_from_commits;
    use crate::parser::ConventionalParser;
    use chrono::Utc;
    use publisher_core::types::Commit;
    use publisher_core::PublisherError;

    fn entries(messages: &[&str]) -> Vec<ChangelogEntry> {
        let commits: Vec<Commit> = messages
            .iter()
            .map(|m| Commit::new("abc1234", *m, "dev", Utc::now()))
            .collect();
        entries_from_commits(&commits, &ConventionalParser::new(), &Vocabulary::default())
    }

    #[test]
    fn test_render_headings_interleave() {
        let output = MarkdownFormatter::default().render(&entries(&[
            "feat: one",
            "fix(ui): two",
            "feat(parser): three\nsecond line",
        ]));
        assert_eq!(
            output,
            "### Features\n\n- one\n\n### Bug Fixes\n\n- **UI:** two\n\n### Features\n\n- **Parser:** three\n\tsecond line\n"
        );
    }

    #[test]
    fn test_render_ticket_at_line_end() {
        let output = MarkdownFormatter::default()
            .render(&entries(&["fix(ui): crash on close [fixed #12, #13]"]));
        assert!(output.contains("- **UI:** crash on close [Fixes #12, #13]\n"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let formatter = MarkdownFormatter::default();
        let list = entries(&["feat: a", "plain", "docs: b [closes #1]"]);
        assert_eq!(formatter.render(&list), formatter.render(&list));
    }

    #[test]
    fn test_skip_set_never_rendered() {
        let output = MarkdownFormatter::default().render(&entries(&["chore: bump deps", "fix: x"]));
        assert!(!output.contains("bump deps"));
    }

    #[test]
    fn test_parse_round_trip() {
        let formatter = MarkdownFormatter::default();
        let original = entries(&[
            "fix(ui): crash on close [fixed #12, #13]",
            "feat(parser): three\nsecond line",
            "feat: four",
            "just a note",
        ]);
        let parsed = formatter.parse(&formatter.render(&original)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_bullet_without_heading() {
        let err = MarkdownFormatter::default()
            .parse("- orphan\n")
            .unwrap_err();
        assert!(matches!(
            err,
            PublisherError::Changelog(ChangelogError::EntryMismatch { subjects: 0, messages: 1 })
        ));
    }

    #[test]
    fn test_find_versions() {
        let content = "# APP CHANGE LOG\n\n## Version 1.1.0 (May 2nd, 2026)\n\n- b\n\n## Version 1.0.0 (May 1st, 2026)\n\n- a\n";
        let formatter = MarkdownFormatter::default();
        let markers = formatter.find_versions(content, Path::new("CHANGELOG.md")).unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].version, "1.1.0");
        assert_eq!(markers[0].body_end, markers[1].header_line);
        assert_eq!(formatter.latest(&markers).unwrap().version, "1.1.0");
    }

    #[test]
    fn test_header_without_version_is_malformed() {
        let err = MarkdownFormatter::default()
            .find_versions("## Version\n", Path::new("CHANGELOG.md"))
            .unwrap_err();
        assert_eq!(err.code(), 402);
    }

    #[test]
    fn test_merge_prepends_newest() {
        let formatter = MarkdownFormatter::default();
        let existing = "# APP CHANGE LOG\n\n## Version 1.0.0 (May 1st, 2026)\n\n- a\n";
        let merged = formatter.merge(existing, "## Version 1.1.0 (May 2nd, 2026)\n\n- b\n");
        assert_eq!(
            merged,
            "# APP CHANGE LOG\n\n## Version 1.1.0 (May 2nd, 2026)\n\n- b\n\n## Version 1.0.0 (May 1st, 2026)\n\n- a\n"
        );
    }

    #[test]
    fn test_merge_keeps_crlf_history_intact() {
        let formatter = MarkdownFormatter::default();
        let existing = "# APP CHANGE LOG\r\n\r\n## Version 1.0.0 (May 1st, 2026)\r\n\r\n- a\r\n";
        let merged = formatter.merge(existing, "## Version 1.1.0 (May 2nd, 2026)\n\n- b\n");
        assert_eq!(
            merged,
            "# APP CHANGE LOG\r\n\r\n## Version 1.1.0 (May 2nd, 2026)\n\n- b\n\n## Version 1.0.0 (May 1st, 2026)\r\n\r\n- a\r\n"
        );
        assert!(merged.ends_with(&existing["# APP CHANGE LOG\r\n\r\n".len()..]));
    }

    #[test]
    fn test_merge_after_multibyte_lines() {
        let formatter = MarkdownFormatter::default();
        let existing = "É\r\nÉ\r\nÉ\r\n## Version 1.0.0 (May 1st, 2026)\r\n";
        let merged = formatter.merge(existing, "## Version 1.1.0 (May 2nd, 2026)\n");
        assert_eq!(
            merged,
            "É\r\nÉ\r\nÉ\r\n## Version 1.1.0 (May 2nd, 2026)\n\n## Version 1.0.0 (May 1st, 2026)\r\n"
        );
    }

    #[test]
    fn test_merge_into_title_only() {
        let formatter = MarkdownFormatter::default();
        let merged = formatter.merge(&formatter.title("app"), "## Version 1.0.0 (May 1st, 2026)\n\n- a\n");
        assert_eq!(merged, "# APP CHANGE LOG\n\n## Version 1.0.0 (May 1st, 2026)\n\n- a\n");
    }

    #[test]
    fn test_section_header() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            MarkdownFormatter::default().section_header("1.3.0", date),
            "## Version 1.3.0 (October 17th, 2026)"
        );
    }
}
