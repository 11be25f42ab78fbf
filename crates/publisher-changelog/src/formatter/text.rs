//! Fixed-width text history formatter
//!
//! Sections are appended in release order, so the newest version is the last
//! one in the file. Each section is a header block followed by numbered
//! entries wrapped to the configured line width:
//!
//! ```text
//! Version 1.3.0
//! October 17th, 2026
//! ----------------------------------------
//! ****************************************
//!
//! 1.  Bug Fix (UI):  Crash on close.
//!     [Fixes #12, #13]
//! ```

use std::path::Path;

use chrono::NaiveDate;
use publisher_core::config::{ChangelogConfig, ChangelogFormat, MIN_LINE_LEN};
use publisher_core::error::ChangelogError;
use publisher_core::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument};

use super::{format_release_date, ChangelogFormatter, MarkdownFormatter};
use crate::types::{ChangelogEntry, SectionMarker};

/// Indentation of continuation and ticket lines
const INDENT: &str = "    ";

static ENTRY_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s+(?P<subject>[^:(]+?)(?:\s+\((?P<scope>[^)]*)\))?:\s+(?P<message>.*)$")
        .expect("Invalid regex")
});

static TICKET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s+\[(?P<tickets>(?:Bugs|Issues|Closes|Fixes|Resolves|References) #\d+[^\]]*)\]\s*$",
    )
    .expect("Invalid regex")
});

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s").expect("Invalid regex"));

/// Text history formatter, newest section last
pub struct TextFormatter {
    version_text: String,
    line_len: usize,
}

impl TextFormatter {
    /// Create a formatter for a changelog configuration
    pub fn new(config: &ChangelogConfig) -> Self {
        Self {
            version_text: config.version_text.clone(),
            line_len: config.line_len.max(MIN_LINE_LEN),
        }
    }

    /// Widest line an entry may produce
    fn wrap_width(&self) -> usize {
        self.line_len - 4
    }

    /// `Some(version token)` for a `<versionText> ...` line
    fn header_version<'l>(&self, line: &'l str) -> Option<&'l str> {
        let rest = line.strip_prefix(self.version_text.as_str())?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let mut tokens = rest.split_whitespace();
        let version = tokens.next()?;
        let looks_like_version = version.starts_with(|c: char| c.is_ascii_digit())
            || (version.starts_with(['v', 'V'])
                && version[1..].starts_with(|c: char| c.is_ascii_digit()));
        (tokens.next().is_none() && looks_like_version).then_some(version)
    }

    fn render_entry(&self, number: usize, entry: &ChangelogEntry) -> Vec<String> {
        let width = self.wrap_width();
        let mut message_lines = entry.message.lines();
        let first = capitalize(message_lines.next().unwrap_or(""));
        let rest: Vec<&str> = message_lines.collect();

        let mut first = first;
        if rest.is_empty() && !first.ends_with('.') && !first.ends_with(']') {
            first.push('.');
        }

        let mut lead = format!("{}.  {}", number, entry.subject);
        if let Some(scope) = &entry.scope {
            lead.push_str(&format!(" ({})", scope));
        }
        lead.push_str(":  ");

        let mut lines = wrap(&first, &lead, INDENT, width);
        for line in rest {
            if is_preserved(line) {
                lines.extend(break_preserved(line, width));
            } else {
                lines.extend(wrap(line, INDENT, INDENT, width));
            }
        }
        if let Some(tickets) = &entry.tickets {
            lines.push(format!("{}[{}]", INDENT, tickets));
        }
        lines
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(&ChangelogConfig::default())
    }
}

/// Lines kept as written: indented three or more spaces, or list items
fn is_preserved(line: &str) -> bool {
    line.starts_with("   ") || line.starts_with('\t') || LIST_MARKER.is_match(line)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep a preserved line as written, breaking it only at the last space that
/// fits when it is wider than `width`. Continuations keep the line's indent.
fn break_preserved(line: &str, width: usize) -> Vec<String> {
    let own_indent = &line[..line.len() - line.trim_start().len()];
    let prefix_len = INDENT.len() + own_indent.len();
    let mut lines = Vec::new();
    let mut current = format!("{}{}", INDENT, line.trim_end());

    while current.chars().count() > width {
        let end = current
            .char_indices()
            .nth(width)
            .map_or(current.len(), |(i, _)| i);
        if end <= prefix_len {
            break;
        }
        let split = if current[end..].starts_with(' ') {
            Some(end)
        } else {
            current[prefix_len..end].rfind(' ').map(|i| prefix_len + i)
        };
        let Some(split) = split.filter(|&s| current[..s].trim_end().len() > prefix_len) else {
            break;
        };
        let rest = current[split..].trim_start().to_string();
        lines.push(current[..split].trim_end().to_string());
        current = format!("{}{}{}", INDENT, own_indent, rest);
    }

    lines.push(current);
    lines
}

/// Greedy word wrap; `width` counts the prefixes. Words longer than a line
/// are placed on their own line.
fn wrap(text: &str, first_prefix: &str, prefix: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = first_prefix.to_string();
    let mut current_has_word = false;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if current_has_word { word_len + 1 } else { word_len };
        if current_has_word && current.chars().count() + needed > width {
            lines.push(current);
            current = prefix.to_string();
            current_has_word = false;
        }
        if current_has_word {
            current.push(' ');
        }
        current.push_str(word);
        current_has_word = true;
    }

    lines.push(current.trim_end().to_string());
    lines
}

impl ChangelogFormatter for TextFormatter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn format(&self) -> ChangelogFormat {
        ChangelogFormat::Text
    }

    #[instrument(skip(self, entries), fields(entry_count = entries.len(), line_len = self.line_len))]
    fn render(&self, entries: &[ChangelogEntry]) -> String {
        let output = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| self.render_entry(i + 1, entry).join("\n") + "\n")
            .collect::<Vec<_>>()
            .join("\n");
        debug!(output_len = output.len(), "text section rendered");
        output
    }

    fn parse(&self, section: &str) -> Result<Vec<ChangelogEntry>> {
        let mut entries: Vec<ChangelogEntry> = Vec::new();
        let lines: Vec<&str> = section.lines().collect();
        // A ticket block only closes an entry: nothing but blanks or the next entry follows
        let closes_entry = |index: usize| {
            lines[index + 1..]
                .iter()
                .find(|l| !l.trim().is_empty())
                .map_or(true, |next| ENTRY_START.is_match(next))
        };

        for (index, &line) in lines.iter().enumerate() {
            if let Some(caps) = ENTRY_START.captures(line) {
                entries.push(ChangelogEntry {
                    subject: caps["subject"].trim().to_string(),
                    scope: caps
                        .name("scope")
                        .map(|s| s.as_str().trim().to_string())
                        .filter(|s| !s.is_empty()),
                    message: caps["message"].trim_end().to_string(),
                    tickets: None,
                });
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            let Some(entry) = entries.last_mut() else {
                return Err(ChangelogError::EntryMismatch {
                    subjects: 0,
                    messages: 1,
                }
                .into());
            };
            if let Some(caps) = TICKET_LINE.captures(line).filter(|_| closes_entry(index)) {
                entry.tickets = Some(caps["tickets"].to_string());
                continue;
            }

            let body = line.strip_prefix(INDENT).unwrap_or(line.trim_start());
            if is_preserved(body) {
                entry.message.push('\n');
                entry.message.push_str(body.trim_end());
            } else {
                entry.message.push(' ');
                entry.message.push_str(body.trim());
            }
        }

        Ok(entries)
    }

    fn title(&self, project_name: &str) -> String {
        format!("{} HISTORY\n", project_name.to_uppercase())
    }

    fn section_header(&self, version: &str, date: NaiveDate) -> String {
        format!(
            "{} {}\n{}\n{}\n{}",
            self.version_text,
            version,
            format_release_date(date),
            "-".repeat(self.line_len),
            "*".repeat(self.line_len)
        )
    }

    fn find_versions(&self, content: &str, path: &Path) -> Result<Vec<SectionMarker>> {
        let lines: Vec<&str> = content.lines().collect();
        let mut markers: Vec<SectionMarker> = Vec::new();
        let is_rule = |line: Option<&&str>, c: char| {
            line.is_some_and(|l| !l.trim().is_empty() && l.trim().chars().all(|x| x == c))
        };

        for (index, line) in lines.iter().enumerate() {
            let Some(version) = self.header_version(line.trim_end()) else {
                continue;
            };
            if !is_rule(lines.get(index + 2), '-') || !is_rule(lines.get(index + 3), '*') {
                return Err(ChangelogError::MalformedSection {
                    path: path.to_path_buf(),
                    line: index + 1,
                    reason: format!("'{} {}' is not followed by its delimiter block", self.version_text, version),
                }
                .into());
            }
            if let Some(previous) = markers.last_mut() {
                previous.body_end = index;
            }
            markers.push(SectionMarker {
                version: version.to_string(),
                header_line: index,
                body_start: index + 4,
                body_end: lines.len(),
            });
        }

        Ok(markers)
    }

    fn latest<'m>(&self, markers: &'m [SectionMarker]) -> Option<&'m SectionMarker> {
        markers.last()
    }

    fn merge(&self, existing: &str, section: &str) -> String {
        let head = existing.trim_end();
        let section = format!("{}\n", section.trim_end());
        if head.is_empty() {
            section
        } else {
            format!("{}\n\n{}", head, section)
        }
    }

    fn to_html(&self, section: &str) -> String {
        match self.parse(section) {
            Ok(entries) => {
                let markdown = MarkdownFormatter::default();
                markdown.to_html(&markdown.render(&entries))
            }
            Err(_) => crate::html::markdown_to_html(section),
        }
    }
}
