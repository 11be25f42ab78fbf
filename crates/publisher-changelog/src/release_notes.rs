//! Release-channel bodies built from an already-written section

use publisher_core::config::Config;
use tracing::{debug, instrument, warn};
use url::form_urlencoded;

use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::html::{escape_html, markdown_to_html};
use crate::types::ChangelogEntry;

/// Bodies for the email, GitHub and MantisBT release channels
pub struct ReleaseNotes<'a> {
    config: &'a Config,
    version: String,
    entries: Vec<ChangelogEntry>,
}

impl<'a> ReleaseNotes<'a> {
    /// Create notes for a version from its parsed section entries
    pub fn new(config: &'a Config, version: impl Into<String>, entries: Vec<ChangelogEntry>) -> Self {
        Self {
            config,
            version: version.into(),
            entries,
        }
    }

    /// Entries the notes are built from
    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    fn link_row(label: &str, href: &str, text: &str) -> String {
        format!(
            "<tr><td><strong>{}</strong></td><td><a href=\"{}\">{}</a></td></tr>",
            escape_html(label),
            escape_html(href),
            escape_html(text)
        )
    }

    /// Header block: project title plus a table of configured links
    pub fn header_block(&self) -> String {
        let notes = &self.config.notes;
        let mut rows = Vec::new();

        if let Some(path) = notes.dist_release_path.as_deref().filter(|p| !p.is_empty()) {
            rows.push(Self::link_row("Network Location", path, path));
        }
        if let (Some(registry), Some(package)) = (&notes.npm_registry, &notes.npm_package) {
            let href = format!("{}/{}", registry.trim_end_matches('/'), package);
            rows.push(Self::link_row("NPM Location", &href, &format!("{}@{}", package, self.version)));
        }
        if let Some(url) = &notes.mantisbt_url {
            let project = notes
                .mantisbt_project
                .as_deref()
                .unwrap_or_else(|| self.config.project_name());
            let href = format!(
                "{}/plugin.php?page=Releases/releases&project={}",
                url.trim_end_matches('/'),
                form_urlencoded::byte_serialize(project.as_bytes()).collect::<String>()
            );
            rows.push(Self::link_row("Releases Board", &href, project));
        }
        for href in &notes.hrefs {
            match href.split_once('|') {
                Some((label, url)) => rows.push(Self::link_row(label.trim(), url.trim(), url.trim())),
                None => warn!(href = %href, "href is not in 'label|url' form, skipped"),
            }
        }

        let mut block = format!(
            "<h2>{} {} {}</h2>",
            escape_html(self.config.project_name()),
            escape_html(&self.config.changelog.version_text),
            escape_html(&self.version)
        );
        if !rows.is_empty() {
            block.push_str("\n<table>\n");
            block.push_str(&rows.join("\n"));
            block.push_str("\n</table>");
        }
        block
    }

    /// Markdown body grouped by heading (GitHub release)
    pub fn github_body(&self) -> String {
        MarkdownFormatter::new(&self.config.changelog).render(&self.entries)
    }

    /// HTML body grouped by heading (MantisBT release)
    pub fn mantisbt_body(&self) -> String {
        markdown_to_html(&self.github_body())
    }

    /// HTML email: header block followed by the section
    #[instrument(skip(self), fields(version = %self.version, entry_count = self.entries.len()))]
    pub fn email_body(&self) -> String {
        let body = format!("{}\n{}", self.header_block(), self.mantisbt_body());
        debug!(body_len = body.len(), "email body built");
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<ChangelogEntry> {
        vec![
            ChangelogEntry::new("Feature", "dark mode").with_scope("UI"),
            ChangelogEntry::new("Bug Fix", "crash on close").with_tickets("Fixes #12"),
        ]
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.project_name = Some("app".to_string());
        config
    }

    #[test]
    fn test_header_without_links() {
        let config = config();
        let notes = ReleaseNotes::new(&config, "1.3.0", entries());
        assert_eq!(notes.header_block(), "<h2>app Version 1.3.0</h2>");
    }

    #[test]
    fn test_releases_board_project_is_encoded() {
        let mut config = config();
        config.notes.mantisbt_url = Some("https://bugs.example.com/".to_string());
        config.notes.mantisbt_project = Some("My App & Co".to_string());

        let header = ReleaseNotes::new(&config, "1.3.0", entries()).header_block();
        assert!(header.contains("https://bugs.example.com/plugin.php?page=Releases/releases&amp;project=My+App+%26+Co\""));
    }

    #[test]
    fn test_header_rows_follow_config() {
        let mut config = config();
        config.notes.dist_release_path = Some("\\\\share\\dist\\app".to_string());
        config.notes.npm_registry = Some("https://registry.example.com/".to_string());
        config.notes.npm_package = Some("@scope/app".to_string());
        config.notes.mantisbt_url = Some("https://bugs.example.com".to_string());
        config.notes.hrefs = vec!["Docs|https://docs.example.com".to_string(), "broken".to_string()];

        let header = ReleaseNotes::new(&config, "1.3.0", entries()).header_block();
        assert!(header.contains("<td><strong>Network Location</strong></td>"));
        assert!(header.contains("href=\"https://registry.example.com/@scope/app\""));
        assert!(header.contains("page=Releases/releases&amp;project=app"));
        assert!(header.contains("<a href=\"https://docs.example.com\">"));
        assert_eq!(header.matches("<tr>").count(), 4);
    }

    #[test]
    fn test_bodies() {
        let config = config();
        let notes = ReleaseNotes::new(&config, "1.3.0", entries());

        assert_eq!(
            notes.github_body(),
            "### Features\n\n- **UI:** dark mode\n\n### Bug Fixes\n\n- crash on close [Fixes #12]\n"
        );
        assert!(notes.mantisbt_body().starts_with("<h3>Features</h3>"));
        let email = notes.email_body();
        assert!(email.starts_with("<h2>app Version 1.3.0</h2>\n<h3>Features</h3>"));
    }
}
