//! Persisted changelog file access

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use chrono::NaiveDate;
use publisher_core::config::{ChangelogFormat, Config};
use publisher_core::error::ChangelogError;
use publisher_core::{PublisherError, Result, RunContext};
use tracing::{debug, info, instrument, warn};

use crate::formatter::{entries_from_commits, ChangelogFormatter, FormatterRegistry};
use crate::html::html_document;
use crate::parser::CommitParser;
use crate::types::ChangelogEntry;
use crate::vocabulary::Vocabulary;

/// Shape of a section returned by [`ChangelogStore::sections`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMode {
    /// Section text as persisted
    Raw,
    /// Section converted to HTML
    Html,
}

/// Result of [`ChangelogStore::do_edit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// A file was written
    Written {
        /// Path of the written file
        path: PathBuf,
    },
    /// The section was printed instead of written
    Printed(String),
    /// Nothing was written
    Skipped {
        /// Why the edit was skipped
        reason: String,
    },
    /// Dry run: the content that would have been written
    DryRun {
        /// Target path
        path: PathBuf,
        /// Full file content
        content: String,
    },
}

/// Reads and writes one changelog or history file
pub struct ChangelogStore {
    path: PathBuf,
    formatter: Arc<dyn ChangelogFormatter>,
    vocabulary: Vocabulary,
    header_file: Option<PathBuf>,
}

impl ChangelogStore {
    /// Create a store for a file written by a formatter
    pub fn new(path: impl Into<PathBuf>, formatter: Arc<dyn ChangelogFormatter>) -> Self {
        Self {
            path: path.into(),
            formatter,
            vocabulary: Vocabulary::default(),
            header_file: None,
        }
    }

    /// Create the store for a project's configured changelog
    pub fn for_config(config: &Config, project_dir: &Path) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                project_dir.join(p)
            }
        };
        Self {
            path: resolve(config.changelog_path()),
            formatter: FormatterRegistry::for_format(&config.changelog),
            vocabulary: Vocabulary::from_config(&config.changelog),
            header_file: match config.changelog.format {
                ChangelogFormat::Text => config.changelog.header_file.as_deref().map(resolve),
                ChangelogFormat::Markdown => None,
            },
        }
    }

    /// Path of the changelog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Formatter used for this file
    pub fn formatter(&self) -> &dyn ChangelogFormatter {
        self.formatter.as_ref()
    }

    /// File content, `None` when the file does not exist
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "changelog file not found");
                Ok(None)
            }
            Err(e) => Err(ChangelogError::Io(e).into()),
        }
    }

    /// Latest version, or a version's section.
    ///
    /// With no version, returns the most recent version in the file. With a
    /// version, returns that version's section in the requested mode. A
    /// missing file is not an error: `None` for the latest version, an empty
    /// section otherwise.
    pub fn sections(&self, version: Option<&str>, mode: SectionMode) -> Result<Option<String>> {
        match version {
            None => self.latest_version(),
            Some(version) => self.section(version, mode).map(Some),
        }
    }

    /// Most recent version recorded in the file
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn latest_version(&self) -> Result<Option<String>> {
        let Some(content) = self.read()? else {
            return Ok(None);
        };
        let markers = self.formatter.find_versions(&content, &self.path)?;
        let latest = self.formatter.latest(&markers).map(|m| m.version.clone());
        debug!(latest = ?latest, "latest changelog version");
        Ok(latest)
    }

    /// Whether the file already holds a section for a version
    pub fn has_version(&self, version: &str) -> Result<bool> {
        let Some(content) = self.read()? else {
            return Ok(false);
        };
        let markers = self.formatter.find_versions(&content, &self.path)?;
        Ok(markers.iter().any(|m| m.version == version))
    }

    /// Text of one version's section
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn section(&self, version: &str, mode: SectionMode) -> Result<String> {
        let Some(content) = self.read()? else {
            return Ok(String::new());
        };
        let markers = self.formatter.find_versions(&content, &self.path)?;
        let marker = markers
            .iter()
            .find(|m| m.version == version)
            .ok_or_else(|| ChangelogError::SectionNotFound {
                version: version.to_string(),
                path: self.path.clone(),
            })?;

        let lines: Vec<&str> = content.lines().collect();
        let end = marker.body_end.min(lines.len());
        let start = marker.body_start.min(end);
        let raw = lines[start..end].join("\n").trim_matches('\n').to_string();

        Ok(match mode {
            SectionMode::Raw => raw,
            SectionMode::Html => self.formatter.to_html(&raw),
        })
    }

    /// Parse one version's section back into entries
    pub fn section_entries(&self, version: &str) -> Result<Vec<ChangelogEntry>> {
        let raw = self.section(version, SectionMode::Raw)?;
        let entries = self.formatter.parse(&raw)?;
        debug!(version, entry_count = entries.len(), "section entries parsed");
        Ok(entries)
    }

    /// Render a complete section, header included
    pub fn render_section(
        &self,
        commits: &[publisher_core::Commit],
        parser: &dyn CommitParser,
        version: &str,
        date: NaiveDate,
    ) -> Option<String> {
        let entries = entries_from_commits(commits, parser, &self.vocabulary);
        if entries.is_empty() {
            return None;
        }
        Some(format!(
            "{}\n\n{}",
            self.formatter.section_header(version, date),
            self.formatter.render(&entries)
        ))
    }

    /// Title for a new file
    fn title(&self, project_name: &str) -> Result<String> {
        if let Some(header_file) = &self.header_file {
            match std::fs::read_to_string(header_file) {
                Ok(header) => return Ok(format!("{}\n", header.trim_end())),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    warn!(path = %header_file.display(), "history header file not found");
                }
                Err(e) => return Err(ChangelogError::Io(e).into()),
            }
        }
        Ok(self.formatter.title(project_name))
    }

    /// Write this run's section to the target selected by the task flags.
    ///
    /// Targets, first match wins: print to stdout, HTML preview file, export
    /// file, the changelog itself. Writing the same version twice is skipped.
    #[instrument(skip(self, ctx, parser), fields(path = %self.path.display(), commit_count = ctx.commits.len()))]
    pub fn do_edit(
        &self,
        ctx: &RunContext<'_>,
        parser: &dyn CommitParser,
        date: NaiveDate,
    ) -> Result<EditOutcome> {
        let next = ctx
            .next_release
            .as_ref()
            .ok_or_else(|| PublisherError::other("next release must be computed before the changelog"))?;

        if let Some(last) = &ctx.last_release {
            if !ctx.changelog_is_new && last.version == next.version {
                let reason = format!("version {} is already the last release", next.version);
                warn!(reason = %reason, "skipping changelog edit");
                return Ok(EditOutcome::Skipped { reason });
            }
        }

        let Some(section) = self.render_section(&ctx.commits, parser, &next.version, date) else {
            let reason = "no changelog entries in this release".to_string();
            warn!(reason = %reason, "skipping changelog edit");
            return Ok(EditOutcome::Skipped { reason });
        };

        let tasks = &ctx.config.tasks;
        let project = ctx.config.project_name();

        if tasks.changelog_print {
            info!(version = %next.version, "printing changelog section");
            return Ok(EditOutcome::Printed(section));
        }

        let (target, content) = if let Some(html) = &tasks.changelog_html {
            let body = self.formatter.to_html(
                section
                    .split_once("\n\n")
                    .map_or(section.as_str(), |(_, body)| body),
            );
            let title = format!("{} {} {}", project, ctx.config.changelog.version_text, next.version);
            (ctx.resolve(html), html_document(&title, &body))
        } else if let Some(file) = &tasks.changelog_file {
            let title = self.formatter.title(project);
            (ctx.resolve(file), self.formatter.merge(&title, &section))
        } else {
            let existing = match self.read()? {
                Some(existing) => existing,
                None => self.title(project)?,
            };
            let markers = self.formatter.find_versions(&existing, &self.path)?;
            if markers.iter().any(|m| m.version == next.version) {
                let reason = format!("{} already has a section for {}", self.path.display(), next.version);
                warn!(reason = %reason, "skipping changelog edit");
                return Ok(EditOutcome::Skipped { reason });
            }
            (self.path.clone(), self.formatter.merge(&existing, &section))
        };

        if ctx.dry_run {
            info!(path = %target.display(), "dry run, changelog not written");
            return Ok(EditOutcome::DryRun {
                path: target,
                content,
            });
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(ChangelogError::Io)?;
        }
        std::fs::write(&target, content).map_err(|e| ChangelogError::WriteFailed {
            path: target.clone(),
            reason: e.to_string(),
        })?;
        info!(path = %target.display(), version = %next.version, "changelog written");

        if tasks.changelog_view {
            open_in_editor(&target)?;
        }

        Ok(EditOutcome::Written { path: target })
    }
}

/// Open a file in `$VISUAL` or `$EDITOR` and wait for it to close
pub fn open_in_editor(path: &Path) -> Result<()> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| ChangelogError::EditorFailed {
            editor: String::new(),
            reason: "neither VISUAL nor EDITOR is set".to_string(),
        })?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or_default();
    let program_path = which::which(program).map_err(|e| ChangelogError::EditorFailed {
        editor: editor.clone(),
        reason: e.to_string(),
    })?;

    debug!(editor = %editor, path = %path.display(), "opening editor");
    let status = Command::new(program_path)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| ChangelogError::EditorFailed {
            editor: editor.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(ChangelogError::EditorFailed {
            editor,
            reason: format!("exited with {}", status),
        }
        .into());
    }
    Ok(())
}
