//! Notes command

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use tracing::info;

use publisher_changelog::ReleaseNotes;

use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::Project;

/// Release channel a body is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    /// HTML email with the release links header
    Email,
    /// Markdown release body
    Github,
    /// HTML body for the MantisBT releases board
    Mantisbt,
}

/// Render release notes for a channel from a written section
#[derive(Debug, Args)]
pub struct NotesCommand {
    /// Target channel
    #[arg(value_enum)]
    pub channel: Channel,

    /// Version whose section is used (default: latest in the changelog)
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Write the body to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl NotesCommand {
    /// Execute the notes command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(channel = ?self.channel, for_version = ?self.for_version, "executing notes command");
        let project = Project::load(&std::env::current_dir()?)?;
        let store = project.store();

        let version = match &self.for_version {
            Some(version) => version.clone(),
            None => store.latest_version()?.ok_or_else(|| {
                anyhow::anyhow!("{} has no version sections", store.path().display())
            })?,
        };

        let notes = ReleaseNotes::new(&project.config, &version, store.section_entries(&version)?);
        let body = match self.channel {
            Channel::Email => notes.email_body(),
            Channel::Github => notes.github_body(),
            Channel::Mantisbt => notes.mantisbt_body(),
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &body)?;
                if !cli.quiet {
                    output::success(&format!("Release notes written to {}", path.display()));
                }
            }
            None if cli.format == OutputFormat::Json => {
                let output = serde_json::json!({
                    "version": version,
                    "entries": notes.entries(),
                    "body": body
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            None => println!("{}", body),
        }

        Ok(())
    }
}
