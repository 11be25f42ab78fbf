//! Changelog command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use publisher_changelog::{ConventionalParser, EditOutcome, SectionMode};

use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::{Project, ReleasePlan};

/// Write or show changelog sections
#[derive(Debug, Args)]
pub struct ChangelogCommand {
    /// Show an existing section instead of writing a new one
    #[arg(long = "for-version", value_name = "VERSION")]
    pub for_version: Option<String>,

    /// Print the new section instead of writing it
    #[arg(long)]
    pub print: bool,

    /// Export the new section to this file
    #[arg(long, value_name = "PATH", conflicts_with = "for_version")]
    pub file: Option<PathBuf>,

    /// Write an HTML preview of the new section; with --for-version, show it as HTML
    #[arg(long, value_name = "PATH")]
    pub html: Option<Option<PathBuf>>,

    /// Open the written changelog in $VISUAL or $EDITOR
    #[arg(long)]
    pub view: bool,

    /// Show what would be written
    #[arg(long)]
    pub dry_run: bool,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            for_version = ?self.for_version,
            print = self.print,
            file = ?self.file,
            html = ?self.html,
            view = self.view,
            "executing changelog command"
        );
        let mut project = Project::load(&std::env::current_dir()?)?;

        if let Some(version) = &self.for_version {
            return self.show_section(&project, version, cli);
        }

        let tasks = &mut project.config.tasks;
        tasks.changelog_print |= self.print;
        tasks.changelog_view |= self.view;
        if let Some(file) = &self.file {
            tasks.changelog_file = Some(file.clone());
        }
        if let Some(Some(html)) = &self.html {
            tasks.changelog_html = Some(html.clone());
        }

        let plan = ReleasePlan::gather(&project)?;
        let next = plan.next_version(&project.config)?;
        let ctx = plan.context(&project, &next, self.dry_run);
        let outcome = project.store().do_edit(
            &ctx,
            &ConventionalParser::new(),
            chrono::Local::now().date_naive(),
        )?;

        report(&outcome, cli)
    }

    fn show_section(&self, project: &Project, version: &str, cli: &Cli) -> anyhow::Result<()> {
        let store = project.store();

        if cli.format == OutputFormat::Json {
            let entries = store.section_entries(version)?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let mode = if self.html.is_some() {
            SectionMode::Html
        } else {
            SectionMode::Raw
        };
        println!("{}", store.section(version, mode)?);
        Ok(())
    }
}

/// Tell the user what a changelog edit did
pub(crate) fn report(outcome: &EditOutcome, cli: &Cli) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        let output = match outcome {
            EditOutcome::Written { path } => {
                serde_json::json!({ "outcome": "written", "path": path })
            }
            EditOutcome::Printed(section) => {
                serde_json::json!({ "outcome": "printed", "section": section })
            }
            EditOutcome::Skipped { reason } => {
                serde_json::json!({ "outcome": "skipped", "reason": reason })
            }
            EditOutcome::DryRun { path, content } => {
                serde_json::json!({ "outcome": "dry_run", "path": path, "content": content })
            }
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match outcome {
        EditOutcome::Printed(section) => println!("{}", section),
        _ if cli.quiet => {}
        EditOutcome::Written { path } => output::success(&format!(
            "Changelog written to {}",
            style(path.display()).cyan()
        )),
        EditOutcome::Skipped { reason } => {
            output::warning(&format!("Changelog not updated: {}", reason))
        }
        EditOutcome::DryRun { path, content } => {
            output::info(&format!(
                "Would write {}:",
                style(path.display()).cyan()
            ));
            println!();
            println!("{}", content);
        }
    }
    Ok(())
}
