//! Release command

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::info;

use publisher_adapters::VersionResolver;
use publisher_changelog::ConventionalParser;
use publisher_core::PublisherError;

use super::changelog::report;
use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::{Project, ReleasePlan};

/// Run the whole release
#[derive(Debug, Args)]
pub struct ReleaseCommand {
    /// Compute everything, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Skip creating and pushing the release tag
    #[arg(long)]
    pub no_git: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            dry_run = self.dry_run,
            no_git = self.no_git,
            "executing release command"
        );
        let project = Project::load(&std::env::current_dir()?)?;
        publisher_core::config::validate_for_release(&project.config)?;

        let plan = ReleasePlan::gather(&project)?;
        let next = plan.next_version(&project.config)?;
        let tag = project.config.format_tag(&next);
        let ctx = plan.context(&project, &next, self.dry_run);
        let dry_run = ctx.dry_run;

        if !cli.quiet && cli.format == OutputFormat::Text {
            println!("{}", output::header("Release Preview"));
            println!();
            println!("{}", output::key_value("Current version", &style(&plan.current.version).cyan().to_string()));
            println!("{}", output::key_value("Next version", &style(&next).green().bold().to_string()));
            println!("{}", output::key_value("Release level", plan.level.map_or("none", |l| l.as_str())));
            println!("{}", output::key_value("Tag", &style(&tag).yellow().to_string()));
            println!("{}", output::key_value("Commits", &plan.commits.len().to_string()));
            println!();
            if dry_run {
                println!("  {}", style("[DRY RUN - no changes will be made]").yellow().bold());
                println!();
            }
        }

        if !self.yes && !dry_run {
            let confirmed = Confirm::new()
                .with_prompt("Proceed with release?")
                .default(true)
                .interact()?;

            if !confirmed {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        let outcome = project.store().do_edit(
            &ctx,
            &ConventionalParser::new(),
            chrono::Local::now().date_naive(),
        )?;
        report(&outcome, cli)?;

        let bumped = VersionResolver::for_config(&project.config).bump_versions(
            &project.dir,
            &plan.current.version,
            &next,
            &project.config.versioning.files,
            dry_run,
        )?;
        if !cli.quiet && cli.format == OutputFormat::Text {
            for target in &bumped {
                output::success(&format!("Set version {} in {}", style(&next).green(), target));
            }
        }

        let mut tagged = false;
        if !self.no_git && !dry_run {
            let repo = project.repo()?;
            let message = project.config.git.tag_message.replace("{version}", &next);
            repo.create_tag(&tag, Some(&message))
                .map_err(PublisherError::from)?;
            tagged = true;
            if !cli.quiet && cli.format == OutputFormat::Text {
                output::success(&format!("Created tag {}", style(&tag).yellow()));
            }

            if project.config.git.push_tags {
                repo.push_tag(&project.config.git.remote, &tag)
                    .map_err(PublisherError::from)?;
                if !cli.quiet && cli.format == OutputFormat::Text {
                    output::success(&format!(
                        "Pushed {} to {}",
                        style(&tag).yellow(),
                        project.config.git.remote
                    ));
                }
            }
        }

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "current": plan.current.version,
                    "next": next,
                    "level": plan.level,
                    "tag": tag,
                    "tagged": tagged,
                    "bumped": bumped,
                    "dry_run": dry_run
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if !cli.quiet => {
                println!();
                if dry_run {
                    output::success(&format!(
                        "Dry run complete. Version {} would be released.",
                        style(&next).green().bold()
                    ));
                } else {
                    output::success(&format!("Released version {}", style(&next).green().bold()));
                }
            }
            OutputFormat::Text => {}
        }

        Ok(())
    }
}
