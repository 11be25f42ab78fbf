//! Version command

use clap::Args;
use console::style;
use tracing::info;

use publisher_adapters::VersionResolver;

use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::{Project, ReleasePlan};

/// Show the current and next version
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Show current version only
    #[arg(long)]
    pub current: bool,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(current = self.current, "executing version command");
        let project = Project::load(&std::env::current_dir()?)?;

        if self.current {
            let current = VersionResolver::for_config(&project.config).resolve(&project.dir)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&current)?),
                OutputFormat::Text => println!("{}", current.version),
            }
            return Ok(());
        }

        let plan = ReleasePlan::gather(&project)?;
        let next = plan.next_version(&project.config)?;
        let level = plan.level.map_or("none", |l| l.as_str());

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "current": plan.current.version,
                    "system": plan.current.version_system,
                    "source": plan.current.source,
                    "first_release": plan.first_release,
                    "level": plan.level,
                    "next": next,
                    "commits": plan.commits.len()
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text if cli.quiet => println!("{}", next),
            OutputFormat::Text => {
                println!("{}", output::header("Version Calculation"));
                println!();
                println!("{}", output::key_value("Current version", &style(&plan.current.version).cyan().to_string()));
                println!("{}", output::key_value("Version system", plan.current.version_system.as_str()));
                println!("{}", output::key_value("Release level", &style(level).yellow().to_string()));
                println!("{}", output::key_value("Next version", &style(&next).green().bold().to_string()));
                println!("{}", output::key_value("Commits", &plan.commits.len().to_string()));
            }
        }

        Ok(())
    }
}
