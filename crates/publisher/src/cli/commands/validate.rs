//! Validate command

use clap::Args;
use console::style;
use tracing::info;

use publisher_adapters::VersionResolver;
use publisher_core::config::{load_config_from_dir, validate_config, validate_for_release};

use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::Project;

/// Validate the configuration
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Also check what a release run needs (repo, repo type, current version)
    #[arg(long)]
    pub release: bool,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(release = self.release, "executing validate command");
        let cwd = std::env::current_dir()?;

        let mut errors: Vec<String> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        let (config, config_path) = match load_config_from_dir(&cwd) {
            Ok((c, p)) => (Some(c), Some(p)),
            Err(e) => {
                errors.push(format!("Configuration [{}]: {}", e.code(), e));
                (None, None)
            }
        };

        if let Some(ref cfg) = config {
            let checked = if self.release {
                validate_for_release(cfg)
            } else {
                validate_config(cfg)
            };
            if let Err(e) = checked {
                errors.push(format!("Configuration [{}]: {}", e.code(), e));
            }

            let project_dir = config_path
                .as_deref()
                .and_then(|p| p.parent())
                .unwrap_or(&cwd);
            let resolver = VersionResolver::for_config(cfg);
            let detected: Vec<&str> = resolver
                .detected(project_dir)
                .iter()
                .map(|s| s.name())
                .collect();
            if detected.is_empty() {
                warnings.push("No version source detected".to_string());
            }

            if self.release {
                match resolver.resolve(project_dir) {
                    Ok(info) => {
                        if !cli.quiet && cli.format == OutputFormat::Text {
                            output::info(&format!(
                                "Current version {} ({})",
                                style(&info.version).green(),
                                info.source.as_deref().unwrap_or("unknown source")
                            ));
                        }
                    }
                    Err(e) => errors.push(format!("Version [{}]: {}", e.code(), e)),
                }

                let project = Project {
                    config: cfg.clone(),
                    config_path: config_path.clone(),
                    dir: project_dir.to_path_buf(),
                };
                if let Err(e) = project.repo() {
                    errors.push(format!("Repository [{}]: {}", e.code(), e));
                }
            }
        }

        let passed = errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.map(|p| p.to_string_lossy().to_string()),
                    "errors": errors,
                    "warnings": warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Validation Results"));
                    println!();

                    if let Some(path) = &config_path {
                        println!("Config: {}", style(path.display()).cyan());
                        println!();
                    }

                    if !errors.is_empty() {
                        println!("{}", style("Errors:").red().bold());
                        for error in &errors {
                            println!("  {} {}", style("✗").red(), error);
                        }
                        println!();
                    }

                    if !warnings.is_empty() {
                        println!("{}", style("Warnings:").yellow().bold());
                        for warning in &warnings {
                            println!("  {} {}", style("!").yellow(), warning);
                        }
                        println!();
                    }

                    if passed {
                        output::success("Validation passed");
                    } else {
                        println!(
                            "{} with {} error(s)",
                            style("✗ Validation failed").red().bold(),
                            errors.len()
                        );
                    }
                }
            }
        }

        if !passed {
            anyhow::bail!("configuration is not valid");
        }

        Ok(())
    }
}
