//! publisher - release automation CLI

mod cli;
mod pipeline;

use clap::Parser;
use publisher_core::PublisherError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

/// Exit status of a failed run
const EXIT_FAILURE: i32 = 1;

/// Environment variables whose values never reach the terminal
const SECRET_VARS: &[&str] = &["GITHUB_TOKEN", "NPM_TOKEN", "MANTISBT_API_TOKEN", "EMAIL_PASSWORD"];

fn main() {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose);

    if let Err(err) = cli.execute() {
        tracing::error!(error = %redact(&format!("{:#}", err)), "run failed");
        eprintln!("{}", render_error(&err));
        std::process::exit(EXIT_FAILURE);
    }
}

/// `error[<code>]: <message>` for publisher errors, the plain chain otherwise
fn render_error(err: &anyhow::Error) -> String {
    let message = redact(&format!("{:#}", err));
    match err.downcast_ref::<PublisherError>() {
        Some(e) => format!("error[{}]: {}", e.code(), message),
        None => format!("error: {}", message),
    }
}

/// Replace the value of every set secret variable with `[REDACTED]`
fn redact(text: &str) -> String {
    SECRET_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter(|value| value.len() >= 4)
        .fold(text.to_string(), |acc, secret| acc.replace(&secret, "[REDACTED]"))
}

/// Set up tracing with two layers:
/// - Console: RUST_LOG, else `warn` (`debug` with --verbose)
/// - File: always debug-level JSON to ~/.publisher/logs/
fn init_tracing(verbose: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if let Some(log_dir) = log_directory() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "publisher.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_filter(console_filter),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_filter(EnvFilter::new("debug")),
            )
            .init();

        return Some(guard);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    None
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".publisher").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use publisher_core::error::ConfigError;

    #[test]
    fn test_render_error_carries_code() {
        let err: anyhow::Error = PublisherError::from(ConfigError::CurrentVersionUnknown).into();
        assert_eq!(
            render_error(&err),
            "error[104]: Current version cannot be determined"
        );
    }

    #[test]
    fn test_render_plain_error() {
        let err = anyhow::anyhow!("aborted");
        assert_eq!(render_error(&err), "error: aborted");
    }
}
