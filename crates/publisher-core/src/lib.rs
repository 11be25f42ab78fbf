//! Publisher Core - shared foundation of the publisher release tool
//!
//! This crate provides the data model, error taxonomy, configuration, and
//! per-run context used by the changelog, versioning, and CLI crates.

pub mod config;
pub mod error;
pub mod types;
pub mod workflow;

pub use error::{PublisherError, Result};
pub use types::{Commit, ReleaseInfo, ReleaseLevel, VersionBump, VersionInfo, VersionSystem};
pub use workflow::RunContext;
