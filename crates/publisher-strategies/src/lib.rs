//! Publisher Strategies - version numbering for the publisher release tool
//!
//! This crate computes the next version of a release under semver,
//! incremental, or .NET numbering, and validates versions supplied by hand.

mod dotnet;
mod incremental;
mod next;
mod registry;
mod semver;
mod traits;

pub use dotnet::DotNetStrategy;
pub use incremental::IncrementalStrategy;
pub use next::{next_version, validate_next_version};
pub use registry::StrategyRegistry;
pub use semver::SemVerStrategy;
pub use traits::VersionStrategy;
