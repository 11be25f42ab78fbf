//! Built-in version sources

mod changelog;
mod dotnet;
mod makefile;
mod mantisbt;
mod maven;
mod npm;

pub use changelog::{ChangelogSource, OverrideSource};
pub use dotnet::DotNetSource;
pub use makefile::MakefileSource;
pub use mantisbt::MantisBtSource;
pub use maven::MavenSource;
pub use npm::{NpmSource, PackageJson};
