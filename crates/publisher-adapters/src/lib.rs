//! Publisher Adapters - Project file version sources
//!
//! Each supported project file format (npm, .NET assembly info, Makefile and
//! resource scripts, Maven, MantisBT plugins) implements [`VersionSource`].
//! The [`VersionResolver`] queries them in a fixed order to find the current
//! version and bumps them once the next version is known.

mod files;
pub mod resolver;
pub mod sources;
mod traits;

pub use files::replace_version_in_file;
pub use resolver::VersionResolver;
pub use sources::{
    ChangelogSource, DotNetSource, MakefileSource, MantisBtSource, MavenSource, NpmSource,
    OverrideSource, PackageJson,
};
pub use traits::VersionSource;
