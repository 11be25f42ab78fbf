//! CLI commands

mod changelog;
mod completions;
mod init;
mod notes;
mod release;
mod validate;
mod version;

pub use changelog::ChangelogCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use notes::NotesCommand;
pub use release::ReleaseCommand;
pub use validate::ValidateCommand;
pub use version::VersionCommand;
