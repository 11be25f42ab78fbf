//! Publisher Git - the VCS side of a release run
//!
//! This crate reads commit history and tags from a git repository and
//! creates and pushes release tags.

mod commits;
mod remote;
mod repository;
mod tags;
pub mod types;

pub use remote::git_push_tag;
pub use repository::{GitRepo, Result};
pub use types::TagInfo;
