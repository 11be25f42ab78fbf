//! Workflow state for publisher runs

mod context;

pub use context::RunContext;
