//! Command handlers for the `prp` CLI.
//!
//! Each mode lives in its own submodule.

pub mod dispatch;
pub mod list;
pub mod run;

// Re-export command types for convenience
pub use dispatch::DispatchCommand;
pub use list::ListCommand;
pub use run::{RunCommand, RunEnv};
