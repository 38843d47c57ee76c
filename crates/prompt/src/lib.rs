//! Prompt commands for the `prp` tool.
//!
//! This crate turns a `/name` reference into agent-ready text:
//! - File lookup over the search roots (disk or in-memory)
//! - Listing and resolving command files
//! - `$ARGUMENTS` / `$CWD` substitution with shell quoting
//! - Loading PRP documents for the runner

pub mod builder;
pub mod loader;
pub mod lookup;
pub mod prp;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use loader::{list_commands, resolve_command};
pub use lookup::{DiskLookup, FileLookup, MemoryLookup};
pub use prp::{build_prp_prompt, locate_prp, PrpSource, META_HEADER};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, CommandFile, CommandName, ARGUMENTS_TOKEN,
    COMMAND_DELIMITER, COMMAND_EXTENSIONS, CWD_TOKEN, USAGE,
};
