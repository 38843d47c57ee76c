//! External agent integration for the `prp` tool.
//!
//! This crate launches agent CLIs as child processes behind a narrow
//! launcher trait, so callers can be tested against a recording mock.
//!
//! # Drivers
//! - **codex**: prompt passed as one flattened positional argument (default)
//! - **claude**: prompt passed with `-p`, tool allow-list, output format
//! - **noop**: no process; prints a canned transcript
//!
//! # Example
//! ```no_run
//! use prp_agent::{AgentInvocation, ProcessLauncher, SystemLauncher};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let invocation = AgentInvocation::new("codex")
//!     .arg("--full-auto")
//!     .arg("Summarize this repository");
//! let code = SystemLauncher.launch(&invocation)?;
//! std::process::exit(code);
//! # }
//! ```

pub mod driver;
pub mod launcher;
pub mod mock;
pub mod output;

// Re-export main types
pub use driver::{
    build_invocation, flatten_prompt, noop_transcript, resolve_cli, Driver, OutputFormat,
    CLAUDE_ALLOWED_TOOLS, NOOP_MARKER,
};
pub use launcher::{exit_code, AgentInvocation, CapturedOutput, ProcessLauncher, SystemLauncher};
pub use mock::MockLauncher;
