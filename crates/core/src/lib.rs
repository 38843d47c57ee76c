//! PRP Core Library
//!
//! This crate provides the foundational utilities for the `prp` tool:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - The per-run invocation context (working directory, search roots)

pub mod config;
pub mod context;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AgentConfig, AppConfig, ConfigOverrides};
pub use context::{InvocationContext, RootScope, SearchRoot, COMMANDS_SUBDIR};
pub use error::{AppError, AppResult};
