//! Logging infrastructure for the PRP command tool.
//!
//! This module initializes the tracing subscriber for structured logging.
//! All logs are emitted to stderr: stdout carries command listings and
//! whatever the launched agent prints.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber with stderr output.
///
/// # Arguments
/// * `log_level` - Filter directive (e.g., "debug", "prp_prompt=trace")
/// * `no_color` - Disable colored output
///
/// # Example
/// ```no_run
/// use prp_core::logging::init_logging;
///
/// init_logging("warn", false).expect("Failed to initialize logging");
/// ```
pub fn init_logging(log_level: &str, no_color: bool) -> AppResult<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

    Ok(())
}

/// Check if stderr can render ANSI colors.
fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    std::io::stderr().is_terminal()
}
