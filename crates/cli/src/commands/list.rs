//! List command handler.
//!
//! Prints every available command name, one per line.

use prp_core::{AppResult, InvocationContext};
use prp_prompt::{list_commands, FileLookup};
use std::io::Write;

/// List available prompt commands
#[derive(Debug, Default)]
pub struct ListCommand;

impl ListCommand {
    /// Execute the list command.
    ///
    /// Missing roots and an empty result are both successes. The workspace
    /// itself is checked earlier by `AppConfig::load`, so a missing
    /// `--workspace` directory fails with a configuration error before
    /// listing starts.
    pub fn execute(
        &self,
        ctx: &InvocationContext,
        lookup: &dyn FileLookup,
        out: &mut dyn Write,
    ) -> AppResult<()> {
        tracing::info!("Executing list command");

        let names = list_commands(lookup, ctx)?;
        tracing::debug!("Found {} command(s)", names.len());

        for name in names {
            writeln!(out, "{}", name)?;
        }

        Ok(())
    }
}
