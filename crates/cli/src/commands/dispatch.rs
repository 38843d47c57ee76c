//! Dispatch command handler.
//!
//! Resolves `/name [args...]` to a single command file, substitutes its
//! placeholders and launches the agent with the result.

use prp_agent::{AgentInvocation, ProcessLauncher};
use prp_core::{config::AppConfig, AppError, AppResult, InvocationContext};
use prp_prompt::{build_prompt, resolve_command, CommandName, FileLookup, USAGE};

/// Dispatch a prompt command: `/name [args...]`
#[derive(Debug, Clone)]
pub struct DispatchCommand {
    /// Raw tokens, starting with the command reference
    pub tokens: Vec<String>,
}

impl DispatchCommand {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Execute the dispatch. Returns the agent's exit code.
    pub fn execute(
        &self,
        config: &AppConfig,
        ctx: &InvocationContext,
        lookup: &dyn FileLookup,
        launcher: &dyn ProcessLauncher,
    ) -> AppResult<i32> {
        tracing::info!("Executing dispatch command");

        // Validate syntax before touching the filesystem
        let (first, rest) = self
            .tokens
            .split_first()
            .ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
        let name = CommandName::parse(first)?;
        let arguments = rest.join(" ");

        tracing::debug!("Dispatching {} with arguments {:?}", name, arguments);

        let file = resolve_command(lookup, ctx, &name)?;
        let built = build_prompt(lookup, &file, &arguments, &ctx.cwd)?;

        let invocation = AgentInvocation::new(&config.agent.cli)
            .arg(&config.agent.approval_flag)
            .arg(built.text);

        launcher.launch(&invocation)
    }
}
