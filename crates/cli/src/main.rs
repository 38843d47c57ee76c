//! PRP command CLI
//!
//! Main entry point for the `prp` tool.
//! Resolves `/name` prompt commands and hands them to an external agent.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{DispatchCommand, ListCommand, RunCommand, RunEnv};
use prp_agent::SystemLauncher;
use prp_core::{config::AppConfig, logging, AppError, ConfigOverrides};
use prp_prompt::{DiskLookup, USAGE};
use std::path::PathBuf;
use std::process::ExitCode;

/// PRP command tool - run reusable prompt commands through a coding agent
#[derive(Parser, Debug)]
#[command(name = "prp")]
#[command(about = "Run reusable prompt commands through a coding agent", long_about = None)]
#[command(version)]
#[command(override_usage = "prp /<command> [args...]\n       prp --list\n       prp run [OPTIONS]")]
struct Cli {
    /// List available commands
    #[arg(short, long)]
    list: bool,

    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PRP_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PRP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output (`NO_COLOR` is honoured by the config loader)
    #[arg(long, global = true)]
    no_color: bool,

    /// Agent executable used for dispatch
    #[arg(long, global = true, env = "PRP_AGENT_CLI")]
    agent_cli: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a PRP document through an agent driver
    Run(RunCommand),

    /// `/name [args...]`: dispatch a prompt command
    #[command(external_subcommand)]
    Dispatch(Vec<String>),
}

fn main() -> ExitCode {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let config = AppConfig::load(ConfigOverrides {
        workspace: cli.workspace,
        config_file: cli.config,
        agent_cli: cli.agent_cli,
        log_level: cli.log_level,
        verbose: cli.verbose,
        no_color: cli.no_color,
    })
    .context("Failed to load configuration")?;

    // Initialize logging with final configuration
    logging::init_logging(config.effective_log_level(), config.no_color)?;

    tracing::info!("prp starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Agent: {} {}", config.agent.cli, config.agent.approval_flag);

    let command_name = match (&cli.command, cli.list) {
        (_, true) => "list",
        (Some(Commands::Run(_)), _) => "run",
        (Some(Commands::Dispatch(_)), _) => "dispatch",
        (None, false) => "usage",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let lookup = DiskLookup;
    let launcher = SystemLauncher;

    let result = if cli.list {
        let ctx = config.invocation_context()?;
        ListCommand
            .execute(&ctx, &lookup, &mut std::io::stdout().lock())
            .map(|()| 0)
    } else {
        match cli.command {
            Some(Commands::Run(cmd)) => cmd.execute(
                &config,
                &lookup,
                &launcher,
                RunEnv {
                    out: &mut std::io::stdout().lock(),
                    err: &mut std::io::stderr().lock(),
                    locate: &prp_agent::resolve_cli,
                },
            ),
            Some(Commands::Dispatch(tokens)) => {
                let ctx = config.invocation_context()?;
                DispatchCommand::new(tokens).execute(&config, &ctx, &lookup, &launcher)
            }
            None => Err(AppError::Usage(USAGE.to_string())),
        }
    };

    match &result {
        Ok(code) => tracing::info!("Command completed with exit code {}", code),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    Ok(result?)
}
