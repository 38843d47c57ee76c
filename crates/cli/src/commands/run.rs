//! Run command handler.
//!
//! Runs a whole PRP document through an agent driver, with optional
//! headless output handling.

use clap::Args;
use prp_agent::{
    build_invocation, noop_transcript, output, AgentInvocation, Driver, OutputFormat,
    ProcessLauncher,
};
use prp_core::{config::AppConfig, AppError, AppResult};
use prp_prompt::{build_prp_prompt, locate_prp, FileLookup, PrpSource};
use std::io::Write;
use std::path::PathBuf;

/// Run a PRP document through an agent
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Path to a PRP markdown file, e.g. PRPs/feature.md (overrides --prp)
    #[arg(long)]
    pub prp_path: Option<PathBuf>,

    /// PRP file name without the .md extension, resolved under PRPs/
    #[arg(long)]
    pub prp: Option<String>,

    /// Agent driver: codex, claude or noop (default: configured driver)
    #[arg(long)]
    pub driver: Option<Driver>,

    /// Override the driver's executable
    #[arg(long)]
    pub cli: Option<String>,

    /// Launch an interactive session
    #[arg(long)]
    pub interactive: bool,

    /// Output format for headless runs: text, json or stream-json
    #[arg(long, default_value = "text")]
    pub output_format: OutputFormat,
}

/// Output sinks and executable lookup used by a run.
pub struct RunEnv<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub locate: &'a dyn Fn(&str) -> Option<PathBuf>,
}

impl RunCommand {
    /// Execute the run command. Returns the exit code to report.
    pub fn execute(
        &self,
        config: &AppConfig,
        lookup: &dyn FileLookup,
        launcher: &dyn ProcessLauncher,
        env: RunEnv<'_>,
    ) -> AppResult<i32> {
        tracing::info!("Executing run command");
        tracing::debug!("Run options: {:?}", self);

        let source = PrpSource::from_flags(self.prp_path.clone(), self.prp.clone())?;
        let path = locate_prp(&config.workspace, &source);
        let prompt = build_prp_prompt(lookup, &path)?;

        let driver = match self.driver {
            Some(driver) => driver,
            None => config.agent.driver.parse().map_err(AppError::Config)?,
        };

        let (driver, program) = self.resolve_program(driver, env.locate, env.err)?;

        let Some(invocation) =
            build_invocation(driver, &program, self.interactive, self.output_format, &prompt)
        else {
            for line in noop_transcript(self.interactive, self.output_format, &prompt) {
                writeln!(env.out, "{}", line)?;
            }
            return Ok(0);
        };

        // Relative paths inside PRPs are written against the workspace root
        let invocation = invocation.in_dir(&config.workspace);

        if self.interactive {
            return launcher.launch(&invocation);
        }

        match self.output_format {
            OutputFormat::Text => launcher.launch(&invocation),
            OutputFormat::Json => run_json(launcher, &invocation, env.out, env.err),
            OutputFormat::StreamJson => run_stream_json(launcher, &invocation, env.out, env.err),
        }
    }

    /// Pick the executable for `driver`, falling back to noop when missing.
    fn resolve_program(
        &self,
        driver: Driver,
        locate: &dyn Fn(&str) -> Option<PathBuf>,
        err: &mut dyn Write,
    ) -> AppResult<(Driver, String)> {
        let Some(default_cli) = driver.default_cli() else {
            return Ok((driver, String::new()));
        };

        let cli = self.cli.as_deref().unwrap_or(default_cli);
        match locate(cli) {
            Some(resolved) => Ok((driver, resolved.to_string_lossy().into_owned())),
            None => {
                tracing::warn!("Agent CLI '{}' not found", cli);
                writeln!(
                    err,
                    "CLI executable not found: '{}'. Falling back to local 'noop' driver.",
                    cli
                )?;
                Ok((Driver::Noop, String::new()))
            }
        }
    }
}

fn report_failure(err: &mut dyn Write, code: i32, stderr: &str) -> AppResult<i32> {
    writeln!(err, "Runner failed with exit code {}", code)?;
    writeln!(err, "Error: {}", stderr)?;
    Ok(code)
}

fn run_json(
    launcher: &dyn ProcessLauncher,
    invocation: &AgentInvocation,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> AppResult<i32> {
    let captured = launcher.capture(invocation)?;
    if !captured.success() {
        return report_failure(err, captured.code, &captured.stderr);
    }

    let document = output::parse_result_document(&captured.stdout);
    writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;

    if let Some(summary) = output::result_summary(&document) {
        for line in summary {
            writeln!(err, "{}", line)?;
        }
    }

    Ok(0)
}

fn run_stream_json(
    launcher: &dyn ProcessLauncher,
    invocation: &AgentInvocation,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> AppResult<i32> {
    let mut write_result: std::io::Result<()> = Ok(());

    let captured = launcher.stream(invocation, &mut |line| {
        if write_result.is_ok() {
            write_result = emit_stream_line(line, out, err);
        }
    })?;
    write_result?;

    if !captured.success() {
        return report_failure(err, captured.code, &captured.stderr);
    }

    Ok(0)
}

fn emit_stream_line(line: &str, out: &mut dyn Write, err: &mut dyn Write) -> std::io::Result<()> {
    let event = match output::parse_stream_line(line) {
        None => return Ok(()),
        Some(Ok(event)) => event,
        Some(Err(e)) => {
            tracing::warn!("Failed to parse JSON line: {} (line: {})", e, line);
            return Ok(());
        }
    };

    for description in output::describe_event(&event) {
        writeln!(err, "{}", description)?;
    }
    writeln!(out, "{}", event)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prp_agent::{MockLauncher, CLAUDE_ALLOWED_TOOLS, NOOP_MARKER};
    use prp_prompt::MemoryLookup;

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.workspace = PathBuf::from("/repo");
        config
    }

    fn lookup() -> MemoryLookup {
        MemoryLookup::new().with_file("/repo/PRPs/feature.md", "# Feature\nBuild it")
    }

    fn command(driver: Driver, format: OutputFormat) -> RunCommand {
        RunCommand {
            prp_path: None,
            prp: Some("feature".to_string()),
            driver: Some(driver),
            cli: None,
            interactive: false,
            output_format: format,
        }
    }

    fn found(cli: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(cli))
    }

    fn missing(_: &str) -> Option<PathBuf> {
        None
    }

    struct Outcome {
        code: i32,
        out: String,
        err: String,
    }

    fn run_with(
        cmd: &RunCommand,
        launcher: &MockLauncher,
        locate: &dyn Fn(&str) -> Option<PathBuf>,
    ) -> AppResult<Outcome> {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = cmd.execute(
            &config(),
            &lookup(),
            launcher,
            RunEnv {
                out: &mut out,
                err: &mut err,
                locate,
            },
        )?;
        Ok(Outcome {
            code,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        })
    }

    #[test]
    fn test_codex_text_run_launches_in_workspace() {
        let launcher = MockLauncher::new();
        let outcome = run_with(&command(Driver::Codex, OutputFormat::Text), &launcher, &found).unwrap();

        assert_eq!(outcome.code, 0);
        let inv = &launcher.invocations()[0];
        assert_eq!(inv.program, "/usr/bin/codex");
        assert_eq!(inv.args.len(), 1);
        assert!(inv.args[0].starts_with("Ingest and understand"));
        assert!(inv.args[0].ends_with("# Feature Build it"));
        assert_eq!(inv.current_dir, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_cli_override_is_looked_up() {
        let launcher = MockLauncher::new();
        let mut cmd = command(Driver::Claude, OutputFormat::Text);
        cmd.cli = Some("claude-beta".to_string());

        run_with(&cmd, &launcher, &found).unwrap();
        let inv = &launcher.invocations()[0];
        assert_eq!(inv.program, "/usr/bin/claude-beta");
        assert_eq!(inv.args[0], "-p");
        assert_eq!(inv.args[3], CLAUDE_ALLOWED_TOOLS);
    }

    #[test]
    fn test_missing_cli_falls_back_to_noop() {
        let launcher = MockLauncher::new();
        let outcome = run_with(&command(Driver::Codex, OutputFormat::Text), &launcher, &missing).unwrap();

        assert_eq!(outcome.code, 0);
        assert!(launcher.invocations().is_empty());
        assert!(outcome.err.contains("Falling back to local 'noop' driver"));
        assert_eq!(outcome.out, format!("{}\n", NOOP_MARKER));
    }

    #[test]
    fn test_default_driver_comes_from_config() {
        let launcher = MockLauncher::new();
        let mut cmd = command(Driver::Codex, OutputFormat::Text);
        cmd.driver = None;

        run_with(&cmd, &launcher, &found).unwrap();
        assert_eq!(launcher.invocations()[0].program, "/usr/bin/codex");
    }

    #[test]
    fn test_missing_prp_is_error() {
        let launcher = MockLauncher::new();
        let mut cmd = command(Driver::Noop, OutputFormat::Text);
        cmd.prp = Some("nope".to_string());

        let err = run_with(&cmd, &launcher, &found).err().unwrap();
        assert!(err.to_string().contains("PRP not found: /repo/PRPs/nope.md"));
    }

    #[test]
    fn test_json_run_pretty_prints_and_summarizes() {
        let launcher = MockLauncher::new().with_stdout(
            r#"{"type":"result","is_error":false,"cost_usd":0.25,"duration_ms":900,"session_id":"abc"}"#,
        );
        let outcome = run_with(&command(Driver::Claude, OutputFormat::Json), &launcher, &found).unwrap();

        assert_eq!(outcome.code, 0);
        assert!(outcome.out.contains("\"session_id\": \"abc\""));
        assert!(outcome.err.contains("Success: true"));
        assert!(outcome.err.contains("Cost: $0.2500"));
        assert!(outcome.err.contains("Session: abc"));
    }

    #[test]
    fn test_json_run_failure_propagates_code() {
        let launcher = MockLauncher::new().with_exit_code(5).with_stderr("bad auth");
        let outcome = run_with(&command(Driver::Claude, OutputFormat::Json), &launcher, &found).unwrap();

        assert_eq!(outcome.code, 5);
        assert!(outcome.out.is_empty());
        assert!(outcome.err.contains("Runner failed with exit code 5"));
        assert!(outcome.err.contains("Error: bad auth"));
    }

    #[test]
    fn test_stream_json_run_echoes_events() {
        let launcher = MockLauncher::new().with_stdout(
            "{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"s9\"}\nnot json\n\n{\"type\":\"assistant\",\"message\":{\"content\":\"hi\"}}\n",
        );
        let outcome =
            run_with(&command(Driver::Claude, OutputFormat::StreamJson), &launcher, &found).unwrap();

        assert_eq!(outcome.code, 0);
        assert_eq!(outcome.out.lines().count(), 2);
        assert_eq!(
            outcome.out.lines().next(),
            Some("{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"s9\"}")
        );
        assert!(outcome.err.contains("Session started: s9"));
        assert!(outcome.err.contains("Assistant: hi..."));
    }

    #[test]
    fn test_noop_stream_transcript() {
        let launcher = MockLauncher::new();
        let outcome =
            run_with(&command(Driver::Noop, OutputFormat::StreamJson), &launcher, &found).unwrap();

        assert_eq!(outcome.out.lines().count(), 4);
        assert!(launcher.invocations().is_empty());
    }

    #[test]
    fn test_interactive_launches_with_inherited_stdio() {
        let launcher = MockLauncher::new().with_exit_code(130).with_stdout("ignored");
        let mut cmd = command(Driver::Codex, OutputFormat::Json);
        cmd.interactive = true;

        let outcome = run_with(&cmd, &launcher, &found).unwrap();
        assert_eq!(outcome.code, 130);
        assert!(outcome.out.is_empty());
    }
}
