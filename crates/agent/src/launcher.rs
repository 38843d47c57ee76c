//! Process launcher abstraction and the system implementation.
//!
//! Dispatch only ever calls [`ProcessLauncher::launch`]; `capture` and
//! `stream` back the headless output modes of `prp run`.

use prp_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// A fully specified external process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInvocation {
    /// Executable name or path
    pub program: String,

    /// Arguments, passed verbatim (no shell involved)
    pub args: Vec<String>,

    /// Working directory for the child (inherits ours when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dir: Option<PathBuf>,
}

impl AgentInvocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the child in `dir`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args.iter().map(OsString::from));
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

/// Output of a finished child whose stdout/stderr were piped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code, see [`exit_code`]
    pub code: i32,

    /// Captured stdout (empty for streamed runs)
    pub stdout: String,

    /// Captured stderr
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Something that can run an external program.
pub trait ProcessLauncher {
    /// Run with inherited stdio and block until exit. Returns the exit code.
    fn launch(&self, invocation: &AgentInvocation) -> AppResult<i32>;

    /// Run with stdout and stderr captured.
    fn capture(&self, invocation: &AgentInvocation) -> AppResult<CapturedOutput>;

    /// Run with stdout delivered line by line to `on_line`; stderr is captured.
    fn stream(
        &self,
        invocation: &AgentInvocation,
        on_line: &mut dyn FnMut(&str),
    ) -> AppResult<CapturedOutput>;
}

/// Launcher that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, invocation: &AgentInvocation) -> AppResult<i32> {
        tracing::info!("Launching {} ({} args)", invocation.program, invocation.args.len());

        let status = invocation
            .to_command()
            .status()
            .map_err(|e| spawn_error(invocation, e))?;

        let code = exit_code(status);
        tracing::debug!("{} exited with {}", invocation.program, code);
        Ok(code)
    }

    fn capture(&self, invocation: &AgentInvocation) -> AppResult<CapturedOutput> {
        tracing::info!("Launching {} with captured output", invocation.program);

        let output = invocation
            .to_command()
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error(invocation, e))?;

        Ok(CapturedOutput {
            code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn stream(
        &self,
        invocation: &AgentInvocation,
        on_line: &mut dyn FnMut(&str),
    ) -> AppResult<CapturedOutput> {
        tracing::info!("Launching {} with streamed output", invocation.program);

        let mut child = invocation
            .to_command()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(invocation, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::Agent("stdout not captured".to_string()))?;

        // Drain stderr on its own thread so a chatty child cannot block on a full pipe
        let stderr_reader = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        // Decode lossily so one bad byte does not abort the stream
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();
        let read_result = loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break Ok(()),
                Ok(_) => on_line(trim_line_ending(&String::from_utf8_lossy(&buf))),
                Err(e) => break Err(e),
            }
        };

        if let Err(e) = &read_result {
            tracing::warn!("Lost stdout of {}: {}", invocation.program, e);
            let _ = child.kill();
        }

        let status = child.wait()?;
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        read_result?;

        Ok(CapturedOutput {
            code: exit_code(status),
            stdout: String::new(),
            stderr,
        })
    }
}

fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn spawn_error(invocation: &AgentInvocation, err: std::io::Error) -> AppError {
    AppError::Agent(format!("Failed to launch '{}': {}", invocation.program, err))
}

/// Map an exit status to a shell-style code.
///
/// Signal deaths on Unix become `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = AgentInvocation::new("codex")
            .arg("--full-auto")
            .args(["one", "two"])
            .in_dir("/repo");
        assert_eq!(inv.program, "codex");
        assert_eq!(inv.args, vec!["--full-auto", "one", "two"]);
        assert_eq!(inv.current_dir, Some(PathBuf::from("/repo")));
    }

    #[test]
    fn test_missing_program_is_agent_error() {
        let inv = AgentInvocation::new("prp-definitely-not-installed-binary");
        let err = SystemLauncher.launch(&inv).unwrap_err();
        assert!(matches!(err, AppError::Agent(_)));
        assert!(err.to_string().contains("prp-definitely-not-installed-binary"));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_propagates_exit_code() {
        let inv = AgentInvocation::new("sh").args(["-c", "exit 7"]);
        assert_eq!(SystemLauncher.launch(&inv).unwrap(), 7);
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_collects_both_streams() {
        let inv = AgentInvocation::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemLauncher.capture(&inv).unwrap();
        assert_eq!(output.code, 3);
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_delivers_lines() {
        let inv = AgentInvocation::new("sh").args(["-c", "printf 'a\\nb\\n'; echo oops >&2"]);
        let mut lines = Vec::new();
        let output = SystemLauncher
            .stream(&inv, &mut |line| lines.push(line.to_string()))
            .unwrap();
        assert_eq!(lines, vec!["a", "b"]);
        assert_eq!(output.stderr, "oops\n");
        assert!(output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_stream_decodes_invalid_utf8_lossily() {
        let inv = AgentInvocation::new("sh")
            .args(["-c", "printf 'ok\\r\\n\\377bad\\nend'; exit 4"]);
        let mut lines = Vec::new();
        let output = SystemLauncher
            .stream(&inv, &mut |line| lines.push(line.to_string()))
            .unwrap();
        assert_eq!(lines, vec!["ok", "\u{FFFD}bad", "end"]);
        assert_eq!(output.code, 4);
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("a\r\n"), "a");
        assert_eq!(trim_line_ending("a\n"), "a");
        assert_eq!(trim_line_ending("a"), "a");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_requested_dir() {
        let inv = AgentInvocation::new("pwd").in_dir("/");
        let output = SystemLauncher.capture(&inv).unwrap();
        assert_eq!(output.stdout.trim(), "/");
    }
}
