//! Recording launcher for tests.

use crate::launcher::{AgentInvocation, CapturedOutput, ProcessLauncher};
use prp_core::AppResult;
use std::sync::Mutex;

/// Launcher that records invocations instead of spawning processes.
///
/// `capture` returns the configured stdout; `stream` feeds it line by line.
#[derive(Debug, Default)]
pub struct MockLauncher {
    exit_code: i32,
    stdout: String,
    stderr: String,
    invocations: Mutex<Vec<AgentInvocation>>,
}

impl MockLauncher {
    /// A launcher whose runs all succeed with no output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit code reported for every run.
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Stdout produced by `capture` and `stream`.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    /// Stderr produced by `capture` and `stream`.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Every invocation seen so far, in order.
    pub fn invocations(&self) -> Vec<AgentInvocation> {
        self.invocations
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn record(&self, invocation: &AgentInvocation) {
        if let Ok(mut guard) = self.invocations.lock() {
            guard.push(invocation.clone());
        }
    }
}

impl ProcessLauncher for MockLauncher {
    fn launch(&self, invocation: &AgentInvocation) -> AppResult<i32> {
        self.record(invocation);
        Ok(self.exit_code)
    }

    fn capture(&self, invocation: &AgentInvocation) -> AppResult<CapturedOutput> {
        self.record(invocation);
        Ok(CapturedOutput {
            code: self.exit_code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        })
    }

    fn stream(
        &self,
        invocation: &AgentInvocation,
        on_line: &mut dyn FnMut(&str),
    ) -> AppResult<CapturedOutput> {
        self.record(invocation);
        for line in self.stdout.lines() {
            on_line(line);
        }
        Ok(CapturedOutput {
            code: self.exit_code,
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}
