//! Agent drivers for `prp run`.
//!
//! A driver decides how a PRP prompt becomes a command line for a given
//! agent CLI family. The `noop` driver never spawns anything and prints a
//! canned transcript instead, for validating PRPs without an agent installed.

use crate::launcher::AgentInvocation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Tools granted to the claude CLI.
pub const CLAUDE_ALLOWED_TOOLS: &str = "Edit,Bash,Write,MultiEdit,NotebookEdit,WebFetch,Agent,LS,Grep,Read,NotebookRead,TodoRead,TodoWrite,WebSearch";

/// Marker printed by the noop driver.
pub const NOOP_MARKER: &str = "PRP TEST OK";

/// Agent CLI family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Codex,
    Claude,
    Noop,
}

impl Driver {
    /// Executable used when `--cli` is not given.
    pub fn default_cli(&self) -> Option<&'static str> {
        match self {
            Driver::Codex => Some("codex"),
            Driver::Claude => Some("claude"),
            Driver::Noop => None,
        }
    }
}

impl FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "codex" => Ok(Driver::Codex),
            "claude" => Ok(Driver::Claude),
            "noop" => Ok(Driver::Noop),
            _ => Err(format!(
                "Unknown driver: {} (expected 'codex', 'claude' or 'noop')",
                s
            )),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Driver::Codex => "codex",
            Driver::Claude => "claude",
            Driver::Noop => "noop",
        };
        f.write_str(name)
    }
}

/// Output format for headless runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "stream-json")]
    StreamJson,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "stream-json" => Ok(OutputFormat::StreamJson),
            _ => Err(format!(
                "Unknown output format: {} (expected 'text', 'json' or 'stream-json')",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::StreamJson => "stream-json",
        };
        f.write_str(name)
    }
}

/// Collapse a multi-line prompt into one line.
///
/// Each line is trimmed and the lines are joined with single spaces; the
/// codex CLI truncates positional prompts at the first newline.
pub fn flatten_prompt(prompt: &str) -> String {
    prompt
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Build the command line for a real driver.
///
/// Returns `None` for [`Driver::Noop`], which never spawns a process.
pub fn build_invocation(
    driver: Driver,
    cli: &str,
    interactive: bool,
    format: OutputFormat,
    prompt: &str,
) -> Option<AgentInvocation> {
    match driver {
        Driver::Codex => Some(AgentInvocation::new(cli).arg(flatten_prompt(prompt))),
        // Interactive claude also takes the prompt as its last positional
        // argument, so the session opens on the PRP instead of an empty
        // chat.
        Driver::Claude if interactive => Some(
            AgentInvocation::new(cli)
                .arg("--allowedTools")
                .arg(CLAUDE_ALLOWED_TOOLS)
                .arg(prompt),
        ),
        Driver::Claude => Some(
            AgentInvocation::new(cli)
                .arg("-p")
                .arg(prompt)
                .arg("--allowedTools")
                .arg(CLAUDE_ALLOWED_TOOLS)
                .arg("--output-format")
                .arg(format.to_string()),
        ),
        Driver::Noop => None,
    }
}

/// Lines printed by the noop driver, in order.
pub fn noop_transcript(interactive: bool, format: OutputFormat, prompt: &str) -> Vec<String> {
    if interactive {
        return vec![
            "[noop] Interactive session start.\n".to_string(),
            prompt.to_string(),
            format!("\n[noop] {}", NOOP_MARKER),
        ];
    }

    match format {
        OutputFormat::StreamJson => vec![
            serde_json::json!({"type": "system", "subtype": "init", "session_id": "noop-session"}),
            serde_json::json!({"type": "assistant", "message": {"content": "Reading PRP..."}}),
            serde_json::json!({"type": "assistant", "message": {"content": NOOP_MARKER}}),
            serde_json::json!({
                "type": "result",
                "subtype": "success",
                "result": NOOP_MARKER,
                "cost_usd": 0.0,
                "duration_ms": 1,
                "num_turns": 1
            }),
        ]
        .into_iter()
        .map(|event| event.to_string())
        .collect(),
        OutputFormat::Json => vec![serde_json::json!({
            "type": "result",
            "subtype": "success",
            "result": NOOP_MARKER,
            "is_error": false,
            "cost_usd": 0.0,
            "duration_ms": 1,
            "session_id": "noop-session"
        })
        .to_string()],
        OutputFormat::Text => vec![NOOP_MARKER.to_string()],
    }
}

/// Find an executable on `PATH` (or accept an existing path as-is).
pub fn resolve_cli(cli: &str) -> Option<PathBuf> {
    match which::which(cli) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::debug!("Could not resolve '{}' on PATH: {}", cli, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_parsing() {
        assert_eq!("codex".parse::<Driver>().unwrap(), Driver::Codex);
        assert_eq!("Claude".parse::<Driver>().unwrap(), Driver::Claude);
        assert_eq!("noop".parse::<Driver>().unwrap(), Driver::Noop);
        assert!("gemini".parse::<Driver>().is_err());
    }

    #[test]
    fn test_default_cli() {
        assert_eq!(Driver::Codex.default_cli(), Some("codex"));
        assert_eq!(Driver::Claude.default_cli(), Some("claude"));
        assert_eq!(Driver::Noop.default_cli(), None);
    }

    #[test]
    fn test_output_format_names() {
        for name in ["text", "json", "stream-json"] {
            assert_eq!(name.parse::<OutputFormat>().unwrap().to_string(), name);
        }
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_flatten_prompt() {
        assert_eq!(flatten_prompt("  a \n\n b\n  c  "), "a  b c");
        assert_eq!(flatten_prompt("single"), "single");
    }

    #[test]
    fn test_codex_invocation_flattens() {
        let inv = build_invocation(Driver::Codex, "codex", false, OutputFormat::Json, "x\ny").unwrap();
        assert_eq!(inv.program, "codex");
        assert_eq!(inv.args, vec!["x y"]);
    }

    #[test]
    fn test_claude_headless_invocation() {
        let inv =
            build_invocation(Driver::Claude, "claude", false, OutputFormat::StreamJson, "go").unwrap();
        assert_eq!(
            inv.args,
            vec![
                "-p",
                "go",
                "--allowedTools",
                CLAUDE_ALLOWED_TOOLS,
                "--output-format",
                "stream-json"
            ]
        );
    }

    #[test]
    fn test_claude_interactive_passes_prompt() {
        let inv = build_invocation(Driver::Claude, "claude", true, OutputFormat::Text, "go").unwrap();
        assert_eq!(inv.args, vec!["--allowedTools", CLAUDE_ALLOWED_TOOLS, "go"]);
    }

    #[test]
    fn test_noop_has_no_invocation() {
        assert!(build_invocation(Driver::Noop, "", false, OutputFormat::Text, "x").is_none());
    }

    #[test]
    fn test_noop_transcripts() {
        assert_eq!(noop_transcript(false, OutputFormat::Text, "p"), vec![NOOP_MARKER]);

        let stream = noop_transcript(false, OutputFormat::StreamJson, "p");
        assert_eq!(stream.len(), 4);
        assert!(stream[0].starts_with("{\"type\":\"system\",\"subtype\":\"init\""));
        let last: serde_json::Value = serde_json::from_str(&stream[3]).unwrap();
        assert_eq!(last["subtype"], "success");

        let json = noop_transcript(false, OutputFormat::Json, "p");
        let doc: serde_json::Value = serde_json::from_str(&json[0]).unwrap();
        assert_eq!(doc["result"], NOOP_MARKER);

        let interactive = noop_transcript(true, OutputFormat::Json, "the prompt");
        assert_eq!(interactive[1], "the prompt");
    }
}
