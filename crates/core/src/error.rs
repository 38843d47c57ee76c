//! Error types for the PRP command tool.
//!
//! This module defines a unified error enum that covers every failure the
//! tool can report: usage, command resolution, prompt I/O, agent launch,
//! configuration and serialization errors.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for the PRP command tool.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// Every variant is terminal for the current invocation.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed invocation (e.g. a command without the `/` delimiter)
    #[error("{0}")]
    Usage(String),

    /// No command file matched in any existing search root
    #[error("command '/{name}' not found; searched under {}", display_roots(.roots))]
    CommandNotFound { name: String, roots: Vec<PathBuf> },

    /// More than one command file matched
    #[error(
        "multiple matches for command '/{name}':\n{}\nrename or remove all but one",
        display_candidates(.candidates)
    )]
    AmbiguousCommand {
        name: String,
        candidates: Vec<PathBuf>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Prompt and PRP file errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// External agent launch errors
    #[error("Agent error: {0}")]
    Agent(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

fn display_roots(roots: &[PathBuf]) -> String {
    let rendered: Vec<String> = roots.iter().map(|r| r.display().to_string()).collect();
    match rendered.split_last() {
        None => "no search roots".to_string(),
        Some((only, [])) => only.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

fn display_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|c| format!("  {}", c.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_both_roots() {
        let err = AppError::CommandNotFound {
            name: "review".to_string(),
            roots: vec![
                PathBuf::from("/work/.codex/commands"),
                PathBuf::from("/home/me/.codex/commands"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "command '/review' not found; searched under /work/.codex/commands and /home/me/.codex/commands"
        );
    }

    #[test]
    fn test_not_found_single_root() {
        let err = AppError::CommandNotFound {
            name: "x".to_string(),
            roots: vec![PathBuf::from("/work/.codex/commands")],
        };
        assert!(err.to_string().ends_with("searched under /work/.codex/commands"));
    }

    #[test]
    fn test_ambiguous_lists_every_candidate() {
        let err = AppError::AmbiguousCommand {
            name: "plan".to_string(),
            candidates: vec![PathBuf::from("/a/plan.md"), PathBuf::from("/b/plan.txt")],
        };
        let msg = err.to_string();
        assert!(msg.contains("multiple matches for command '/plan'"));
        assert!(msg.contains("  /a/plan.md"));
        assert!(msg.contains("  /b/plan.txt"));
    }
}
