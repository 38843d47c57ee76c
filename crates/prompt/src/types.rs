//! Prompt types for the PRP command tool.
//!
//! This module defines the domain entities of command resolution and the
//! fixed constants the resolver matches against.

use prp_core::{AppError, AppResult, RootScope};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Leading character of a command reference (`/name`).
pub const COMMAND_DELIMITER: char = '/';

/// Extensions accepted for command files: markdown, plain text, prompt.
pub const COMMAND_EXTENSIONS: [&str; 3] = ["md", "txt", "prompt"];

/// Replaced by the forwarded arguments.
pub const ARGUMENTS_TOKEN: &str = "$ARGUMENTS";

/// Replaced by the invocation working directory.
pub const CWD_TOKEN: &str = "$CWD";

/// Usage hint printed for malformed invocations.
pub const USAGE: &str = "usage: prp /<command> [args...]\n       prp --list";

/// A validated command name (delimiter already stripped).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CommandName(String);

impl CommandName {
    /// Parse a user-facing token such as `/review`.
    ///
    /// Fails with a usage error when the delimiter is missing or nothing
    /// follows it.
    pub fn parse(token: &str) -> AppResult<Self> {
        let name = token.strip_prefix(COMMAND_DELIMITER).ok_or_else(|| {
            AppError::Usage(format!(
                "command must start with '{}': {}\n{}",
                COMMAND_DELIMITER, token, USAGE
            ))
        })?;

        if name.is_empty() {
            return Err(AppError::Usage(format!("missing command name\n{}", USAGE)));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` is a command file for this name.
    pub fn matches(&self, path: &Path) -> bool {
        command_stem(path).is_some_and(|stem| stem == self.0)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COMMAND_DELIMITER, self.0)
    }
}

/// Extension-stripped file name, if the extension is accepted.
pub fn command_stem(path: &Path) -> Option<&str> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    if !COMMAND_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem().and_then(|s| s.to_str())
}

/// The single file a command name resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFile {
    /// Name the file was resolved for
    pub name: CommandName,

    /// Full path of the file
    pub path: PathBuf,

    /// Tier of the root it was found under
    pub scope: RootScope,
}

/// Prompt text with placeholders substituted, ready to hand to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltPrompt {
    /// Final text
    pub text: String,

    /// Metadata about the substitution
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltPromptMetadata {
    /// File the text came from
    #[serde(rename = "sourcePath")]
    pub source_path: PathBuf,

    /// Number of `$ARGUMENTS` occurrences replaced
    #[serde(rename = "argumentsReplaced")]
    pub arguments_replaced: usize,

    /// Number of `$CWD` occurrences replaced
    #[serde(rename = "cwdReplaced")]
    pub cwd_replaced: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_delimiter() {
        let name = CommandName::parse("/review-pr").unwrap();
        assert_eq!(name.as_str(), "review-pr");
        assert_eq!(name.to_string(), "/review-pr");
    }

    #[test]
    fn test_parse_requires_delimiter() {
        let err = CommandName::parse("foo").unwrap_err();
        assert!(matches!(err, AppError::Usage(_)));
        assert!(err.to_string().contains("usage: prp"));
    }

    #[test]
    fn test_parse_rejects_bare_delimiter() {
        assert!(matches!(CommandName::parse("/"), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_command_stem_filters_extensions() {
        assert_eq!(command_stem(Path::new("/r/a.md")), Some("a"));
        assert_eq!(command_stem(Path::new("/r/a.txt")), Some("a"));
        assert_eq!(command_stem(Path::new("/r/b.prompt")), Some("b"));
        assert_eq!(command_stem(Path::new("/r/c.yaml")), None);
        assert_eq!(command_stem(Path::new("/r/README")), None);
    }

    #[test]
    fn test_matches_uses_stem_only() {
        let name = CommandName::parse("/plan").unwrap();
        assert!(name.matches(Path::new("/root/nested/plan.md")));
        assert!(!name.matches(Path::new("/root/plan.rs")));
        assert!(!name.matches(Path::new("/root/planner.md")));
    }
}
