//! Invocation context: the working directory and the ordered search roots.
//!
//! Nothing in the resolver reads the process environment directly. The
//! context is built once per run and passed down explicitly.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Sub-path joined onto both the project directory and the home directory.
pub const COMMANDS_SUBDIR: &str = ".codex/commands";

/// Which tier a search root belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootScope {
    /// `<workspace>/.codex/commands`
    Project,
    /// `~/.codex/commands`
    User,
}

/// A directory tree scanned for command files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRoot {
    pub scope: RootScope,
    pub path: PathBuf,
}

/// Everything the resolver needs to know about the current invocation.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    /// Directory substituted for the working-directory placeholder
    pub cwd: PathBuf,

    /// Search roots in priority order (project first)
    pub roots: Vec<SearchRoot>,
}

impl InvocationContext {
    pub fn new(cwd: impl Into<PathBuf>, roots: Vec<SearchRoot>) -> Self {
        Self {
            cwd: cwd.into(),
            roots,
        }
    }

    /// Build the standard two-tier root list.
    ///
    /// The user root is omitted when no home directory is known.
    pub fn from_dirs(cwd: impl Into<PathBuf>, project: &Path, home: Option<&Path>) -> Self {
        let mut roots = vec![SearchRoot {
            scope: RootScope::Project,
            path: project.join(COMMANDS_SUBDIR),
        }];

        if let Some(home) = home {
            roots.push(SearchRoot {
                scope: RootScope::User,
                path: home.join(COMMANDS_SUBDIR),
            });
        }

        Self::new(cwd, roots)
    }

    /// Root paths in priority order, used for error reporting.
    pub fn root_paths(&self) -> Vec<PathBuf> {
        self.roots.iter().map(|r| r.path.clone()).collect()
    }
}
