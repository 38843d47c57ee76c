//! PRP documents: locating a Product Requirement Prompt and wrapping it in
//! the workflow header handed to an agent driver.

use crate::lookup::FileLookup;
use prp_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Directory under the workspace that holds PRP documents.
pub const PRP_DIR: &str = "PRPs";

/// Workflow guidance prepended to every PRP.
pub const META_HEADER: &str = "Ingest and understand the Product Requirement Prompt (PRP) below in detail.

    # WORKFLOW GUIDANCE:

    ## Planning Phase
    - Think hard before you code. Create a comprehensive plan addressing all requirements.
    - Break down complex tasks into smaller, manageable steps.
    - Use the TodoWrite tool to create and track your implementation plan.
    - Identify implementation patterns from existing code to follow.

    ## Implementation Phase
    - Follow code conventions and patterns found in existing files.
    - Implement one component at a time and verify it works correctly.
    - Write clear, maintainable code with appropriate comments.
    - Consider error handling, edge cases, and potential security issues.
    - Use type hints to ensure type safety.

    ## Testing Phase
    - Test each component thoroughly as you build it.
    - Use the provided validation gates to verify your implementation.
    - Verify that all requirements have been satisfied.
    - Run the project tests when finished and output \"DONE\" when they pass.

    ## Example Implementation Approach:
    1. Analyze the PRP requirements in detail
    2. Search for and understand existing patterns in the codebase
    3. Search the Web and gather additional context and examples
    4. Create a step-by-step implementation plan with TodoWrite
    5. Implement core functionality first, then additional features
    6. Test and validate each component
    7. Ensure all validation gates pass

    ***When you are finished, move the completed PRP to the PRPs/completed folder***
    ";

/// How the user named the PRP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrpSource {
    /// Explicit path; relative paths are taken from the workspace
    Path(PathBuf),
    /// Feature key, resolved to `PRPs/<key>.md`
    Key(String),
}

impl PrpSource {
    /// Pick the source from the two mutually exclusive flags.
    ///
    /// An explicit path wins over a key.
    pub fn from_flags(path: Option<PathBuf>, key: Option<String>) -> AppResult<Self> {
        match (path, key) {
            (Some(path), _) => Ok(Self::Path(path)),
            (None, Some(key)) => Ok(Self::Key(key)),
            (None, None) => Err(AppError::Usage(
                "Must supply --prp or --prp-path".to_string(),
            )),
        }
    }
}

/// Resolve a PRP source to a file path under the workspace.
pub fn locate_prp(workspace: &Path, source: &PrpSource) -> PathBuf {
    match source {
        PrpSource::Path(path) if path.is_absolute() => path.clone(),
        PrpSource::Path(path) => workspace.join(path),
        PrpSource::Key(key) => workspace.join(PRP_DIR).join(format!("{}.md", key)),
    }
}

/// Load a PRP and prepend the workflow header.
pub fn build_prp_prompt(lookup: &dyn FileLookup, path: &Path) -> AppResult<String> {
    if !lookup.is_file(path) {
        return Err(AppError::Prompt(format!("PRP not found: {}", path.display())));
    }
    let body = lookup.read_to_string(path)?;

    tracing::info!("Loaded PRP {:?} ({} bytes)", path, body.len());

    Ok(format!("{}{}", META_HEADER, body))
}
