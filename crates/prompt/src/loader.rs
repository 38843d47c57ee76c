//! Command loader: listing and resolving command files across search roots.

use crate::lookup::FileLookup;
use crate::types::{command_stem, CommandFile, CommandName};
use prp_core::{AppError, AppResult, InvocationContext};
use std::collections::BTreeSet;

/// List all available command names across the search roots.
///
/// Roots that do not exist are skipped. Names are extension-stripped,
/// deduplicated and sorted; an empty result is not an error.
///
/// # Example
/// ```no_run
/// use prp_core::InvocationContext;
/// use prp_prompt::{list_commands, DiskLookup};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ctx = InvocationContext::from_dirs(".", Path::new("."), None);
/// for name in list_commands(&DiskLookup, &ctx)? {
///     println!("{}", name);
/// }
/// # Ok(())
/// # }
/// ```
pub fn list_commands(lookup: &dyn FileLookup, ctx: &InvocationContext) -> AppResult<Vec<String>> {
    let mut names = BTreeSet::new();

    for root in &ctx.roots {
        if !lookup.is_dir(&root.path) {
            tracing::debug!("Skipping missing root: {:?}", root.path);
            continue;
        }

        for path in lookup.list_files(&root.path)? {
            if let Some(stem) = command_stem(&path) {
                names.insert(stem.to_string());
            }
        }
    }

    Ok(names.into_iter().collect())
}

/// Resolve a command name to exactly one file.
///
/// Every existing root is searched; matches accumulate in root priority
/// order. Zero matches and more than one match are both errors, so a
/// project file never silently shadows a user file of the same name.
pub fn resolve_command(
    lookup: &dyn FileLookup,
    ctx: &InvocationContext,
    name: &CommandName,
) -> AppResult<CommandFile> {
    let mut candidates = Vec::new();

    for root in &ctx.roots {
        if !lookup.is_dir(&root.path) {
            continue;
        }

        for path in lookup.list_files(&root.path)? {
            if name.matches(&path) {
                tracing::debug!("Candidate for {}: {:?}", name, path);
                candidates.push((path, root.scope));
            }
        }
    }

    match candidates.len() {
        0 => Err(AppError::CommandNotFound {
            name: name.as_str().to_string(),
            roots: ctx.root_paths(),
        }),
        1 => {
            let (path, scope) = candidates.remove(0);
            tracing::info!("Resolved {} to {:?}", name, path);
            Ok(CommandFile {
                name: name.clone(),
                path,
                scope,
            })
        }
        _ => Err(AppError::AmbiguousCommand {
            name: name.as_str().to_string(),
            candidates: candidates.into_iter().map(|(path, _)| path).collect(),
        }),
    }
}
