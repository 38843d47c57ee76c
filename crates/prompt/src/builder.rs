//! Prompt builder: placeholder substitution on command file text.

use crate::lookup::FileLookup;
use crate::types::{BuiltPrompt, BuiltPromptMetadata, CommandFile, ARGUMENTS_TOKEN, CWD_TOKEN};
use prp_core::{AppError, AppResult};
use std::path::Path;

/// Read a resolved command file and substitute its placeholders.
///
/// # Arguments
/// * `lookup` - Source of the file contents
/// * `file` - The resolved command file
/// * `arguments` - Forwarded arguments, already joined with single spaces
/// * `cwd` - Invocation working directory
///
/// # Example
/// ```no_run
/// use prp_prompt::{build_prompt, resolve_command, CommandName, DiskLookup};
/// use prp_core::InvocationContext;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ctx = InvocationContext::from_dirs(".", Path::new("."), None);
/// let name = CommandName::parse("/review")?;
/// let file = resolve_command(&DiskLookup, &ctx, &name)?;
/// let built = build_prompt(&DiskLookup, &file, "src/main.rs", &ctx.cwd)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    lookup: &dyn FileLookup,
    file: &CommandFile,
    arguments: &str,
    cwd: &Path,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt from {:?}", file.path);

    let raw = lookup.read_to_string(&file.path)?;

    let cwd = cwd.to_str().ok_or_else(|| {
        AppError::Prompt(format!("Working directory is not valid UTF-8: {:?}", cwd))
    })?;

    let quoted_arguments = quote(arguments)?;
    let quoted_cwd = quote(cwd)?;

    let (text, arguments_replaced, cwd_replaced) =
        substitute(&raw, &quoted_arguments, &quoted_cwd);

    tracing::debug!(
        "Substituted {} argument and {} cwd placeholder(s)",
        arguments_replaced,
        cwd_replaced
    );

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            source_path: file.path.clone(),
            arguments_replaced,
            cwd_replaced,
        },
    })
}

/// Quote a value for POSIX shells. The empty string stays empty.
fn quote(value: &str) -> AppResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }

    shlex::try_quote(value)
        .map(|q| q.into_owned())
        .map_err(|e| AppError::Prompt(format!("Cannot quote {:?}: {}", value, e)))
}

/// Replace both placeholders in a single left-to-right pass.
///
/// Inserted values are never rescanned, so an argument containing `$CWD`
/// is left as typed. Returns the text and the count of each replacement.
fn substitute(text: &str, arguments: &str, cwd: &str) -> (String, usize, usize) {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut arguments_replaced = 0;
    let mut cwd_replaced = 0;

    loop {
        let next_args = rest.find(ARGUMENTS_TOKEN);
        let next_cwd = rest.find(CWD_TOKEN);

        let (at, token, value) = match (next_args, next_cwd) {
            (None, None) => break,
            (Some(a), Some(c)) if c < a => (c, CWD_TOKEN, cwd),
            (Some(a), _) => (a, ARGUMENTS_TOKEN, arguments),
            (None, Some(c)) => (c, CWD_TOKEN, cwd),
        };

        out.push_str(&rest[..at]);
        out.push_str(value);
        rest = &rest[at + token.len()..];

        if token == ARGUMENTS_TOKEN {
            arguments_replaced += 1;
        } else {
            cwd_replaced += 1;
        }
    }

    out.push_str(rest);
    (out, arguments_replaced, cwd_replaced)
}
