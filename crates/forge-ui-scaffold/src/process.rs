//! Executable lookup for the subprocess-backed collaborators

use crate::error::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Resolve `program` through PATH, honoring PATHEXT on Windows
///
/// Callers spawn the returned path, never the bare name, so `.cmd` shims
/// such as `npm.cmd` run as well.
pub(crate) fn resolve_program(program: &str) -> Result<PathBuf> {
    let path = which::which(program).map_err(|_| Error::command_not_found(program))?;
    debug!("Resolved {} to {}", program, path.display());
    Ok(path)
}
