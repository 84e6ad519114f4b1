//! External editor invocation.
//!
//! The caller is responsible for closing the index handle and suspending
//! the terminal before calling in, and reopening both afterwards - the
//! editor may need exclusive access to files the index holds open.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// Run the configured editor command on `path` and wait for it to exit.
///
/// The first whitespace-separated word is the program, the rest become
/// leading arguments, and the file path is appended last.
pub fn run_editor(command: &str, path: &Path) -> Result<()> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("editor command is empty");
    };

    debug!(editor = program, path = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{program}'"))?;

    if !status.success() {
        bail!("editor exited with {status}");
    }
    Ok(())
}
