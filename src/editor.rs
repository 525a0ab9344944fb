// Editor-based composition.
// Launches the user's editor on a scratch file and returns what they wrote.

use std::env;
use std::fs;
use std::process::Command;

use crate::error::{ComixError, Result};

const FALLBACK_EDITOR: &str = "vi";

/// Compose free-form text in `$EDITOR`.
///
/// Blocks until the editor exits; the scratch file is removed afterwards.
pub fn compose_body() -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("comix-issue-")
        .suffix(".md")
        .tempfile()?;

    let editor = env::var("EDITOR").unwrap_or_else(|_| FALLBACK_EDITOR.to_string());
    let status = Command::new(&editor).arg(file.path()).status()?;
    if !status.success() {
        return Err(ComixError::Editor(format!("{editor} exited with {status}")));
    }

    Ok(fs::read_to_string(file.path())?)
}
