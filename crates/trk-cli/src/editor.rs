//! Blocking round trip through the user's text editor.

use std::env;
use std::io::Write as _;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tempfile::NamedTempFile;

/// Writes `initial` to a temp file, opens it in the user's editor, and
/// returns the file's contents after the editor exits.
///
/// The editor is `$VISUAL`, then `$EDITOR`, then `vim`. The call blocks
/// until the editing session ends; there is no timeout.
pub fn edit_string(initial: &str) -> Result<String> {
    let mut file = NamedTempFile::new().context("failed to create temp file for editor")?;
    file.write_all(initial.as_bytes())
        .context("failed to write temp file for editor")?;
    file.flush().context("failed to flush temp file for editor")?;

    let editor = env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| "vim".to_owned());
    tracing::debug!(%editor, path = %file.path().display(), "launching editor");

    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("failed to launch editor {editor}"))?;
    if !status.success() {
        bail!("editor {editor} exited with {status}; nothing was saved");
    }

    // Re-read by path: some editors replace the file rather than write
    // into it.
    let edited = std::fs::read_to_string(file.path())
        .context("failed to read temp file back after editing")?;
    Ok(edited)
}
