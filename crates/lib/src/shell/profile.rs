//! Marker-delimited managed blocks in shell profile files.
//!
//! The region between [`MARKER_START`] and [`MARKER_END`] is owned entirely
//! by the installer and always rewritten as a unit, so repeated installs
//! converge to one block and uninstall removes exactly what install added.
//! Editing is line-based with explicit `\n` handling: CRLF input is
//! normalized to LF on the first rewrite rather than handled implicitly.
//!
//! A profile containing duplicated or nested marker pairs is outside the
//! contract; only the first block is recognized.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{MARKER_END, MARKER_START};

/// Errors that can occur editing a profile file.
#[derive(Debug, Error)]
pub enum ProfileError {
  #[error("failed to read profile {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write profile {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Whether `remove_block` found anything to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
  Removed,
  NotPresent,
}

/// Insert or replace the managed block in `path`, wrapping `body` in the
/// marker pair.
///
/// Any existing block is stripped first, so calling this repeatedly (or
/// across installer versions) leaves exactly one block with the current
/// content. An absent file is created, provided its directory exists.
pub fn install_block(path: &Path, body: &str) -> Result<(), ProfileError> {
  let existing = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
    Err(e) => {
      return Err(ProfileError::Read {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  let mut content = strip_block(&existing).unwrap_or(existing);

  if !content.is_empty() && !content.ends_with('\n') {
    content.push('\n');
  }
  if !content.is_empty() {
    // Blank separator line between user content and the block
    content.push('\n');
  }

  content.push_str(MARKER_START);
  content.push('\n');
  content.push_str(body.trim());
  content.push('\n');
  content.push_str(MARKER_END);
  content.push('\n');

  fs::write(path, content).map_err(|e| ProfileError::Write {
    path: path.to_path_buf(),
    source: e,
  })?;

  info!(path = ?path, "shell integration installed");
  Ok(())
}

/// Remove the managed block from `path`, if present.
///
/// An absent file or a file without the start marker is a no-op.
pub fn remove_block(path: &Path) -> Result<RemoveOutcome, ProfileError> {
  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RemoveOutcome::NotPresent),
    Err(e) => {
      return Err(ProfileError::Read {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  let Some(stripped) = strip_block(&content) else {
    debug!(path = ?path, "no managed block present");
    return Ok(RemoveOutcome::NotPresent);
  };

  fs::write(path, stripped).map_err(|e| ProfileError::Write {
    path: path.to_path_buf(),
    source: e,
  })?;

  info!(path = ?path, "shell integration removed");
  Ok(RemoveOutcome::Removed)
}

/// Remove the first managed block from `content`.
///
/// Returns `None` when no start marker is present. Drops every line from
/// the start marker through the end marker inclusive, plus the single blank
/// separator line install put before the block, so install-then-remove
/// round-trips the original content up to trailing-newline normalization.
fn strip_block(content: &str) -> Option<String> {
  if !content.contains(MARKER_START) {
    return None;
  }

  let mut kept: Vec<&str> = Vec::new();
  let mut in_block = false;

  for line in content.lines() {
    let trimmed = line.trim_end_matches('\r');

    if !in_block && trimmed == MARKER_START {
      in_block = true;
      if kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
      }
      continue;
    }

    if in_block {
      if trimmed == MARKER_END {
        in_block = false;
      }
      continue;
    }

    kept.push(line);
  }

  let mut out = kept.join("\n");
  if !out.is_empty() {
    out.push('\n');
  }
  Some(out)
}
