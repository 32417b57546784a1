//! Locating and extracting the tool binary from a release tarball.
//!
//! Release archives are gzip-compressed tars containing the anvs binary and
//! whatever else the release pipeline bundles (README, LICENSE). Only the
//! binary entry matters here; everything else is skipped in place.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur extracting the binary from a release archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("entry {entry:?} not found in archive {}", path.display())]
  EntryNotFound { entry: String, path: PathBuf },

  #[error("failed to read archive {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Extract the entry named `entry_name` from a tar.gz archive to `dest`.
///
/// The archive is streamed; entries other than `entry_name` are skipped
/// without being written anywhere (advancing the entry iterator keeps the
/// tar cursor valid past unread bodies). The extracted file gets executable
/// permissions on Unix.
///
/// Fails with [`ArchiveError::EntryNotFound`] if the archive ends without
/// the entry — a release payload without the binary is malformed, never a
/// silent success.
pub fn extract_entry(archive_path: &Path, entry_name: &str, dest: &Path) -> Result<(), ArchiveError> {
  let read_err = |source| ArchiveError::Read {
    path: archive_path.to_path_buf(),
    source,
  };
  let write_err = |source| ArchiveError::Write {
    path: dest.to_path_buf(),
    source,
  };

  let file = File::open(archive_path).map_err(read_err)?;
  let decoder = GzDecoder::new(BufReader::new(file));
  let mut archive = Archive::new(decoder);

  for entry in archive.entries().map_err(read_err)? {
    let mut entry = entry.map_err(read_err)?;
    let entry_path = entry.path().map_err(read_err)?;

    if entry_path.as_ref() != Path::new(entry_name) {
      continue;
    }

    if let Some(parent) = dest.parent() {
      fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut out = File::create(dest).map_err(write_err)?;
    let bytes = io::copy(&mut entry, &mut out).map_err(write_err)?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(dest, fs::Permissions::from_mode(0o755)).map_err(write_err)?;
    }

    debug!(entry = entry_name, bytes, path = ?dest, "extracted binary");
    return Ok(());
  }

  Err(ArchiveError::EntryNotFound {
    entry: entry_name.to_string(),
    path: archive_path.to_path_buf(),
  })
}
