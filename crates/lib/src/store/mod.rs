//! Versioned on-disk store for installed anvs binaries.
//!
//! Layout:
//! ```text
//! <root>/
//! ├── versions/v<semver>/
//! │   ├── bin/anvs          # The versioned binary
//! │   └── lib/anvs.sh, anvs.ps1
//! ├── bin/anvs              # Symlink → current version's binary
//! ├── current               # Symlink → versions/v<semver>
//! ├── cache/                # Download staging area
//! └── .lock                 # Advisory lock file
//! ```
//!
//! An install walks Provisioning → Committing → Pruning. Provisioning only
//! writes inside the new version's own directory; Committing repoints the
//! two shared symlinks via create-under-temporary-name + rename, so no
//! observer ever sees `current` absent or dangling; Pruning is best-effort.
//! An abort at any stage leaves the previously committed version reachable.

pub mod lock;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use semver::Version;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts::{RETAIN_VERSIONS, TOOL_NAME};
use crate::templates;

/// Errors that can occur mutating the version store.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to install binary at {}: {source}", path.display())]
  CopyBinary {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  WriteScript {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to create symlink {} -> {}: {source}", link.display(), target.display())]
  Symlink {
    link: PathBuf,
    target: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to commit symlink {}: {source}", link.display())]
  CommitRename {
    link: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read versions directory {}: {source}", path.display())]
  ReadVersions {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove store root {}: {source}", path.display())]
  RemoveRoot {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// One installed version: its directory and the well-known files inside it.
#[derive(Debug, Clone)]
pub struct VersionRecord {
  pub version: Version,
  pub dir: PathBuf,
}

impl VersionRecord {
  /// Path of the versioned binary, `<dir>/bin/anvs`.
  pub fn bin_path(&self) -> PathBuf {
    self.dir.join("bin").join(TOOL_NAME)
  }

  /// Directory holding the shell-glue scripts, `<dir>/lib`.
  pub fn lib_dir(&self) -> PathBuf {
    self.dir.join("lib")
  }
}

/// Counters from a pruning pass.
#[derive(Debug, Default)]
pub struct PruneStats {
  pub scanned: usize,
  pub deleted: usize,
}

/// The versioned store rooted at a single directory (normally `~/.anvs`).
pub struct VersionStore {
  root: PathBuf,
}

impl VersionStore {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn versions_dir(&self) -> PathBuf {
    self.root.join("versions")
  }

  fn version_dir(&self, version: &Version) -> PathBuf {
    self.versions_dir().join(format!("v{version}"))
  }

  /// The `current` symlink, pointing at the committed version directory.
  pub fn current_link(&self) -> PathBuf {
    self.root.join("current")
  }

  /// The global binary symlink, `<root>/bin/anvs`.
  pub fn bin_link(&self) -> PathBuf {
    self.root.join("bin").join(TOOL_NAME)
  }

  /// Download staging area inside the store.
  pub fn cache_dir(&self) -> PathBuf {
    self.root.join("cache")
  }

  /// Provision a version directory from a verified binary.
  ///
  /// Everything lands inside `versions/v<version>/`; the shared pointers are
  /// untouched, so a failure here never affects the committed version.
  /// Re-provisioning an existing version overwrites it in place.
  pub fn provision(&self, version: &Version, binary: &Path) -> Result<VersionRecord, StoreError> {
    let record = VersionRecord {
      version: version.clone(),
      dir: self.version_dir(version),
    };

    let bin_dir = record.dir.join("bin");
    let lib_dir = record.lib_dir();
    for dir in [&bin_dir, &lib_dir] {
      fs::create_dir_all(dir).map_err(|e| StoreError::CreateDir {
        path: dir.clone(),
        source: e,
      })?;
    }

    let bin_dest = record.bin_path();
    fs::copy(binary, &bin_dest).map_err(|e| StoreError::CopyBinary {
      path: bin_dest.clone(),
      source: e,
    })?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      fs::set_permissions(&bin_dest, fs::Permissions::from_mode(0o755)).map_err(|e| {
        StoreError::CopyBinary {
          path: bin_dest.clone(),
          source: e,
        }
      })?;
    }

    for (name, content) in [
      (format!("{TOOL_NAME}.sh"), templates::POSIX_GLUE),
      (format!("{TOOL_NAME}.ps1"), templates::POWERSHELL_GLUE),
    ] {
      let path = lib_dir.join(name);
      fs::write(&path, content).map_err(|e| StoreError::WriteScript { path, source: e })?;
    }

    debug!(version = %version, dir = ?record.dir, "provisioned version directory");
    Ok(record)
  }

  /// Commit a provisioned version by repointing the shared symlinks.
  ///
  /// Both updates go through [`replace_symlink`]: the new link is created
  /// under a temporary name and renamed over the old one, so `current` and
  /// `bin/anvs` are replaced atomically and are never observably missing.
  pub fn commit(&self, record: &VersionRecord) -> Result<(), StoreError> {
    let bin_dir = self.root.join("bin");
    fs::create_dir_all(&bin_dir).map_err(|e| StoreError::CreateDir {
      path: bin_dir,
      source: e,
    })?;

    replace_symlink(&record.bin_path(), &self.bin_link())?;
    replace_symlink(&record.dir, &self.current_link())?;

    info!(version = %record.version, "committed");
    Ok(())
  }

  /// List installed versions, newest first.
  ///
  /// Ordering is the `semver` crate's numeric (major, minor, patch) tuple
  /// comparison, never string collation. Directory names that do not parse
  /// as `v<semver>` are skipped with a warning and left alone.
  pub fn list_versions(&self) -> Result<Vec<VersionRecord>, StoreError> {
    let versions_dir = self.versions_dir();
    if !versions_dir.exists() {
      return Ok(Vec::new());
    }

    let entries = fs::read_dir(&versions_dir).map_err(|e| StoreError::ReadVersions {
      path: versions_dir.clone(),
      source: e,
    })?;

    let mut records = Vec::new();
    for entry in entries.flatten() {
      let path = entry.path();
      if !path.is_dir() {
        continue;
      }

      let name = entry.file_name();
      let parsed = name
        .to_str()
        .and_then(|n| n.strip_prefix('v'))
        .and_then(|n| Version::parse(n).ok());

      match parsed {
        Some(version) => records.push(VersionRecord { version, dir: path }),
        None => warn!(path = ?path, "skipping entry that is not a v<semver> directory"),
      }
    }

    records.sort_by(|a, b| b.version.cmp(&a.version));
    Ok(records)
  }

  /// Delete all but the newest [`RETAIN_VERSIONS`] versions.
  ///
  /// The version `current` points at is always retained regardless of its
  /// position in the ordering: a downgrade install commits the lowest
  /// semver, and pruning it would leave `current` and `bin/anvs` dangling.
  ///
  /// Each deletion is best-effort: one stale version failing to delete is
  /// logged and does not stop the others, and never fails the install.
  pub fn prune(&self) -> Result<PruneStats, StoreError> {
    let records = self.list_versions()?;
    let committed = fs::read_link(self.current_link()).ok();
    let mut stats = PruneStats {
      scanned: records.len(),
      deleted: 0,
    };

    for stale in records.iter().skip(RETAIN_VERSIONS) {
      if committed.as_deref() == Some(stale.dir.as_path()) {
        debug!(version = %stale.version, "retaining committed version");
        continue;
      }
      match fs::remove_dir_all(&stale.dir) {
        Ok(()) => {
          debug!(version = %stale.version, "pruned stale version");
          stats.deleted += 1;
        }
        Err(e) => {
          warn!(version = %stale.version, error = %e, "failed to prune stale version, continuing");
        }
      }
    }

    Ok(stats)
  }

  /// Remove the entire store root. A missing root is a no-op.
  ///
  /// Returns whether anything was removed.
  pub fn destroy(&self) -> Result<bool, StoreError> {
    if !self.root.exists() {
      return Ok(false);
    }

    fs::remove_dir_all(&self.root).map_err(|e| StoreError::RemoveRoot {
      path: self.root.clone(),
      source: e,
    })?;

    info!(root = ?self.root, "removed store root");
    Ok(true)
  }
}

/// Atomically repoint `link` at `target`.
///
/// The replacement link is created under a temporary sibling name and then
/// renamed over `link`. Rename is atomic on POSIX filesystems, so `link`
/// always resolves either to the old target or the new one — never to
/// nothing. Delete-then-create would open exactly that window.
fn replace_symlink(target: &Path, link: &Path) -> Result<(), StoreError> {
  let file_name = link
    .file_name()
    .and_then(|n| n.to_str())
    .unwrap_or("link");
  let staged = link.with_file_name(format!(".{file_name}.tmp"));

  // Leftover from an interrupted earlier run
  if staged.symlink_metadata().is_ok() {
    let _ = fs::remove_file(&staged);
  }

  make_symlink(target, &staged).map_err(|e| StoreError::Symlink {
    link: staged.clone(),
    target: target.to_path_buf(),
    source: e,
  })?;

  #[cfg(windows)]
  if link.symlink_metadata().is_ok() {
    // Windows rename does not replace an existing destination
    let _ = fs::remove_file(link);
  }

  fs::rename(&staged, link).map_err(|e| StoreError::CommitRename {
    link: link.to_path_buf(),
    source: e,
  })?;

  debug!(link = ?link, target = ?target, "symlink updated");
  Ok(())
}

#[cfg(unix)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_symlink(target: &Path, link: &Path) -> io::Result<()> {
  if target.is_dir() {
    std::os::windows::fs::symlink_dir(target, link)
  } else {
    std::os::windows::fs::symlink_file(target, link)
  }
}
