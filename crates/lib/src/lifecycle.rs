//! End-to-end install and uninstall orchestration.
//!
//! Install walks a linear state machine — Resolving → Provisioning →
//! Committing → Pruning — under one exclusive store lock. Each stage either
//! fails before shared state is touched or mutates it atomically, so an
//! abort at any point leaves the previously committed version (if any)
//! fully reachable. Uninstall is the reverse sweep: profiles, store root,
//! config file, each step convergent when repeated.

use std::fs;
use std::path::PathBuf;

use semver::Version;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::archive::{self, ArchiveError};
use crate::consts::TOOL_NAME;
use crate::fetch::{self, FetchError};
use crate::platform::{PlatformError, ReleaseTarget, paths};
use crate::shell::profile::{self, ProfileError, RemoveOutcome};
use crate::shell::{self, Shell};
use crate::store::lock::{LockError, StoreLock};
use crate::store::{StoreError, VersionStore};
use crate::templates;
use crate::verify::{self, VerifyError};

/// Any fatal error from an install or uninstall run.
///
/// Each variant is transparent over the failing stage's own error, so the
/// user-facing message is the stage message itself.
#[derive(Debug, Error)]
pub enum SetupError {
  #[error("invalid version {version:?}: {source}")]
  InvalidVersion {
    version: String,
    source: semver::Error,
  },

  #[error(transparent)]
  Platform(#[from] PlatformError),

  #[error(transparent)]
  Lock(#[from] LockError),

  #[error(transparent)]
  Fetch(#[from] FetchError),

  #[error(transparent)]
  Verify(#[from] VerifyError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Profile(#[from] ProfileError),
}

/// Summary of a successful install.
#[derive(Debug)]
pub struct InstallReport {
  pub version: Version,
  pub target: ReleaseTarget,
  pub store_root: PathBuf,
  pub profile: PathBuf,
  pub pruned: usize,
}

/// Summary of a successful uninstall.
#[derive(Debug)]
pub struct UninstallReport {
  pub profiles_cleaned: Vec<PathBuf>,
  pub store_removed: bool,
  pub config_removed: bool,
}

impl UninstallReport {
  /// True when there was nothing at all to clean up.
  pub fn was_noop(&self) -> bool {
    self.profiles_cleaned.is_empty() && !self.store_removed && !self.config_removed
  }
}

/// Install (or upgrade to) the given release version.
pub fn install(version_str: &str) -> Result<InstallReport, SetupError> {
  // Resolving: everything that can fail before any mutation
  let version = Version::parse(version_str.trim_start_matches('v')).map_err(|e| {
    SetupError::InvalidVersion {
      version: version_str.to_string(),
      source: e,
    }
  })?;
  let target = ReleaseTarget::current()?;
  let home = paths::home_dir()?;
  let root = paths::store_root()?;
  let store = VersionStore::new(&root);

  info!(version = %version, target = %target, root = ?root, "installing anvs");

  // One exclusive lock spans every mutation, including the profile edit
  let _lock = StoreLock::acquire(&root, "install")?;

  let cache_dir = store.cache_dir();
  let artifact = fetch::fetch_release(target, &version, &cache_dir)?;
  verify::verify(&artifact.tarball_path, &artifact.checksum_text)?;

  let staged_binary = cache_dir.join(TOOL_NAME);
  archive::extract_entry(&artifact.tarball_path, TOOL_NAME, &staged_binary)?;

  // Provisioning → Committing → Pruning
  let record = store.provision(&version, &staged_binary)?;
  store.commit(&record)?;
  let pruned = store.prune()?.deleted;

  // Staging leftovers are cache, not state; removal is best-effort
  for leftover in [&staged_binary, &artifact.tarball_path] {
    if let Err(e) = fs::remove_file(leftover) {
      debug!(path = ?leftover, error = %e, "could not remove staging file");
    }
  }

  let shell = Shell::detect();
  let profile_path = shell::profile_for_install(shell, &home);
  profile::install_block(&profile_path, templates::INTEGRATION_BLOCK)?;

  info!(version = %version, "install complete");
  Ok(InstallReport {
    version,
    target,
    store_root: root,
    profile: profile_path,
    pruned,
  })
}

/// Remove every trace of anvs: profile blocks, the version store, and the
/// configuration file.
pub fn uninstall() -> Result<UninstallReport, SetupError> {
  let home = paths::home_dir()?;
  let root = paths::store_root()?;

  info!(root = ?root, "uninstalling anvs");

  // Acquiring the lock creates the root if absent; remember what was
  // actually installed so the report stays truthful.
  let had_store = root.exists();

  // The lock guards profile edits against a concurrent install. It lives
  // inside the store root, so it is dropped before the root itself goes.
  let lock = StoreLock::acquire(&root, "uninstall")?;

  let mut profiles_cleaned = Vec::new();
  for profile_path in Shell::all_profile_files(&home) {
    match profile::remove_block(&profile_path) {
      Ok(RemoveOutcome::Removed) => profiles_cleaned.push(profile_path),
      Ok(RemoveOutcome::NotPresent) => {}
      Err(e) => {
        warn!(path = ?profile_path, error = %e, "failed to clean profile, continuing");
      }
    }
  }

  drop(lock);
  VersionStore::new(&root).destroy()?;
  let store_removed = had_store;

  let config = paths::config_file()?;
  let config_removed = match fs::remove_file(&config) {
    Ok(()) => true,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
    Err(e) => {
      warn!(path = ?config, error = %e, "failed to remove config file, continuing");
      false
    }
  };

  info!("uninstall complete");
  Ok(UninstallReport {
    profiles_cleaned,
    store_removed,
    config_removed,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  #[test]
  #[serial]
  fn uninstall_on_a_clean_home_is_a_noop() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().to_str().unwrap().to_string();

    temp_env::with_vars(
      [
        ("HOME", Some(home.as_str())),
        (crate::consts::STORE_ENV_VAR, None),
      ],
      || {
        let report = uninstall().unwrap();
        assert!(report.was_noop());
        // The lock file briefly recreated the root; it must be gone again
        assert!(!temp.path().join(".anvs").exists());
      },
    );
  }

  #[test]
  #[serial]
  fn uninstall_twice_converges() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().to_str().unwrap().to_string();

    temp_env::with_vars(
      [
        ("HOME", Some(home.as_str())),
        (crate::consts::STORE_ENV_VAR, None),
      ],
      || {
        std::fs::create_dir_all(temp.path().join(".anvs").join("versions")).unwrap();
        std::fs::write(temp.path().join(".anvsrc"), "version: 1\n").unwrap();
        std::fs::write(
          temp.path().join(".zshrc"),
          format!(
            "# mine\n\n{}\nblock\n{}\n",
            crate::consts::MARKER_START,
            crate::consts::MARKER_END
          ),
        )
        .unwrap();

        let first = uninstall().unwrap();
        assert!(first.store_removed);
        assert!(first.config_removed);
        assert_eq!(first.profiles_cleaned.len(), 1);

        let second = uninstall().unwrap();
        assert!(second.was_noop());

        assert_eq!(
          std::fs::read_to_string(temp.path().join(".zshrc")).unwrap(),
          "# mine\n"
        );
      },
    );
  }

  #[test]
  #[serial]
  fn install_rejects_a_malformed_version() {
    let temp = TempDir::new().unwrap();
    let home = temp.path().to_str().unwrap().to_string();

    temp_env::with_var("HOME", Some(home.as_str()), || {
      let err = install("not-a-version").unwrap_err();
      assert!(matches!(err, SetupError::InvalidVersion { .. }));
    });
  }
}
