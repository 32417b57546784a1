//! Advisory locking for the version store.
//!
//! Two installer runs racing on the same store root (two shells
//! bootstrapping at once) could interleave provisioning, commits, and
//! profile edits. A single exclusive lock on `<root>/.lock` is held for the
//! whole mutating span of an operation; the lock is advisory, so only
//! cooperating installer processes are excluded.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const LOCK_FILENAME: &str = ".lock";

/// Diagnostics written into the lock file by the holder.
#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub version: u32,
  pub pid: u32,
  pub started_at_unix: u64,
  pub operation: String,
}

#[derive(Debug, Error)]
pub enum LockError {
  #[error(
    "another anvs-setup is running: {operation} (PID {pid})\n\
     If you're sure none is running, remove the lock file:\n  {lock_path}"
  )]
  Contention {
    operation: String,
    pid: u32,
    lock_path: PathBuf,
  },

  #[error(
    "the anvs store is locked (could not read lock metadata)\n\
     If you're sure no anvs-setup is running, remove the lock file:\n  {lock_path}"
  )]
  ContentionUnknown { lock_path: PathBuf },

  #[error("failed to create store directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("failed to write lock metadata: {0}")]
  WriteMetadata(#[source] io::Error),

  #[error("failed to acquire lock: {0}")]
  LockFailed(#[source] io::Error),
}

/// An exclusive advisory lock on a store root. Released on drop.
#[derive(Debug)]
pub struct StoreLock {
  _file: File,
  lock_path: PathBuf,
}

impl StoreLock {
  /// Take the exclusive lock for `root`, creating the root if needed.
  ///
  /// Never blocks: contention is an immediate error carrying the holder's
  /// metadata so the user can decide whether the other run is still alive.
  pub fn acquire(root: &Path, operation: &str) -> Result<Self, LockError> {
    let lock_path = root.join(LOCK_FILENAME);

    if !root.exists() {
      std::fs::create_dir_all(root).map_err(LockError::CreateDir)?;
    }

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(LockError::OpenFile)?;

    if let Err(err) = try_lock_exclusive(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(Self::read_contention_error(&lock_path));
      }
      return Err(LockError::LockFailed(err));
    }

    Self::write_metadata(&file, operation)?;

    Ok(StoreLock {
      _file: file,
      lock_path,
    })
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  /// Reads the metadata back through the held file handle.
  ///
  /// Tests and diagnostics use this instead of re-opening the file, which
  /// would fail on Windows due to mandatory locking.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    use std::io::{Seek, SeekFrom};

    let mut file = &self._file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }

  fn write_metadata(file: &File, operation: &str) -> Result<(), LockError> {
    let metadata = LockMetadata {
      version: 1,
      pid: std::process::id(),
      started_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
      operation: operation.to_string(),
    };

    file.set_len(0).map_err(LockError::WriteMetadata)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &metadata)
      .map_err(|e| LockError::WriteMetadata(io::Error::other(e)))?;
    writer.flush().map_err(LockError::WriteMetadata)?;

    Ok(())
  }

  fn read_contention_error(lock_path: &Path) -> LockError {
    if let Ok(mut file) = File::open(lock_path) {
      let mut contents = String::new();
      if file.read_to_string(&mut contents).is_ok()
        && let Ok(metadata) = serde_json::from_str::<LockMetadata>(&contents)
      {
        return LockError::Contention {
          operation: metadata.operation,
          pid: metadata.pid,
          lock_path: lock_path.to_path_buf(),
        };
      }
    }

    LockError::ContentionUnknown {
      lock_path: lock_path.to_path_buf(),
    }
  }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive)
    .map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(windows)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
  use std::os::windows::io::AsRawHandle;
  use windows_sys::Win32::Foundation::HANDLE;
  use windows_sys::Win32::Storage::FileSystem::{
    LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, LockFileEx,
  };

  let handle = file.as_raw_handle() as HANDLE;
  let flags = LOCKFILE_FAIL_IMMEDIATELY | LOCKFILE_EXCLUSIVE_LOCK;

  // SAFETY: OVERLAPPED is a plain data struct that is valid when
  // zero-initialized. LockFileEx is safe to call with a valid file handle
  // and zeroed OVERLAPPED.
  let result = unsafe {
    let mut overlapped = std::mem::zeroed();
    LockFileEx(handle, flags, 0, 1, 0, &mut overlapped)
  };

  if result == 0 {
    Err(io::Error::last_os_error())
  } else {
    Ok(())
  }
}
