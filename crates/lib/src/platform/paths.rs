//! Locations of the version store and the anvs configuration file.

use std::path::PathBuf;

use crate::consts::{CONFIG_FILE_NAME, STORE_DIR_NAME, STORE_ENV_VAR};
use crate::platform::PlatformError;

/// Returns the user's home directory.
#[cfg(windows)]
pub fn home_dir() -> Result<PathBuf, PlatformError> {
  std::env::var_os("USERPROFILE")
    .map(PathBuf::from)
    .ok_or(PlatformError::NoHomeDirectory)
}

/// Returns the user's home directory.
#[cfg(not(windows))]
pub fn home_dir() -> Result<PathBuf, PlatformError> {
  std::env::var_os("HOME")
    .map(PathBuf::from)
    .ok_or(PlatformError::NoHomeDirectory)
}

/// Root of the version store, `~/.anvs` unless `ANVS_DIR` overrides it.
pub fn store_root() -> Result<PathBuf, PlatformError> {
  if let Some(dir) = std::env::var_os(STORE_ENV_VAR) {
    if !dir.is_empty() {
      return Ok(PathBuf::from(dir));
    }
  }
  Ok(home_dir()?.join(STORE_DIR_NAME))
}

/// The anvs configuration file, `~/.anvsrc`. Removed on uninstall.
pub fn config_file() -> Result<PathBuf, PlatformError> {
  Ok(home_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[cfg(not(windows))]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn store_env_var_takes_precedence() {
    temp_env::with_vars(
      [
        (STORE_ENV_VAR, Some("/custom/anvs")),
        ("HOME", Some("/home/user")),
      ],
      || {
        assert_eq!(store_root().unwrap(), PathBuf::from("/custom/anvs"));
      },
    );
  }

  #[test]
  #[serial]
  fn store_defaults_to_home_dot_dir() {
    temp_env::with_vars(
      [(STORE_ENV_VAR, None::<&str>), ("HOME", Some("/home/user"))],
      || {
        assert_eq!(store_root().unwrap(), PathBuf::from("/home/user/.anvs"));
        assert_eq!(config_file().unwrap(), PathBuf::from("/home/user/.anvsrc"));
      },
    );
  }

  #[test]
  #[serial]
  fn missing_home_is_an_error() {
    temp_env::with_vars(
      [(STORE_ENV_VAR, None::<&str>), ("HOME", None::<&str>)],
      || {
        assert!(matches!(
          home_dir().unwrap_err(),
          PlatformError::NoHomeDirectory
        ));
      },
    );
  }
}
