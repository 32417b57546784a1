//! Shell detection and profile file selection.

pub mod profile;

use std::fmt;
use std::path::{Path, PathBuf};

/// Shell families the installer knows profile conventions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
  Zsh,
  Bash,
  Other,
}

impl Shell {
  /// Detect the user's login shell from `$SHELL`.
  pub fn detect() -> Self {
    let shell = match std::env::var("SHELL") {
      Ok(s) => s,
      Err(_) => return Shell::Other,
    };

    let name = Path::new(&shell)
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or("")
      .to_lowercase();

    if name.contains("zsh") {
      Shell::Zsh
    } else if name.contains("bash") {
      Shell::Bash
    } else {
      Shell::Other
    }
  }

  pub const fn as_str(&self) -> &'static str {
    match self {
      Shell::Zsh => "zsh",
      Shell::Bash => "bash",
      Shell::Other => "sh",
    }
  }

  /// Profile candidates for this shell, in preference order.
  pub fn profile_files(&self, home: &Path) -> Vec<PathBuf> {
    let names: &[&str] = match self {
      Shell::Zsh => &[".zshrc", ".zprofile"],
      Shell::Bash => &[".bashrc", ".bash_profile", ".profile"],
      Shell::Other => &[".profile"],
    };
    names.iter().map(|n| home.join(n)).collect()
  }

  /// Every profile any supported shell might use. Uninstall sweeps all of
  /// them, since the login shell may have changed since install.
  pub fn all_profile_files(home: &Path) -> Vec<PathBuf> {
    [".zshrc", ".zprofile", ".bashrc", ".bash_profile", ".profile"]
      .iter()
      .map(|n| home.join(n))
      .collect()
  }
}

impl fmt::Display for Shell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// The profile file install should edit: the first candidate that already
/// exists, or the shell's primary profile if none do (it will be created).
pub fn profile_for_install(shell: Shell, home: &Path) -> PathBuf {
  let candidates = shell.profile_files(home);
  candidates
    .iter()
    .find(|p| p.exists())
    .cloned()
    .unwrap_or_else(|| candidates[0].clone())
}
