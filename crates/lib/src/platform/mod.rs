//! Host platform detection and release target resolution.

pub mod paths;

use std::fmt;

use thiserror::Error;

/// Errors that can occur resolving the host platform.
#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("unsupported platform: {os}-{arch} (no anvs release exists for it)")]
  Unsupported { os: Os, arch: Arch },

  #[error("could not determine home directory")]
  NoHomeDirectory,
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  Darwin,
  Windows,
}

impl Os {
  /// Detect the current operating system at compile time.
  #[cfg(target_os = "linux")]
  pub const fn current() -> Self {
    Os::Linux
  }

  #[cfg(target_os = "macos")]
  pub const fn current() -> Self {
    Os::Darwin
  }

  #[cfg(target_os = "windows")]
  pub const fn current() -> Self {
    Os::Windows
  }

  pub const fn as_str(&self) -> &'static str {
    match self {
      Os::Linux => "linux",
      Os::Darwin => "darwin",
      Os::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
  Arm,
}

impl Arch {
  /// Detect the current architecture at compile time.
  #[cfg(target_arch = "x86_64")]
  pub const fn current() -> Self {
    Arch::X86_64
  }

  #[cfg(target_arch = "aarch64")]
  pub const fn current() -> Self {
    Arch::Aarch64
  }

  #[cfg(target_arch = "arm")]
  pub const fn current() -> Self {
    Arch::Arm
  }

  pub const fn as_str(&self) -> &'static str {
    match self {
      Arch::X86_64 => "x86_64",
      Arch::Aarch64 => "aarch64",
      Arch::Arm => "arm",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// A platform that anvs publishes prebuilt binaries for.
///
/// The set is closed: release tarballs only exist for these four targets,
/// and any other (os, arch) pair is an unsupported platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseTarget {
  LinuxX64,
  LinuxArm64,
  DarwinX64,
  DarwinArm64,
}

impl ReleaseTarget {
  /// Look up the release target for an (os, arch) pair.
  pub fn resolve(os: Os, arch: Arch) -> Result<Self, PlatformError> {
    match (os, arch) {
      (Os::Linux, Arch::X86_64) => Ok(ReleaseTarget::LinuxX64),
      (Os::Linux, Arch::Aarch64) => Ok(ReleaseTarget::LinuxArm64),
      (Os::Darwin, Arch::X86_64) => Ok(ReleaseTarget::DarwinX64),
      (Os::Darwin, Arch::Aarch64) => Ok(ReleaseTarget::DarwinArm64),
      (os, arch) => Err(PlatformError::Unsupported { os, arch }),
    }
  }

  /// Resolve the target for the machine we are running on.
  pub fn current() -> Result<Self, PlatformError> {
    Self::resolve(Os::current(), Arch::current())
  }

  /// The target triple used in release asset names.
  pub const fn as_str(&self) -> &'static str {
    match self {
      ReleaseTarget::LinuxX64 => "x86_64-unknown-linux-gnu",
      ReleaseTarget::LinuxArm64 => "aarch64-unknown-linux-gnu",
      ReleaseTarget::DarwinX64 => "x86_64-apple-darwin",
      ReleaseTarget::DarwinArm64 => "aarch64-apple-darwin",
    }
  }
}

impl fmt::Display for ReleaseTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolve_covers_every_published_target() {
    let table = [
      (Os::Linux, Arch::X86_64, "x86_64-unknown-linux-gnu"),
      (Os::Linux, Arch::Aarch64, "aarch64-unknown-linux-gnu"),
      (Os::Darwin, Arch::X86_64, "x86_64-apple-darwin"),
      (Os::Darwin, Arch::Aarch64, "aarch64-apple-darwin"),
    ];

    for (os, arch, expected) in table {
      let target = ReleaseTarget::resolve(os, arch).unwrap();
      assert_eq!(target.as_str(), expected);
    }
  }

  #[test]
  fn resolve_rejects_pairs_outside_the_table() {
    for (os, arch) in [
      (Os::Windows, Arch::X86_64),
      (Os::Windows, Arch::Aarch64),
      (Os::Linux, Arch::Arm),
      (Os::Darwin, Arch::Arm),
    ] {
      let err = ReleaseTarget::resolve(os, arch).unwrap_err();
      assert!(matches!(err, PlatformError::Unsupported { .. }));
    }
  }

  #[test]
  fn current_matches_compile_time_detection() {
    // On any platform we build for, detection itself must not panic; whether
    // resolve succeeds depends on the release table.
    let os = Os::current();
    let arch = Arch::current();
    assert_eq!(
      ReleaseTarget::current().is_ok(),
      ReleaseTarget::resolve(os, arch).is_ok()
    );
  }
}
