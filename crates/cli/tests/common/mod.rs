//! Shared helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

/// Isolated test environment: a fake home directory with its own store,
/// profile files, and release mirror URL.
pub struct TestEnv {
  pub home: TempDir,
  pub release_base: String,
}

impl TestEnv {
  pub fn new(release_base: &str) -> Self {
    Self {
      home: TempDir::new().unwrap(),
      release_base: release_base.to_string(),
    }
  }

  /// Write a file relative to the fake home directory.
  pub fn write_home_file(&self, name: &str, content: &str) {
    std::fs::write(self.home.path().join(name), content).unwrap();
  }

  pub fn home_path(&self, name: &str) -> PathBuf {
    self.home.path().join(name)
  }

  pub fn store_root(&self) -> PathBuf {
    self.home.path().join(".anvs")
  }

  /// A pre-configured `anvs-setup` command isolated to this environment.
  pub fn setup_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("anvs-setup");
    cmd.env("HOME", self.home.path());
    cmd.env("USERPROFILE", self.home.path()); // For Windows
    cmd.env("SHELL", "/bin/zsh");
    cmd.env("ANVS_RELEASE_BASE", &self.release_base);
    cmd.env_remove("ANVS_DIR");
    cmd
  }
}

/// Build a release tarball in memory: README + anvs binary + LICENSE.
pub fn build_tarball(version: &str) -> Vec<u8> {
  let encoder = GzEncoder::new(Vec::new(), Compression::default());
  let mut builder = tar::Builder::new(encoder);

  let binary = format!("anvs-binary-{version}");
  for (name, content) in [
    ("README", "readme".as_bytes()),
    ("anvs", binary.as_bytes()),
    ("LICENSE", "MIT".as_bytes()),
  ] {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append_data(&mut header, name, content).unwrap();
  }

  builder.into_inner().unwrap().finish().unwrap()
}

/// `sha256sum`-style checksum line for a payload.
pub fn checksum_line(payload: &[u8], asset_name: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(payload);
  format!("{}  {asset_name}\n", hex::encode(hasher.finalize()))
}

/// Mount tarball + checksum mocks for one release version.
pub fn mount_release(server: &mut mockito::Server, version: &str, target: &str) -> Vec<mockito::Mock> {
  let asset = format!("anvs-{target}.tar.gz");
  let tarball = build_tarball(version);
  let checksum = checksum_line(&tarball, &asset);

  vec![
    server
      .mock("GET", format!("/v{version}/{asset}").as_str())
      .with_body(tarball)
      .create(),
    server
      .mock("GET", format!("/v{version}/{asset}.sha256").as_str())
      .with_body(checksum)
      .create(),
  ]
}
