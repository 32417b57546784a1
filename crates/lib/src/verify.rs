//! Artifact integrity verification.
//!
//! The published checksum is the first whitespace-delimited token of the
//! `.sha256` companion file, as produced by `sha256sum`. Note the checksum
//! travels over the same unauthenticated channel as the artifact itself, so
//! this check defends against corruption and truncation, not against a
//! compromised release host.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur verifying a downloaded artifact.
#[derive(Debug, Error)]
pub enum VerifyError {
  #[error("checksum file is empty or has no digest token")]
  MissingDigest,

  #[error("checksum mismatch: expected {expected}, got {actual}")]
  Mismatch { expected: String, actual: String },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Extract the expected digest from checksum file content.
pub fn expected_digest(checksum_text: &str) -> Result<&str, VerifyError> {
  checksum_text
    .split_whitespace()
    .next()
    .ok_or(VerifyError::MissingDigest)
}

/// Verify that `path` hashes to the digest published in `checksum_text`.
///
/// Any failure is fatal to the install: a mismatching artifact must never
/// reach extraction.
pub fn verify(path: &Path, checksum_text: &str) -> Result<(), VerifyError> {
  let expected = expected_digest(checksum_text)?;
  let actual = hash_file(path)?;

  if actual != expected {
    return Err(VerifyError::Mismatch {
      expected: expected.to_string(),
      actual,
    });
  }

  debug!(digest = %actual, "checksum verified");
  Ok(())
}

/// Streaming SHA-256 of a file, as a lowercase hex string.
fn hash_file(path: &Path) -> Result<String, VerifyError> {
  let read_err = |source| VerifyError::Read {
    path: path.to_path_buf(),
    source,
  };

  let file = File::open(path).map_err(read_err)?;
  let mut reader = BufReader::new(file);
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];

  loop {
    let bytes_read = reader.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::NamedTempFile;

  const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

  fn artifact(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
  }

  #[test]
  fn accepts_matching_digest() {
    let file = artifact(b"hello world");
    verify(file.path(), HELLO_SHA256).unwrap();
  }

  #[test]
  fn accepts_sha256sum_style_checksum_lines() {
    let file = artifact(b"hello world");
    let text = format!("{HELLO_SHA256}  anvs-x86_64-unknown-linux-gnu.tar.gz\n");
    verify(file.path(), &text).unwrap();
  }

  #[test]
  fn flipping_one_byte_is_a_mismatch() {
    let file = artifact(b"hello worlD");
    let err = verify(file.path(), HELLO_SHA256).unwrap_err();
    match err {
      VerifyError::Mismatch { expected, actual } => {
        assert_eq!(expected, HELLO_SHA256);
        assert_ne!(actual, expected);
      }
      other => panic!("expected Mismatch, got {other:?}"),
    }
  }

  #[test]
  fn empty_checksum_file_is_missing_digest() {
    let file = artifact(b"hello world");
    assert!(matches!(
      verify(file.path(), "  \n"),
      Err(VerifyError::MissingDigest)
    ));
  }
}
