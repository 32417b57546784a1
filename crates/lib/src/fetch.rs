//! Release artifact download.
//!
//! Builds the deterministic download URL for a (target, version) pair and
//! fetches the tarball plus its companion checksum file over HTTPS. Redirects
//! are followed to a hard cap; nothing is retried automatically — the caller
//! re-runs the whole operation instead.

use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use reqwest::blocking::{Client, Response};
use reqwest::redirect::Policy;
use semver::Version;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::consts::{
  FETCH_TIMEOUT, MAX_REDIRECTS, RELEASE_BASE_ENV_VAR, RELEASE_BASE_URL, TOOL_NAME,
};
use crate::platform::ReleaseTarget;

/// Errors that can occur while downloading a release.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("network error fetching {url}: {source}")]
  Network {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("download timed out after {}s: {url}", FETCH_TIMEOUT.as_secs())]
  TimedOut { url: String },

  #[error("download failed with HTTP {status}: {url}")]
  DownloadFailed { url: String, status: u16 },

  #[error("connection interrupted while downloading {url}: {source}")]
  Interrupted {
    url: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to write download to {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A downloaded release: the tarball on disk plus its checksum text.
#[derive(Debug)]
pub struct ReleaseArtifact {
  pub tarball_path: PathBuf,
  pub checksum_text: String,
}

/// Asset name of the release tarball for a target.
pub fn tarball_name(target: ReleaseTarget) -> String {
  format!("{TOOL_NAME}-{target}.tar.gz")
}

fn release_base() -> String {
  env::var(RELEASE_BASE_ENV_VAR).unwrap_or_else(|_| RELEASE_BASE_URL.to_string())
}

/// Download the release tarball and its checksum file into `dest_dir`.
///
/// The tarball is staged under a temporary name and renamed into place only
/// after the body has been read to the end, so an interrupted download never
/// leaves a partial file that looks like a finished artifact.
pub fn fetch_release(
  target: ReleaseTarget,
  version: &Version,
  dest_dir: &Path,
) -> Result<ReleaseArtifact, FetchError> {
  let client = Client::builder()
    .redirect(Policy::limited(MAX_REDIRECTS))
    .timeout(FETCH_TIMEOUT)
    .user_agent(concat!("anvs-setup/", env!("CARGO_PKG_VERSION")))
    .build()
    .map_err(FetchError::Client)?;

  let name = tarball_name(target);
  let tarball_url = format!("{}/v{version}/{name}", release_base());
  let checksum_url = format!("{tarball_url}.sha256");

  fs::create_dir_all(dest_dir).map_err(|e| FetchError::Write {
    path: dest_dir.to_path_buf(),
    source: e,
  })?;

  let tarball_path = dest_dir.join(&name);
  download_file(&client, &tarball_url, &tarball_path)?;
  let checksum_text = download_text(&client, &checksum_url)?;

  info!(path = ?tarball_path, "release downloaded");
  Ok(ReleaseArtifact {
    tarball_path,
    checksum_text,
  })
}

fn send(client: &Client, url: &str) -> Result<Response, FetchError> {
  debug!(url = %url, "fetching");

  let response = client
    .get(url)
    .send()
    .map_err(|e| classify_transport_error(url, e))?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::DownloadFailed {
      url: url.to_string(),
      status: status.as_u16(),
    });
  }

  Ok(response)
}

fn classify_transport_error(url: &str, err: reqwest::Error) -> FetchError {
  if err.is_timeout() {
    FetchError::TimedOut {
      url: url.to_string(),
    }
  } else {
    FetchError::Network {
      url: url.to_string(),
      source: err,
    }
  }
}

fn download_file(client: &Client, url: &str, dest: &Path) -> Result<(), FetchError> {
  let mut response = send(client, url)?;

  let dest_dir = dest.parent().unwrap_or_else(|| Path::new("."));
  let mut staged = NamedTempFile::new_in(dest_dir).map_err(|e| FetchError::Write {
    path: dest.to_path_buf(),
    source: e,
  })?;

  let bytes = io::copy(&mut response, staged.as_file_mut()).map_err(|e| {
    FetchError::Interrupted {
      url: url.to_string(),
      source: e,
    }
  })?;

  staged.persist(dest).map_err(|e| FetchError::Write {
    path: dest.to_path_buf(),
    source: e.error,
  })?;

  debug!(url = %url, bytes, "download complete");
  Ok(())
}

fn download_text(client: &Client, url: &str) -> Result<String, FetchError> {
  send(client, url)?
    .text()
    .map_err(|e| classify_transport_error(url, e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::TempDir;

  const TARGET: ReleaseTarget = ReleaseTarget::LinuxX64;

  fn version() -> Version {
    Version::new(1, 2, 0)
  }

  fn with_release_base<F: FnOnce()>(url: &str, f: F) {
    temp_env::with_var(RELEASE_BASE_ENV_VAR, Some(url), f);
  }

  #[test]
  #[serial]
  fn fetch_downloads_tarball_and_checksum() {
    let mut server = mockito::Server::new();
    let tarball = server
      .mock("GET", "/v1.2.0/anvs-x86_64-unknown-linux-gnu.tar.gz")
      .with_body(b"tarball-bytes".as_slice())
      .create();
    let checksum = server
      .mock("GET", "/v1.2.0/anvs-x86_64-unknown-linux-gnu.tar.gz.sha256")
      .with_body("abc123  anvs-x86_64-unknown-linux-gnu.tar.gz\n")
      .create();

    let temp = TempDir::new().unwrap();
    let artifact = with_release_base_result(&server.url(), temp.path());

    let artifact = artifact.unwrap();
    assert_eq!(std::fs::read(&artifact.tarball_path).unwrap(), b"tarball-bytes");
    assert!(artifact.checksum_text.starts_with("abc123"));
    tarball.assert();
    checksum.assert();
  }

  #[test]
  #[serial]
  fn missing_release_is_download_failed() {
    let mut server = mockito::Server::new();
    server
      .mock("GET", "/v1.2.0/anvs-x86_64-unknown-linux-gnu.tar.gz")
      .with_status(404)
      .create();

    let temp = TempDir::new().unwrap();
    let err = with_release_base_result(&server.url(), temp.path()).unwrap_err();

    assert!(matches!(err, FetchError::DownloadFailed { status: 404, .. }));
    // No partial artifact may remain after a failed download
    assert!(
      !temp
        .path()
        .join("anvs-x86_64-unknown-linux-gnu.tar.gz")
        .exists()
    );
  }

  #[test]
  #[serial]
  fn redirects_are_followed() {
    let mut server = mockito::Server::new();
    let asset_url = format!("{}/assets/blob.tar.gz", server.url());
    server
      .mock("GET", "/v1.2.0/anvs-x86_64-unknown-linux-gnu.tar.gz")
      .with_status(302)
      .with_header("location", &asset_url)
      .create();
    server
      .mock("GET", "/assets/blob.tar.gz")
      .with_body(b"redirected".as_slice())
      .create();
    server
      .mock("GET", "/v1.2.0/anvs-x86_64-unknown-linux-gnu.tar.gz.sha256")
      .with_body("deadbeef\n")
      .create();

    let temp = TempDir::new().unwrap();
    let artifact = with_release_base_result(&server.url(), temp.path()).unwrap();

    assert_eq!(std::fs::read(&artifact.tarball_path).unwrap(), b"redirected");
  }

  fn with_release_base_result(
    base: &str,
    dest: &Path,
  ) -> Result<ReleaseArtifact, FetchError> {
    let mut result = None;
    with_release_base(base, || {
      result = Some(fetch_release(TARGET, &version(), dest));
    });
    result.unwrap()
  }

  #[test]
  fn tarball_name_embeds_the_target_triple() {
    assert_eq!(
      tarball_name(ReleaseTarget::DarwinArm64),
      "anvs-aarch64-apple-darwin.tar.gz"
    );
  }
}
