//! Shared constants for the installer.

use std::time::Duration;

/// Name of the managed tool, its binary, and the tar entry we extract.
pub const TOOL_NAME: &str = "anvs";

/// Dot-directory under the user's home that holds the version store.
pub const STORE_DIR_NAME: &str = ".anvs";

/// Environment variable overriding the store root. The shell integration
/// block exports the same variable, so the two stay in sync.
pub const STORE_ENV_VAR: &str = "ANVS_DIR";

/// Configuration file removed on uninstall. Its format is owned by anvs
/// itself; the installer only deletes it.
pub const CONFIG_FILE_NAME: &str = ".anvsrc";

/// Default release download base. A release for version `X.Y.Z` lives at
/// `<base>/vX.Y.Z/anvs-<target>.tar.gz` with a `.sha256` companion.
pub const RELEASE_BASE_URL: &str = "https://github.com/cameronolivier/anvs/releases/download";

/// Environment variable overriding [`RELEASE_BASE_URL`].
pub const RELEASE_BASE_ENV_VAR: &str = "ANVS_RELEASE_BASE";

/// How many installed versions `prune` keeps.
pub const RETAIN_VERSIONS: usize = 2;

/// Redirect-following cap for release downloads. GitHub serves release
/// assets through one redirect; anything deeper is a misbehaving server.
pub const MAX_REDIRECTS: usize = 5;

/// Network timeout for each release download request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Start marker of the managed block in shell profiles. Exact string,
/// case-sensitive; must never change between releases or uninstall stops
/// finding blocks written by older installers.
pub const MARKER_START: &str = "# >>> anvs initialize >>>";

/// End marker of the managed block.
pub const MARKER_END: &str = "# <<< anvs initialize <<<";
