//! Embedded shell payloads.
//!
//! Two kinds of text ship inside the installer binary: the glue scripts
//! provisioned into every version directory (`lib/anvs.sh`, `lib/anvs.ps1`),
//! and the body of the managed block written into the user's shell profile.
//! The profile block only ever references `$ANVS_DIR/current/...`, so it
//! survives upgrades without being rewritten.

/// POSIX glue sourced by the profile block. Hooks directory changes so anvs
/// can re-evaluate the wanted node version.
pub const POSIX_GLUE: &str = r#"#!/bin/sh
# anvs shell glue. Sourced via the managed block in the user's profile.
export ANVS_DIR="${ANVS_DIR:-$HOME/.anvs}"
export PATH="$ANVS_DIR/bin:$PATH"

__anvs_activate() {
  command -v anvs >/dev/null 2>&1 || return 0
  anvs activate "$PWD"
}

if [ -n "$ZSH_VERSION" ]; then
  autoload -Uz add-zsh-hook
  add-zsh-hook chpwd __anvs_activate
  __anvs_activate
elif [ -n "$BASH_VERSION" ]; then
  case ";$PROMPT_COMMAND;" in
    *";__anvs_activate;"*) ;;
    *) PROMPT_COMMAND="__anvs_activate${PROMPT_COMMAND:+;$PROMPT_COMMAND}" ;;
  esac
fi
"#;

/// PowerShell counterpart of [`POSIX_GLUE`].
pub const POWERSHELL_GLUE: &str = r#"# anvs shell glue for PowerShell.
$env:ANVS_DIR = if ($env:ANVS_DIR) { $env:ANVS_DIR } else { Join-Path $HOME ".anvs" }
$env:PATH = (Join-Path $env:ANVS_DIR "bin") + [IO.Path]::PathSeparator + $env:PATH

function Invoke-AnvsActivate {
  if (Get-Command anvs -ErrorAction SilentlyContinue) {
    anvs activate $PWD.Path
  }
}
"#;

/// Body of the managed profile block. The editor wraps this in the start/end
/// markers; the body itself must never contain a marker line.
pub const INTEGRATION_BLOCK: &str = r#"# anvs shell integration
export ANVS_DIR="$HOME/.anvs"
export PATH="$ANVS_DIR/bin:$PATH"

# Versioned installation
if [ -s "$ANVS_DIR/current/lib/anvs.sh" ]; then
  . "$ANVS_DIR/current/lib/anvs.sh"
# Homebrew installation
elif command -v brew >/dev/null 2>&1 && [ -s "$(brew --prefix anvs 2>/dev/null)/lib/anvs.sh" ]; then
  . "$(brew --prefix anvs)/lib/anvs.sh"
fi"#;
