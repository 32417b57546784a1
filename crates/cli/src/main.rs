use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// Installer for the anvs automatic node version switcher.
///
/// Runs at package install, upgrade, and removal time: fetches the
/// precompiled anvs binary for this machine, maintains the versioned
/// `~/.anvs` layout, and wires anvs into future shell sessions.
#[derive(Parser)]
#[command(name = "anvs-setup")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Download and install an anvs release, then set up shell integration
  Install {
    /// Release version to install (e.g. 1.2.0)
    version: String,
  },
  /// Remove installed versions, configuration, and shell integration
  Uninstall,
}

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .without_time()
    .with_writer(std::io::stderr)
    .init();

  let result = match cli.command {
    Commands::Install { version } => cmd::cmd_install(&version),
    Commands::Uninstall => cmd::cmd_uninstall(),
  };

  if let Err(err) = result {
    output::print_error(&format!("{err}"));
    std::process::exit(1);
  }
}
