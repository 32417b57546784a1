//! Implementation of the `anvs-setup install` command.

use anyhow::Result;

use anvs_setup_lib::lifecycle;

use crate::output::{print_info, print_stat, print_success};

/// Download, verify, and install the given anvs release, then wire up shell
/// integration. Prints a summary and the steps the user still has to take.
pub fn cmd_install(version: &str) -> Result<()> {
  print_info(&format!("Installing anvs {version}"));

  let report = lifecycle::install(version)?;

  println!();
  print_success(&format!("anvs {} installed!", report.version));
  print_stat("Platform", report.target.as_str());
  print_stat("Store", &report.store_root.display().to_string());
  print_stat("Profile", &report.profile.display().to_string());
  if report.pruned > 0 {
    print_stat("Stale versions removed", &report.pruned.to_string());
  }

  println!();
  println!("To start using anvs, restart your shell or run:");
  println!("  source {}", report.profile.display());

  Ok(())
}
