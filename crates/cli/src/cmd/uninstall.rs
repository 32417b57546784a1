//! Implementation of the `anvs-setup uninstall` command.

use anyhow::Result;

use anvs_setup_lib::lifecycle;

use crate::output::{print_info, print_stat, print_success};

/// Remove installed anvs versions, the configuration file, and the shell
/// integration block from every known profile.
pub fn cmd_uninstall() -> Result<()> {
  print_info("Uninstalling anvs");

  let report = lifecycle::uninstall()?;

  println!();
  if report.was_noop() {
    print_info("Nothing to clean up - anvs was not installed.");
    return Ok(());
  }

  print_success("anvs uninstalled!");
  if report.store_removed {
    print_stat("Version store", "removed");
  }
  if report.config_removed {
    print_stat("Configuration", "removed");
  }
  for profile in &report.profiles_cleaned {
    print_stat("Cleaned profile", &profile.display().to_string());
  }

  if !report.profiles_cleaned.is_empty() {
    println!();
    println!("Restart your shell for the change to take effect.");
  }

  Ok(())
}
