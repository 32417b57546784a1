mod install;
mod uninstall;

pub use install::cmd_install;
pub use uninstall::cmd_uninstall;
