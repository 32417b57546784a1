//! anvs-setup-lib: install/upgrade/uninstall lifecycle for the anvs binary.
//!
//! anvs itself (the automatic node version switcher) ships as a precompiled
//! binary from GitHub releases. This crate owns everything around getting
//! that binary onto a host and removing it again:
//! - `platform`: host detection and release target resolution
//! - `fetch` / `verify` / `archive`: release download, checksum check,
//!   binary extraction
//! - `store`: the versioned `~/.anvs` layout, atomic symlink commits, and
//!   retention pruning
//! - `shell`: profile detection and marker-delimited block editing
//! - `lifecycle`: end-to-end install/uninstall orchestration

pub mod archive;
pub mod consts;
pub mod fetch;
pub mod lifecycle;
pub mod platform;
pub mod shell;
pub mod store;
pub mod templates;
pub mod verify;
