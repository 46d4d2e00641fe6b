//! Shared test utilities for the agentver workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`host`] - [`TestHost`], a temporary host with etc dir, link location and installations
//! - [`install`] - [`TestInstall`], one installation directory and its files

pub mod host;
pub mod install;

pub use host::TestHost;
pub use install::TestInstall;
