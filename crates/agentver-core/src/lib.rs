//! Core layer for agentver
//!
//! Manages side-by-side installations of the agent on one host:
//!
//! - **Validator**: checks that a directory is an installation and reads its version
//! - **Registry**: the `versions.json` manifest of known installation paths
//! - **Switch**: the symlink that selects the active installation
//! - **Merger**: copies whitelisted installer options into the config store
//! - **Installer**: runs the install sequence as an explicit state machine
//!
//! # Architecture
//!
//! ```text
//!                  agentver-cli
//!                       |
//!                 agentver-core
//!   installer -> validator, registry, switch, merge, hooks
//!                       |
//!                  agentver-fs
//! ```
//!
//! All collaborators that differ per host (paths, post-install hook) are
//! carried by a [`PlatformContext`] built once per command.

pub mod error;
pub mod hooks;
pub mod installer;
pub mod merge;
pub mod platform;
pub mod registry;
pub mod store;
pub mod switch;
pub mod validator;

pub use error::{Error, Origin, Result};
pub use hooks::{HookContext, NoopHook, PostInstallHook, ScriptHook};
pub use installer::{InstallFailure, InstallReport, Installer, Stage};
pub use merge::{CONFIG_KEYS, MergeReport};
pub use platform::{Platform, PlatformContext, PlatformDefaults};
pub use registry::{Enumeration, EnumerationPolicy, InstalledVersion, Registration, VersionRegistry};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
pub use switch::ActiveSwitch;
pub use validator::{PackageInfo, read_package_info, validate};
