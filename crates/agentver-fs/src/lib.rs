//! Filesystem primitives for agentver
//!
//! Provides normalized installation paths, atomic file writes, atomic
//! symlink replacement and format-agnostic document loading.

pub mod constants;
pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use constants::InstallPath;
pub use document::{DocumentStore, Format};
pub use error::{Error, Result};
pub use path::NormalizedPath;
