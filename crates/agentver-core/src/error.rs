//! Error types for agentver-core
//!
//! Every variant carries the path or key it concerns, the underlying cause
//! where there is one, and the [`Origin`] in this crate that raised it.
//! Constructors are `#[track_caller]`, so the origin is the call site of
//! the constructor.

use std::fmt;
use std::panic::Location;

use agentver_fs::NormalizedPath;

/// Result type for agentver-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause for errors that can come from more than one layer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Source location that raised an error.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Origin(&'static Location<'static>);

impl Origin {
    /// Capture the caller's location.
    #[track_caller]
    pub fn here() -> Self {
        Self(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.0.file()
    }

    pub fn line(&self) -> u32 {
        self.0.line()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.0.file(), self.0.line())
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Errors that can occur in agentver-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Installation path does not exist
    #[error("{path} does not exist")]
    NotFound { path: NormalizedPath, origin: Origin },

    /// Installation path exists but is not a directory
    #[error("{path} is not a directory")]
    NotADirectory { path: NormalizedPath, origin: Origin },

    /// Package metadata file is absent
    #[error("Package metadata not found at {path}")]
    MetadataMissing { path: NormalizedPath, origin: Origin },

    /// Package metadata exists but cannot be read or parsed
    #[error("Package metadata at {path} is unreadable: {source}")]
    MetadataUnreadable {
        path: NormalizedPath,
        #[source]
        source: BoxError,
        origin: Origin,
    },

    /// Versions manifest exists but cannot be read or parsed
    #[error("Versions manifest at {path} is corrupt: {source}")]
    RegistryCorrupt {
        path: NormalizedPath,
        #[source]
        source: agentver_fs::Error,
        origin: Origin,
    },

    /// Versions manifest could not be written
    #[error("Failed to write versions manifest at {path}: {source}")]
    RegistryWrite {
        path: NormalizedPath,
        #[source]
        source: agentver_fs::Error,
        origin: Origin,
    },

    /// Installer options file is absent
    #[error("Install options not found at {path}")]
    OptionsMissing { path: NormalizedPath, origin: Origin },

    /// Installer options file cannot be read, parsed, or is not an object
    #[error("Install options at {path} are unreadable: {source}")]
    OptionsUnreadable {
        path: NormalizedPath,
        #[source]
        source: BoxError,
        origin: Origin,
    },

    /// Active-version link could not be replaced
    #[error("Failed to point {link} at {target}: {source}")]
    SwitchFailed {
        link: NormalizedPath,
        target: NormalizedPath,
        #[source]
        source: agentver_fs::Error,
        origin: Origin,
    },

    /// No active-version link exists
    #[error("No active version: {link} does not exist")]
    NoActiveVersion { link: NormalizedPath, origin: Origin },

    /// Active-version link points somewhere other than an installation entry point
    #[error("{link} points at {target}, which is not an installation entry point")]
    UnrecognizedLink {
        link: NormalizedPath,
        target: NormalizedPath,
        origin: Origin,
    },

    /// Post-install hook reported failure
    #[error("Post-install hook '{hook}' failed: {message}")]
    HookFailed {
        hook: String,
        message: String,
        origin: Origin,
    },

    /// Storage (etc) directory could not be created
    #[error("Failed to prepare storage directory {path}: {source}")]
    StorageDir {
        path: NormalizedPath,
        #[source]
        source: agentver_fs::Error,
        origin: Origin,
    },

    /// Config store could not be read or written
    #[error("Config store at {path} failed: {source}")]
    ConfigStore {
        path: NormalizedPath,
        #[source]
        source: agentver_fs::Error,
        origin: Origin,
    },

    /// No registered installation declares the requested version
    #[error("Version {version} is not registered")]
    VersionNotRegistered { version: String, origin: Origin },

    /// The running operating system has no platform defaults
    #[error("Unsupported platform: {name}")]
    UnsupportedPlatform { name: String, origin: Origin },
}

impl Error {
    #[track_caller]
    pub fn not_found(path: impl Into<NormalizedPath>) -> Self {
        Self::NotFound {
            path: path.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn not_a_directory(path: impl Into<NormalizedPath>) -> Self {
        Self::NotADirectory {
            path: path.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn metadata_missing(path: impl Into<NormalizedPath>) -> Self {
        Self::MetadataMissing {
            path: path.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn metadata_unreadable(path: impl Into<NormalizedPath>, source: impl Into<BoxError>) -> Self {
        Self::MetadataUnreadable {
            path: path.into(),
            source: source.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn registry_corrupt(path: impl Into<NormalizedPath>, source: agentver_fs::Error) -> Self {
        Self::RegistryCorrupt {
            path: path.into(),
            source,
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn registry_write(path: impl Into<NormalizedPath>, source: agentver_fs::Error) -> Self {
        Self::RegistryWrite {
            path: path.into(),
            source,
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn options_missing(path: impl Into<NormalizedPath>) -> Self {
        Self::OptionsMissing {
            path: path.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn options_unreadable(path: impl Into<NormalizedPath>, source: impl Into<BoxError>) -> Self {
        Self::OptionsUnreadable {
            path: path.into(),
            source: source.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn switch_failed(
        link: impl Into<NormalizedPath>,
        target: impl Into<NormalizedPath>,
        source: agentver_fs::Error,
    ) -> Self {
        Self::SwitchFailed {
            link: link.into(),
            target: target.into(),
            source,
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn no_active_version(link: impl Into<NormalizedPath>) -> Self {
        Self::NoActiveVersion {
            link: link.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn unrecognized_link(
        link: impl Into<NormalizedPath>,
        target: impl Into<NormalizedPath>,
    ) -> Self {
        Self::UnrecognizedLink {
            link: link.into(),
            target: target.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn hook_failed(hook: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HookFailed {
            hook: hook.into(),
            message: message.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn storage_dir(path: impl Into<NormalizedPath>, source: agentver_fs::Error) -> Self {
        Self::StorageDir {
            path: path.into(),
            source,
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn config_store(path: impl Into<NormalizedPath>, source: agentver_fs::Error) -> Self {
        Self::ConfigStore {
            path: path.into(),
            source,
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn version_not_registered(version: impl Into<String>) -> Self {
        Self::VersionNotRegistered {
            version: version.into(),
            origin: Origin::here(),
        }
    }

    #[track_caller]
    pub fn unsupported_platform(name: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            name: name.into(),
            origin: Origin::here(),
        }
    }

    /// Where in this crate the error was raised.
    pub fn origin(&self) -> Origin {
        match self {
            Self::NotFound { origin, .. }
            | Self::NotADirectory { origin, .. }
            | Self::MetadataMissing { origin, .. }
            | Self::MetadataUnreadable { origin, .. }
            | Self::RegistryCorrupt { origin, .. }
            | Self::RegistryWrite { origin, .. }
            | Self::OptionsMissing { origin, .. }
            | Self::OptionsUnreadable { origin, .. }
            | Self::SwitchFailed { origin, .. }
            | Self::NoActiveVersion { origin, .. }
            | Self::UnrecognizedLink { origin, .. }
            | Self::HookFailed { origin, .. }
            | Self::StorageDir { origin, .. }
            | Self::ConfigStore { origin, .. }
            | Self::VersionNotRegistered { origin, .. }
            | Self::UnsupportedPlatform { origin, .. } => *origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_points_at_constructor_call_site() {
        let line = line!() + 1;
        let error = Error::not_found("/opt/agent/9.9.9");

        let origin = error.origin();
        assert!(origin.file().ends_with("error.rs"), "got {origin}");
        assert_eq!(origin.line(), line);
    }

    #[test]
    fn not_found_displays_path() {
        let error = Error::not_found("/opt/agent/9.9.9/");
        assert_eq!(error.to_string(), "/opt/agent/9.9.9 does not exist");
    }

    #[test]
    fn metadata_unreadable_keeps_cause() {
        let cause = semver::Version::parse("not-a-version").unwrap_err();
        let error = Error::metadata_unreadable("/opt/a/package.json", cause);

        let source = std::error::Error::source(&error).expect("cause must be kept");
        assert!(!source.to_string().is_empty());
        assert!(error.to_string().contains("/opt/a/package.json"));
    }
}
