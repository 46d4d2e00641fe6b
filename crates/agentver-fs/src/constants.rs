//! Well-known file and directory names.

use std::path::Path;

/// Fixed names inside an installation directory and the etc directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPath {
    /// Package metadata declaring the installation's `version`
    PackageMetadata,
    /// Options deposited by the installer UI, read once at registration
    InstallOptions,
    /// Directory holding the entry-point script
    BinDir,
    /// Directory holding per-platform hook scripts
    ScriptsDir,
    /// Manifest of registered installations (inside the etc dir)
    VersionsManifest,
    /// Persistent config store (inside the etc dir)
    ConfigFile,
}

impl InstallPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PackageMetadata => "package.json",
            Self::InstallOptions => "install_options.json",
            Self::BinDir => "bin",
            Self::ScriptsDir => "scripts",
            Self::VersionsManifest => "versions.json",
            Self::ConfigFile => "config.json",
        }
    }
}

impl AsRef<Path> for InstallPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for InstallPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for InstallPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
