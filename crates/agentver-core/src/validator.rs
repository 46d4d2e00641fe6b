//! Installation validation
//!
//! An installation is a directory containing `package.json` whose `version`
//! field is a semantic version. Validation has no side effects.

use serde::Deserialize;

use agentver_fs::{DocumentStore, InstallPath, NormalizedPath};

use crate::error::{Error, Result};

/// The parts of `package.json` this crate cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageInfo {
    /// Declared version, guaranteed to parse as semver
    pub version: String,
    /// Package name, informational only
    #[serde(default)]
    pub name: Option<String>,
}

/// Read package metadata from an installation directory.
///
/// Only the metadata read is checked here; the directory itself is not
/// re-validated. Used by enumeration for every registered path.
pub fn read_package_info(installation: &NormalizedPath) -> Result<PackageInfo> {
    let metadata_path = installation.join(InstallPath::PackageMetadata.as_str());

    let info: PackageInfo = match DocumentStore::new().load_if_exists(&metadata_path) {
        Ok(Some(info)) => info,
        Ok(None) => return Err(Error::metadata_missing(metadata_path)),
        Err(e) => return Err(Error::metadata_unreadable(metadata_path, e)),
    };

    if let Err(e) = semver::Version::parse(&info.version) {
        return Err(Error::metadata_unreadable(metadata_path, e));
    }

    Ok(info)
}

/// Check that `path` is an installation and return its declared version.
pub fn validate(path: &NormalizedPath) -> Result<String> {
    if !path.exists() {
        return Err(Error::not_found(path.clone()));
    }
    if !path.is_dir() {
        return Err(Error::not_a_directory(path.clone()));
    }

    let info = read_package_info(path)?;
    tracing::debug!(path = %path, version = %info.version, "Validated installation");
    Ok(info.version)
}
