//! Version registry
//!
//! The manifest (`<etc_dir>/versions.json`) is a JSON array of installation
//! paths in registration order. It is append-only: paths are added by
//! [`VersionRegistry::register`] and never removed. Order carries no
//! ranking; the active installation is tracked by the symlink alone.
//!
//! Versions are never stored. Enumeration re-reads each installation's
//! package metadata.

use std::fmt;

use agentver_fs::{DocumentStore, NormalizedPath};

use crate::error::{Error, Result};
use crate::validator::read_package_info;

/// Result of [`VersionRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The path was appended to the manifest
    Added,
    /// The path was already listed; the manifest was not touched
    AlreadyPresent,
}

/// How enumeration treats an entry whose metadata cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnumerationPolicy {
    /// Yield the error and stop; later entries are never read
    #[default]
    FailFast,
    /// Log a warning and move on to the next entry
    SkipInvalid,
}

/// A registered installation together with its re-derived version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: String,
    pub path: NormalizedPath,
}

impl fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.version, self.path)
    }
}

/// Reads and appends to the versions manifest.
///
/// Assumes a single writer: there is no locking between processes and the
/// last writer wins.
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    manifest: NormalizedPath,
    documents: DocumentStore,
}

impl VersionRegistry {
    /// Create a registry backed by the manifest at `manifest`.
    pub fn new(manifest: impl Into<NormalizedPath>) -> Self {
        Self {
            manifest: manifest.into(),
            documents: DocumentStore::compact(),
        }
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> &NormalizedPath {
        &self.manifest
    }

    /// Read the manifest. A missing file is an empty registry.
    pub fn load(&self) -> Result<Vec<NormalizedPath>> {
        let paths = self
            .documents
            .load_if_exists::<Vec<NormalizedPath>>(&self.manifest)
            .map_err(|e| Error::registry_corrupt(self.manifest.clone(), e))?;
        Ok(paths.unwrap_or_default())
    }

    /// Overwrite the manifest with `paths`.
    pub fn save(&self, paths: &[NormalizedPath]) -> Result<()> {
        self.documents
            .save(&self.manifest, &paths)
            .map_err(|e| Error::registry_write(self.manifest.clone(), e))
    }

    /// Append `installation` unless it is already listed.
    pub fn register(&self, installation: &NormalizedPath) -> Result<Registration> {
        let mut paths = self.load()?;

        if paths.contains(installation) {
            tracing::info!(path = %installation, "Installation already registered");
            return Ok(Registration::AlreadyPresent);
        }

        paths.push(installation.clone());
        self.save(&paths)?;
        tracing::info!(path = %installation, total = paths.len(), "Registered installation");
        Ok(Registration::Added)
    }

    /// Lazily enumerate registered installations with their versions.
    ///
    /// The manifest is read now; each entry's metadata is read as the
    /// iterator advances, one at a time, in registration order.
    pub fn enumerate(&self, policy: EnumerationPolicy) -> Result<Enumeration> {
        let paths = self.load()?;
        Ok(Enumeration {
            paths: paths.into_iter(),
            policy,
            finished: false,
        })
    }

    /// First registered installation whose metadata declares `version`.
    pub fn find_version(&self, version: &str, policy: EnumerationPolicy) -> Result<InstalledVersion> {
        for entry in self.enumerate(policy)? {
            let entry = entry?;
            if entry.version == version {
                return Ok(entry);
            }
        }
        Err(Error::version_not_registered(version))
    }
}

/// Iterator returned by [`VersionRegistry::enumerate`].
///
/// Under [`EnumerationPolicy::FailFast`] the first error is yielded and the
/// iterator then ends.
#[derive(Debug)]
pub struct Enumeration {
    paths: std::vec::IntoIter<NormalizedPath>,
    policy: EnumerationPolicy,
    finished: bool,
}

impl Iterator for Enumeration {
    type Item = Result<InstalledVersion>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for path in self.paths.by_ref() {
            match read_package_info(&path) {
                Ok(info) => {
                    return Some(Ok(InstalledVersion {
                        version: info.version,
                        path,
                    }));
                }
                Err(e) => match self.policy {
                    EnumerationPolicy::FailFast => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    EnumerationPolicy::SkipInvalid => {
                        tracing::warn!(path = %path, error = %e, "Skipping unreadable installation");
                    }
                },
            }
        }
        self.finished = true;
        None
    }
}

impl std::iter::FusedIterator for Enumeration {}
