//! Active-version switch
//!
//! The active installation is whatever the entry-point symlink points into.
//! The link target is always `<installation>/bin/<entrypoint>`; nothing else
//! records which version is current.

use agentver_fs::{InstallPath, NormalizedPath, io};

use crate::error::{Error, Result};
use crate::registry::InstalledVersion;
use crate::validator::read_package_info;

/// Reads and replaces the entry-point symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSwitch {
    link: NormalizedPath,
    entrypoint: String,
}

impl ActiveSwitch {
    pub fn new(link: impl Into<NormalizedPath>, entrypoint: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            entrypoint: entrypoint.into(),
        }
    }

    pub fn link(&self) -> &NormalizedPath {
        &self.link
    }

    /// Link target for `installation`.
    pub fn entrypoint_for(&self, installation: &NormalizedPath) -> NormalizedPath {
        installation.join(&self.suffix())
    }

    /// Point the link at `installation`'s entry point.
    ///
    /// A dangling or stale link is replaced. The entry point itself is not
    /// required to exist.
    pub fn activate(&self, installation: &NormalizedPath) -> Result<()> {
        let target = self.entrypoint_for(installation);
        if !target.is_file() {
            tracing::warn!(target = %target, "Entry point does not exist, linking anyway");
        }

        io::replace_symlink(&self.link, &target)
            .map_err(|e| Error::switch_failed(self.link.clone(), target.clone(), e))?;

        tracing::info!(link = %self.link, target = %target, "Activated installation");
        Ok(())
    }

    /// Installation path the link currently points into.
    pub fn current(&self) -> Result<NormalizedPath> {
        let target = match io::read_link_if_exists(&self.link) {
            Ok(Some(target)) => target,
            Ok(None) => return Err(Error::no_active_version(self.link.clone())),
            Err(agentver_fs::Error::Io { source, .. })
                if source.kind() == std::io::ErrorKind::InvalidInput =>
            {
                // Something other than a symlink sits at the link path.
                return Err(Error::unrecognized_link(self.link.clone(), self.link.clone()));
            }
            Err(e) => return Err(Error::switch_failed(self.link.clone(), self.link.clone(), e)),
        };

        target
            .strip_segments(&self.suffix())
            .ok_or_else(|| Error::unrecognized_link(self.link.clone(), target))
    }

    /// The current installation together with its declared version.
    pub fn current_version(&self) -> Result<InstalledVersion> {
        let path = self.current()?;
        let info = read_package_info(&path)?;
        Ok(InstalledVersion {
            version: info.version,
            path,
        })
    }

    fn suffix(&self) -> String {
        format!("{}/{}", InstallPath::BinDir, self.entrypoint)
    }
}
