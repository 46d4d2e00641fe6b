//! [`TestHost`]: an isolated host layout for install scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::install::TestInstall;

/// A temporary root holding everything a host would spread across the
/// filesystem:
///
/// ```text
/// <root>/etc/            versions.json, config.json
/// <root>/bin/agent       active-version link
/// <root>/opt/agent/<v>/  installations
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use agentver_test_utils::TestHost;
///
/// let host = TestHost::new();
/// let install = host.install("1.0.0");
/// host.assert_not_registered(install.path());
/// ```
pub struct TestHost {
    temp_dir: TempDir,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn etc_dir(&self) -> PathBuf {
        self.root().join("etc")
    }

    pub fn link_path(&self) -> PathBuf {
        self.root().join("bin").join("agent")
    }

    /// Create a valid installation for `version` under `opt/agent/`.
    pub fn install(&self, version: &str) -> TestInstall {
        TestInstall::create(self.root().join("opt").join("agent").join(version), version)
    }

    /// Registered paths, or empty when the manifest does not exist yet.
    pub fn manifest(&self) -> Vec<String> {
        let path = self.etc_dir().join("versions.json");
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("{} is not a JSON array of strings: {e}", path.display())),
            Err(_) => Vec::new(),
        }
    }

    /// Write raw text as the versions manifest.
    pub fn write_manifest(&self, raw: &str) {
        fs::create_dir_all(self.etc_dir()).unwrap();
        fs::write(self.etc_dir().join("versions.json"), raw).unwrap();
    }

    /// Target of the active-version link, if one exists.
    pub fn link_target(&self) -> Option<PathBuf> {
        fs::read_link(self.link_path()).ok()
    }

    /// The config store document, if it has been written.
    pub fn config(&self) -> Option<serde_json::Value> {
        let path = self.etc_dir().join("config.json");
        let content = fs::read_to_string(&path).ok()?;
        Some(
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("{} is not valid JSON: {e}", path.display())),
        )
    }

    /// # Panics
    /// Panics if `install` is not listed in the manifest.
    pub fn assert_registered(&self, install: &Path) {
        let expected = install.display().to_string();
        let manifest = self.manifest();
        assert!(
            manifest.contains(&expected),
            "Expected {expected} to be registered, manifest: {manifest:?}"
        );
    }

    /// # Panics
    /// Panics if `install` is listed in the manifest.
    pub fn assert_not_registered(&self, install: &Path) {
        let unexpected = install.display().to_string();
        let manifest = self.manifest();
        assert!(
            !manifest.contains(&unexpected),
            "Expected {unexpected} NOT to be registered, manifest: {manifest:?}"
        );
    }

    /// # Panics
    /// Panics unless the active link points at `install`'s entry point.
    pub fn assert_active(&self, install: &Path) {
        let expected = install.join("bin").join("agent.js");
        assert_eq!(
            self.link_target(),
            Some(expected),
            "Active link does not point at {}",
            install.display()
        );
    }
}
