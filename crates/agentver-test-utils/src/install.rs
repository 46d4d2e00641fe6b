//! [`TestInstall`]: a fake agent installation on disk.

use std::fs;
use std::path::{Path, PathBuf};

/// An installation directory with `package.json` and `bin/agent.js`.
///
/// Created through [`crate::TestHost::install`]; the directory lives as long
/// as the host's temporary root.
#[derive(Debug, Clone)]
pub struct TestInstall {
    path: PathBuf,
    version: String,
}

impl TestInstall {
    /// Create a valid installation declaring `version` at `path`.
    pub fn create(path: impl Into<PathBuf>, version: &str) -> Self {
        let path = path.into();
        fs::create_dir_all(path.join("bin")).unwrap();
        fs::write(path.join("bin").join("agent.js"), "#!/usr/bin/env node\n").unwrap();

        let install = Self {
            path,
            version: version.to_string(),
        };
        install.write_metadata(&serde_json::json!({ "name": "agent", "version": version }).to_string());
        install
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path as a string, the form the CLI takes.
    pub fn path_str(&self) -> String {
        self.path.display().to_string()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Write `install_options.json` with the given object.
    pub fn with_options(self, options: serde_json::Value) -> Self {
        fs::write(
            self.path.join("install_options.json"),
            serde_json::to_string_pretty(&options).unwrap(),
        )
        .unwrap();
        self
    }

    /// Write raw text as `install_options.json`.
    pub fn with_raw_options(self, raw: &str) -> Self {
        fs::write(self.path.join("install_options.json"), raw).unwrap();
        self
    }

    /// Write `scripts/<platform>/<name>` with `body`.
    pub fn with_hook_script(self, platform: &str, name: &str, body: &str) -> Self {
        let dir = self.path.join("scripts").join(platform);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), body).unwrap();
        self
    }

    /// Overwrite `package.json` with raw text.
    pub fn write_metadata(&self, raw: &str) {
        fs::write(self.path.join("package.json"), raw).unwrap();
    }

    /// Delete the whole installation directory.
    pub fn remove(&self) {
        fs::remove_dir_all(&self.path).unwrap();
    }
}
