//! Platform defaults and the per-command context
//!
//! Every path that differs between hosts lives in a static table keyed by
//! [`Platform`]. A [`PlatformContext`] is built from those defaults once per
//! command, with any overrides applied, and handed to every component.

use std::fmt;

use agentver_fs::{InstallPath, NormalizedPath};

use crate::error::{Error, Result};
use crate::hooks::{PostInstallHook, ScriptHook};
use crate::registry::VersionRegistry;
use crate::store::FileConfigStore;
use crate::switch::ActiveSwitch;

/// Supported host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Mac,
    Windows,
}

/// Host-specific defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDefaults {
    /// Directory holding the versions manifest and the config store
    pub etc_dir: &'static str,
    /// Location of the active-version symlink
    pub link_path: &'static str,
    /// Entry-point file name under `<installation>/bin/`
    pub entrypoint: &'static str,
    /// Post-install script name under `<installation>/scripts/<platform>/`
    pub hook_script: &'static str,
    /// Program (and leading args) the hook script is passed to
    pub hook_interpreter: &'static [&'static str],
}

static LINUX: PlatformDefaults = PlatformDefaults {
    etc_dir: "/etc/agent",
    link_path: "/usr/local/bin/agent",
    entrypoint: "agent.js",
    hook_script: "post_install.sh",
    hook_interpreter: &["sh"],
};

static MAC: PlatformDefaults = PlatformDefaults {
    etc_dir: "/etc/agent",
    link_path: "/usr/local/bin/agent",
    entrypoint: "agent.js",
    hook_script: "post_install.sh",
    hook_interpreter: &["sh"],
};

static WINDOWS: PlatformDefaults = PlatformDefaults {
    etc_dir: "C:/ProgramData/agent",
    link_path: "C:/ProgramData/agent/bin/agent.js",
    entrypoint: "agent.js",
    hook_script: "post_install.cmd",
    hook_interpreter: &["cmd", "/C"],
};

impl Platform {
    /// All supported platforms
    pub const ALL: [Platform; 3] = [Platform::Linux, Platform::Mac, Platform::Windows];

    /// The platform this binary is running on.
    pub fn current() -> Result<Self> {
        Self::parse(std::env::consts::OS)
            .ok_or_else(|| Error::unsupported_platform(std::env::consts::OS))
    }

    /// Parse an OS name as reported by `std::env::consts::OS`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "linux" => Some(Self::Linux),
            "macos" => Some(Self::Mac),
            "windows" => Some(Self::Windows),
            _ => None,
        }
    }

    /// Directory name used under `scripts/`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Mac => "mac",
            Self::Windows => "windows",
        }
    }

    pub fn defaults(&self) -> &'static PlatformDefaults {
        match self {
            Self::Linux => &LINUX,
            Self::Mac => &MAC,
            Self::Windows => &WINDOWS,
        }
    }

    /// The post-install hook registered for this platform.
    pub fn hook(&self) -> Box<dyn PostInstallHook> {
        let defaults = self.defaults();
        let script = format!(
            "{}/{}/{}",
            InstallPath::ScriptsDir,
            self.as_str(),
            defaults.hook_script
        );
        Box::new(
            ScriptHook::new(defaults.hook_interpreter.iter().copied(), script)
                .with_args(["${AGENTVER_VERSION}"]),
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host paths and collaborators for one command.
#[derive(Debug)]
pub struct PlatformContext {
    platform: Platform,
    etc_dir: NormalizedPath,
    link_path: NormalizedPath,
    entrypoint: String,
    hook: Box<dyn PostInstallHook>,
}

impl PlatformContext {
    /// Context for the running host with no overrides.
    pub fn detect() -> Result<Self> {
        Ok(Self::for_platform(Platform::current()?))
    }

    pub fn for_platform(platform: Platform) -> Self {
        let defaults = platform.defaults();
        Self {
            platform,
            etc_dir: NormalizedPath::new(defaults.etc_dir),
            link_path: NormalizedPath::new(defaults.link_path),
            entrypoint: defaults.entrypoint.to_string(),
            hook: platform.hook(),
        }
    }

    pub fn with_etc_dir(mut self, etc_dir: impl Into<NormalizedPath>) -> Self {
        self.etc_dir = etc_dir.into();
        self
    }

    pub fn with_link_path(mut self, link_path: impl Into<NormalizedPath>) -> Self {
        self.link_path = link_path.into();
        self
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    pub fn with_hook(mut self, hook: Box<dyn PostInstallHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn etc_dir(&self) -> &NormalizedPath {
        &self.etc_dir
    }

    pub fn link_path(&self) -> &NormalizedPath {
        &self.link_path
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    pub fn hook(&self) -> &dyn PostInstallHook {
        self.hook.as_ref()
    }

    /// `<etc_dir>/versions.json`
    pub fn manifest_path(&self) -> NormalizedPath {
        self.etc_dir.join(InstallPath::VersionsManifest.as_str())
    }

    /// `<etc_dir>/config.json`
    pub fn config_path(&self) -> NormalizedPath {
        self.etc_dir.join(InstallPath::ConfigFile.as_str())
    }

    pub fn registry(&self) -> VersionRegistry {
        VersionRegistry::new(self.manifest_path())
    }

    pub fn switch(&self) -> ActiveSwitch {
        ActiveSwitch::new(self.link_path.clone(), self.entrypoint.clone())
    }

    pub fn config_store(&self) -> FileConfigStore {
        FileConfigStore::new(self.config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::NoopHook;
    use rstest::rstest;

    #[rstest]
    #[case("linux", Some(Platform::Linux))]
    #[case("macos", Some(Platform::Mac))]
    #[case("windows", Some(Platform::Windows))]
    #[case("freebsd", None)]
    fn test_parse(#[case] os: &str, #[case] expected: Option<Platform>) {
        assert_eq!(Platform::parse(os), expected);
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn test_current_is_supported() {
        assert!(Platform::current().is_ok());
    }

    #[test]
    fn test_every_platform_has_defaults() {
        for platform in Platform::ALL {
            let defaults = platform.defaults();
            assert!(!defaults.etc_dir.is_empty());
            assert!(!defaults.link_path.is_empty());
            assert_eq!(defaults.entrypoint, "agent.js");
            assert!(!defaults.hook_interpreter.is_empty());
        }
    }

    #[test]
    fn test_hook_script_lives_under_platform_dir() {
        assert_eq!(Platform::Linux.hook().name(), "scripts/linux/post_install.sh");
        assert_eq!(Platform::Mac.hook().name(), "scripts/mac/post_install.sh");
        assert_eq!(Platform::Windows.hook().name(), "scripts/windows/post_install.cmd");
    }

    #[test]
    fn test_context_defaults() {
        let ctx = PlatformContext::for_platform(Platform::Linux);
        assert_eq!(ctx.etc_dir().as_str(), "/etc/agent");
        assert_eq!(ctx.link_path().as_str(), "/usr/local/bin/agent");
        assert_eq!(ctx.manifest_path().as_str(), "/etc/agent/versions.json");
        assert_eq!(ctx.config_path().as_str(), "/etc/agent/config.json");
    }

    #[test]
    fn test_context_overrides() {
        let ctx = PlatformContext::for_platform(Platform::Linux)
            .with_etc_dir("/tmp/etc/")
            .with_link_path("/tmp/bin/agent")
            .with_entrypoint("main.js")
            .with_hook(Box::new(NoopHook));

        assert_eq!(ctx.manifest_path().as_str(), "/tmp/etc/versions.json");
        assert_eq!(ctx.registry().manifest_path().as_str(), "/tmp/etc/versions.json");
        assert_eq!(ctx.config_store().path().as_str(), "/tmp/etc/config.json");
        assert_eq!(ctx.switch().link().as_str(), "/tmp/bin/agent");
        assert_eq!(
            ctx.switch()
                .entrypoint_for(&NormalizedPath::new("/opt/a"))
                .as_str(),
            "/opt/a/bin/main.js"
        );
        assert_eq!(ctx.hook().name(), "noop");
    }
}
