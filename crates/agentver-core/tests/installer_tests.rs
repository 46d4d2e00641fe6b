//! Integration tests for the install sequence
//!
//! Each test builds an isolated host with `TestHost` and drives the
//! installer, registry and switch together the way the CLI does.

use agentver_core::{
    EnumerationPolicy, Error, FileConfigStore, MemoryConfigStore, NoopHook, Platform,
    PlatformContext, Registration, ScriptHook, Stage, Installer,
};
use agentver_fs::NormalizedPath;
use agentver_test_utils::TestHost;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;

fn context(host: &TestHost) -> PlatformContext {
    PlatformContext::for_platform(Platform::Linux)
        .with_etc_dir(host.etc_dir())
        .with_link_path(host.link_path())
        .with_hook(Box::new(NoopHook))
}

// =============================================================================
// Successful installs
// =============================================================================

#[test]
fn test_fresh_install_runs_every_stage() {
    let host = TestHost::new();
    let install = host
        .install("1.0.0")
        .with_options(json!({ "api_key": "abc", "check_url": "https://check.example" }));
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    let mut installer = Installer::new(&ctx, &mut store);
    let report = installer
        .run(&NormalizedPath::new(install.path()))
        .unwrap();

    assert_eq!(installer.stage(), Stage::Done);
    assert_eq!(report.version, "1.0.0");
    assert_eq!(report.registration, Registration::Added);
    assert!(report.created_storage_dir);
    assert_eq!(report.merge.supplied, vec!["api_key", "check_url"]);

    host.assert_registered(install.path());
    host.assert_active(install.path());
    assert_eq!(store.get("api_key"), Some(&json!("abc")));
}

#[test]
fn test_reinstall_same_path_keeps_single_entry() {
    let host = TestHost::new();
    let install = host.install("1.0.0").with_options(json!({}));
    let ctx = context(&host);
    let path = NormalizedPath::new(install.path());
    let mut store = MemoryConfigStore::new();

    Installer::new(&ctx, &mut store).run(&path).unwrap();
    let report = Installer::new(&ctx, &mut store).run(&path).unwrap();

    assert_eq!(report.registration, Registration::AlreadyPresent);
    assert!(!report.created_storage_dir);
    assert_eq!(host.manifest(), vec![install.path_str()]);
}

#[test]
fn test_trailing_slash_is_the_same_installation() {
    let host = TestHost::new();
    let install = host.install("1.0.0").with_options(json!({}));
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap();
    let report = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(format!("{}/", install.path_str())))
        .unwrap();

    assert_eq!(report.registration, Registration::AlreadyPresent);
    assert_eq!(host.manifest().len(), 1);
}

#[test]
fn test_second_install_becomes_active_and_first_stays_listed() {
    let host = TestHost::new();
    let first = host.install("1.0.0").with_options(json!({}));
    let second = host.install("1.1.0").with_options(json!({}));
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(first.path()))
        .unwrap();
    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(second.path()))
        .unwrap();

    host.assert_active(second.path());
    assert_eq!(host.manifest(), vec![first.path_str(), second.path_str()]);

    let listed: Vec<String> = ctx
        .registry()
        .enumerate(EnumerationPolicy::FailFast)
        .unwrap()
        .map(|entry| entry.unwrap().to_string())
        .collect();
    assert_eq!(
        listed,
        vec![
            format!("1.0.0:{}", first.path_str()),
            format!("1.1.0:{}", second.path_str()),
        ]
    );
}

#[test]
fn test_set_switches_back_to_registered_version() {
    let host = TestHost::new();
    let first = host.install("1.0.0").with_options(json!({}));
    let second = host.install("1.1.0").with_options(json!({}));
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();
    for install in [&first, &second] {
        Installer::new(&ctx, &mut store)
            .run(&NormalizedPath::new(install.path()))
            .unwrap();
    }

    let target = ctx
        .registry()
        .find_version("1.0.0", EnumerationPolicy::FailFast)
        .unwrap();
    ctx.switch().activate(&target.path).unwrap();

    host.assert_active(first.path());
    assert_eq!(ctx.switch().current_version().unwrap().version, "1.0.0");
}

// =============================================================================
// Config merge through the file store
// =============================================================================

#[test]
fn test_config_keys_are_overwritten_on_every_install() {
    let host = TestHost::new();
    let first = host
        .install("1.0.0")
        .with_options(json!({ "api_key": "abc", "mail_to": "ops@example.com" }));
    let second = host.install("1.1.0").with_options(json!({ "api_key": "def" }));
    let ctx = context(&host);

    let mut store = ctx.config_store();
    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(first.path()))
        .unwrap();
    assert_eq!(host.config().unwrap()["mail_to"], json!("ops@example.com"));

    let mut store = FileConfigStore::new(ctx.config_path());
    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(second.path()))
        .unwrap();

    assert_eq!(host.config(), Some(json!({ "api_key": "def" })));
}

#[test]
fn test_configure_stores_arrays_with_nulls() {
    let host = TestHost::new();
    let install = host
        .install("1.0.0")
        .with_options(json!({ "mail_to": ["a@b", null], "device_key": u64::MAX }));
    let ctx = context(&host);

    let mut store = ctx.config_store();
    let report = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap();

    assert_eq!(report.merge.supplied, vec!["device_key", "mail_to"]);
    assert_eq!(
        host.config(),
        Some(json!({ "device_key": u64::MAX, "mail_to": ["a@b", null] }))
    );
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_invalid_metadata_touches_nothing() {
    let host = TestHost::new();
    let install = host.install("1.0.0").with_options(json!({}));
    install.write_metadata("{ not json");
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    let failure = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Validating);
    assert!(matches!(failure.error, Error::MetadataUnreadable { .. }));
    assert!(!host.etc_dir().exists());
    assert_eq!(host.link_target(), None);
    assert!(store.writes().is_empty());
}

#[test]
fn test_missing_options_fails_after_registration() {
    let host = TestHost::new();
    let install = host.install("1.0.0");
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    let failure = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap_err();

    assert_eq!(failure.stage, Stage::MergingConfig);
    assert!(matches!(failure.error, Error::OptionsMissing { .. }));
    // Earlier stages are not rolled back
    host.assert_registered(install.path());
    host.assert_active(install.path());
}

#[test]
fn test_storage_dir_occupied_by_file() {
    let host = TestHost::new();
    let install = host.install("1.0.0").with_options(json!({}));
    fs::write(host.etc_dir(), "not a directory").unwrap();
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    let failure = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap_err();

    assert_eq!(failure.stage, Stage::EnsuringStorageDir);
    assert!(matches!(failure.error, Error::StorageDir { .. }));
}

#[test]
fn test_directory_at_link_path_fails_activation() {
    let host = TestHost::new();
    let install = host.install("1.0.0").with_options(json!({}));
    fs::create_dir_all(host.link_path()).unwrap();
    let ctx = context(&host);
    let mut store = MemoryConfigStore::new();

    let failure = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap_err();

    assert_eq!(failure.stage, Stage::Activating);
    assert!(matches!(failure.error, Error::SwitchFailed { .. }));
    host.assert_not_registered(install.path());
}

#[cfg(unix)]
#[test]
fn test_failing_hook_is_reported_at_hook_stage() {
    let host = TestHost::new();
    let install = host
        .install("1.0.0")
        .with_options(json!({}))
        .with_hook_script("linux", "post_install.sh", "echo 'no service manager' >&2\nexit 1\n");
    let ctx = context(&host).with_hook(Box::new(ScriptHook::new(
        ["sh"],
        "scripts/linux/post_install.sh",
    )));
    let mut store = MemoryConfigStore::new();

    let failure = Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap_err();

    assert_eq!(failure.stage, Stage::RunningPostInstallHook);
    assert!(
        failure.to_string().contains("no service manager"),
        "got: {failure}"
    );
    assert_eq!(store.writes().len(), 10);
}

#[cfg(unix)]
#[test]
fn test_platform_hook_receives_install_context() {
    let host = TestHost::new();
    let install = host
        .install("1.2.0")
        .with_options(json!({}))
        .with_hook_script(
            "linux",
            "post_install.sh",
            "echo \"$1 $AGENTVER_ETC_DIR\" > \"$AGENTVER_INSTALL_DIR/hook.out\"\n",
        );
    let ctx = context(&host).with_hook(Platform::Linux.hook());
    let mut store = MemoryConfigStore::new();

    Installer::new(&ctx, &mut store)
        .run(&NormalizedPath::new(install.path()))
        .unwrap();

    let out = fs::read_to_string(install.path().join("hook.out")).unwrap();
    assert_eq!(
        out.trim(),
        format!("1.2.0 {}", host.etc_dir().display())
    );
}
