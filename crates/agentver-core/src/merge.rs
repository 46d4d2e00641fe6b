//! Installer options merge
//!
//! The installer UI leaves `install_options.json` in the installation
//! directory. Only the whitelisted keys below are copied into the config
//! store, and every one of them is written on each merge: a key the options
//! file does not define is written as `None`, clearing any previous value.
//! The store is flushed once, after all keys have been staged.

use serde_json::{Map, Value};

use agentver_fs::{InstallPath, NormalizedPath, io};

use crate::error::{Error, Result};
use crate::store::ConfigStore;

/// Option keys copied from the installer into the config store.
pub const CONFIG_KEYS: [&str; 10] = [
    "auto_connect",
    "extended_headers",
    "post_method",
    "api_key",
    "device_key",
    "check_url",
    "mail_to",
    "smtp_server",
    "smtp_username",
    "smtp_password",
];

/// Which whitelisted keys were supplied by the options file and which were cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub supplied: Vec<&'static str>,
    pub cleared: Vec<&'static str>,
}

/// Read the installer options object from `installation`.
pub fn read_install_options(installation: &NormalizedPath) -> Result<Map<String, Value>> {
    let options_path = installation.join(InstallPath::InstallOptions.as_str());

    let content = match io::read_text_if_exists(&options_path) {
        Ok(Some(content)) => content,
        Ok(None) => return Err(Error::options_missing(options_path)),
        Err(e) => return Err(Error::options_unreadable(options_path, e)),
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(options)) => Ok(options),
        Ok(other) => Err(Error::options_unreadable(
            options_path,
            format!("expected a JSON object, found {}", json_kind(&other)),
        )),
        Err(e) => Err(Error::options_unreadable(options_path, e)),
    }
}

/// Copy the whitelisted options of `installation` into `store`.
pub fn merge(installation: &NormalizedPath, store: &mut dyn ConfigStore) -> Result<MergeReport> {
    let mut options = read_install_options(installation)?;
    let mut report = MergeReport::default();

    for key in CONFIG_KEYS {
        let value = options.remove(key).filter(|v| !v.is_null());
        if value.is_some() {
            report.supplied.push(key);
        } else {
            report.cleared.push(key);
        }
        store.set(key, value)?;
    }
    store.flush()?;

    let ignored: Vec<&String> = options.keys().collect();
    if !ignored.is_empty() {
        tracing::debug!(?ignored, "Ignoring options outside the whitelist");
    }
    tracing::info!(
        supplied = report.supplied.len(),
        cleared = report.cleared.len(),
        "Merged install options"
    );
    Ok(report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
