//! Tests for format-agnostic document loading and saving

use agentver_fs::{DocumentStore, Error, Format, NormalizedPath};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct PackageInfo {
    name: String,
    version: String,
}

#[rstest]
#[case("package.toml", "name = \"agent\"\nversion = \"1.0.0\"")]
#[case("package.json", r#"{"name": "agent", "version": "1.0.0"}"#)]
#[case("package.yaml", "name: agent\nversion: 1.0.0")]
#[case("package.yml", "name: agent\nversion: 1.0.0")]
fn load_detects_format_from_extension(#[case] file: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join(file);
    fs::write(&file_path, content).unwrap();

    let info: PackageInfo = DocumentStore::new()
        .load(&NormalizedPath::new(&file_path))
        .unwrap();

    assert_eq!(
        info,
        PackageInfo {
            name: "agent".into(),
            version: "1.0.0".into()
        }
    );
}

#[test]
fn load_if_exists_returns_none_for_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("versions.json"));

    let loaded: Option<Vec<String>> = DocumentStore::new().load_if_exists(&path).unwrap();

    assert!(loaded.is_none());
}

#[test]
fn load_if_exists_still_reports_parse_errors() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("versions.json");
    fs::write(&file_path, "[\"/opt/a\",").unwrap();

    let result: agentver_fs::Result<Option<Vec<String>>> =
        DocumentStore::new().load_if_exists(&NormalizedPath::new(&file_path));

    match result {
        Err(Error::Parse { format, .. }) => assert_eq!(format, "JSON"),
        other => panic!("expected a JSON parse error, got {other:?}"),
    }
}

#[test]
fn compact_store_writes_single_line_json() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("versions.json"));
    let paths = vec!["/opt/agent/1.0.0".to_string(), "/opt/agent/1.1.0".to_string()];

    DocumentStore::compact().save(&path, &paths).unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, r#"["/opt/agent/1.0.0","/opt/agent/1.1.0"]"#);
}

#[test]
fn save_toml_then_load_preserves_map() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("config.toml"));
    let mut values = BTreeMap::new();
    values.insert("api_key".to_string(), serde_json::json!("abc"));
    values.insert("auto_connect".to_string(), serde_json::json!(true));

    let store = DocumentStore::new();
    store.save(&path, &values).unwrap();
    let loaded: BTreeMap<String, serde_json::Value> = store.load(&path).unwrap();

    assert_eq!(loaded, values);
    let content = fs::read_to_string(path.to_native()).unwrap();
    assert!(content.contains("api_key = \"abc\""), "got: {content}");
}

#[test]
fn unsupported_extension_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.ini");
    fs::write(&file_path, "a=b").unwrap();
    let path = NormalizedPath::new(&file_path);

    assert!(matches!(
        Format::from_path(&path),
        Err(Error::UnsupportedFormat { extension }) if extension == "ini"
    ));
    let result: agentver_fs::Result<BTreeMap<String, String>> = DocumentStore::new().load(&path);
    assert!(result.is_err());
}
