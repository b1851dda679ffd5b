//! Write-back guarded by the load-time sha256 and backups.

use camino::Utf8PathBuf;
use cfgfix_edit::{PersistOptions, load_document, persist_document, sha256_hex};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const ORIGINAL: &str = r#"{
  "platform": {"name": "atlas", "version": "1.0.0", "environment": "production"},
  "security": {"enableSSL": false}
}
"#;

fn setup() -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(td.path().join("platform.json")).expect("utf8");
    fs::write(&path, ORIGINAL).unwrap();
    (td, path)
}

#[test]
fn load_hashes_exact_bytes() {
    let (_td, path) = setup();
    let loaded = load_document(&path).unwrap();
    assert_eq!(loaded.sha256, sha256_hex(ORIGINAL.as_bytes()));
    assert_eq!(loaded.text, ORIGINAL);
    assert_eq!(loaded.document.get_bool(&"security.enableSSL".into()), Some(false));
}

#[test]
fn load_reports_malformed_json_with_path() {
    let (_td, path) = setup();
    fs::write(&path, "{ \"platform\": ").unwrap();
    let err = load_document(&path).unwrap_err();
    assert!(format!("{err:#}").contains("platform.json"));
}

#[test]
fn persist_writes_pretty_json_and_backup() {
    let (_td, path) = setup();
    let mut loaded = load_document(&path).unwrap();
    loaded
        .document
        .set(&"security.enableSSL".into(), json!(true))
        .unwrap();

    let opts = PersistOptions::default();
    let outcome = persist_document(&path, &loaded.document, &loaded.sha256, &opts).unwrap();

    let backup = outcome.backup.expect("backup");
    assert_eq!(backup.as_str(), format!("{path}.cfgfix.bak"));
    assert_eq!(fs::read_to_string(&backup).unwrap(), ORIGINAL);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["security"]["enableSSL"], json!(true));
    // Key order survives the rewrite.
    assert!(written.find("platform").unwrap() < written.find("security").unwrap());
}

#[test]
fn second_save_replaces_backup_with_previous_state() {
    let (_td, path) = setup();
    let opts = PersistOptions::default();

    let mut first = load_document(&path).unwrap();
    first.document.set(&"security.enableSSL".into(), json!(true)).unwrap();
    persist_document(&path, &first.document, &first.sha256, &opts).unwrap();
    let after_first = fs::read_to_string(&path).unwrap();

    let mut second = load_document(&path).unwrap();
    second.document.set(&"platform.name".into(), json!("hermes")).unwrap();
    let outcome = persist_document(&path, &second.document, &second.sha256, &opts).unwrap();

    let backup = outcome.backup.expect("backup");
    assert_eq!(fs::read_to_string(&backup).unwrap(), after_first);
    assert_ne!(after_first, ORIGINAL);
}

#[test]
fn persist_without_backup() {
    let (_td, path) = setup();
    let loaded = load_document(&path).unwrap();
    let opts = PersistOptions { backup_suffix: None };
    let outcome = persist_document(&path, &loaded.document, &loaded.sha256, &opts).unwrap();
    assert_eq!(outcome.backup, None);
    assert!(!Utf8PathBuf::from(format!("{path}.cfgfix.bak")).exists());
}

#[test]
fn persist_refuses_when_file_changed_underneath() {
    let (_td, path) = setup();
    let loaded = load_document(&path).unwrap();
    fs::write(&path, ORIGINAL.replace("atlas", "hermes")).unwrap();

    let err = persist_document(&path, &loaded.document, &loaded.sha256, &PersistOptions::default())
        .unwrap_err();
    assert!(err.is_precondition());
    assert!(fs::read_to_string(&path).unwrap().contains("hermes"));
}

#[test]
fn persist_reports_missing_file_as_runtime_error() {
    let (_td, path) = setup();
    let loaded = load_document(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let err = persist_document(&path, &loaded.document, &loaded.sha256, &PersistOptions::default())
        .unwrap_err();
    assert!(!err.is_precondition());
}
