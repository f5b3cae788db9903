//! Tests for `run` failure paths that stop before any network access.

use super::parse;
use crate::cli::run;

#[test]
fn run_without_location_fails_before_config() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.json");
    let cli = parse(&["remote2oss", "-c", missing.to_str().unwrap()]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("missing argument"));
}

#[test]
fn run_with_missing_config_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.json");
    let cli = parse(&[
        "remote2oss",
        "-c",
        missing.to_str().unwrap(),
        "-l",
        "https://example.com/a.zip",
    ]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("does-not-exist.json"));
}

#[test]
fn run_with_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"oss_public_url": "", "oss_endpoint": "e", "oss_access_key_id": "k",
            "oss_access_key_secret": "s", "oss_bucket": "b"}"#,
    )
    .unwrap();
    let cli = parse(&["remote2oss", "-c", path.to_str().unwrap(), "-l", "https://example.com/a.zip"]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("oss_public_url"));
}

#[test]
fn run_rejects_root_url_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ok.json");
    let ws = dir.path().join("ws");
    std::fs::write(
        &path,
        format!(
            r#"{{"workspace": {:?}, "oss_public_url": "https://p", "oss_endpoint": "http://127.0.0.1:1",
                "oss_access_key_id": "k", "oss_access_key_secret": "s", "oss_bucket": "b"}}"#,
            ws.to_str().unwrap()
        ),
    )
    .unwrap();
    let cli = parse(&["remote2oss", "-c", path.to_str().unwrap(), "-l", "https://example.com/"]);
    let err = run(&cli).unwrap_err();
    assert!(format!("{err:#}").contains("no file name"));
    assert!(!ws.exists());
}
