//! End-to-end CLI smoke tests.
//!
//! Network-dependent paths (the actual GitHub fetch) are not exercised
//! here; these tests cover the storage-facing commands and the exit-code
//! contract.

use assert_cmd::Command;
use tempfile::TempDir;

fn discus() -> Command {
    Command::cargo_bin("discus").unwrap()
}

#[test]
fn version_prints_package_version() {
    discus()
        .arg("version")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_json_includes_name_and_description() {
    let output = discus().args(["version", "--json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "discus");
    assert!(!json["description"].as_str().unwrap().is_empty());
}

#[test]
fn completions_emit_the_binary_name() {
    discus()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicates::str::contains("discus"));
}

#[test]
fn status_on_empty_root_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    discus()
        .args(["status", "--root"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("never"));
}

#[test]
fn status_json_reports_default_ledger() {
    let temp_dir = TempDir::new().unwrap();

    let output = discus()
        .args(["status", "--json", "--root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["state"]["version"], 1);
    assert!(json["state"]["lastFullSync"].is_null());
}

#[test]
fn list_empty_category_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    discus()
        .args(["list", "People", "--root"])
        .arg(temp_dir.path())
        .assert()
        .success();
}

#[test]
fn show_missing_record_exits_not_found() {
    let temp_dir = TempDir::new().unwrap();

    discus()
        .args(["show", "People", "nobody", "--root"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(3);
}

#[test]
fn delete_missing_record_exits_not_found() {
    let temp_dir = TempDir::new().unwrap();

    discus()
        .args(["delete", "People", "nobody", "--root"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .code(3);
}

#[test]
fn status_with_malformed_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("discus.json");
    std::fs::write(&config, "{not json").unwrap();

    // A broken config must not silently fall back to ./content
    discus()
        .args(["status", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(2);
}

#[test]
fn sync_without_config_exits_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("missing.json");

    discus()
        .args(["sync", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .code(2);
}

#[test]
fn show_roundtrips_stored_record() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("people");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("marcus-aurelius.json"),
        serde_json::json!({
            "source": "demo",
            "sourceType": "github-discussion",
            "category": "People",
            "title": "Marcus Aurelius",
            "slug": "marcus-aurelius",
            "externalId": 17,
            "externalUrl": "https://github.com/acme/wiki/discussions/17",
            "retrievedAt": "2024-06-01T00:00:00Z",
            "updatedAt": "2024-06-01T00:00:00Z",
            "checksum": "abc",
            "body": "Roman Emperor"
        })
        .to_string(),
    )
    .unwrap();

    let output = discus()
        .args(["show", "People", "marcus-aurelius", "--json", "--root"])
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "Marcus Aurelius");
    assert_eq!(json["externalId"], 17);
}
