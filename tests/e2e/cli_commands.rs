//! CLI command tests using the compiled binary.

use std::collections::BTreeMap;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use presets::preset::Preset;
use presets::share;

fn presets_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("presets").unwrap();
    cmd.arg("--dir").arg(dir);
    cmd
}

/// A code for a small two-plugin preset, produced by the library codec.
fn sample_code() -> String {
    let mut preset = Preset::new(1, "Combat".to_string());
    preset.enabled_plugins.insert("Boosts".to_string(), true);
    preset.enabled_plugins.insert("Camera".to_string(), false);
    let mut group = BTreeMap::new();
    group.insert("showIcons".to_string(), Some("true".to_string()));
    preset.plugin_settings.insert("boosts".to_string(), group);
    share::export(&preset).unwrap()
}

#[test]
fn test_list_empty_directory() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No presets found"));
}

#[test]
fn test_import_then_list_and_show() {
    let tmp = tempfile::tempdir().unwrap();

    presets_cmd(tmp.path())
        .args(["import", &sample_code()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 'Combat'"));

    presets_cmd(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Combat"));

    presets_cmd(tmp.path())
        .args(["show", "Combat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Boosts"))
        .stdout(predicate::str::contains("Camera"));
}

#[test]
fn test_import_reads_stdin() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .arg("import")
        .write_stdin(sample_code())
        .assert()
        .success();
}

#[test]
fn test_import_with_name_override() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", &sample_code(), "--name", "Renamed Combat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed Combat"));
}

#[test]
fn test_export_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", &sample_code()])
        .assert()
        .success();

    let output = presets_cmd(tmp.path())
        .args(["export", "Combat"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let code = String::from_utf8(output.stdout).unwrap();
    let decoded = share::import(code.trim()).unwrap();
    assert_eq!(decoded.name, "Combat");
    assert_eq!(decoded.enabled_plugins.get("Boosts"), Some(&true));
}

#[test]
fn test_rename_and_delete() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", &sample_code()])
        .assert()
        .success();

    presets_cmd(tmp.path())
        .args(["rename", "Combat", "Skilling"])
        .assert()
        .success();

    presets_cmd(tmp.path())
        .args(["delete", "Skilling"])
        .assert()
        .success();

    presets_cmd(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No presets found"));
}

#[test]
fn test_import_rejects_garbage() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", "@@@ definitely not a code @@@"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed preset code"));
}

#[test]
fn test_rename_rejects_invalid_name() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", &sample_code()])
        .assert()
        .success();

    presets_cmd(tmp.path())
        .args(["rename", "Combat", "bad/slash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid preset name"));
}

#[test]
fn test_show_missing_preset_fails_with_hint() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["show", "Nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Preset not found"))
        .stderr(predicate::str::contains("presets list"));
}

#[test]
fn test_robot_mode_list_is_json() {
    let tmp = tempfile::tempdir().unwrap();
    presets_cmd(tmp.path())
        .args(["import", &sample_code()])
        .assert()
        .success();

    let output = presets_cmd(tmp.path())
        .args(["--robot", "list", "--long"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["name"], "Combat");
}
