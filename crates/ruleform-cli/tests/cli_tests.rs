//! End-to-end tests for the `ruleform` binary.

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

const SIGNUP_JSON: &str = r#"{
    "fields": [
        { "name": "user[name]", "value": "jo", "validation": "[NOTEMPTY, L>=3]" },
        { "name": "user[email]", "value": "jo@example.com", "validation": "NOTEMPTY, EMAIL" },
        { "name": "user[age]", "value": "", "validation": "OPTIONAL, NUMERIC" }
    ]
}"#;

fn ruleform() -> Command {
    let mut cmd = Command::cargo_bin("ruleform").unwrap();
    cmd.env_remove("RULEFORM_ALL_ERRORS").env_remove("RUST_LOG");
    cmd
}

fn write_form(dir: &TempDir, file: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn check_reports_failing_fields_in_text() {
    let dir = TempDir::new().unwrap();
    let path = write_form(&dir, "signup.json", SIGNUP_JSON);

    let output = ruleform().current_dir(dir.path()).arg("check").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("user[name]"));
    assert!(stdout.contains("Name must be greater or equal to 3 characters."));
    assert!(stdout.contains("1 error(s) on 1 field(s)"));
}

#[test]
fn check_json_output_is_ordered_by_field() {
    let dir = TempDir::new().unwrap();
    let path = write_form(
        &dir,
        "form.json",
        r#"{ "fields": [
            { "name": "b", "value": "", "validation": "NOTEMPTY" },
            { "name": "a", "value": "x", "validation": "NUMERIC" }
        ] }"#,
    );

    let output = ruleform()
        .current_dir(dir.path())
        .args(["check", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"]["b"][0], "B must not be empty.");

    let b = stdout.find("\"b\"").unwrap();
    let a = stdout.find("\"a\"").unwrap();
    assert!(b < a);
}

#[test]
fn check_accepts_toml_and_passes_valid_forms() {
    let dir = TempDir::new().unwrap();
    let path = write_form(
        &dir,
        "form.toml",
        r#"
[[fields]]
name = "password"
value = "secret1"
validation = "NOTEMPTY, L>=6"

[[fields]]
name = "confirm"
value = "secret1"
validation = "V==password"
"#,
    );

    let output = ruleform().current_dir(dir.path()).arg("check").arg(&path).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().contains("All fields are valid."));
}

#[test]
fn all_errors_flag_collects_every_message() {
    let dir = TempDir::new().unwrap();
    let path = write_form(
        &dir,
        "form.json",
        r#"{ "fields": [ { "name": "code", "value": "", "validation": "NOTEMPTY, NUMERIC" } ] }"#,
    );

    let first_only = ruleform()
        .current_dir(dir.path())
        .args(["check", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&first_only.stdout).unwrap();
    assert_eq!(report["errors"]["code"].as_array().unwrap().len(), 1);

    let all = ruleform()
        .current_dir(dir.path())
        .args(["check", "--all-errors", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&all.stdout).unwrap();
    assert_eq!(report["errors"]["code"].as_array().unwrap().len(), 2);
}

#[test]
fn all_errors_can_come_from_the_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_form(
        &dir,
        "form.json",
        r#"{ "fields": [ { "name": "code", "value": "", "validation": "NOTEMPTY, NUMERIC" } ] }"#,
    );

    let output = ruleform()
        .current_dir(dir.path())
        .env("RULEFORM_ALL_ERRORS", "true")
        .args(["check", "--format", "api"])
        .arg(&path)
        .output()
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["error"]["type"], "validation_error");
    assert_eq!(body["error"]["fields"].as_array().unwrap().len(), 2);
}

#[test]
fn check_fails_on_unreadable_input() {
    let dir = TempDir::new().unwrap();
    let path = write_form(&dir, "broken.json", "{ not json");

    let output = ruleform().current_dir(dir.path()).arg("check").arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8(output.stderr).unwrap().contains("Invalid JSON form"));
}

#[test]
fn parse_normalizes_rule_text() {
    let output = ruleform().args(["parse", "notempty , l >= 6"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[NOTEMPTY, L>=6]"));
    assert!(stdout.contains("comparison"));
}

#[test]
fn parse_flags_rules_that_would_be_skipped() {
    let output = ruleform().args(["parse", "BOGUS, L=>3, NOTEMPTY"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("unknown rule"));
    assert!(stdout.contains("invalid"));
}

#[test]
fn rules_lists_predefined_rules() {
    let output = ruleform().arg("rules").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for name in ["NOTEMPTY", "NUMERIC", "EMAIL", "OPTIONAL"] {
        assert!(stdout.contains(name), "missing {name}");
    }
    assert!(stdout.contains("$ must be different than %"));
}
