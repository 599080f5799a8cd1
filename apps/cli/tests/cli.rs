use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn conduit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("conduit").unwrap();
    cmd.current_dir(dir).env_clear().env("NO_COLOR", "1");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "track.json",
        r#"{"type": "track", "event": "Clicked CTA Button", "userId": "u-7"}"#,
    );
    write(
        dir.path(),
        "identify.json",
        r#"{"type": "identify", "userId": "u-7", "traits": {"company_name": "Acme"}}"#,
    );
    dir
}

#[test]
fn list_shows_builtin_destinations() {
    let dir = workspace();
    conduit(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("actions-schematic"))
        .stdout(predicate::str::contains("actions-fullstory"))
        .stdout(predicate::str::contains("identifyUserV2"));
}

#[test]
fn defaults_prints_default_mapping() {
    let dir = workspace();
    conduit(dir.path())
        .args(["defaults", "actions-schematic", "identifyUser"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""@path": "$.traits.company_name""#));
}

#[test]
fn resolve_applies_defaults_and_overrides() {
    let dir = workspace();
    conduit(dir.path())
        .args(["resolve", "actions-schematic", "identifyUser", "--event", "identify.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""company_name": "Acme""#))
        .stdout(predicate::str::contains(r#""user_id": "u-7""#));

    write(
        dir.path(),
        "mapping.json",
        r#"{"company_name": {"@template": "{{traits.company_name}} Inc"}}"#,
    );
    conduit(dir.path())
        .args([
            "resolve",
            "actions-schematic",
            "identifyUser",
            "--event",
            "identify.json",
            "--mapping",
            "mapping.json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""company_name": "Acme Inc""#));
}

#[test]
fn resolve_reports_missing_required_field() {
    let dir = workspace();
    write(dir.path(), "anonymous.json", r#"{"type": "track", "userId": "u-7"}"#);
    conduit(dir.path())
        .args(["resolve", "actions-schematic", "trackEvent", "--event", "anonymous.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field `event_name`"));
}

#[test]
fn unknown_destination_fails() {
    let dir = workspace();
    conduit(dir.path())
        .args(["defaults", "acme", "trackEvent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown destination `acme`"));
}

#[test]
fn send_dry_run_prints_request() {
    let dir = workspace();
    write(
        dir.path(),
        "conduit.toml",
        "[destinations.actions-schematic]\napiKey = \"sch-test\"\n",
    );
    conduit(dir.path())
        .args(["send", "--event", "track.json", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""action":"trackEvent""#))
        .stdout(predicate::str::contains("https://api.schematichq.com/events"))
        .stdout(predicate::str::contains(r#""event":"clicked_cta_button""#))
        .stdout(predicate::str::contains("sch-test").not());
}

#[test]
fn send_without_configuration_fails() {
    let dir = workspace();
    conduit(dir.path())
        .args(["send", "--event", "track.json", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no cloud destination is configured"));
}

#[test]
fn send_rejects_missing_api_key() {
    let dir = workspace();
    write(dir.path(), "custom.toml", "[destinations.actions-schematic]\n");
    conduit(dir.path())
        .args(["--config", "custom.toml", "send", "--event", "track.json", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid settings for actions-schematic"));
}

#[test]
fn runs_without_config_file() {
    let dir = TempDir::new().unwrap();
    conduit(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("actions-schematic"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = workspace();
    conduit(dir.path())
        .args(["--config", "absent.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));

    conduit(dir.path())
        .env("CONDUIT_CONFIG", "absent.toml")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}
