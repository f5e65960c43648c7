// ABOUTME: Integration tests for the dockhand CLI commands.
// ABOUTME: Validates --help output, init behavior, and config errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn dockhand_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dockhand"))
}

#[test]
fn help_shows_commands() {
    dockhand_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn deploy_help_shows_defaults() {
    dockhand_cmd()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8080"))
        .stdout(predicate::str::contains("DOCKER=1"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("dockhand.yml");

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--domain", "apps.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created dockhand.yml"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("domain: apps.example.com"));
    assert!(content.contains("cleanup: keep"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("dockhand.yml"), "existing: config").unwrap();

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("dockhand.yml");
    fs::write(&config_path, "existing: config").unwrap();

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert!(fs::read_to_string(&config_path).unwrap().contains("proxy:"));
}

#[test]
fn deploy_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "acme", "widget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn deploy_rejects_malformed_env_before_loading_config() {
    let temp_dir = tempfile::tempdir().unwrap();

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .args(["deploy", "acme", "widget", "--env", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid request"));
}

#[test]
fn check_reports_missing_secrets() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(
        temp_dir.path().join("dockhand.yml"),
        "domain: apps.example.com\npublic_ip: { env: DOCKHAND_CLI_TEST_IP }\n",
    )
    .unwrap();

    dockhand_cmd()
        .current_dir(temp_dir.path())
        .env_remove("DOCKHAND_CLI_TEST_IP")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOCKHAND_CLI_TEST_IP"));
}
