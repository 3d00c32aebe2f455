//! Configuration resolution through the `roam config` command.
//!
//! Covers precedence (flag > env > file > default), legacy keys and their
//! warnings, and config-file handling.

mod common;

use common::{TestEnv, VALID_TOKEN};
use predicates::prelude::*;

/// Run `roam config` and parse the JSON printed after any warnings.
fn config_json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.arg("config").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let start = stdout.find('{').expect("no JSON in output");
    serde_json::from_str(&stdout[start..]).unwrap()
}

// ==================== Defaults ====================

#[test]
fn test_defaults_without_any_source() {
    let env = TestEnv::new();
    let json = config_json(&mut env.roam());

    assert_eq!(json["url"], "http://localhost:4646");
    assert_eq!(json["token"], serde_json::Value::Null);
    assert_eq!(json["namespace"], "*");
    assert_eq!(json["log_offset"], 1_000_000);
    assert_eq!(json["update_seconds"], 2);
    assert_eq!(json["event"]["namespace"], "default");
    assert_eq!(json["tls"]["skip_verify"], false);
}

// ==================== Precedence ====================

#[test]
fn test_address_flag_wins() {
    let env = TestEnv::new();
    env.write_default_config("nomad_addr = \"http://file:3\"\n");

    let json = config_json(
        env.roam()
            .env("NOMAD_ADDR", "http://env:2")
            .args(["--address", "http://h:1"]),
    );
    assert_eq!(json["url"], "http://h:1");
}

#[test]
fn test_env_wins_over_file() {
    let env = TestEnv::new();
    env.write_default_config("nomad_addr = \"http://file:3\"\n");

    let json = config_json(env.roam().env("NOMAD_ADDR", "http://env:2"));
    assert_eq!(json["url"], "http://env:2");
}

#[test]
fn test_file_used_when_nothing_else_set() {
    let env = TestEnv::new();
    env.write_default_config(
        "nomad_addr = \"http://file:3\"\nroam_update_seconds = 7\nnomad_skip_verify = true\n",
    );

    let json = config_json(&mut env.roam());
    assert_eq!(json["url"], "http://file:3");
    assert_eq!(json["update_seconds"], 7);
    assert_eq!(json["tls"]["skip_verify"], true);
}

#[test]
fn test_empty_flag_falls_through() {
    let env = TestEnv::new();
    let json = config_json(
        env.roam()
            .env("NOMAD_REGION", "eu")
            .args(["--region", ""]),
    );
    assert_eq!(json["region"], "eu");
}

#[test]
fn test_topics_array_in_file() {
    let env = TestEnv::new();
    env.write_default_config("roam_event_topics = [\"Job:web\", \"Node\"]\n");

    let json = config_json(&mut env.roam());
    let topics = json["event"]["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert!(topics.contains(&serde_json::json!("Job:web")));
    assert!(topics.contains(&serde_json::json!("Node:*")));
}

#[test]
fn test_token_is_masked() {
    let env = TestEnv::new();
    env.roam()
        .args(["config", "--token", VALID_TOKEN])
        .assert()
        .success()
        .stdout(predicate::str::contains("1111...5555"))
        .stdout(predicate::str::contains(VALID_TOKEN).not());
}

// ==================== Legacy Keys ====================

#[test]
fn test_legacy_address_warns_on_stdout() {
    let env = TestEnv::new();
    let assert = env
        .roam()
        .env("ROAM_ADDR", "http://legacy:4646")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "warning: use of ROAM_ADDR env variable or roam_addr in config file will be removed",
        ))
        .stdout(predicate::str::contains(
            "use NOMAD_ADDR env variable or nomad_addr in config file instead",
        ));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("\"url\": \"http://legacy:4646\""));
}

#[test]
fn test_current_key_silences_legacy() {
    let env = TestEnv::new();
    env.roam()
        .env("ROAM_ADDR", "http://legacy:4646")
        .env("NOMAD_ADDR", "http://current:4646")
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("warning").not())
        .stdout(predicate::str::contains("http://current:4646"));
}

#[test]
fn test_legacy_token_from_file_warns() {
    let env = TestEnv::new();
    env.write_default_config(&format!("roam_token = \"{}\"\n", VALID_TOKEN));

    env.roam()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("ROAM_TOKEN"))
        .stdout(predicate::str::contains("NOMAD_TOKEN"));
}

// ==================== Config File ====================

#[test]
fn test_explicit_config_file() {
    let env = TestEnv::new();
    let path = env.write_file("custom.toml", "nomad_namespace = \"ops\"\n");

    let json = config_json(env.roam().arg("--config").arg(&path));
    assert_eq!(json["namespace"], "ops");
}

#[test]
fn test_missing_explicit_config_file_fails() {
    let env = TestEnv::new();
    env.roam()
        .args(["--config", "does-not-exist.toml", "config"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: "))
        .stderr(predicate::str::contains("does-not-exist.toml"));
}

#[test]
fn test_malformed_default_config_fails() {
    let env = TestEnv::new();
    env.write_default_config("nomad_addr = \n");

    env.roam()
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains(".roam.toml"));
}
