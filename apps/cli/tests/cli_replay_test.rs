//! Integration tests for the `tune replay` command.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LOG: &str = "[SETUP] loading café data\n{\"type\":\"metric\",\"epoch\":1,\"loss\":2.5}\n[TRAIN] step\n";

/// A `tune` command isolated from any user or local configuration.
fn tune(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tune").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path());
    cmd
}

fn write_log(temp_dir: &TempDir, content: &str) -> String {
    let path = temp_dir.path().join("run.log");
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_replay_prints_lines_and_final_status() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);

    tune(&temp_dir)
        .args(["replay", &path])
        .assert()
        .success()
        .stdout(predicate::str::contains("[INFO] Initiating deployment process..."))
        .stdout(predicate::str::contains("Epoch 1: Training Loss = 2.5000"))
        .stdout(predicate::str::contains("[TRAIN] step"))
        .stdout(predicate::str::contains("Active"))
        .stdout(predicate::str::contains("\"type\"").not());
}

#[test]
fn test_replay_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);

    let assert = tune(&temp_dir).args(["replay", &path, "--json", "--chunk-size", "1"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("replay JSON output should be valid JSON");

    assert_eq!(json["status"], "active");
    assert!(json["id"].as_str().unwrap().starts_with("proj_"));
    assert_eq!(json["metrics"].as_array().unwrap().len(), 1);
    assert_eq!(json["metrics"][0]["epoch"], 1);

    // One-byte reads must not split the multi-byte character.
    let lines: Vec<&str> =
        json["log_lines"].as_array().unwrap().iter().map(|l| l.as_str().unwrap()).collect();
    assert_eq!(
        lines,
        vec![
            "[INFO] Initiating deployment process...",
            "[SETUP] loading café data",
            "Epoch 1: Training Loss = 2.5000",
            "[TRAIN] step",
        ]
    );
}

#[test]
fn test_replay_from_stdin() {
    let temp_dir = TempDir::new().unwrap();

    tune(&temp_dir)
        .args(["replay", "-"])
        .write_stdin("[DEPLOY] pushing image\n[SUCCESS] done")
        .assert()
        .success()
        .stdout(predicate::str::contains("[DEPLOY] pushing image"))
        .stdout(predicate::str::contains("[SUCCESS] done"))
        .stdout(predicate::str::contains("Deploying"));
}

#[test]
fn test_replay_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    tune(&temp_dir)
        .args(["replay", "does-not-exist.log"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERROR] The deployment process failed."))
        .stderr(predicate::str::contains("Replay of does-not-exist.log failed"));
}

#[test]
fn test_replay_require_marker_without_success_line_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);

    tune(&temp_dir)
        .args(["replay", &path, "--require-marker"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed"));

    let with_marker = write_log(&temp_dir, &format!("{LOG}[SUCCESS] ok\n"));
    tune(&temp_dir).args(["replay", &with_marker, "--require-marker"]).assert().success();
}

#[test]
fn test_replay_rejects_zero_chunk_size() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);

    tune(&temp_dir)
        .args(["replay", &path, "--chunk-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--chunk-size"));
}

#[test]
fn test_replay_uses_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);
    let config = temp_dir.path().join("tune.toml");
    std::fs::write(
        &config,
        "[output]\nformat = \"json\"\n\n[interpreter]\npreamble = \"\"\n",
    )
    .unwrap();

    let assert = tune(&temp_dir)
        .args(["--config", config.to_str().unwrap(), "replay", &path])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["log_lines"][0], "[SETUP] loading café data");
}

#[test]
fn test_invalid_local_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(&temp_dir, LOG);
    std::fs::write(temp_dir.path().join(".tuneforgerc"), "[interpreter\n").unwrap();

    tune(&temp_dir)
        .args(["replay", &path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
