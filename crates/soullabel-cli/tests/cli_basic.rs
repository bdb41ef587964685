//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config file and home
//! directory, then check its output.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let config = home.join("config.toml");
    let mut child = Command::new(env!("CARGO_BIN_EXE_soullabel"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("HOME", home)
        .env_remove("SOULLABEL_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    if let Some(text) = stdin {
        child
            .stdin
            .take()
            .unwrap()
            .write_all(text.as_bytes())
            .unwrap();
    } else {
        drop(child.stdin.take());
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_simulate_prints_result_snapshot() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--nickname", "Mia", "--gender", "female", "--seed", "7"],
        None,
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");

    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["type"], "state_snapshot");
    assert_eq!(snapshot["stage"], "result");
    assert_eq!(snapshot["nickname"], "Mia");
    assert_eq!(snapshot["gender"], "female");
    assert!(snapshot["result_tag"].as_str().is_some_and(|t| !t.is_empty()));

    let emotion = snapshot["stats"]["emotion"].as_u64().unwrap();
    let defense = snapshot["stats"]["defense"].as_u64().unwrap();
    assert!((60..100).contains(&emotion));
    assert!((30..100).contains(&defense));
}

#[test]
fn test_simulate_is_reproducible_with_seed() {
    let home = tempfile::tempdir().unwrap();
    let args = ["simulate", "--nickname", "Mia", "--gender", "female", "--seed", "99"];
    let (first, _, _) = run_cli(home.path(), &args, None);
    let (second, _, _) = run_cli(home.path(), &args, None);

    let a: serde_json::Value = serde_json::from_str(&first).unwrap();
    let b: serde_json::Value = serde_json::from_str(&second).unwrap();
    assert_eq!(a["result_tag"], b["result_tag"]);
    assert_eq!(a["stats"], b["stats"]);
}

#[test]
fn test_simulate_json_lines() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["simulate", "--nickname", "Mia", "--gender", "f", "--seed", "1", "--json"],
        None,
    );
    assert_eq!(code, 0);

    let kinds: Vec<String> = stdout
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["type"].to_string())
        .collect();
    assert_eq!(kinds.first().map(String::as_str), Some("\"quiz_started\""));
    assert_eq!(kinds.last().map(String::as_str), Some("\"stats_revealed\""));
    assert_eq!(kinds.iter().filter(|k| *k == "\"result_selected\"").count(), 1);
}

#[test]
fn test_simulate_rejects_unknown_gender() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        home.path(),
        &["simulate", "--nickname", "Mia", "--gender", "robot"],
        None,
    );
    assert_ne!(code, 0);
}

#[test]
fn test_simulate_rejects_blank_nickname() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--nickname", " ", "--gender", "male"],
        None,
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("profile incomplete"));
}

#[test]
fn test_play_instant_with_piped_input() {
    let home = tempfile::tempdir().unwrap();
    let input = "\n1\n2\n3\n4\n1\n2\n3\n4\nMia\nfemale\ns\nq\n";
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["play", "--instant", "--seed", "3"],
        Some(input),
    );
    assert_eq!(code, 0, "play failed: {stderr}");
    assert!(stdout.contains("Question 1/8"));
    assert!(stdout.contains("Mia's true composition"));
    assert!(stdout.contains("share is not implemented yet!"));
}

#[test]
fn test_questions_json() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["questions", "--json"], None);
    assert_eq!(code, 0);
    let data: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(data["questions"].as_array().unwrap().len(), 8);
    assert!(!data["tags"].as_array().unwrap().is_empty());
}

#[test]
fn test_config_set_get_reset() {
    let home = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timing.analyzing_tick_ms"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "300");

    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "timing.analyzing_tick_ms", "10"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timing.analyzing_tick_ms"], None);
    assert_eq!(stdout.trim(), "10");

    let (_, _, code) = run_cli(home.path(), &["config", "reset"], None);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timing.analyzing_tick_ms"], None);
    assert_eq!(stdout.trim(), "300");
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timing.bogus", "1"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_custom_quiz_file_from_config() {
    let home = tempfile::tempdir().unwrap();
    let quiz = home.path().join("quiz.toml");
    std::fs::write(
        &quiz,
        "tags = [\"Solo Tag\"]\n\n[[questions]]\nid = 1\ntext = \"Ready?\"\noptions = [{ id = \"y\", text = \"yes\" }]\n",
    )
    .unwrap();

    let quiz_path = quiz.to_string_lossy().to_string();
    let (_, _, code) = run_cli(home.path(), &["config", "set", "quiz.data_path", &quiz_path], None);
    assert_eq!(code, 0);

    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["simulate", "--nickname", "Mia", "--gender", "other"],
        None,
    );
    assert_eq!(code, 0, "simulate failed: {stderr}");
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["result_tag"], "Solo Tag");
    assert_eq!(snapshot["question_count"], 1);
}
