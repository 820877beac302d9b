//! Integration tests for the calcy CLI.
//!
//! These tests run the actual binary against temporary history files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Build a command pointed at the given history file
fn calcy(history: &Path) -> Command {
    let mut cmd = Command::cargo_bin("calcy").unwrap();
    cmd.arg("--history").arg(history);
    cmd
}

/// Run `calcy press` with the given labels and return stdout
fn press(history: &Path, labels: &[&str]) -> String {
    let assert = calcy(history).arg("press").args(labels).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_press_simple_addition() {
    let dir = tempdir().unwrap();
    let output = press(&dir.path().join("h.csv"), &["7", "+", "5", "="]);

    assert_eq!(output, "7 + 5 = 12\n12\n");
}

#[test]
fn test_press_chain_without_equals_shows_operator() {
    let dir = tempdir().unwrap();
    let output = press(&dir.path().join("h.csv"), &["2", "+", "3", "×"]);

    assert_eq!(output, "× 5\n");
}

#[test]
fn test_press_accepts_hyphen_labels() {
    let dir = tempdir().unwrap();
    let output = press(&dir.path().join("h.csv"), &["9", "-", "4", "+/-", "="]);

    assert_eq!(output, "9 - -4 = 13\n13\n");
}

#[test]
fn test_keys_from_stdin() {
    let dir = tempdir().unwrap();
    calcy(&dir.path().join("h.csv"))
        .arg("keys")
        .write_stdin("2+3+4\n")
        .assert()
        .success()
        .stdout("2 + 3 + 4 = 9\n9\n");
}

#[test]
fn test_keys_from_file_ignores_unmapped_keys() {
    let dir = tempdir().unwrap();
    let keys = dir.path().join("keys.txt");
    fs::write(&keys, "10 / 4 =\nc12*2\n").unwrap();

    calcy(&dir.path().join("h.csv"))
        .arg("keys")
        .arg(&keys)
        .assert()
        .success()
        .stdout("10 ÷ 4 = 2.5\n12 × 2 = 24\n24\n");
}

#[test]
fn test_divide_by_zero_prints_error() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");
    let output = press(&history, &["5", "÷", "0", "="]);

    assert_eq!(output, "Error\n");
    assert!(!history.exists());
}

#[test]
fn test_history_lists_newest_first() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");
    press(&history, &["1", "+", "1", "="]);
    press(&history, &["6", "×", "7", "="]);

    let assert = calcy(&history).arg("history").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("6 × 7 = 42"));
    assert!(lines[1].ends_with("1 + 1 = 2"));
}

#[test]
fn test_history_file_has_header() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");
    press(&history, &["3", "+", "4", "="]);

    let contents = fs::read_to_string(&history).unwrap();
    assert!(contents.starts_with("id,timestamp,operation,result"));
    assert!(contents.contains(",3 + 4,7"));
}

#[test]
fn test_history_clear() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");
    press(&history, &["3", "+", "4", "="]);

    calcy(&history)
        .args(["history", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("History cleared"));

    calcy(&history)
        .arg("history")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_no_history_flag_writes_nothing() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");

    calcy(&history)
        .args(["--no-history", "press", "2", "×", "2", "="])
        .assert()
        .success()
        .stdout("2 × 2 = 4\n4\n");

    assert!(!history.exists());
}

#[test]
fn test_foreign_history_file_is_an_error() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("accounts.csv");
    fs::write(&history, "client,available,held,total,locked\n").unwrap();

    calcy(&history)
        .arg("history")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_press_refuses_foreign_history_file() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("accounts.csv");
    let accounts = "client,available,held,total,locked\n1,1.0000,0.0000,1.0000,false\n";
    fs::write(&history, accounts).unwrap();

    calcy(&history)
        .args(["press", "1", "+", "1", "="])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected header"));

    assert_eq!(fs::read_to_string(&history).unwrap(), accounts);
}

#[test]
fn test_history_with_no_history_flag_is_rejected() {
    let dir = tempdir().unwrap();
    let history = dir.path().join("h.csv");
    press(&history, &["3", "+", "4", "="]);

    calcy(&history)
        .args(["--no-history", "history", "--clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--no-history"));

    assert!(history.exists());
}

#[test]
fn test_missing_keys_file_error() {
    let dir = tempdir().unwrap();
    calcy(&dir.path().join("h.csv"))
        .args(["keys", "nonexistent.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_press_requires_labels() {
    let dir = tempdir().unwrap();
    calcy(&dir.path().join("h.csv"))
        .arg("press")
        .assert()
        .failure();
}
