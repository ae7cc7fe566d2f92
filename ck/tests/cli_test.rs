//! End-to-end tests for the cwk binary

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config that keys through the log so stdout stays quiet
fn log_sink_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.yml");
    std::fs::write(&path, "wpm: 40\nsink: log\n").expect("Failed to write config");
    path
}

fn cwk(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cwk").expect("cwk binary should build");
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_check_keyable_text() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["check", "paris"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".--."))
        .stdout(predicate::str::contains("..."));
}

#[test]
fn test_check_reports_every_unsupported_character() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["check", "PAR!S,", "$"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported characters: '!', ',', '$'"));
}

#[test]
fn test_timing_table() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["timing", "--wpm", "26"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit: 47ms"))
        .stdout(predicate::str::contains("Dah: 141ms"))
        .stdout(predicate::str::contains("WordSpace: 282ms"));
}

#[test]
fn test_timing_rejects_too_slow() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["timing", "--wpm", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("speed too slow"));
}

#[test]
fn test_send_message() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["send", "--wpm", "60", "E", "T"])
        .assert()
        .success()
        .stderr(predicate::str::contains("key down"));
}

#[test]
fn test_send_rejects_unsupported_message() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["send", "PAR!S"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported character: '!'"))
        .stderr(predicate::str::contains("key down").not());
}

#[test]
fn test_interactive_keys_stdin_until_eof() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["interactive", "--wpm", "60"])
        .write_stdin("e\n/wpm 50\n/status\nbad!\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Speed set to"))
        .stderr(predicate::str::contains("unsupported character: '!'"))
        .stderr(predicate::str::contains("key up"));
}

#[test]
fn test_interactive_exits_when_key_fails_after_eof() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(&config, "wpm: 60\nsink: console\n").unwrap();

    let mut child = StdCommand::cargo_bin("cwk")
        .expect("cwk binary should build")
        .arg("--config")
        .arg(&config)
        .arg("interactive")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn cwk");

    // Closing the read end makes the console sink's first write fail
    drop(child.stdout.take());
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"paris paris paris paris\n").unwrap();
    drop(stdin);

    let deadline = Instant::now() + Duration::from_secs(15);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("cwk interactive kept running after the key failed");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let mut stderr = String::new();
    child.stderr.take().unwrap().read_to_string(&mut stderr).unwrap();
    assert!(!status.success());
    assert!(stderr.contains("Keying failed"), "stderr: {stderr}");
}

#[test]
fn test_interactive_quit_after_queued_text() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .args(["interactive", "--wpm", "5"])
        .write_stdin("t\n/quit\nnot keyed\n")
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stderr(predicate::function(|stderr: &str| {
            // Any element started before the quit is finished with the key up
            stderr.matches("key down").count() == stderr.matches("key up").count()
        }));
}

#[test]
fn test_config_init_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new").join("config.yml");

    cwk(&path)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("wpm: 18"), "written: {written}");
    assert!(written.contains("queue_capacity: 2048"), "written: {written}");
    assert!(written.contains("sink: console"), "written: {written}");

    cwk(&path)
        .args(["config", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    std::fs::write(&path, "wpm: 22\n").unwrap();
    cwk(&path).args(["config", "--init", "--force"]).assert().success();

    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("wpm: 22"), "rewritten: {rewritten}");
    assert!(rewritten.contains("queue_capacity: 2048"), "rewritten: {rewritten}");
}

#[test]
fn test_config_prints_effective_values() {
    let dir = TempDir::new().unwrap();
    let config = log_sink_config(&dir);

    cwk(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("wpm: 40"))
        .stdout(predicate::str::contains("sink: log"));
}
