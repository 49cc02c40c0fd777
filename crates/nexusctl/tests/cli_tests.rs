//! CLI integration tests for nexusctl
//!
//! Tests the CLI surface without a switch or a model endpoint:
//! - nexusctl --help / --version
//! - nexusctl commands           default and configured command lists
//! - nexusctl analyze RECORD     missing and empty records
//! - nexusctl run --collect-only input and connection failures
//!
//! Every test points HOME at a temp dir so a developer's own config never
//! leaks in, and removes the API key from the environment.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::{tempdir, NamedTempFile, TempDir};

fn nexusctl(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nexusctl"));
    cmd.env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("NEXUS_DIAG_CONFIG")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    cmd
}

fn run_in(home: &TempDir, args: &[&str]) -> Output {
    nexusctl(home.path())
        .args(args)
        .output()
        .expect("failed to execute nexusctl")
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_help_lists_subcommands() {
    let home = tempdir().unwrap();
    let output = run_in(&home, &["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("commands"));
    assert!(stdout.contains("--collect-only"));
}

#[test]
fn test_version() {
    let home = tempdir().unwrap();
    let output = run_in(&home, &["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("nexusctl "));
}

#[test]
fn test_commands_lists_defaults() {
    let home = tempdir().unwrap();
    let output = run_in(&home, &["commands"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[1]  show version"));
    assert!(stdout.contains("show interface status"));
    assert!(stdout.contains("show logging log | last 100"));
    assert_eq!(stdout.lines().count(), 7);
}

#[test]
fn test_commands_from_config_file() {
    let home = tempdir().unwrap();
    let config = config_file("[collection]\ncommands = [\"show clock\", \"show vpc\"]\n");
    let output = run_in(
        &home,
        &["commands", "--config", config.path().to_str().unwrap()],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[1]  show clock"));
    assert!(stdout.contains("[2]  show vpc"));
    assert!(!stdout.contains("show version"));
}

#[test]
fn test_non_show_command_in_config_is_rejected() {
    let home = tempdir().unwrap();
    let config = config_file("[collection]\ncommands = [\"reload\"]\n");
    let output = run_in(
        &home,
        &["commands", "--config", config.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_unparseable_config_is_invalid_input() {
    let home = tempdir().unwrap();
    let config = config_file("[ssh\nport = ");
    let output = run_in(
        &home,
        &["commands", "--config", config.path().to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_analyze_missing_record() {
    let home = tempdir().unwrap();
    let missing = home.path().join("switch_data_20240501_100000.json");
    let output = run_in(&home, &["analyze", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(74));
}

#[test]
fn test_analyze_record_without_commands() {
    let home = tempdir().unwrap();
    let record = home.path().join("switch_data_20240501_100000.json");
    std::fs::write(
        &record,
        r#"{"host":"10.0.0.1","collected_at":"2024-05-01T10:00:00Z","commands":[]}"#,
    )
    .unwrap();

    let output = run_in(&home, &["analyze", record.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(69));
}

#[test]
fn test_run_with_missing_key_file() {
    let home = tempdir().unwrap();
    let output = run_in(
        &home,
        &[
            "--collect-only",
            "--host",
            "127.0.0.1",
            "-u",
            "admin",
            "--key-file",
            "/nonexistent/id_ed25519",
        ],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_run_unreachable_switch() {
    let home = tempdir().unwrap();
    let key = config_file("not really a key\n");
    let output = run_in(
        &home,
        &[
            "run",
            "--collect-only",
            "--host",
            "127.0.0.1",
            "-p",
            "1",
            "-u",
            "admin",
            "--key-file",
            key.path().to_str().unwrap(),
            "-o",
            home.path().join("records").to_str().unwrap(),
        ],
    );
    assert_eq!(output.status.code(), Some(69));
    assert!(!home.path().join("records").exists());
}
