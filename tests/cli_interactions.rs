//! CLI option handling for the three binaries
//!
//! Nothing here needs a running echo service: every case either fails
//! argument parsing, stops at configuration, or never reaches a request.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn rlt() -> Command {
    Command::cargo_bin("rlt").unwrap()
}

#[test]
fn test_help_lists_options() {
    rlt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--swarm-url"))
        .stdout(predicate::str::contains("--k8s-url"))
        .stdout(predicate::str::contains("--rate"))
        .stdout(predicate::str::contains("--concurrency"));
}

#[test]
fn test_version() {
    rlt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rlt"));
}

#[test]
fn test_unknown_target_rejected() {
    rlt()
        .args(["--target", "mesos"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'mesos'"));
}

#[test]
fn test_zero_concurrency_rejected() {
    rlt()
        .args(["--concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency"));
}

#[test]
fn test_timeout_out_of_range_rejected() {
    rlt().args(["--timeout", "0"]).assert().failure();
    rlt().args(["--timeout", "100000"]).assert().failure();
}

#[test]
fn test_color_flags_conflict() {
    rlt()
        .args(["--color", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_swarm_url_is_config_error() {
    rlt()
        .args(["--swarm-url", "ftp://example.com/reverse", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("http or https"))
        .stderr(predicate::str::contains("Configuration help:"));
}

#[test]
fn test_prefix_with_separator_rejected() {
    rlt()
        .args(["--prefix", "a/b", "--no-color"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("path separators"));
}

#[test]
fn test_empty_k8s_url_skips_k8s_run() {
    let dir = TempDir::new().unwrap();

    rlt()
        .args(["--target", "k8s", "--k8s-url", "", "--no-color"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[INFO] Starting client. target=k8s"))
        .stdout(predicate::str::contains("Total wall-clock time:"))
        .stderr(predicate::str::contains("--k8s-url required for target=k8s or both"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_echo_service_help() {
    Command::cargo_bin("reverse-echo")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--host"));
}

#[test]
fn test_echo_service_rejects_bad_port() {
    Command::cargo_bin("reverse-echo")
        .unwrap()
        .args(["--port", "70000"])
        .assert()
        .failure();
}

#[test]
fn test_reducer_chart_defaults_to_jpeg() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("reducer-chart")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved plot: reducers_vs_time_all.jpeg"));

    let bytes = std::fs::read(dir.path().join("reducers_vs_time_all.jpeg")).unwrap();
    assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
}

#[test]
fn test_reducer_chart_writes_png() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("reducers.png");

    Command::cargo_bin("reducer-chart")
        .unwrap()
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved plot:"));

    let bytes = std::fs::read(&output).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[cfg(unix)]
#[test]
fn test_interrupt_prints_notice_and_exits_130() {
    use std::process::Stdio;
    use std::time::Duration;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let dir = TempDir::new().unwrap();

    // 100000 requests at 5/s keeps the bulk pass busy far longer than the test
    let child = Command::cargo_bin("rlt")
        .unwrap()
        .args(["--swarm-url", &format!("http://127.0.0.1:{}/reverse", port)])
        .args(["-n", "100000", "-r", "5", "--timeout", "1", "--no-color"])
        .arg("--output-dir")
        .arg(dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    std::thread::sleep(Duration::from_secs(2));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(130), "stdout: {}", stdout);
    assert!(stdout.contains("Running 100000-request test for swarm"));
    assert!(stdout.contains("[INFO] Interrupted by user. Exiting."));
    assert!(!stdout.contains("Total wall-clock time"));
}
