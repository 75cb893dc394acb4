//! Behavioural smoke tests for the CLI entrypoint.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path should be valid UTF-8")
}

#[test]
fn cli_without_arguments_shows_usage() {
    let mut cmd = cargo_bin_cmd!("tether");
    cmd.assert().failure().stderr(contains("Usage"));
}

#[test]
fn cli_help_lists_device_operations() {
    let mut cmd = cargo_bin_cmd!("tether");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("push"))
        .stdout(contains("pull"))
        .stdout(contains("check"));
}

#[test]
fn cli_root_prints_local_device_root() {
    let device_dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("tether");
    cmd.args(["--local-root", path_str(device_dir.path()), "root"]);
    cmd.assert().success().stdout("/tether-tests\n");
}

#[test]
fn cli_push_then_pull_round_trips_content() {
    let device_dir = TempDir::new().expect("device temp dir");
    let local_dir = TempDir::new().expect("local temp dir");
    let payload = local_dir.path().join("mybinary.zip");
    fs::write(&payload, b"cli round trip payload").expect("write payload");
    let fetched = local_dir.path().join("fetched.zip");

    let mut push = cargo_bin_cmd!("tether");
    push.args([
        "--local-root",
        path_str(device_dir.path()),
        "push",
        path_str(&payload),
        "mybinary.zip",
    ]);
    push.assert().success();

    let mut pull = cargo_bin_cmd!("tether");
    pull.args([
        "--local-root",
        path_str(device_dir.path()),
        "pull",
        "mybinary.zip",
        path_str(&fetched),
    ]);
    pull.assert().success();

    let round_tripped = fs::read(&fetched).expect("read fetched file");
    assert_eq!(round_tripped, b"cli round trip payload");
}

#[test]
fn cli_pull_of_missing_file_exits_with_two() {
    let device_dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("tether");
    cmd.args([
        "--local-root",
        path_str(device_dir.path()),
        "pull",
        "doesnotexist",
    ]);
    cmd.assert()
        .failure()
        .code(2)
        .stderr(contains("remote file not found"));
}

#[test]
fn cli_rm_tolerates_missing_remote_files() {
    let device_dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("tether");
    cmd.args([
        "--local-root",
        path_str(device_dir.path()),
        "rm",
        "doesnotexist",
    ]);
    cmd.assert().success();
}

#[test]
fn cli_check_verifies_a_local_device() {
    let device_dir = TempDir::new().expect("device temp dir");
    let local_dir = TempDir::new().expect("local temp dir");
    let payload = local_dir.path().join("mybinary.zip");
    fs::write(&payload, b"PK\x03\x04 check me").expect("write payload");

    let mut cmd = cargo_bin_cmd!("tether");
    cmd.args([
        "--local-root",
        path_str(device_dir.path()),
        "check",
        path_str(&payload),
    ]);
    cmd.assert()
        .success()
        .stdout(contains("round trip verified"));
}

#[test]
fn cli_check_fails_for_a_missing_local_file() {
    let device_dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("tether");
    cmd.args([
        "--local-root",
        path_str(device_dir.path()),
        "check",
        "/no/such/payload.bin",
    ]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(contains("verification failed"));
}
