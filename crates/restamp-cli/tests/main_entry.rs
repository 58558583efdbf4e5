//! Integration tests for the `restamp` binary entry point.
//!
//! Verifies a full rewrite on disk and user-facing error handling for
//! missing arguments and strict runs.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use tempfile::TempDir;

const SOURCE: &str = "package p;\n\nclass A {\n    protected final void run() {}\n}\n";

fn prepare(transformers: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("temp dir");
    let package = temp_dir.path().join("src/p");
    fs::create_dir_all(&package).expect("create package");
    fs::write(package.join("A.java"), SOURCE).expect("write source");
    fs::write(temp_dir.path().join("restamp.at"), transformers).expect("write transformers");
    temp_dir
}

#[test]
fn missing_transformers_exit_with_failure() {
    let mut command = cargo_bin_cmd!("restamp");
    command.arg("--dry-run");
    command
        .assert()
        .failure()
        .stderr(contains("--transformers"));
}

#[test]
fn transformers_are_applied_in_place() {
    let temp_dir = prepare("public-f p.A run()V\n");
    let mut command = cargo_bin_cmd!("restamp");
    command
        .current_dir(temp_dir.path())
        .args(["-a", "restamp.at", "--source-root", "src", "--output", "human"]);

    command
        .assert()
        .success()
        .stdout(contains("1 file(s) rewritten"));

    let written = fs::read_to_string(temp_dir.path().join("src/p/A.java")).expect("read source");
    assert_eq!(
        written,
        "package p;\n\nclass A {\n    public void run() {}\n}\n"
    );
}

#[test]
fn strict_runs_fail_before_writing() {
    let temp_dir = prepare("public-f p.A run()V\npublic p.A stop()V\n");
    let mut command = cargo_bin_cmd!("restamp");
    command.current_dir(temp_dir.path()).args([
        "-a",
        "restamp.at",
        "--source-root",
        "src",
        "--strict",
        "--output",
        "json",
    ]);

    command
        .assert()
        .failure()
        .stdout(contains("p.A: [] {stop()V}"))
        .stderr(contains("could not apply access transformers"));

    let untouched = fs::read_to_string(temp_dir.path().join("src/p/A.java")).expect("read source");
    assert_eq!(untouched, SOURCE);
}
