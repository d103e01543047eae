//! CLI smoke tests for stagehand.
//!
//! These tests verify that the CLI commands run without panicking and
//! return appropriate exit codes. Nothing here invokes a real toolchain or
//! platform SDK.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the stagehand binary.
fn stagehand_cmd() -> Command {
    cargo_bin_cmd!("stagehand")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
    stagehand_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    stagehand_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stagehand"));
}

#[test]
fn subcommand_help_works() {
    for cmd in &[
        "build",
        "package",
        "devices",
        "copy-tools",
        "clean-builds",
        "sync",
        "info",
    ] {
        stagehand_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_rejects_malformed_target_spec() {
    let temp = TempDir::new().unwrap();

    stagehand_cmd()
        .arg("build")
        .arg("--target")
        .arg("Shooter-linux-shipping")
        .arg("--output-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME:PLATFORM:CONFIG"));
}

#[test]
fn build_fails_when_tool_is_missing() {
    let temp = TempDir::new().unwrap();

    stagehand_cmd()
        .arg("build")
        .arg("--target")
        .arg("Shooter:linux:development")
        .arg("--tool")
        .arg("stagehand-no-such-tool")
        .arg("--output-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shooter"));
}

// =============================================================================
// package
// =============================================================================

#[test]
fn package_with_nothing_requested_is_a_no_op() {
    stagehand_cmd()
        .arg("package")
        .arg("--project")
        .arg("/tmp/Shooter.project")
        .arg("--platform")
        .arg("linux")
        .arg("--no-client")
        .assert()
        .success()
        .stdout(predicate::str::contains("Package complete"));
}

#[test]
fn package_without_platforms_fails() {
    stagehand_cmd()
        .arg("package")
        .arg("--project")
        .arg("/tmp/Shooter.project")
        .arg("--skip-stage")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no platforms"));
}

#[test]
fn package_requires_a_stage_directory_for_staged_runs() {
    stagehand_cmd()
        .arg("package")
        .arg("--project")
        .arg("/tmp/Shooter.project")
        .arg("--platform")
        .arg("linux")
        .assert()
        .failure()
        .stderr(predicate::str::contains("stage directory"));
}

// =============================================================================
// devices
// =============================================================================

#[test]
fn devices_lists_localhost_for_desktop_platforms() {
    stagehand_cmd()
        .arg("devices")
        .arg("linux")
        .assert()
        .success()
        .stdout(predicate::str::contains("device"));
}

#[test]
fn devices_rejects_unknown_platform() {
    stagehand_cmd()
        .arg("devices")
        .arg("dreamcast")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown platform"));
}

// =============================================================================
// copy-tools
// =============================================================================

#[test]
fn copy_tools_preserves_relative_layout() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tools");
    std::fs::create_dir_all(root.join("bin")).unwrap();
    std::fs::write(root.join("bin/helper.exe"), b"x").unwrap();
    let out = temp.path().join("out");

    stagehand_cmd()
        .arg("copy-tools")
        .arg("--root")
        .arg(&root)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 1 file(s)"));

    assert!(out.join("bin/helper.exe").exists());
}

#[test]
fn copy_tools_with_no_matches_fails() {
    let temp = TempDir::new().unwrap();

    stagehand_cmd()
        .arg("copy-tools")
        .arg("--root")
        .arg(temp.path())
        .arg("--out-dir")
        .arg(temp.path().join("out"))
        .arg("--pattern")
        .arg("missing*")
        .assert()
        .failure()
        .stderr(predicate::str::contains("matched no files"));
}

// =============================================================================
// clean-builds
// =============================================================================

#[test]
fn clean_builds_removes_expired_directories() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("Build-100")).unwrap();
    std::fs::create_dir(temp.path().join("Archive")).unwrap();

    stagehand_cmd()
        .arg("clean-builds")
        .arg("--parent-dir")
        .arg(temp.path())
        .arg("--days")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));

    assert!(!temp.path().join("Build-100").exists());
    assert!(temp.path().join("Archive").exists());
}

#[test]
fn clean_builds_keeps_recent_directories_by_default() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("Build-100")).unwrap();

    stagehand_cmd()
        .arg("clean-builds")
        .arg("--parent-dir")
        .arg(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("Build-100").exists());
}

#[test]
fn clean_builds_requires_an_existing_parent() {
    stagehand_cmd()
        .arg("clean-builds")
        .arg("--parent-dir")
        .arg("/nonexistent/stagehand")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parent directory"));
}

// =============================================================================
// info
// =============================================================================

#[test]
#[serial]
fn info_shows_host_details() {
    stagehand_cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("platform"));
}

#[test]
#[serial]
fn info_json_output_parses() {
    let output = stagehand_cmd()
        .arg("info")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(parsed["host"]["hostname"].is_string());
}

#[test]
#[serial]
fn info_reflects_build_environment_variables() {
    stagehand_cmd()
        .arg("info")
        .env("STAGEHAND_CHANGELIST", "4242")
        .env("STAGEHAND_BRANCH", "release/1.0")
        .assert()
        .success()
        .stdout(predicate::str::contains("4242"))
        .stdout(predicate::str::contains("release/1.0"));
}
