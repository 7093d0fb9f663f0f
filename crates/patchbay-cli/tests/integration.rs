//! Integration tests for patchbay-cli.
//!
//! Runs the `patchbay` binary and checks its output.

use std::process::Command;

use tempfile::TempDir;

/// Helper to get the path to the `patchbay` binary built by cargo.
fn patchbay_bin() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_patchbay"));
    command.env_remove("RUST_LOG");
    command
}

// ---------------------------------------------------------------------------
// `patchbay modules`
// ---------------------------------------------------------------------------

#[test]
fn cli_modules_lists_builtins() {
    let output = patchbay_bin()
        .arg("modules")
        .output()
        .expect("failed to run patchbay modules");
    assert!(output.status.success(), "patchbay modules failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Available Modules"));
    for module in ["constant", "toggle", "selector", "collect", "probe"] {
        assert!(stdout.contains(module), "listing should contain '{module}'");
    }
}

#[test]
fn cli_modules_filters_by_category() {
    let output = patchbay_bin()
        .args(["modules", "--category", "sink"])
        .output()
        .expect("failed to run patchbay modules --category");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("probe"));
    assert!(!stdout.contains("constant"));
}

#[test]
fn cli_modules_rejects_unknown_category() {
    let output = patchbay_bin()
        .args(["modules", "--category", "effects"])
        .output()
        .expect("failed to run patchbay modules");
    assert!(!output.status.success());
}

#[test]
fn cli_modules_respects_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("patchbay.toml");
    std::fs::write(&config, "disabled_modules = [\"probe\"]\n").unwrap();

    let output = patchbay_bin()
        .args(["modules", "--category", "sink", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run patchbay modules --config");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Audio sink"));
    assert!(stdout.contains("Disabled: probe"));
}

#[test]
fn cli_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("patchbay.toml");
    std::fs::write(&config, "disabled_modules = [\"fuzz\"]\n").unwrap();

    let output = patchbay_bin()
        .arg("--config")
        .arg(&config)
        .arg("modules")
        .output()
        .expect("failed to run patchbay");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("fuzz"));
}

#[test]
fn cli_logs_config_load_at_debug() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("patchbay.toml");
    std::fs::write(&config, "backend_available = false\n").unwrap();

    let output = patchbay_bin()
        .env("RUST_LOG", "debug")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("modules")
        .output()
        .expect("failed to run patchbay");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config loaded"), "stderr: {stderr}");
    assert!(stderr.contains("patchbay.toml"));
}

#[test]
fn cli_is_quiet_about_config_at_default_filter() {
    let output = patchbay_bin()
        .arg("modules")
        .output()
        .expect("failed to run patchbay");
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("config"));
}

// ---------------------------------------------------------------------------
// `patchbay describe`
// ---------------------------------------------------------------------------

#[test]
fn cli_describe_shows_parameters_and_ports() {
    let output = patchbay_bin()
        .args(["describe", "selector"])
        .output()
        .expect("failed to run patchbay describe");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Parameters"));
    assert!(stdout.contains("choice"));
    assert!(stdout.contains("sine | triangle | saw | square"));
    assert!(stdout.contains("cv"));
}

#[test]
fn cli_describe_json() {
    let output = patchbay_bin()
        .args(["describe", "collect", "--json"])
        .output()
        .expect("failed to run patchbay describe --json");
    assert!(output.status.success());

    let schema: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("describe --json should print JSON");
    assert_eq!(schema["type"], "collect");
    assert_eq!(schema["category"], "Utility");
    assert_eq!(schema["inputs"][0]["id"], "items");
    assert_eq!(schema["inputs"][0]["type"], "array");
    assert_eq!(schema["outputs"].as_array().map(Vec::len), Some(2));
}

#[test]
fn cli_describe_unknown_type_fails() {
    let output = patchbay_bin()
        .args(["describe", "fuzz"])
        .output()
        .expect("failed to run patchbay describe");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown module type"));
}

// ---------------------------------------------------------------------------
// `patchbay demo`
// ---------------------------------------------------------------------------

#[test]
fn cli_demo_runs_patch() {
    let output = patchbay_bin()
        .args(["demo", "--cv", "0,1"])
        .output()
        .expect("failed to run patchbay demo");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wave = square"));
    assert!(stdout.contains("merge.out = [1.0, 2.0, 3.0, 4.0]"));
    assert!(stdout.contains("after removing steps_a: merge.out = [3.0, 4.0]"));
    assert!(stdout.contains("probe.received = 2  ready = true"));
    assert!(stdout.contains("live: probe.received = 3"));
    assert!(stdout.contains("Cleared 7 modules."));
}
