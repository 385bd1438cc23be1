//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test.
fn siteforge() -> Command {
    Command::cargo_bin("siteforge").unwrap()
}

/// Binary isolated from the user's config, `.env` and API key.
fn isolated(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = siteforge();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env_remove("GEMINI_API_KEY");
    cmd
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    siteforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI website rebuilder"));
}

#[test]
fn test_short_help_flag() {
    siteforge().arg("-h").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    siteforge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_subcommand_fails() {
    siteforge().assert().failure().stderr(predicate::str::contains("Usage:"));
}

// ============================================================================
// Options Command Tests
// ============================================================================

#[test]
fn test_options_lists_every_step() {
    siteforge()
        .arg("options")
        .assert()
        .success()
        .stdout(predicate::str::contains("[vibe]"))
        .stdout(predicate::str::contains("[colorPalette]"))
        .stdout(predicate::str::contains("dark-mode-neon"))
        .stdout(predicate::str::contains("visual-grid"));
}

// ============================================================================
// Theme & Config Command Tests
// ============================================================================

#[test]
fn test_theme_defaults_to_dark() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir).arg("theme").assert().success().stdout("dark\n");
}

#[test]
fn test_theme_toggle_persists() {
    let dir = assert_fs::TempDir::new().unwrap();

    isolated(&dir).args(["theme", "toggle"]).assert().success().stdout("light\n");
    isolated(&dir).arg("theme").assert().success().stdout("light\n");
    isolated(&dir).args(["theme", "dark"]).assert().success().stdout("dark\n");
}

#[test]
fn test_theme_rejects_unknown() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir)
        .args(["theme", "sepia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown theme"));
}

#[test]
fn test_config_shows_defaults() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[pacing]"))
        .stdout(predicate::str::contains("model = \"gemini-2.5-flash\""));
}

#[test]
fn test_config_reads_local_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child(".siteforge.toml").write_str("[pacing]\nadvance_delay_ms = 5\n").unwrap();

    isolated(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("advance_delay_ms = 5"));
}

#[test]
fn test_config_path() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir)
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ============================================================================
// Analyze & Build Argument Tests
// ============================================================================

#[test]
fn test_analyze_requires_a_source() {
    siteforge().arg("analyze").assert().failure();
}

#[test]
fn test_build_rejects_url_with_images() {
    siteforge()
        .args(["build", "--url", "https://example.com", "shot.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_build_reports_missing_image() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir)
        .args(["build", "missing.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.png"));
}

#[test]
fn test_build_rejects_invalid_saved_analysis() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("analysis.json").write_str("not json").unwrap();

    isolated(&dir)
        .args(["build", "--from", "analysis.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a saved analysis"));
}

#[test]
fn test_build_without_api_key() {
    let dir = assert_fs::TempDir::new().unwrap();
    isolated(&dir)
        .args(["build", "--url", "https://example.com", "--no-chat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    siteforge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("siteforge"));
}
