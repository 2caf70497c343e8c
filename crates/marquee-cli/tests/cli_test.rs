#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("top-rated"))
        .stdout(predicate::str::contains("trending"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_without_token_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["search", "--query", "batman", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "TMDB_API_TOKEN environment variable is required",
        ));
}

#[test]
fn test_browse_without_token_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("marquee");
    cmd.env_remove("TMDB_API_TOKEN")
        .args(["browse", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[test]
fn test_config_init_writes_once() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    // Act & Assert
    cargo_bin_cmd!("marquee")
        .args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success();
    let written = std::fs::read_to_string(&config_path).unwrap();
    assert!(written.contains("[trends]"));
    assert!(written.contains("debounce_ms = 500"));

    cargo_bin_cmd!("marquee")
        .args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cargo_bin_cmd!("marquee")
        .args(["config", "init", "--force", "--dir"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_config_path_uses_dir() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cargo_bin_cmd!("marquee")
        .args(["config", "path", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains("not created yet"));
}

#[test]
fn test_trending_requires_enabled_store() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    cargo_bin_cmd!("marquee")
        .args(["trending", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("trend store is disabled"));
}

#[test]
fn test_invalid_config_is_reported() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[ui\n").unwrap();

    // Act & Assert
    cargo_bin_cmd!("marquee")
        .env("TMDB_API_TOKEN", "test-token")
        .args(["discover", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_completions_bash() {
    // Arrange & Act & Assert
    cargo_bin_cmd!("marquee")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marquee"));
}
