//! Config and data directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise returns `~/.config/marquee/config.toml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("config.toml"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("marquee")
        .join("config.toml"))
}

/// Resolves the log file used while the terminal UI owns the screen.
///
/// - If `dir` is `Some`, returns `{dir}/marquee.log`.
/// - Otherwise returns `~/.local/share/marquee/marquee.log`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined (when `dir` is `None`).
pub fn resolve_log_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join("marquee.log"));
    }

    let home = std::env::var("HOME").context("HOME environment variable is not set")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("marquee")
        .join("marquee.log"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_resolve_with_dir() {
        // Arrange
        let dir = PathBuf::from("/tmp/marquee-test");

        // Act
        let config = resolve_config_path(Some(&dir)).unwrap();
        let log = resolve_log_path(Some(&dir)).unwrap();

        // Assert
        assert_eq!(config, PathBuf::from("/tmp/marquee-test/config.toml"));
        assert_eq!(log, PathBuf::from("/tmp/marquee-test/marquee.log"));
    }

    #[test]
    fn test_resolve_default() {
        // Arrange & Act
        let config = resolve_config_path(None).unwrap();
        let log = resolve_log_path(None).unwrap();

        // Assert
        assert!(config.ends_with(".config/marquee/config.toml"));
        assert!(log.ends_with(".local/share/marquee/marquee.log"));
    }
}
