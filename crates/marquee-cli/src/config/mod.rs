//! Application configuration module.
//!
//! Manages the TOML config file holding API endpoints, the trend store
//! location and UI timing. Secrets stay in the environment.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, TmdbConfig, TrendsConfig, UiConfig};
pub use paths::{resolve_config_path, resolve_log_path};
