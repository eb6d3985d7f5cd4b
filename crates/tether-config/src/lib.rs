//! Tether configuration.
//!
//! TOML-based configuration for the host window, the initial page and
//! logging. All sections use serde defaults so partial configs work.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{ContentConfig, LoggingConfig, SizeHint, TetherConfig, WindowConfig};

use std::path::Path;
use tether_common::ConfigError;

/// Load config from `path`, or from the platform default location when
/// `path` is `None`, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<TetherConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TetherConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
