//! Reading `config.toml`, and seeding it from the template on first run.

use std::io;
use std::path::{Path, PathBuf};

use crate::schema::TetherConfig;
use crate::validation;
use tether_common::ConfigError;
use tracing::{info, warn};

use super::template::default_config_toml;

const CONFIG_SUBDIR: &str = "tether";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/tether/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_SUBDIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory".into()))
}

/// Load config from a specific TOML file path.
///
/// Missing fields take their serde defaults. A config that fails
/// validation is still returned; the problems are logged.
pub fn load_from_path(path: &Path) -> Result<TetherConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => io_error("reading", path, e),
    })?;

    let config: TetherConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load from [`default_config_path`]. On first run the commented template
/// is written there and defaults are used; a config directory that can
/// not be written to only costs the template.
pub fn load_default() -> Result<TetherConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            if let Err(e) = seed_config(&path) {
                warn!("default config not written: {e}");
            }
            Ok(TetherConfig::default())
        }
        loaded => loaded,
    }
}

/// Write the commented template to `path`, creating parent directories.
pub fn seed_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_error("creating", dir, e))?;
    }
    std::fs::write(path, default_config_toml()).map_err(|e| io_error("writing", path, e))?;
    info!(path = %path.display(), "default config written");
    Ok(())
}

fn io_error(action: &str, path: &Path, e: io::Error) -> ConfigError {
    ConfigError::ParseError(format!("{action} {}: {e}", path.display()))
}
