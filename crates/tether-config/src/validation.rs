//! Configuration validation.
//!
//! Every check pushes onto a shared error list so a single
//! `ConfigError` reports all problems at once.

use crate::schema::TetherConfig;
use tether_common::ConfigError;

const MIN_DIMENSION: u32 = 100;
const MAX_DIMENSION: u32 = 16384;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TetherConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);
    validate_content(&mut errors, config);
    validate_logging(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_window(errors: &mut Vec<String>, config: &TetherConfig) {
    validate_range(
        errors,
        "window.width",
        config.window.width,
        MIN_DIMENSION,
        MAX_DIMENSION,
    );
    validate_range(
        errors,
        "window.height",
        config.window.height,
        MIN_DIMENSION,
        MAX_DIMENSION,
    );
}

fn validate_content(errors: &mut Vec<String>, config: &TetherConfig) {
    if config.content.url.is_some() && config.content.html.is_some() {
        errors.push("content.url and content.html are mutually exclusive".into());
    }
    if let Some(url) = &config.content.url {
        if url.trim().is_empty() {
            errors.push("content.url must not be empty".into());
        }
    }
}

fn validate_logging(errors: &mut Vec<String>, config: &TetherConfig) {
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }
}
