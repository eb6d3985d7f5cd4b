//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::SizeHint;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_tether_config.toml"));
    assert!(matches!(
        result,
        Err(tether_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[window]
title = "Files"
hint = "fixed"

[content]
url = "https://example.com"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Files");
    assert_eq!(config.window.hint, SizeHint::Fixed);
    assert_eq!(config.content.url.as_deref(), Some("https://example.com"));
    // Defaults preserved
    assert_eq!(config.window.width, 800);
    assert_eq!(config.logging.level, "tether=info");
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(tether_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn load_unknown_hint_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\nhint = \"sideways\"\n").unwrap();

    assert!(load_from_path(&path).is_err());
}

#[test]
fn out_of_range_values_are_still_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[window]\nwidth = 20\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.width, 20);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tether").join("config.toml");

    seed_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.window.title, "Tether");
    assert!(config.content.url.is_none());
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::TetherConfig;

    let config: TetherConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_is_reasonable() {
    if let Ok(path) = default_config_path() {
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("tether"));
        assert!(path_str.ends_with("config.toml"));
    }
}

#[test]
fn seed_config_reports_unwritable_location() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "").unwrap();

    // A regular file where the parent directory should be.
    let err = seed_config(&blocker.join("config.toml")).unwrap_err();
    assert!(matches!(err, tether_common::ConfigError::ParseError(ref m) if m.starts_with("creating")));
}

#[test]
fn unreadable_path_is_parse_error_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    // Reading a directory fails with something other than NotFound.
    let err = load_from_path(dir.path()).unwrap_err();
    assert!(matches!(err, tether_common::ConfigError::ParseError(_)));
}
