//! Unit tests for config module
//!
//! Tests configuration types, defaults, and deserialization.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use std::path::PathBuf;

use crate::{
    PrefsError,
    config::{Config, LogFormat, LogLevel},
};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.general.log_format, LogFormat::Pretty);
    assert_eq!(config.preferences.path, ".prefsync/settings.json");
    assert_eq!(config.preferences.workspace_root, None);
    assert_eq!(config.preferences.debounce_ms, 200);
}

#[test]
fn config_empty_toml_is_default() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn config_partial_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [preferences]
        path = ".theia/prefs.json"
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.general.log_format, LogFormat::Pretty);
    assert_eq!(config.preferences.path, ".theia/prefs.json");
    assert_eq!(config.preferences.debounce_ms, 200);
}

#[test]
fn config_full_toml() {
    let toml_str = r#"
        [general]
        log_level = "trace"
        log_format = "json"

        [preferences]
        workspace_root = "/srv/project"
        path = "settings.toml"
        debounce_ms = 50
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_format, LogFormat::Json);
    assert_eq!(
        config.preferences.workspace_root,
        Some(PathBuf::from("/srv/project"))
    );
    assert_eq!(config.preferences.debounce_ms, 50);
}

#[test]
fn config_rejects_unknown_log_level() {
    let result = Config::from_toml_str("[general]\nlog_level = \"loud\"");
    assert!(matches!(result, Err(PrefsError::TomlParseError { .. })));
}

#[test]
fn config_rejects_absolute_preference_path() {
    let result = Config::from_toml_str("[preferences]\npath = \"/etc/prefs.json\"");
    assert!(matches!(
        result,
        Err(PrefsError::InvalidSetting { ref field, .. }) if field == "preferences.path"
    ));
}

#[test]
fn config_rejects_empty_preference_path() {
    let result = Config::from_toml_str("[preferences]\npath = \"  \"");
    assert!(matches!(result, Err(PrefsError::InvalidSetting { .. })));
}

#[test]
fn log_format_parse() {
    assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
    assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
    assert_eq!(LogFormat::parse("fancy"), None);
}

#[test]
fn log_level_display() {
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}
