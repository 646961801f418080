//! Unit tests for the preferences module
//! No filesystem, timing, or external dependencies.

#![allow(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]


use std::time::Instant;

use serde_json::{Value, json};

use crate::preferences::{
    ChangeError, ChangeEvent, ChangeKind, PreferenceChange, PreferenceMap,
    path_ops::{join_uri, key_matches},
};

pub(super) fn map(value: Value) -> PreferenceMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn change_kind_follows_present_sides() {
    let now = Instant::now();

    assert_eq!(
        PreferenceChange::added("a", json!(1), now).kind(),
        ChangeKind::Added
    );
    assert_eq!(
        PreferenceChange::removed("a", json!(1), now).kind(),
        ChangeKind::Removed
    );
    assert_eq!(
        PreferenceChange::modified("a", json!(1), json!(2), now).kind(),
        ChangeKind::Modified
    );
}

#[test]
fn extract_typed_value() {
    let change = PreferenceChange::added("editor.fontSize", json!(14), Instant::now());

    let size: u32 = change.extract().unwrap();
    assert_eq!(size, 14);
}

#[test]
fn extract_wrong_type_is_mismatch() {
    let change = PreferenceChange::added("editor.fontSize", json!("big"), Instant::now());

    let result: Result<u32, _> = change.extract();
    assert!(matches!(
        result,
        Err(ChangeError::TypeMismatch { ref key, .. }) if key == "editor.fontSize"
    ));
}

#[test]
fn extract_from_removal_is_mismatch() {
    let change = PreferenceChange::removed("wordWrap", json!(true), Instant::now());

    let result: Result<bool, _> = change.extract();
    assert!(matches!(
        result,
        Err(ChangeError::TypeMismatch {
            actual_value: None,
            ..
        })
    ));
}

#[test]
fn as_string_helpers() {
    let change = PreferenceChange::modified("lineNumbers", json!("on"), json!("off"), Instant::now());
    assert_eq!(change.as_string(), Some("off".to_string()));

    let change = PreferenceChange::added("wordWrap", json!(true), Instant::now());
    assert_eq!(change.as_string(), None);
    assert_eq!(change.as_string_or("fallback"), "fallback");
}

#[test]
fn key_pattern_matching() {
    assert!(key_matches("lineNumbers", "*"));
    assert!(key_matches("lineNumbers", "lineNumbers"));
    assert!(key_matches("editor.fontSize", "editor.*"));
    assert!(key_matches("editor.minimap.enabled", "editor.*"));
    assert!(key_matches("editor.minimap.enabled", "editor.*.enabled"));

    assert!(!key_matches("editor", "editor.*"));
    assert!(!key_matches("editor.fontSize", "editor"));
    assert!(!key_matches("terminal.fontSize", "editor.*"));
    assert!(!key_matches("editor.minimap.side", "editor.*.enabled"));
}

#[test]
fn join_uri_normalizes_separators() {
    assert_eq!(
        join_uri("/workspace", ".prefsync/settings.json"),
        "/workspace/.prefsync/settings.json"
    );
    assert_eq!(
        join_uri("/workspace/", "./prefs.json"),
        "/workspace/prefs.json"
    );
    assert_eq!(
        join_uri("file:///workspace", "/nested//prefs.json"),
        "file:///workspace/nested/prefs.json"
    );
    assert_eq!(join_uri("/", "prefs.json"), "/prefs.json");
}

#[test]
fn change_event_membership_is_exact() {
    let event = ChangeEvent::new(["/workspace/.prefsync/settings.json", "/workspace/other"]);

    assert!(event.affects("/workspace/.prefsync/settings.json"));
    assert!(!event.affects("/workspace/.prefsync"));
    assert!(!event.affects("/workspace/.prefsync/settings.json.bak"));
}
