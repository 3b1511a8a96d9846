//! Loading settings from disk.

use std::io::Write;

use murmur_layout::{CopyMode, Error, ModerationAction, Settings};

fn settings_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write settings");
    file
}

#[test]
fn loads_settings_file() {
    let file = settings_file(
        r#"{
            "collapse_messages_min_lines": 2,
            "bold_mentions": true,
            "timestamp_format": "%H:%M:%S",
            "copy_mode": "everything_but_replies",
            "moderation_actions": [
                {"type": "text", "line1": "1", "line2": "h", "command": "/timeout {user} 3600"}
            ]
        }"#,
    );

    let settings = Settings::load(file.path()).expect("load settings");
    assert_eq!(settings.collapse_messages_min_lines, 2);
    assert!(settings.bold_mentions);
    assert!(settings.compact_emotes);
    assert_eq!(settings.timestamp_format, "%H:%M:%S");
    assert_eq!(settings.copy_mode, CopyMode::EverythingButReplies);
    assert_eq!(
        settings.moderation_actions,
        vec![ModerationAction::Text {
            line1: "1".to_string(),
            line2: "h".to_string(),
            command: "/timeout {user} 3600".to_string(),
        }]
    );
}

#[test]
fn empty_object_is_default() {
    let file = settings_file("{}");
    let settings = Settings::load(file.path()).expect("load settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let err = Settings::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn malformed_json_is_settings_error() {
    let file = settings_file("{ not json");
    let err = Settings::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Settings(_)));
}

#[test]
fn invalid_timestamp_format_is_rejected() {
    let file = settings_file(r#"{"timestamp_format": "%H:%Q"}"#);
    let err = Settings::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidTimestampFormat(_)));
    assert!(err.to_string().contains("%H:%Q"));
}
