//! User settings polled by every layout pass.

use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::image::ImageId;

/// Which elements are included when copying a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    #[default]
    Everything,
    /// Everything except the quoted reply context.
    EverythingButReplies,
    /// Message text and emotes only; no timestamp, username or badges.
    OnlyTextAndEmotes,
}

/// A moderation button rendered next to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModerationAction {
    Image { image: ImageId, command: String },
    /// Two short lines of text stacked in a square icon.
    Text {
        line1: String,
        line2: String,
        command: String,
    },
}

impl ModerationAction {
    pub fn command(&self) -> &str {
        match self {
            Self::Image { command, .. } | Self::Text { command, .. } => command,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Let emote-only lines pack tighter.
    pub compact_emotes: bool,
    /// Collapse flagged messages after this many lines; 0 disables collapsing.
    pub collapse_messages_min_lines: usize,
    pub colorize_mentions: bool,
    pub bold_mentions: bool,
    pub remove_spaces_between_emotes: bool,
    /// chrono strftime format for timestamps.
    pub timestamp_format: String,
    pub emote_scale: f32,
    pub copy_mode: CopyMode,
    /// Skip the content of moderated messages entirely.
    pub hide_moderated: bool,
    pub moderation_actions: Vec<ModerationAction>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compact_emotes: true,
            collapse_messages_min_lines: 0,
            colorize_mentions: true,
            bold_mentions: false,
            remove_spaces_between_emotes: false,
            timestamp_format: "%H:%M".to_string(),
            emote_scale: 1.0,
            copy_mode: CopyMode::Everything,
            hide_moderated: false,
            moderation_actions: vec![
                ModerationAction::Text {
                    line1: "ban".to_string(),
                    line2: String::new(),
                    command: "/ban {user}".to_string(),
                },
                ModerationAction::Text {
                    line1: "10".to_string(),
                    line2: "m".to_string(),
                    command: "/timeout {user} 600".to_string(),
                },
            ],
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse settings from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        validate_timestamp_format(&settings.timestamp_format)?;
        Ok(settings)
    }
}

/// Reject strftime strings chrono cannot render.
pub fn validate_timestamp_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::InvalidTimestampFormat(format.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(settings.compact_emotes);
        assert_eq!(settings.collapse_messages_min_lines, 0);
        assert_eq!(settings.timestamp_format, "%H:%M");
        assert_eq!(settings.copy_mode, CopyMode::Everything);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(
            r#"{"collapse_messages_min_lines": 3, "copy_mode": "only_text_and_emotes"}"#,
        )
        .expect("parse settings");
        assert_eq!(settings.collapse_messages_min_lines, 3);
        assert_eq!(settings.copy_mode, CopyMode::OnlyTextAndEmotes);
        assert!(settings.colorize_mentions);
    }

    #[test]
    fn rejects_bad_timestamp_format() {
        let err = Settings::from_json_str(r#"{"timestamp_format": "%Q"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidTimestampFormat(_)));
    }

    #[test]
    fn moderation_actions_are_tagged() {
        let settings = Settings::from_json_str(
            r#"{"moderation_actions": [{"type": "image", "image": "ban", "command": "/ban {user}"}]}"#,
        )
        .expect("parse settings");
        assert_eq!(settings.moderation_actions.len(), 1);
        assert_eq!(settings.moderation_actions[0].command(), "/ban {user}");
    }
}
