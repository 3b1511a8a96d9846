//! Click targets attached to elements.

use serde::{Deserialize, Serialize};

/// What happens when an element is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    #[default]
    None,
    Url,
    /// Open the user card for the login in `value`.
    UserInfo,
    /// Run a moderation action; `value` holds the command template.
    UserAction,
    /// Expand a collapsed message.
    Expand,
    JumpToChannel,
    JumpToMessage,
    ReplyToMessage,
    CopyToClipboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub value: String,
}

impl Link {
    pub fn new(kind: LinkKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.kind == LinkKind::None
    }
}
