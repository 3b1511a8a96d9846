//! Visibility flags for content elements and per-message flags.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which rendering contexts a content element shows up in.
    ///
    /// An element is realized only when the active context flags intersect
    /// its own flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ElementFlags: u64 {
        const MISC = 1 << 0;
        const TEXT = 1 << 1;
        const USERNAME = 1 << 2;
        const TIMESTAMP = 1 << 3;

        const CHANNEL_EMOTE_IMAGE = 1 << 4;
        const CHANNEL_EMOTE_TEXT = 1 << 5;
        const THIRD_PARTY_EMOTE_IMAGE = 1 << 6;
        const THIRD_PARTY_EMOTE_TEXT = 1 << 7;
        const EMOJI_IMAGE = 1 << 8;
        const EMOJI_TEXT = 1 << 9;

        const EMOTE_IMAGES = Self::CHANNEL_EMOTE_IMAGE.bits()
            | Self::THIRD_PARTY_EMOTE_IMAGE.bits()
            | Self::EMOJI_IMAGE.bits();
        const EMOTE_TEXT = Self::CHANNEL_EMOTE_TEXT.bits()
            | Self::THIRD_PARTY_EMOTE_TEXT.bits()
            | Self::EMOJI_TEXT.bits();

        /// Staff, admin and similar global badges.
        const BADGE_GLOBAL_AUTHORITY = 1 << 10;
        const BADGE_PREDICTIONS = 1 << 11;
        /// Moderator, VIP, broadcaster.
        const BADGE_CHANNEL_AUTHORITY = 1 << 12;
        const BADGE_SUBSCRIPTION = 1 << 13;
        const BADGE_VANITY = 1 << 14;
        const BADGE_CLIENT = 1 << 15;
        const BADGE_SHARED_CHANNEL = 1 << 16;

        const BADGES = Self::BADGE_GLOBAL_AUTHORITY.bits()
            | Self::BADGE_PREDICTIONS.bits()
            | Self::BADGE_CHANNEL_AUTHORITY.bits()
            | Self::BADGE_SUBSCRIPTION.bits()
            | Self::BADGE_VANITY.bits()
            | Self::BADGE_CLIENT.bits()
            | Self::BADGE_SHARED_CHANNEL.bits();

        const CHANNEL_NAME = 1 << 17;
        const MODERATOR_TOOLS = 1 << 18;
        const ALWAYS_SHOW = 1 << 19;
        /// The synthesized ellipsis of a collapsed message.
        const COLLAPSED = 1 << 20;
        const MENTION = 1 << 21;
        /// Quoted content of the message being replied to.
        const REPLIED_MESSAGE = 1 << 22;
        const REPLY_BUTTON = 1 << 23;

        const DEFAULT = Self::TIMESTAMP.bits()
            | Self::BADGES.bits()
            | Self::USERNAME.bits()
            | Self::TEXT.bits()
            | Self::EMOTE_IMAGES.bits()
            | Self::ALWAYS_SHOW.bits()
            | Self::COLLAPSED.bits()
            | Self::MISC.bits();
    }
}

impl ElementFlags {
    /// Whether any emote image flag is set.
    #[inline]
    pub fn is_emote_image(self) -> bool {
        self.intersects(Self::EMOTE_IMAGES)
    }

    /// The leading metadata cluster of a message: timestamp, username, badges.
    #[inline]
    pub fn is_metadata(self) -> bool {
        self.intersects(Self::TIMESTAMP | Self::USERNAME | Self::BADGES)
    }
}

bitflags! {
    /// Per-message state that changes how the message is laid out.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MessageFlags: u32 {
        const SYSTEM = 1 << 0;
        const TIMEOUT = 1 << 1;
        const HIGHLIGHTED = 1 << 2;
        /// Deleted or moderated; rendered greyed out or hidden.
        const DISABLED = 1 << 3;
        const CENTERED = 1 << 4;
        /// Collapse to the configured number of lines.
        const COLLAPSED = 1 << 5;
        const DISABLE_COMPACT_EMOTES = 1 << 6;
        const ACTION = 1 << 7;
        const REPLY = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emote_image_groups() {
        assert!(ElementFlags::EMOJI_IMAGE.is_emote_image());
        assert!(!ElementFlags::EMOJI_TEXT.is_emote_image());
        assert!(ElementFlags::DEFAULT.contains(ElementFlags::EMOTE_IMAGES));
        assert!(!ElementFlags::DEFAULT.intersects(ElementFlags::MODERATOR_TOOLS));
    }

    #[test]
    fn metadata_flags() {
        assert!(ElementFlags::BADGE_VANITY.is_metadata());
        assert!(ElementFlags::TIMESTAMP.is_metadata());
        assert!(!(ElementFlags::TEXT | ElementFlags::MENTION).is_metadata());
    }

    #[test]
    fn flags_serialize_by_name() {
        let json = serde_json::to_string(&(ElementFlags::TEXT | ElementFlags::MENTION))
            .expect("serialize");
        assert_eq!(json, "\"TEXT | MENTION\"");
        let back: ElementFlags = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ElementFlags::TEXT | ElementFlags::MENTION);
    }
}
