//! Text direction classification.

use serde::{Deserialize, Serialize};

/// Resolved direction of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    /// No strong characters: digits, punctuation, symbols, emote images.
    #[default]
    Neutral,
    Ltr,
    Rtl,
}

impl TextDirection {
    #[inline]
    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }
}

/// Injected direction detection capability.
pub trait DirectionDetector {
    /// Whether the first strong character of `text` is right-to-left.
    fn is_rtl(&self, text: &str) -> bool;

    /// Whether `text` has no strong characters at all.
    fn is_neutral(&self, text: &str) -> bool;

    fn classify(&self, text: &str) -> TextDirection {
        if self.is_rtl(text) {
            TextDirection::Rtl
        } else if self.is_neutral(text) {
            TextDirection::Neutral
        } else {
            TextDirection::Ltr
        }
    }
}

/// Range-based detector: letters decide, the first letter wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeDirection;

/// Hebrew, Arabic, Syriac, Thaana, NKo, Samaritan, Mandaic, presentation
/// forms, and the supplementary RTL blocks.
const RTL_RANGES: &[(u32, u32)] = &[
    (0x0590, 0x08FF),
    (0xFB1D, 0xFDFF),
    (0xFE70, 0xFEFF),
    (0x10800, 0x10FFF),
    (0x1E800, 0x1EFFF),
];

#[inline]
fn is_rtl_char(ch: char) -> bool {
    let cp = ch as u32;
    RTL_RANGES.iter().any(|&(lo, hi)| (lo..=hi).contains(&cp))
}

impl DirectionDetector for UnicodeDirection {
    fn is_rtl(&self, text: &str) -> bool {
        text.chars()
            .find(|ch| ch.is_alphabetic())
            .is_some_and(is_rtl_char)
    }

    fn is_neutral(&self, text: &str) -> bool {
        !text.chars().any(char::is_alphabetic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scripts() {
        let d = UnicodeDirection;
        assert_eq!(d.classify("hello"), TextDirection::Ltr);
        assert_eq!(d.classify("سلام"), TextDirection::Rtl);
        assert_eq!(d.classify("שלום"), TextDirection::Rtl);
        assert_eq!(d.classify("!?"), TextDirection::Neutral);
        assert_eq!(d.classify("123"), TextDirection::Neutral);
        assert_eq!(d.classify(""), TextDirection::Neutral);
    }

    #[test]
    fn first_strong_character_wins() {
        let d = UnicodeDirection;
        assert_eq!(d.classify("12 abc غير"), TextDirection::Ltr);
        assert_eq!(d.classify("(غير) abc"), TextDirection::Rtl);
    }
}
