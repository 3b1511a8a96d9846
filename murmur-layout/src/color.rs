//! Message color roles and the palette that resolves them.

use serde::{Deserialize, Serialize};

use crate::primitives::Color;

/// A color role, resolved against [`MessageColors`] at paint time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageColor {
    #[default]
    Text,
    Link,
    /// Muted color used for timestamps, fallbacks and system text.
    System,
    Custom(Color),
}

impl MessageColor {
    pub fn resolve(&self, colors: &MessageColors) -> Color {
        match self {
            Self::Text => colors.regular,
            Self::Link => colors.link,
            Self::System => colors.system,
            Self::Custom(color) => *color,
        }
    }
}

/// Palette for the color roles plus selection and mention fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageColors {
    pub regular: Color,
    pub link: Color,
    pub system: Color,
    pub selection: Color,
    /// Mention color when mentions are not colorized.
    pub mention_fallback: Color,
    pub moderator_badge: Color,
    pub vip_badge: Color,
    /// Overlay on top of disabled (moderated) messages.
    pub disabled: Color,
}

impl Default for MessageColors {
    fn default() -> Self {
        Self {
            regular: Color::rgb8(0xE6, 0xE6, 0xE6),
            link: Color::rgb8(0x66, 0xAA, 0xFF),
            system: Color::rgb8(0x8C, 0x8C, 0x8C),
            selection: Color::SELECTION,
            mention_fallback: Color::rgb8(0xE6, 0xE6, 0xE6),
            moderator_badge: Color::rgb8(0x34, 0xAE, 0x0A),
            vip_badge: Color::rgb8(0xE0, 0x05, 0xB9),
            disabled: Color::rgba8(0x00, 0x00, 0x00, 0x99),
        }
    }
}
