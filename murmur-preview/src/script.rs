//! JSON message scripts.
//!
//! A script lists the images the in-memory cache should know about and the
//! messages to lay out, each as a list of tagged element descriptions.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use murmur_layout::{
    BadgeKind, Color, ContentElement, ElementFlags, Emote, FontStyle, ImageSet, Link, MemoryImageCache,
    Message, MessageColor, MessageFlags,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub images: Vec<ImageSpec>,
    pub messages: Vec<MessageSpec>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSpec {
    pub id: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub animated: bool,
}

#[derive(Debug, Deserialize)]
pub struct MessageSpec {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub flags: MessageFlags,
    pub elements: Vec<ElementSpec>,
}

fn default_text_flags() -> ElementFlags {
    ElementFlags::TEXT
}

fn default_emote_flags() -> ElementFlags {
    ElementFlags::CHANNEL_EMOTE_IMAGE | ElementFlags::CHANNEL_EMOTE_TEXT
}

fn default_badge_flags() -> ElementFlags {
    ElementFlags::BADGE_CHANNEL_AUTHORITY
}

fn default_misc_flags() -> ElementFlags {
    ElementFlags::MISC
}

/// One content element in a script.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementSpec {
    Text {
        text: String,
        #[serde(default = "default_text_flags")]
        flags: ElementFlags,
        #[serde(default)]
        color: MessageColor,
        #[serde(default)]
        style: FontStyle,
        #[serde(default)]
        link: Option<Link>,
    },
    SingleLineText {
        text: String,
        #[serde(default = "default_text_flags")]
        flags: ElementFlags,
        #[serde(default)]
        color: MessageColor,
    },
    Username {
        name: String,
        login: String,
        #[serde(default)]
        color: MessageColor,
    },
    Mention {
        name: String,
        login: String,
        #[serde(default)]
        color: MessageColor,
    },
    Timestamp {
        time: NaiveDateTime,
    },
    Emote {
        name: String,
        #[serde(default)]
        images: ImageSet,
        #[serde(default)]
        tooltip: String,
        #[serde(default = "default_emote_flags")]
        flags: ElementFlags,
    },
    LayeredEmote {
        layers: Vec<Emote>,
        #[serde(default = "default_emote_flags")]
        flags: ElementFlags,
    },
    Badge {
        name: String,
        images: ImageSet,
        #[serde(default)]
        kind: BadgeKind,
        #[serde(default = "default_badge_flags")]
        flags: ElementFlags,
    },
    Image {
        image: String,
        #[serde(default = "default_misc_flags")]
        flags: ElementFlags,
    },
    CircularImage {
        image: String,
        #[serde(default)]
        padding: f32,
        background: Color,
        #[serde(default = "default_misc_flags")]
        flags: ElementFlags,
    },
    Moderation,
    Linebreak {
        #[serde(default = "default_text_flags")]
        flags: ElementFlags,
    },
    ReplyCurve,
}

impl ElementSpec {
    fn into_element(self) -> ContentElement {
        match self {
            Self::Text {
                text,
                flags,
                color,
                style,
                link,
            } => {
                let element = ContentElement::styled_text(&text, flags, color, style);
                match link {
                    Some(link) => element.with_link(link),
                    None => element,
                }
            }
            Self::SingleLineText { text, flags, color } => {
                ContentElement::single_line_text(&text, flags, color, FontStyle::ChatMedium)
            }
            Self::Username { name, login, color } => ContentElement::username(&name, &login, color),
            Self::Mention { name, login, color } => {
                ContentElement::mention(&name, &login, MessageColor::Text, color)
            }
            Self::Timestamp { time } => ContentElement::timestamp(time),
            Self::Emote {
                name,
                images,
                tooltip,
                flags,
            } => {
                let mut emote = Emote::new(name, images);
                emote.tooltip = tooltip;
                ContentElement::emote(emote, flags)
            }
            Self::LayeredEmote { layers, flags } => ContentElement::layered_emote(layers, flags),
            Self::Badge {
                name,
                images,
                kind,
                flags,
            } => ContentElement::badge(kind, Emote::new(name, images), flags),
            Self::Image { image, flags } => ContentElement::image(image.as_str(), flags),
            Self::CircularImage {
                image,
                padding,
                background,
                flags,
            } => ContentElement::circular_image(image.as_str(), padding, background, flags),
            Self::Moderation => ContentElement::moderation(),
            Self::Linebreak { flags } => ContentElement::linebreak(flags),
            Self::ReplyCurve => ContentElement::reply_curve(),
        }
    }
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let script: Self = serde_json::from_str(&contents)
            .with_context(|| format!("parsing script {}", path.display()))?;
        tracing::debug!(
            images = script.images.len(),
            messages = script.messages.len(),
            "script loaded"
        );
        Ok(script)
    }

    /// Split the script into the image cache and the messages.
    pub fn build(self) -> (MemoryImageCache, Vec<Message>) {
        let mut images = MemoryImageCache::new();
        for image in self.images {
            if image.animated {
                images.insert_animated(image.id.as_str(), image.width, image.height);
            } else {
                images.insert(image.id.as_str(), image.width, image.height);
            }
        }

        let messages = self
            .messages
            .into_iter()
            .enumerate()
            .map(|(index, message)| {
                let id = if message.id.is_empty() {
                    index.to_string()
                } else {
                    message.id
                };
                let elements = message.elements.into_iter().map(ElementSpec::into_element).collect();
                Message::new(id, message.flags, elements)
            })
            .collect();
        (images, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script() {
        let script: Script = serde_json::from_str(
            r#"{
                "images": [{"id": "kappa", "width": 28, "height": 28}],
                "messages": [{
                    "flags": "COLLAPSED",
                    "elements": [
                        {"type": "timestamp", "time": "2024-03-01T13:37:00"},
                        {"type": "username", "name": "bob:", "login": "bob"},
                        {"type": "text", "text": "hello there"},
                        {"type": "emote", "name": "Kappa", "images": {"x1": "kappa"}},
                        {"type": "linebreak"},
                        {"type": "moderation"}
                    ]
                }]
            }"#,
        )
        .expect("parse script");

        let (images, messages) = script.build();
        assert_eq!(images.len(), 1);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "0");
        assert_eq!(messages[0].flags, MessageFlags::COLLAPSED);
        assert_eq!(messages[0].elements.len(), 6);
        assert_eq!(messages[0].elements[3].flags, default_emote_flags());
    }

    #[test]
    fn demo_script_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/chat.json");
        let (images, messages) = Script::load(&path).expect("load demo").build();
        assert_eq!(images.len(), 3);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].flags, MessageFlags::COLLAPSED);
    }
}
