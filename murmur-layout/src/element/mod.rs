//! Content elements: the model-level pieces of a chat message.
//!
//! A message is an ordered list of [`ContentElement`]s built once when the
//! message arrives. Every layout pass asks each element to emit its layout
//! elements into a [`LayoutContainer`] for the current
//! [`RenderingContext`].

mod image;
mod misc;
mod text;

use chrono::NaiveDateTime;
use serde_json::{Value, json};

use crate::color::MessageColor;
use crate::context::RenderingContext;
use crate::flags::ElementFlags;
use crate::image::{Emote, ImageId, ImageSet};
use crate::layout::LayoutContainer;
use crate::link::{Link, LinkKind};
use crate::metrics::FontStyle;
use crate::primitives::Color;

pub use image::{Badge, BadgeKind, CircularImage, EmoteElement, LayeredEmote};
pub use text::{Mention, SingleLineText, TextRun, Timestamp};

/// The variant-specific part of a content element.
#[derive(Debug, Clone)]
pub enum ElementKind {
    TextRun(TextRun),
    SingleLineText(SingleLineText),
    Image(ImageId),
    CircularImage(CircularImage),
    /// Picks the 1x/2x/3x image by image scale.
    ScalingImage(ImageSet),
    Emote(EmoteElement),
    LayeredEmote(LayeredEmote),
    Badge(Badge),
    Mention(Mention),
    Timestamp(Timestamp),
    /// One button per configured moderation action.
    Moderation,
    Linebreak,
    ReplyCurve,
}

impl ElementKind {
    fn type_name(&self) -> &'static str {
        match self {
            Self::TextRun(_) => "text",
            Self::SingleLineText(_) => "single_line_text",
            Self::Image(_) => "image",
            Self::CircularImage(_) => "circular_image",
            Self::ScalingImage(_) => "scaling_image",
            Self::Emote(_) => "emote",
            Self::LayeredEmote(_) => "layered_emote",
            Self::Badge(_) => "badge",
            Self::Mention(_) => "mention",
            Self::Timestamp(_) => "timestamp",
            Self::Moderation => "moderation",
            Self::Linebreak => "linebreak",
            Self::ReplyCurve => "reply_curve",
        }
    }
}

/// One piece of a message.
#[derive(Debug, Clone)]
pub struct ContentElement {
    pub kind: ElementKind,
    /// Contexts this element is realized in.
    pub flags: ElementFlags,
    pub trailing_space: bool,
    pub link: Option<Link>,
    pub tooltip: String,
}

impl ContentElement {
    pub fn new(kind: ElementKind, flags: ElementFlags) -> Self {
        Self {
            kind,
            flags,
            trailing_space: true,
            link: None,
            tooltip: String::new(),
        }
    }

    // ========================================================================
    // Constructors
    // ========================================================================

    /// Plain text in the regular color.
    pub fn text(text: &str, flags: ElementFlags) -> Self {
        Self::styled_text(text, flags, MessageColor::Text, FontStyle::ChatMedium)
    }

    pub fn styled_text(text: &str, flags: ElementFlags, color: MessageColor, style: FontStyle) -> Self {
        Self::new(ElementKind::TextRun(TextRun::new(text, color, style)), flags)
    }

    /// Text that never wraps; overflow is cut with an ellipsis.
    pub fn single_line_text(text: &str, flags: ElementFlags, color: MessageColor, style: FontStyle) -> Self {
        Self::new(
            ElementKind::SingleLineText(SingleLineText::new(text, color, style)),
            flags,
        )
    }

    /// Bold username linking to the user card.
    pub fn username(name: &str, login: &str, color: MessageColor) -> Self {
        Self::styled_text(name, ElementFlags::USERNAME, color, FontStyle::ChatMediumBold)
            .with_link(Link::new(LinkKind::UserInfo, login))
    }

    pub fn image(image: impl Into<ImageId>, flags: ElementFlags) -> Self {
        Self::new(ElementKind::Image(image.into()), flags)
    }

    pub fn circular_image(
        image: impl Into<ImageId>,
        padding: f32,
        background: Color,
        flags: ElementFlags,
    ) -> Self {
        Self::new(
            ElementKind::CircularImage(CircularImage {
                image: image.into(),
                padding,
                background,
            }),
            flags,
        )
    }

    pub fn scaling_image(images: ImageSet, flags: ElementFlags) -> Self {
        Self::new(ElementKind::ScalingImage(images), flags)
    }

    pub fn emote(emote: Emote, flags: ElementFlags) -> Self {
        let tooltip = emote.tooltip.clone();
        Self::new(ElementKind::Emote(EmoteElement::new(emote, MessageColor::Text)), flags)
            .with_tooltip(tooltip)
    }

    pub fn layered_emote(layers: Vec<Emote>, flags: ElementFlags) -> Self {
        let layered = LayeredEmote::new(layers, MessageColor::Text);
        let tooltip = layered.tooltip();
        Self::new(ElementKind::LayeredEmote(layered), flags).with_tooltip(tooltip)
    }

    pub fn badge(kind: BadgeKind, emote: Emote, flags: ElementFlags) -> Self {
        let tooltip = emote.tooltip.clone();
        Self::new(ElementKind::Badge(Badge { emote, kind }), flags).with_tooltip(tooltip)
    }

    /// `@name` mention. Colors are chosen per pass from the settings.
    pub fn mention(
        display_name: &str,
        login: &str,
        fallback_color: MessageColor,
        user_color: MessageColor,
    ) -> Self {
        Self::new(
            ElementKind::Mention(Mention::new(display_name, fallback_color, user_color)),
            ElementFlags::TEXT | ElementFlags::MENTION,
        )
        .with_link(Link::new(LinkKind::UserInfo, login))
    }

    pub fn timestamp(time: NaiveDateTime) -> Self {
        Self::new(ElementKind::Timestamp(Timestamp::new(time)), ElementFlags::TIMESTAMP)
    }

    pub fn moderation() -> Self {
        Self::new(ElementKind::Moderation, ElementFlags::MODERATOR_TOOLS)
    }

    pub fn linebreak(flags: ElementFlags) -> Self {
        Self::new(ElementKind::Linebreak, flags)
    }

    pub fn reply_curve() -> Self {
        Self::new(ElementKind::ReplyCurve, ElementFlags::REPLIED_MESSAGE)
    }

    pub fn with_trailing_space(mut self, trailing_space: bool) -> Self {
        self.trailing_space = trailing_space;
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Emit this element's layout elements into `container`.
    pub fn add_to_container(&self, container: &mut LayoutContainer, ctx: &RenderingContext<'_>) {
        if !ctx.flags.intersects(self.flags) {
            return;
        }
        if !container.can_add_elements() {
            if !matches!(self.kind, ElementKind::Linebreak) {
                container.mark_truncated();
            }
            return;
        }

        match &self.kind {
            ElementKind::TextRun(run) => {
                let color = run.color.resolve(ctx.colors);
                text::layout_words(self, &run.words, run.style, color, container, ctx);
            }
            ElementKind::SingleLineText(text) => text.add_to_container(self, container, ctx),
            ElementKind::Image(id) => image::add_image(self, id, container, ctx),
            ElementKind::CircularImage(circular) => circular.add_to_container(self, container, ctx),
            ElementKind::ScalingImage(images) => {
                if let Some(id) = images.pick(ctx.image_scale) {
                    image::add_image(self, id, container, ctx);
                }
            }
            ElementKind::Emote(emote) => emote.add_to_container(self, container, ctx),
            ElementKind::LayeredEmote(layered) => layered.add_to_container(self, container, ctx),
            ElementKind::Badge(badge) => badge.add_to_container(self, container, ctx),
            ElementKind::Mention(mention) => mention.add_to_container(self, container, ctx),
            ElementKind::Timestamp(timestamp) => timestamp.add_to_container(self, container, ctx),
            ElementKind::Moderation => misc::add_moderation(self, container, ctx),
            ElementKind::Linebreak => container.break_line(),
            ElementKind::ReplyCurve => misc::add_reply_curve(self, container, ctx),
        }
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Structured dump of the element for debugging. Not a stable format.
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "type": self.kind.type_name(),
            "flags": self.flags,
            "trailing_space": self.trailing_space,
            "link": self.link,
            "tooltip": self.tooltip,
        });

        let fields = match &self.kind {
            ElementKind::TextRun(run) => json!({
                "words": run.words,
                "color": run.color,
                "style": run.style,
            }),
            ElementKind::SingleLineText(text) => json!({
                "words": text.words,
                "color": text.color,
                "style": text.style,
            }),
            ElementKind::Image(id) => json!({ "image": id }),
            ElementKind::CircularImage(circular) => json!({
                "image": circular.image,
                "padding": circular.padding,
                "background": circular.background,
            }),
            ElementKind::ScalingImage(images) => json!({ "images": images }),
            ElementKind::Emote(emote) => json!({
                "emote": emote.emote,
                "text_color": emote.text_color,
            }),
            ElementKind::LayeredEmote(layered) => json!({
                "layers": layered.layers,
                "text_color": layered.text_color,
            }),
            ElementKind::Badge(badge) => json!({
                "emote": badge.emote,
                "kind": badge.kind,
            }),
            ElementKind::Mention(mention) => json!({
                "words": mention.words,
                "fallback_color": mention.fallback_color,
                "user_color": mention.user_color,
            }),
            ElementKind::Timestamp(timestamp) => json!({
                "time": timestamp.time.to_string(),
            }),
            ElementKind::Moderation | ElementKind::Linebreak | ElementKind::ReplyCurve => json!({}),
        };

        if let (Some(object), Value::Object(extra)) = (value.as_object_mut(), fields) {
            object.extend(extra);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_json_has_common_and_variant_fields() {
        let element = ContentElement::text("hello world", ElementFlags::TEXT)
            .with_link(Link::new(LinkKind::Url, "https://example.com"));
        let value = element.to_json();
        assert_eq!(value["type"], "text");
        assert_eq!(value["flags"], "TEXT");
        assert_eq!(value["trailing_space"], true);
        assert_eq!(value["link"]["kind"], "url");
        assert_eq!(value["words"], json!(["hello", "world"]));
        assert_eq!(value["style"], "chat_medium");
    }

    #[test]
    fn mention_json() {
        let element = ContentElement::mention(
            "@forsen",
            "forsen",
            MessageColor::Text,
            MessageColor::Custom(Color::rgb8(255, 0, 0)),
        );
        let value = element.to_json();
        assert_eq!(value["type"], "mention");
        assert_eq!(value["flags"], "TEXT | MENTION");
        assert_eq!(value["link"]["kind"], "user_info");
        assert_eq!(value["link"]["value"], "forsen");
        assert_eq!(value["user_color"]["custom"], "#FF0000");
    }
}
