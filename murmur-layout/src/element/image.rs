//! Image-bearing content elements: plain images, emotes and badges.

use serde::{Deserialize, Serialize};

use crate::color::MessageColor;
use crate::context::RenderingContext;
use crate::flags::ElementFlags;
use crate::image::{Emote, Image, ImageId};
use crate::layout::{ImageBackground, ImageLayer, LayoutContainer, LayoutElement};
use crate::metrics::FontStyle;
use crate::primitives::{Color, Point, Size};

use super::ContentElement;
use super::text::layout_words;

fn image_element(owner: &ContentElement, image: &Image, size: Size) -> LayoutElement {
    LayoutElement::image(image, size)
        .with_flags(owner.flags)
        .with_link(owner.link.clone())
        .with_tooltip(owner.tooltip.clone())
        .with_trailing_space(owner.trailing_space)
}

/// Place a single image at the context scale. Unresolved images are skipped.
pub(super) fn add_image(
    owner: &ContentElement,
    id: &ImageId,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    if let Some(image) = ctx.images.resolve(id, ctx.image_scale) {
        let size = image.size().scaled(ctx.scale);
        container.add_element(image_element(owner, &image, size));
    }
}

/// Emote images are enabled when the context shares an image flag with the
/// element.
fn images_enabled(owner: &ContentElement, ctx: &RenderingContext<'_>) -> bool {
    ctx.flags.intersects(owner.flags & ElementFlags::EMOTE_IMAGES)
}

/// Show `text` in place of an emote image.
fn add_text_fallback(
    owner: &ContentElement,
    text: &str,
    color: MessageColor,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    let words: Vec<String> = text.split(' ').map(str::to_string).collect();
    layout_words(
        owner,
        &words,
        FontStyle::ChatMedium,
        color.resolve(ctx.colors),
        container,
        ctx,
    );
}

// ============================================================================
// Circular image
// ============================================================================

/// An image on a filled circle.
#[derive(Debug, Clone)]
pub struct CircularImage {
    pub image: ImageId,
    pub padding: f32,
    pub background: Color,
}

impl CircularImage {
    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        let Some(image) = ctx.images.resolve(&self.image, ctx.image_scale) else {
            return;
        };
        let padding = self.padding * ctx.scale;
        let inner = image.size().scaled(ctx.scale);
        let size = Size::new(inner.width + 2.0 * padding, inner.height + 2.0 * padding);
        let element = image_element(owner, &image, size).with_background(ImageBackground::Circle {
            color: self.background,
            padding,
        });
        container.add_element(element);
    }
}

// ============================================================================
// Emotes
// ============================================================================

#[derive(Debug, Clone)]
pub struct EmoteElement {
    pub emote: Emote,
    /// Color of the text fallback when emote images are disabled.
    pub text_color: MessageColor,
}

impl EmoteElement {
    pub fn new(emote: Emote, text_color: MessageColor) -> Self {
        Self { emote, text_color }
    }

    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        if !images_enabled(owner, ctx) {
            add_text_fallback(owner, &self.emote.name, self.text_color, container, ctx);
            return;
        }

        let image = self
            .emote
            .images
            .pick(ctx.image_scale)
            .and_then(|id| ctx.images.resolve(id, ctx.image_scale));
        match image {
            Some(image) => {
                let size = image.size().scaled(ctx.scale * ctx.settings.emote_scale);
                let element = image_element(owner, &image, size).with_copy_text(&self.emote.name);
                container.add_element(element);
            }
            None => {
                tracing::trace!(emote = %self.emote.name, "emote image unavailable, using text");
                add_text_fallback(owner, &self.emote.name, MessageColor::System, container, ctx);
            }
        }
    }
}

/// Several emotes drawn on top of each other (zero-width overlays).
#[derive(Debug, Clone)]
pub struct LayeredEmote {
    pub layers: Vec<Emote>,
    pub text_color: MessageColor,
}

impl LayeredEmote {
    pub fn new(layers: Vec<Emote>, text_color: MessageColor) -> Self {
        Self { layers, text_color }
    }

    /// Layer names joined by spaces.
    pub fn copy_string(&self) -> String {
        self.layers
            .iter()
            .map(|emote| emote.name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One tooltip line per layer.
    pub fn tooltip(&self) -> String {
        self.layers
            .iter()
            .map(|emote| {
                if emote.tooltip.is_empty() {
                    emote.name.as_str()
                } else {
                    emote.tooltip.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        if !images_enabled(owner, ctx) {
            add_text_fallback(owner, &self.copy_string(), self.text_color, container, ctx);
            return;
        }

        let images: Option<Vec<Image>> = self
            .layers
            .iter()
            .map(|emote| {
                emote
                    .images
                    .pick(ctx.image_scale)
                    .and_then(|id| ctx.images.resolve(id, ctx.image_scale))
            })
            .collect();
        let Some(images) = images.filter(|images| !images.is_empty()) else {
            tracing::trace!(layers = self.layers.len(), "layered emote incomplete, using text");
            add_text_fallback(owner, &self.copy_string(), MessageColor::System, container, ctx);
            return;
        };

        let factor = ctx.scale * ctx.settings.emote_scale;
        let sizes: Vec<Size> = images.iter().map(|image| image.size().scaled(factor)).collect();
        let largest = sizes.iter().fold(Size::ZERO, |acc, size| {
            Size::new(acc.width.max(size.width), acc.height.max(size.height))
        });

        let layers = images
            .iter()
            .zip(&sizes)
            .map(|(image, size)| ImageLayer {
                image: image.id.clone(),
                offset: Point::new(
                    (largest.width - size.width) / 2.0,
                    (largest.height - size.height) / 2.0,
                ),
                size: *size,
                animated: image.animated,
            })
            .collect();

        let element = LayoutElement::layered(layers, largest)
            .with_flags(owner.flags)
            .with_link(owner.link.clone())
            .with_tooltip(owner.tooltip.clone())
            .with_trailing_space(owner.trailing_space)
            .with_copy_text(self.copy_string());
        container.add_element(element);
    }
}

// ============================================================================
// Badges
// ============================================================================

/// Badge flavors; some paint a colored backdrop behind the image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    #[default]
    Plain,
    Moderator,
    Vip,
    /// Badge of another platform, with its brand color.
    Platform(Color),
}

#[derive(Debug, Clone)]
pub struct Badge {
    pub emote: Emote,
    pub kind: BadgeKind,
}

impl Badge {
    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        let Some(image) = self
            .emote
            .images
            .pick(ctx.image_scale)
            .and_then(|id| ctx.images.resolve(id, ctx.image_scale))
        else {
            return;
        };

        let background = match self.kind {
            BadgeKind::Plain => ImageBackground::None,
            BadgeKind::Moderator => ImageBackground::Rect(ctx.colors.moderator_badge),
            BadgeKind::Vip => ImageBackground::Rect(ctx.colors.vip_badge),
            BadgeKind::Platform(color) => ImageBackground::Rect(color),
        };
        let size = image.size().scaled(ctx.scale);
        container.add_element(image_element(owner, &image, size).with_background(background));
    }
}
