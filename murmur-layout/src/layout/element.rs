//! Layout elements: positioned, measured boxes produced by one layout pass.

use unicode_segmentation::UnicodeSegmentation;

use crate::bidi::TextDirection;
use crate::flags::ElementFlags;
use crate::image::{Image, ImageId};
use crate::link::Link;
use crate::metrics::{FontStyle, TextMetrics};
use crate::paint::Painter;
use crate::primitives::{Color, Point, Rect, Size};

/// Right-to-left embedding mark, prepended to reversed neutral runs so the
/// renderer's own bidi pass keeps them attached to their RTL neighbor.
pub const RTL_EMBEDDING: char = '\u{202B}';

/// Background painted behind an image element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageBackground {
    None,
    Rect(Color),
    /// Filled circle; the image is inset by `padding`.
    Circle { color: Color, padding: f32 },
}

/// One layer of a layered emote, positioned relative to the element.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub image: ImageId,
    pub offset: Point,
    pub size: Size,
    pub animated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutKind {
    Text {
        text: String,
        style: FontStyle,
        color: Color,
        /// Advance of each char of `text`.
        advances: Vec<f32>,
    },
    /// Up to two short lines stacked in a square, e.g. a moderation button.
    TextIcon {
        line1: String,
        line2: String,
        color: Color,
    },
    Image {
        image: ImageId,
        animated: bool,
        background: ImageBackground,
    },
    LayeredImage {
        layers: Vec<ImageLayer>,
    },
    ReplyCurve {
        thickness: f32,
        radius: f32,
        margin: f32,
        color: Color,
    },
}

/// A positioned box inside a message layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutElement {
    pub rect: Rect,
    pub kind: LayoutKind,
    /// Flags of the content element that produced this box.
    pub flags: ElementFlags,
    pub link: Option<Link>,
    pub tooltip: String,
    pub trailing_space: bool,
    /// Text copied for atomic elements such as emotes.
    pub copy_text: Option<String>,
    /// Index of the line this element was placed on.
    pub line: usize,
    /// Shared by all fragments of one source word.
    pub word_id: Option<usize>,
    pub direction: TextDirection,
    /// Neutral text that sits inside a reversed run.
    pub reversed_neutral: bool,
}

impl LayoutElement {
    fn with_kind(kind: LayoutKind, size: Size) -> Self {
        Self {
            rect: Rect::from_origin_size(Point::ORIGIN, size),
            kind,
            flags: ElementFlags::empty(),
            link: None,
            tooltip: String::new(),
            trailing_space: true,
            copy_text: None,
            line: 0,
            word_id: None,
            direction: TextDirection::Neutral,
            reversed_neutral: false,
        }
    }

    /// A text run measured with `metrics`.
    pub fn text(text: impl Into<String>, metrics: TextMetrics, style: FontStyle, color: Color) -> Self {
        let size = Size::new(metrics.total_advance, metrics.line_height);
        Self::with_kind(
            LayoutKind::Text {
                text: text.into(),
                style,
                color,
                advances: metrics.advances,
            },
            size,
        )
    }

    pub fn text_icon(line1: impl Into<String>, line2: impl Into<String>, size: Size, color: Color) -> Self {
        Self::with_kind(
            LayoutKind::TextIcon {
                line1: line1.into(),
                line2: line2.into(),
                color,
            },
            size,
        )
    }

    pub fn image(image: &Image, size: Size) -> Self {
        Self::with_kind(
            LayoutKind::Image {
                image: image.id.clone(),
                animated: image.animated,
                background: ImageBackground::None,
            },
            size,
        )
    }

    pub fn layered(layers: Vec<ImageLayer>, size: Size) -> Self {
        Self::with_kind(LayoutKind::LayeredImage { layers }, size)
    }

    pub fn reply_curve(width: f32, thickness: f32, radius: f32, margin: f32, color: Color) -> Self {
        Self::with_kind(
            LayoutKind::ReplyCurve {
                thickness,
                radius,
                margin,
                color,
            },
            Size::new(width, 0.0),
        )
    }

    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_link(mut self, link: Option<Link>) -> Self {
        self.link = link.filter(|link| !link.is_none());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_trailing_space(mut self, trailing_space: bool) -> Self {
        self.trailing_space = trailing_space;
        self
    }

    pub fn with_copy_text(mut self, copy_text: impl Into<String>) -> Self {
        self.copy_text = Some(copy_text.into());
        self
    }

    pub fn with_word_id(mut self, word_id: usize) -> Self {
        self.word_id = Some(word_id);
        self
    }

    pub fn with_direction(mut self, direction: TextDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Paint a background behind an image element. No-op for other kinds.
    pub fn with_background(mut self, new_background: ImageBackground) -> Self {
        if let LayoutKind::Image { background, .. } = &mut self.kind {
            *background = new_background;
        }
        self
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rect.height
    }

    /// The text of a text element.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            LayoutKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// An emote rendered as an image (not as fallback text).
    pub fn is_emote_image(&self) -> bool {
        matches!(
            self.kind,
            LayoutKind::Image { .. } | LayoutKind::LayeredImage { .. }
        ) && self.flags.is_emote_image()
    }

    pub fn is_animated(&self) -> bool {
        match &self.kind {
            LayoutKind::Image { animated, .. } => *animated,
            LayoutKind::LayeredImage { layers } => layers.iter().any(|layer| layer.animated),
            _ => false,
        }
    }

    /// Number of flat selection slots this element consumes.
    pub fn selection_index_count(&self) -> usize {
        let trailing = usize::from(self.trailing_space);
        match &self.kind {
            LayoutKind::Text { text, .. } => text.chars().count() + trailing,
            LayoutKind::TextIcon { .. }
            | LayoutKind::Image { .. }
            | LayoutKind::LayeredImage { .. } => 1 + trailing,
            LayoutKind::ReplyCurve { .. } => 1,
        }
    }

    /// Local char index under `point`. Text snaps to grapheme starts.
    pub fn mouse_over_index(&self, point: Point) -> usize {
        let LayoutKind::Text { text, advances, .. } = &self.kind else {
            return 0;
        };
        if point.x < self.rect.left() {
            return 0;
        }

        let mut x = self.rect.left();
        let mut char_index = 0;
        for grapheme in text.graphemes(true) {
            let chars = grapheme.chars().count();
            let width: f32 = advances.iter().skip(char_index).take(chars).sum();
            if x + width > point.x {
                return char_index;
            }
            x += width;
            char_index += chars;
        }
        char_index
    }

    /// X coordinate of the boundary before local `index`.
    pub fn x_from_index(&self, index: usize) -> f32 {
        if index == 0 {
            return self.rect.left();
        }
        match &self.kind {
            LayoutKind::Text { advances, .. } if index < advances.len() => {
                self.rect.left() + advances[..index].iter().sum::<f32>()
            }
            _ => self.rect.right(),
        }
    }

    /// Append the text of local slots `from..to` to `out`.
    pub fn add_copy_text(&self, out: &mut String, from: usize, to: usize) {
        match &self.kind {
            LayoutKind::Text { text, .. } => {
                let len = text.chars().count();
                let end = to.min(len);
                if from < end {
                    out.extend(text.chars().skip(from).take(end - from));
                }
                if self.trailing_space && to > len {
                    out.push(' ');
                }
            }
            LayoutKind::Image { .. } | LayoutKind::LayeredImage { .. } => {
                let Some(copy_text) = &self.copy_text else {
                    return;
                };
                if from < 1 {
                    out.push_str(copy_text);
                }
                if self.trailing_space && to >= 2 {
                    out.push(' ');
                }
            }
            LayoutKind::TextIcon { .. } | LayoutKind::ReplyCurve { .. } => {}
        }
    }

    // ========================================================================
    // Painting
    // ========================================================================

    /// Paint everything that does not animate.
    pub fn paint(&self, painter: &mut dyn Painter, y_offset: f32) {
        let rect = self.rect.translate(Point::new(0.0, y_offset));
        match &self.kind {
            LayoutKind::Text {
                text, style, color, ..
            } => {
                if self.reversed_neutral {
                    let mut marked = String::with_capacity(text.len() + 3);
                    marked.push(RTL_EMBEDDING);
                    marked.push_str(text);
                    painter.draw_text(&marked, rect.origin(), *style, *color);
                } else {
                    painter.draw_text(text, rect.origin(), *style, *color);
                }
            }
            LayoutKind::TextIcon {
                line1,
                line2,
                color,
            } => {
                painter.draw_text(line1, rect.origin(), FontStyle::Tiny, *color);
                if !line2.is_empty() {
                    let second = Point::new(rect.x, rect.y + rect.height / 2.0);
                    painter.draw_text(line2, second, FontStyle::Tiny, *color);
                }
            }
            LayoutKind::Image {
                image,
                animated,
                background,
            } => {
                if !*animated {
                    paint_image(painter, image, rect, *background);
                }
            }
            LayoutKind::LayeredImage { layers } => {
                if !self.is_animated() {
                    paint_layers(painter, layers, rect);
                }
            }
            LayoutKind::ReplyCurve {
                thickness,
                radius,
                margin,
                color,
            } => {
                painter.stroke_path(&reply_curve_points(rect, *radius, *margin), *thickness, *color);
            }
        }
    }

    /// Paint animated content. Returns whether this element animates.
    pub fn paint_animated(&self, painter: &mut dyn Painter, y_offset: f32) -> bool {
        if !self.is_animated() {
            return false;
        }
        let rect = self.rect.translate(Point::new(0.0, y_offset));
        match &self.kind {
            LayoutKind::Image {
                image, background, ..
            } => paint_image(painter, image, rect, *background),
            // A layered emote repaints every layer so stacking order holds.
            LayoutKind::LayeredImage { layers } => paint_layers(painter, layers, rect),
            _ => {}
        }
        true
    }
}

fn paint_image(painter: &mut dyn Painter, image: &ImageId, rect: Rect, background: ImageBackground) {
    match background {
        ImageBackground::None => painter.draw_image(image, rect),
        ImageBackground::Rect(color) => {
            painter.fill_rect(rect, color);
            painter.draw_image(image, rect);
        }
        ImageBackground::Circle { color, padding } => {
            painter.fill_ellipse(rect, color);
            let inner = Rect::new(
                rect.x + padding,
                rect.y + padding,
                rect.width - 2.0 * padding,
                rect.height - 2.0 * padding,
            );
            painter.draw_image(image, inner);
        }
    }
}

fn paint_layers(painter: &mut dyn Painter, layers: &[ImageLayer], rect: Rect) {
    for layer in layers {
        let origin = rect.origin() + layer.offset;
        painter.draw_image(&layer.image, Rect::from_origin_size(origin, layer.size));
    }
}

/// Quadratic curve from below the element up and across to its right edge.
fn reply_curve_points(rect: Rect, radius: f32, margin: f32) -> Vec<Point> {
    const SEGMENTS: usize = 8;
    let left = rect.left() + margin;
    let start = Point::new(left, rect.bottom() + radius);
    let control = Point::new(left, rect.top() - radius);
    let end = Point::new(rect.right(), rect.top() - radius);
    (0..=SEGMENTS)
        .map(|step| {
            let t = step as f32 / SEGMENTS as f32;
            let u = 1.0 - t;
            Point::new(
                u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
                u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
            )
        })
        .collect()
}
