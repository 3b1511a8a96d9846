//! Painter interface.
//!
//! Layout elements never touch pixels. They describe what to draw through a
//! [`Painter`]; renderers implement it against their surface. [`PaintRecorder`]
//! keeps the commands in a list for tests and headless previews.

use crate::image::ImageId;
use crate::metrics::FontStyle;
use crate::primitives::{Color, Point, Rect};

/// Drawing surface handed to the paint queries.
pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, style: FontStyle, color: Color);

    fn draw_image(&mut self, image: &ImageId, rect: Rect);

    /// Fill the ellipse inscribed in `rect`.
    fn fill_ellipse(&mut self, rect: Rect, color: Color);

    /// Stroke connected segments through `points`.
    fn stroke_path(&mut self, points: &[Point], thickness: f32, color: Color);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        origin: Point,
        style: FontStyle,
        color: Color,
    },
    Image {
        image: ImageId,
        rect: Rect,
    },
    Ellipse {
        rect: Rect,
        color: Color,
    },
    Path {
        points: Vec<Point>,
        thickness: f32,
        color: Color,
    },
}

/// A painter that records every call in order.
#[derive(Debug, Default, Clone)]
pub struct PaintRecorder {
    commands: Vec<PaintCommand>,
}

impl PaintRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Rectangles filled with exactly `color`, in paint order.
    pub fn filled_rects(&self, color: Color) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::FillRect { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// All drawn text runs, in paint order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<&ImageId> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::Image { image, .. } => Some(image),
                _ => None,
            })
            .collect()
    }
}

impl Painter for PaintRecorder {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::FillRect { rect, color });
    }

    fn draw_text(&mut self, text: &str, origin: Point, style: FontStyle, color: Color) {
        self.commands.push(PaintCommand::Text {
            text: text.to_string(),
            origin,
            style,
            color,
        });
    }

    fn draw_image(&mut self, image: &ImageId, rect: Rect) {
        self.commands.push(PaintCommand::Image {
            image: image.clone(),
            rect,
        });
    }

    fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::Ellipse { rect, color });
    }

    fn stroke_path(&mut self, points: &[Point], thickness: f32, color: Color) {
        if points.len() >= 2 {
            self.commands.push(PaintCommand::Path {
                points: points.to_vec(),
                thickness,
                color,
            });
        }
    }
}
