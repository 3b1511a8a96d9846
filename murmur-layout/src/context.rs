//! Per-pass rendering context.

use crate::bidi::{DirectionDetector, UnicodeDirection};
use crate::color::MessageColors;
use crate::flags::ElementFlags;
use crate::image::ImageCache;
use crate::metrics::MetricsProvider;
use crate::settings::Settings;

static UNICODE_DIRECTION: UnicodeDirection = UnicodeDirection;

/// Everything a layout pass reads, captured once at `begin_layout`.
///
/// The context borrows its collaborators; nothing in it is mutated during a
/// pass. Settings changes are picked up by building a new context with a
/// bumped `generation`.
#[derive(Clone, Copy)]
pub struct RenderingContext<'a> {
    /// Element flags to realize in this view.
    pub flags: ElementFlags,
    /// Canvas width in logical pixels, margins included.
    pub width: f32,
    pub scale: f32,
    /// Resolution picked from image sets.
    pub image_scale: f32,
    pub settings: &'a Settings,
    pub colors: &'a MessageColors,
    pub metrics: &'a dyn MetricsProvider,
    pub images: &'a dyn ImageCache,
    pub direction: &'a dyn DirectionDetector,
    /// Bumped whenever settings change; cached layouts compare it.
    pub generation: u64,
}

impl<'a> RenderingContext<'a> {
    pub fn new(
        settings: &'a Settings,
        colors: &'a MessageColors,
        metrics: &'a dyn MetricsProvider,
        images: &'a dyn ImageCache,
    ) -> Self {
        Self {
            flags: ElementFlags::DEFAULT,
            width: 400.0,
            scale: 1.0,
            image_scale: 1.0,
            settings,
            colors,
            metrics,
            images,
            direction: &UNICODE_DIRECTION,
            generation: 0,
        }
    }

    pub fn with_flags(mut self, flags: ElementFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_image_scale(mut self, image_scale: f32) -> Self {
        self.image_scale = image_scale;
        self
    }

    pub fn with_direction(mut self, direction: &'a dyn DirectionDetector) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl std::fmt::Debug for RenderingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingContext")
            .field("flags", &self.flags)
            .field("width", &self.width)
            .field("scale", &self.scale)
            .field("image_scale", &self.image_scale)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
