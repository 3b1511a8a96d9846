//! Text measurement.
//!
//! The layout engine never shapes text itself. It asks a [`MetricsProvider`]
//! for per-character advances and a line height, so the same container code
//! runs against a deterministic cell grid in tests and against real font
//! shaping in a renderer.

use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

/// Font roles used by message elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Tiny,
    ChatSmall,
    #[default]
    ChatMedium,
    ChatMediumBold,
    ChatLarge,
}

impl FontStyle {
    /// Size relative to the medium chat font.
    pub fn size_factor(self) -> f32 {
        match self {
            Self::Tiny => 0.625,
            Self::ChatSmall => 0.875,
            Self::ChatMedium | Self::ChatMediumBold => 1.0,
            Self::ChatLarge => 1.25,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::ChatMediumBold)
    }
}

/// Result of measuring one run of text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMetrics {
    /// Advance of each `char`, in order. Interior chars of a cluster get 0.
    pub advances: Vec<f32>,
    pub total_advance: f32,
    pub line_height: f32,
}

/// Injected text measurement capability.
pub trait MetricsProvider {
    fn measure(&self, text: &str, style: FontStyle, scale: f32) -> TextMetrics;

    fn width(&self, text: &str, style: FontStyle, scale: f32) -> f32 {
        self.measure(text, style, scale).total_advance
    }

    fn line_height(&self, style: FontStyle, scale: f32) -> f32 {
        self.measure(" ", style, scale).line_height
    }

    fn space_width(&self, style: FontStyle, scale: f32) -> f32 {
        self.width(" ", style, scale)
    }
}

// ============================================================================
// Monospace
// ============================================================================

/// Fixed-cell measurement: every char advances by its terminal cell width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub cell_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl MonospaceMetrics {
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }
}

impl MetricsProvider for MonospaceMetrics {
    fn measure(&self, text: &str, style: FontStyle, scale: f32) -> TextMetrics {
        let cell = self.cell_width * style.size_factor() * scale;
        let advances: Vec<f32> = text
            .chars()
            .map(|ch| ch.width().unwrap_or(0) as f32 * cell)
            .collect();
        TextMetrics {
            total_advance: advances.iter().sum(),
            advances,
            line_height: self.line_height * style.size_factor() * scale,
        }
    }
}

// ============================================================================
// cosmic-text
// ============================================================================

const SHAPE_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Measurement backed by cosmic-text shaping, with an LRU cache of results.
pub struct CosmicMetrics {
    font_system: RefCell<FontSystem>,
    cache: RefCell<LruCache<u64, TextMetrics>>,
    /// Point size of [`FontStyle::ChatMedium`] at scale 1.
    base_font_size: f32,
}

impl CosmicMetrics {
    /// Load system fonts.
    pub fn new(base_font_size: f32) -> Self {
        Self::with_font_system(FontSystem::new(), base_font_size)
    }

    pub fn with_font_system(font_system: FontSystem, base_font_size: f32) -> Self {
        Self {
            font_system: RefCell::new(font_system),
            cache: RefCell::new(LruCache::new(SHAPE_CACHE_CAPACITY)),
            base_font_size,
        }
    }

    fn cache_key(text: &str, style: FontStyle, scale: f32) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        style.hash(&mut hasher);
        scale.to_bits().hash(&mut hasher);
        hasher.finish()
    }

    fn shape(&self, text: &str, style: FontStyle, scale: f32) -> TextMetrics {
        let font_size = self.base_font_size * style.size_factor() * scale;
        let line_height = (font_size * 1.35).ceil();
        let char_count = text.chars().count();

        let mut font_system = self.font_system.borrow_mut();
        let mut buffer = Buffer::new(&mut font_system, Metrics::new(font_size, line_height));
        buffer.set_size(&mut font_system, Some(f32::MAX), Some(f32::MAX));
        let mut attrs = Attrs::new().family(Family::SansSerif);
        if style.is_bold() {
            attrs = attrs.weight(Weight::BOLD);
        }
        buffer.set_text(&mut font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        // byte offset -> char index
        let mut byte_to_char = vec![char_count; text.len() + 1];
        for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
            for slot in &mut byte_to_char[byte_idx..byte_idx + ch.len_utf8()] {
                *slot = char_idx;
            }
        }

        let mut advances = vec![0.0_f32; char_count];
        let mut covered = vec![false; char_count];
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let Some(&first) = byte_to_char.get(glyph.start) else {
                    continue;
                };
                let last = byte_to_char.get(glyph.end).copied().unwrap_or(char_count);
                if first >= char_count {
                    continue;
                }
                // The cluster's width goes to its first char.
                if !covered[first] {
                    advances[first] = glyph.w;
                }
                for slot in &mut covered[first..last.max(first + 1).min(char_count)] {
                    *slot = true;
                }
            }
        }

        // Whitespace the shaper dropped still needs room.
        let fallback = font_size * 0.3;
        for (advance, (is_covered, ch)) in advances
            .iter_mut()
            .zip(covered.iter().zip(text.chars()))
        {
            if !is_covered && ch.is_whitespace() {
                *advance = fallback;
            }
        }

        TextMetrics {
            total_advance: advances.iter().sum(),
            advances,
            line_height,
        }
    }
}

impl MetricsProvider for CosmicMetrics {
    fn measure(&self, text: &str, style: FontStyle, scale: f32) -> TextMetrics {
        let key = Self::cache_key(text, style, scale);
        if let Some(hit) = self.cache.borrow_mut().get(&key) {
            return hit.clone();
        }
        let metrics = self.shape(text, style, scale);
        self.cache.borrow_mut().put(key, metrics.clone());
        metrics
    }
}

impl std::fmt::Debug for CosmicMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosmicMetrics")
            .field("base_font_size", &self.base_font_size)
            .field("cached", &self.cache.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_uses_cell_widths() {
        let metrics = MonospaceMetrics::default();
        let m = metrics.measure("ab", FontStyle::ChatMedium, 1.0);
        assert_eq!(m.advances, vec![8.0, 8.0]);
        assert_eq!(m.total_advance, 16.0);
        assert_eq!(m.line_height, 16.0);
    }

    #[test]
    fn monospace_wide_and_combining_chars() {
        let metrics = MonospaceMetrics::default();
        // CJK is two cells wide, a combining acute accent is zero.
        let m = metrics.measure("中e\u{301}", FontStyle::ChatMedium, 1.0);
        assert_eq!(m.advances, vec![16.0, 8.0, 0.0]);
    }

    #[test]
    fn monospace_scales() {
        let metrics = MonospaceMetrics::default();
        assert_eq!(metrics.width("abc", FontStyle::ChatMedium, 2.0), 48.0);
        assert_eq!(metrics.line_height(FontStyle::ChatMedium, 2.0), 32.0);
        assert_eq!(metrics.space_width(FontStyle::Tiny, 1.0), 5.0);
    }
}
