//! Text-bearing content elements and the word wrapping loop.

use std::cell::RefCell;
use std::fmt::Write as _;

use chrono::NaiveDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::color::MessageColor;
use crate::context::RenderingContext;
use crate::layout::{ELLIPSIS, LayoutContainer, LayoutElement};
use crate::metrics::{FontStyle, TextMetrics};
use crate::primitives::Color;

use super::ContentElement;

fn split_words(text: &str) -> Vec<String> {
    text.split(' ').map(str::to_string).collect()
}

/// Wrapping text, split into words once at construction.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub words: Vec<String>,
    pub color: MessageColor,
    pub style: FontStyle,
}

impl TextRun {
    pub fn new(text: &str, color: MessageColor, style: FontStyle) -> Self {
        Self {
            words: split_words(text),
            color,
            style,
        }
    }

    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Build a text layout element carrying the owner's payload.
fn text_element(
    owner: &ContentElement,
    ctx: &RenderingContext<'_>,
    text: &str,
    metrics: TextMetrics,
    style: FontStyle,
    color: Color,
) -> LayoutElement {
    LayoutElement::text(text, metrics, style, color)
        .with_flags(owner.flags)
        .with_link(owner.link.clone())
        .with_tooltip(owner.tooltip.clone())
        .with_direction(ctx.direction.classify(text))
}

/// Place `words`, wrapping and hard-splitting as needed.
///
/// Each word tries the current line, then a fresh line, and is otherwise
/// split on grapheme boundaries. Every split piece holds at least one
/// grapheme. Fragments of one word share a word id.
pub(super) fn layout_words(
    owner: &ContentElement,
    words: &[String],
    style: FontStyle,
    color: Color,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    let last = words.len().saturating_sub(1);
    for (i, word) in words.iter().enumerate() {
        if !container.can_add_elements() {
            container.mark_truncated();
            return;
        }

        let trailing_space = if i == last { owner.trailing_space } else { true };
        let word_id = container.next_word_id();
        let metrics = ctx.metrics.measure(word, style, ctx.scale);
        let width = metrics.total_advance;

        if container.fits_in_line(width) {
            let element = text_element(owner, ctx, word, metrics, style, color)
                .with_trailing_space(trailing_space)
                .with_word_id(word_id);
            container.add_element_no_line_break(element);
            continue;
        }

        if !container.at_line_start() {
            container.break_line();
            if !container.can_add_elements() {
                container.mark_truncated();
                return;
            }
            if container.fits_in_line(width) {
                let element = text_element(owner, ctx, word, metrics, style, color)
                    .with_trailing_space(trailing_space)
                    .with_word_id(word_id);
                container.add_element_no_line_break(element);
                continue;
            }
        }

        hard_split(owner, word, &metrics, style, color, trailing_space, word_id, container, ctx);
    }
}

/// Split a word wider than an empty line across as many lines as needed.
#[allow(clippy::too_many_arguments)]
fn hard_split(
    owner: &ContentElement,
    word: &str,
    metrics: &TextMetrics,
    style: FontStyle,
    color: Color,
    trailing_space: bool,
    word_id: usize,
    container: &mut LayoutContainer,
    ctx: &RenderingContext<'_>,
) {
    let piece = |chars: std::ops::Range<usize>, width: f32| TextMetrics {
        advances: metrics.advances[chars].to_vec(),
        total_advance: width,
        line_height: metrics.line_height,
    };

    let mut piece_start_byte = 0;
    let mut piece_start_char = 0;
    let mut piece_width = 0.0;
    let mut char_index = 0;

    for (byte, grapheme) in word.grapheme_indices(true) {
        let chars = grapheme.chars().count();
        let grapheme_width: f32 = metrics.advances[char_index..char_index + chars].iter().sum();

        if char_index > piece_start_char && !container.fits_in_line(piece_width + grapheme_width) {
            let text = &word[piece_start_byte..byte];
            let element = text_element(
                owner,
                ctx,
                text,
                piece(piece_start_char..char_index, piece_width),
                style,
                color,
            )
            .with_trailing_space(false)
            .with_word_id(word_id);
            container.add_element_no_line_break(element);
            container.break_line();
            if !container.can_add_elements() {
                container.mark_truncated();
                return;
            }

            piece_start_byte = byte;
            piece_start_char = char_index;
            piece_width = 0.0;
        }

        piece_width += grapheme_width;
        char_index += chars;
    }

    let text = &word[piece_start_byte..];
    let element = text_element(
        owner,
        ctx,
        text,
        piece(piece_start_char..char_index, piece_width),
        style,
        color,
    )
    .with_trailing_space(trailing_space)
    .with_word_id(word_id);
    container.add_element_no_line_break(element);
}

// ============================================================================
// Single line
// ============================================================================

/// Text that stays on the current line and is cut with an ellipsis.
#[derive(Debug, Clone)]
pub struct SingleLineText {
    pub words: Vec<String>,
    pub color: MessageColor,
    pub style: FontStyle,
}

impl SingleLineText {
    pub fn new(text: &str, color: MessageColor, style: FontStyle) -> Self {
        Self {
            words: split_words(text),
            color,
            style,
        }
    }

    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        let color = self.color.resolve(ctx.colors);
        let last = self.words.len().saturating_sub(1);

        for (i, word) in self.words.iter().enumerate() {
            let trailing_space = if i == last { owner.trailing_space } else { true };
            let metrics = ctx.metrics.measure(word, self.style, ctx.scale);

            if container.fits_in_line(metrics.total_advance) {
                let element = text_element(owner, ctx, word, metrics, self.style, color)
                    .with_trailing_space(trailing_space);
                container.add_element_no_line_break(element);
                continue;
            }

            let ellipsis_width = ctx.metrics.width(ELLIPSIS, self.style, ctx.scale);
            let mut truncated = String::new();
            let mut width = 0.0;
            let mut char_index = 0;
            for grapheme in word.graphemes(true) {
                let chars = grapheme.chars().count();
                let grapheme_width: f32 =
                    metrics.advances[char_index..char_index + chars].iter().sum();
                if !container.fits_in_line(width + grapheme_width + ellipsis_width) {
                    break;
                }
                truncated.push_str(grapheme);
                width += grapheme_width;
                char_index += chars;
            }
            truncated.push_str(ELLIPSIS);

            let metrics = ctx.metrics.measure(&truncated, self.style, ctx.scale);
            let element = text_element(owner, ctx, &truncated, metrics, self.style, color)
                .with_trailing_space(false);
            container.add_element_no_line_break(element);
            container.break_line();
            return;
        }
    }
}

// ============================================================================
// Mention
// ============================================================================

/// An `@user` mention whose look follows the live settings.
#[derive(Debug, Clone)]
pub struct Mention {
    pub words: Vec<String>,
    /// Used when mentions are not colorized.
    pub fallback_color: MessageColor,
    pub user_color: MessageColor,
}

impl Mention {
    pub fn new(display_name: &str, fallback_color: MessageColor, user_color: MessageColor) -> Self {
        Self {
            words: split_words(display_name),
            fallback_color,
            user_color,
        }
    }

    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        let color = if ctx.settings.colorize_mentions {
            self.user_color
        } else {
            self.fallback_color
        };
        let style = if ctx.settings.bold_mentions {
            FontStyle::ChatMediumBold
        } else {
            FontStyle::ChatMedium
        };
        layout_words(owner, &self.words, style, color.resolve(ctx.colors), container, ctx);
    }
}

// ============================================================================
// Timestamp
// ============================================================================

/// Message time, formatted with the configured strftime string.
#[derive(Debug, Clone)]
pub struct Timestamp {
    pub time: NaiveDateTime,
    /// Last `(format, words)` pair.
    cache: RefCell<Option<(String, Vec<String>)>>,
}

impl Timestamp {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time,
            cache: RefCell::new(None),
        }
    }

    /// Formatted words for `format`, rebuilt only when the format changes.
    pub fn words(&self, format: &str) -> Vec<String> {
        let mut cache = self.cache.borrow_mut();
        if let Some((cached_format, words)) = cache.as_ref() {
            if cached_format == format {
                return words.clone();
            }
        }

        let mut formatted = String::new();
        if write!(formatted, "{}", self.time.format(format)).is_err() {
            tracing::warn!(format, "invalid timestamp format, using %H:%M");
            formatted.clear();
            let _ = write!(formatted, "{}", self.time.format("%H:%M"));
        }
        let words = split_words(&formatted);
        *cache = Some((format.to_string(), words.clone()));
        words
    }

    pub(super) fn add_to_container(
        &self,
        owner: &ContentElement,
        container: &mut LayoutContainer,
        ctx: &RenderingContext<'_>,
    ) {
        let words = self.words(&ctx.settings.timestamp_format);
        let color = MessageColor::System.resolve(ctx.colors);
        layout_words(owner, &words, FontStyle::ChatMedium, color, container, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(13, 37, 5))
            .expect("valid date")
    }

    #[test]
    fn text_run_splits_on_spaces() {
        let run = TextRun::new("a b  c", MessageColor::Text, FontStyle::ChatMedium);
        assert_eq!(run.words, vec!["a", "b", "", "c"]);
        assert_eq!(run.text(), "a b  c");
    }

    #[test]
    fn timestamp_caches_per_format() {
        let timestamp = Timestamp::new(time());
        assert_eq!(timestamp.words("%H:%M"), vec!["13:37"]);
        assert_eq!(timestamp.words("%H:%M:%S"), vec!["13:37:05"]);
        assert_eq!(timestamp.words("%I:%M %p"), vec!["01:37", "PM"]);
    }

    #[test]
    fn invalid_timestamp_format_falls_back() {
        let timestamp = Timestamp::new(time());
        assert_eq!(timestamp.words("%Q"), vec!["13:37"]);
    }
}
