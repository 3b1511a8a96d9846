//! Line-breaking container.
//!
//! Content elements push [`LayoutElement`]s into the container one at a time.
//! The container assigns positions left to right, wraps when an element no
//! longer fits, and records a [`Line`] per finished row. Each pass starts
//! with [`LayoutContainer::begin_layout`] and ends with
//! [`LayoutContainer::end_layout`].
//!
//! Positions are built in content coordinates (origin at the left margin,
//! elements hanging above `current_y`) and shifted into message coordinates
//! when a line is finished.

use crate::bidi::TextDirection;
use crate::context::RenderingContext;
use crate::flags::{ElementFlags, MessageFlags};
use crate::link::{Link, LinkKind};
use crate::metrics::{FontStyle, TextMetrics};
use crate::primitives::{Color, Margins, Point};

use super::element::LayoutElement;

/// Space around message content, unscaled.
pub const MARGIN: Margins = Margins::new(8.0, 4.0, 8.0, 4.0);

/// How much compact emotes shave off their line-height contribution, unscaled.
pub const COMPACT_EMOTES_OFFSET: f32 = 6.0;

/// Text appended to collapsed messages.
pub const ELLIPSIS: &str = "...";

/// A finished row of elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Element range `start_index..end_index` in the container arena.
    pub start_index: usize,
    pub end_index: usize,
    /// Flat selection range `start_char_index..end_char_index`.
    pub start_char_index: usize,
    pub end_char_index: usize,
    /// Vertical band. The first line extends up to -inf, the last down to +inf.
    pub top: f32,
    pub bottom: f32,
}

impl Line {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    #[inline]
    pub fn contains_y(&self, y: f32) -> bool {
        self.top <= y && y < self.bottom
    }
}

/// Size and flags the placement routine needs from an element.
#[derive(Debug, Clone, Copy)]
pub(super) struct Placement {
    pub width: f32,
    pub height: f32,
    pub emote_image: bool,
    pub trailing_space: bool,
}

impl Placement {
    pub(super) fn of(element: &LayoutElement) -> Self {
        Self {
            width: element.width(),
            height: element.height(),
            emote_image: element.is_emote_image(),
            trailing_space: element.trailing_space,
        }
    }
}

/// The line-breaking engine for one message.
#[derive(Debug, Clone)]
pub struct LayoutContainer {
    pub(super) elements: Vec<LayoutElement>,
    pub(super) lines: Vec<Line>,

    // Pass parameters
    pub(super) width: f32,
    pub(super) scale: f32,
    pub(super) image_scale: f32,
    pub(super) flags: MessageFlags,
    pub(super) compact_emotes: bool,
    pub(super) collapse_after: usize,
    pub(super) remove_spaces_between_emotes: bool,
    pub(super) space_width: f32,
    pub(super) text_line_height: f32,
    pub(super) ellipsis_metrics: TextMetrics,
    pub(super) ellipsis_color: Color,

    // Pass state
    pub(super) current_x: f32,
    pub(super) current_y: f32,
    pub(super) line_height: f32,
    pub(super) line: usize,
    pub(super) line_start: usize,
    pub(super) can_add: bool,
    pub(super) truncated: bool,
    pub(super) is_collapsed: bool,
    pub(super) height: f32,
    pub(super) next_word_id: usize,

    // Bidi state
    pub(super) contains_rtl: bool,
    pub(super) paragraph_direction: TextDirection,
    pub(super) line_reordered: bool,
    pub(super) was_prev_reversed: bool,
}

impl Default for LayoutContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutContainer {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            lines: Vec::new(),
            width: 0.0,
            scale: 1.0,
            image_scale: 1.0,
            flags: MessageFlags::empty(),
            compact_emotes: false,
            collapse_after: 0,
            remove_spaces_between_emotes: false,
            space_width: 0.0,
            text_line_height: 0.0,
            ellipsis_metrics: TextMetrics::default(),
            ellipsis_color: Color::WHITE,
            current_x: 0.0,
            current_y: 0.0,
            line_height: 0.0,
            line: 0,
            line_start: 0,
            can_add: true,
            truncated: false,
            is_collapsed: false,
            height: 0.0,
            next_word_id: 0,
            contains_rtl: false,
            paragraph_direction: TextDirection::Neutral,
            line_reordered: false,
            was_prev_reversed: false,
        }
    }

    // ========================================================================
    // Pass lifecycle
    // ========================================================================

    /// Reset all per-pass state and capture the pass parameters.
    pub fn begin_layout(&mut self, ctx: &RenderingContext<'_>, flags: MessageFlags) {
        self.elements.clear();
        self.lines.clear();

        self.width = ctx.width;
        self.scale = ctx.scale;
        self.image_scale = ctx.image_scale;
        self.flags = flags;
        self.compact_emotes =
            ctx.settings.compact_emotes && !flags.contains(MessageFlags::DISABLE_COMPACT_EMOTES);
        self.collapse_after = ctx.settings.collapse_messages_min_lines;
        self.remove_spaces_between_emotes = ctx.settings.remove_spaces_between_emotes;

        let space = ctx.metrics.measure(" ", FontStyle::ChatMedium, ctx.scale);
        self.space_width = space.total_advance;
        self.text_line_height = space.line_height;
        self.ellipsis_metrics = ctx.metrics.measure(ELLIPSIS, FontStyle::ChatMedium, ctx.scale);
        self.ellipsis_color = ctx.colors.link;

        self.current_x = 0.0;
        self.current_y = (MARGIN.top * ctx.scale).trunc();
        self.line_height = 0.0;
        self.line = 0;
        self.line_start = 0;
        self.can_add = true;
        self.truncated = false;
        self.is_collapsed = false;
        self.height = 0.0;
        self.next_word_id = 0;

        self.contains_rtl = false;
        self.paragraph_direction = TextDirection::Neutral;
        self.line_reordered = false;
        self.was_prev_reversed = false;
    }

    /// Finish the last line, inject the ellipsis if content was dropped and
    /// compute the final height.
    pub fn end_layout(&mut self) {
        if self.truncated {
            if self.contains_rtl && !self.line_reordered {
                self.reorder_rtl(self.rtl_start_index());
                self.line_reordered = true;
            }
            let ellipsis = LayoutElement::text(
                ELLIPSIS,
                self.ellipsis_metrics.clone(),
                FontStyle::ChatMedium,
                self.ellipsis_color,
            )
            .with_flags(ElementFlags::COLLAPSED)
            .with_link(Some(Link::new(LinkKind::Expand, "")));

            let run_start = self.line_start.max(self.rtl_start_index());
            if self.paragraph_direction == TextDirection::Rtl && run_start < self.elements.len() {
                // The cut sits where RTL reading ends: left of the reordered run.
                let shift = ellipsis.width() + self.space_width;
                self.current_x = self.elements[run_start].rect.x;
                self.place(ellipsis.with_trailing_space(true));
                let end = self.elements.len() - 1;
                for element in &mut self.elements[run_start..end] {
                    element.rect.x += shift;
                }
                self.elements[run_start..].rotate_right(1);
            } else {
                self.current_x = match self.line_right_edge() {
                    Some(right) => right + self.space_width,
                    None => 0.0,
                };
                self.place(ellipsis.with_trailing_space(false));
            }
            self.is_collapsed = true;
            tracing::debug!(lines = self.line + 1, "message collapsed");
            self.finish_line();
        } else if !self.at_line_start() {
            self.finish_line();
        }

        if self.lines.is_empty() {
            self.lines.push(Line {
                start_index: 0,
                end_index: 0,
                start_char_index: 0,
                end_char_index: 0,
                top: self.current_y,
                bottom: self.current_y + self.text_line_height,
            });
            self.current_y += self.text_line_height;
        }

        if let Some(first) = self.lines.first_mut() {
            first.top = f32::NEG_INFINITY;
        }
        if let Some(last) = self.lines.last_mut() {
            last.bottom = f32::INFINITY;
        }

        self.height = self.current_y + (MARGIN.bottom * self.scale).trunc();

        tracing::trace!(
            lines = self.lines.len(),
            elements = self.elements.len(),
            height = self.height,
            collapsed = self.is_collapsed,
            "layout pass finished"
        );
    }

    // ========================================================================
    // Adding elements
    // ========================================================================

    /// Place `element`, breaking the line first if it does not fit.
    pub fn add_element(&mut self, element: LayoutElement) {
        if !self.can_add {
            self.mark_truncated();
            return;
        }
        if !self.at_line_start() && !self.fits_in_line(element.width()) {
            self.break_line();
            if !self.can_add {
                self.mark_truncated();
                return;
            }
        }
        self.place(element);
    }

    /// Place `element` on the current line without checking the width.
    pub fn add_element_no_line_break(&mut self, element: LayoutElement) {
        if !self.can_add {
            self.mark_truncated();
            return;
        }
        self.place(element);
    }

    /// Record that content was dropped after the collapse limit, so
    /// `end_layout` appends the ellipsis.
    pub fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    /// End the current line.
    ///
    /// On the last line a collapsed message may show, the line stays open
    /// and further elements are dropped instead.
    pub fn break_line(&mut self) {
        if !self.can_add {
            return;
        }
        if self.can_collapse() && self.line + 1 >= self.collapse_after {
            self.can_add = false;
            tracing::trace!(line = self.line, "collapse limit reached");
            return;
        }
        self.finish_line();
    }

    /// Id for a new word; all fragments of one word share it.
    pub fn next_word_id(&mut self) -> usize {
        let id = self.next_word_id;
        self.next_word_id += 1;
        id
    }

    // ========================================================================
    // Pass queries
    // ========================================================================

    /// Whether the current line has no elements yet.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.line_start == self.elements.len()
    }

    #[inline]
    pub fn can_add_elements(&self) -> bool {
        self.can_add
    }

    /// Collapsing is configured and the message asks for it.
    #[inline]
    pub fn can_collapse(&self) -> bool {
        self.collapse_after > 0 && self.flags.contains(MessageFlags::COLLAPSED)
    }

    /// Width left on the current line, minus the ellipsis reserve on the
    /// line where collapsing would kick in.
    pub fn remaining_width(&self) -> f32 {
        let reserve = if self.can_collapse() && self.line + 1 == self.collapse_after {
            self.ellipsis_metrics.total_advance
        } else {
            0.0
        };
        self.width - MARGIN.horizontal(self.scale) - self.current_x - reserve
    }

    #[inline]
    pub fn fits_in_line(&self, width: f32) -> bool {
        width <= self.remaining_width()
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn image_scale(&self) -> f32 {
        self.image_scale
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn message_flags(&self) -> MessageFlags {
        self.flags
    }

    #[inline]
    pub fn space_width(&self) -> f32 {
        self.space_width
    }

    // ========================================================================
    // Results
    // ========================================================================

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    #[inline]
    pub fn elements(&self) -> &[LayoutElement] {
        &self.elements
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    #[inline]
    pub fn paragraph_direction(&self) -> TextDirection {
        self.paragraph_direction
    }

    // ========================================================================
    // Placement
    // ========================================================================

    /// Append a new element to the current line.
    fn place(&mut self, mut element: LayoutElement) {
        if element.word_id.is_none() {
            element.word_id = Some(self.next_word_id());
        }
        if element.direction == TextDirection::Rtl {
            self.contains_rtl = true;
        }
        if self.paragraph_direction.is_neutral()
            && element.flags.contains(ElementFlags::TEXT)
            && !element.flags.intersects(ElementFlags::MENTION | ElementFlags::REPLIED_MESSAGE)
            && !element.direction.is_neutral()
        {
            self.paragraph_direction = element.direction;
        }

        let prev = self
            .elements
            .len()
            .checked_sub(1)
            .filter(|&index| index >= self.line_start);
        let origin = self.position(Placement::of(&element), prev, false);
        element.rect.move_to(origin);
        element.line = self.line;
        self.elements.push(element);
    }

    /// Advance the cursor over one element and return its origin.
    ///
    /// Shared by forward layout and the RTL re-placement. `prev` is the
    /// element placed just before this one in the current sequence; `rtl`
    /// walks the cursor leftwards.
    pub(super) fn position(&mut self, placement: Placement, prev: Option<usize>, rtl: bool) -> Point {
        let compact = self.compact_emotes && placement.emote_image;
        let contribution = if compact {
            placement.height - COMPACT_EMOTES_OFFSET * self.scale
        } else {
            placement.height
        };
        self.line_height = self.line_height.max(contribution);

        if self.remove_spaces_between_emotes && placement.emote_image {
            let retract = prev
                .and_then(|index| self.elements.get(index))
                .is_some_and(|prev| prev.trailing_space && prev.is_emote_image());
            if retract {
                if rtl {
                    self.current_x += self.space_width;
                } else {
                    self.current_x -= self.space_width;
                }
            }
        }

        if rtl {
            self.current_x -= placement.width;
        }
        let origin = Point::new(self.current_x, self.current_y - placement.height);
        if rtl {
            if placement.trailing_space {
                self.current_x -= self.space_width;
            }
        } else {
            self.current_x += placement.width;
            if placement.trailing_space {
                self.current_x += self.space_width;
            }
        }
        origin
    }

    /// Right edge of the rightmost element on the current line.
    fn line_right_edge(&self) -> Option<f32> {
        self.elements[self.line_start..]
            .iter()
            .map(|element| element.rect.right())
            .reduce(f32::max)
    }

    /// Close the current line: reorder, center, shift into message
    /// coordinates and record it.
    fn finish_line(&mut self) {
        if self.contains_rtl && !self.line_reordered {
            self.reorder_rtl(self.rtl_start_index());
        }
        self.line_reordered = false;

        let end = self.elements.len();
        let x_offset = if self.flags.contains(MessageFlags::CENTERED) {
            let available = self.width - MARGIN.horizontal(self.scale);
            self.line_right_edge()
                .map_or(0.0, |right| ((available - right) / 2.0).max(0.0))
        } else {
            0.0
        };
        let left = (MARGIN.left * self.scale).trunc();
        let nudge = COMPACT_EMOTES_OFFSET / 2.0 * self.scale;

        let mut char_count = 0;
        for element in &mut self.elements[self.line_start..end] {
            let y_extra = if self.compact_emotes && element.is_emote_image() {
                nudge
            } else {
                0.0
            };
            element.rect.x += x_offset + left;
            element.rect.y += self.line_height + y_extra;
            char_count += element.selection_index_count();
        }

        let start_char_index = self.lines.last().map_or(0, |line| line.end_char_index);
        self.lines.push(Line {
            start_index: self.line_start,
            end_index: end,
            start_char_index,
            end_char_index: start_char_index + char_count,
            top: self.current_y,
            bottom: self.current_y + self.line_height,
        });
        debug_assert!(
            self.lines
                .windows(2)
                .all(|pair| pair[0].end_char_index == pair[1].start_char_index),
            "line char ranges must be contiguous"
        );

        self.current_x = 0.0;
        self.current_y += self.line_height;
        self.line_height = 0.0;
        self.line += 1;
        self.line_start = end;
    }

    /// First element eligible for RTL reordering: the one after the
    /// username, or after the leading timestamp and badges.
    pub(super) fn rtl_start_index(&self) -> usize {
        match self
            .elements
            .iter()
            .position(|element| element.flags.contains(ElementFlags::USERNAME))
        {
            Some(username) => username + 1,
            None => self
                .elements
                .iter()
                .take_while(|element| {
                    element.flags.intersects(ElementFlags::TIMESTAMP | ElementFlags::BADGES)
                })
                .count(),
        }
    }
}
