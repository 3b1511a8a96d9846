//! Hit-testing, selection painting and copy text for a finished layout.

use crate::flags::ElementFlags;
use crate::paint::Painter;
use crate::primitives::{Color, Point, Rect};
use crate::selection::Selection;
use crate::settings::CopyMode;

use super::container::{LayoutContainer, Line};
use super::element::LayoutElement;

impl LayoutContainer {
    /// First element whose rect contains `point`.
    pub fn element_at(&self, point: Point) -> Option<&LayoutElement> {
        self.elements.iter().find(|element| element.rect.contains(point))
    }

    /// Flat char index under `point`.
    pub fn selection_index(&self, point: Point) -> usize {
        if self.elements.is_empty() {
            return 0;
        }
        let Some(line) = self
            .lines
            .iter()
            .find(|line| line.contains_y(point.y))
            .or_else(|| self.lines.last())
        else {
            return 0;
        };

        let mut index = line.start_char_index;
        for element in &self.elements[line.start_index..line.end_index] {
            let space = if element.trailing_space {
                self.space_width
            } else {
                0.0
            };
            if point.x <= element.rect.right() + space {
                return index + element.mouse_over_index(point);
            }
            index += element.selection_index_count();
        }
        index
    }

    /// `[start, end)` of the word `element` belongs to, without the final
    /// trailing-space slot.
    pub fn word_bounds(&self, element: &LayoutElement) -> (usize, usize) {
        let mut index = 0;
        let mut bounds: Option<(usize, usize)> = None;
        for candidate in &self.elements {
            let count = candidate.selection_index_count();
            if candidate.word_id == element.word_id {
                let end = index + count - usize::from(candidate.trailing_space);
                bounds = Some(match bounds {
                    Some((start, _)) => (start, end),
                    None => (index, end),
                });
            }
            index += count;
        }
        bounds.unwrap_or((0, 0))
    }

    /// Slots taken by the leading timestamp, badges and username.
    pub fn first_message_character_index(&self) -> usize {
        self.elements
            .iter()
            .take_while(|element| element.flags.is_metadata())
            .map(LayoutElement::selection_index_count)
            .sum()
    }

    pub fn last_character_index(&self) -> usize {
        self.lines.last().map_or(0, |line| line.end_char_index)
    }

    // ========================================================================
    // Painting
    // ========================================================================

    pub fn paint_elements(&self, painter: &mut dyn Painter, y_offset: f32) {
        for element in &self.elements {
            element.paint(painter, y_offset);
        }
    }

    /// Paint animated elements. Returns whether any exist.
    pub fn paint_animated_elements(&self, painter: &mut dyn Painter, y_offset: f32) -> bool {
        let mut any = false;
        for element in &self.elements {
            any |= element.paint_animated(painter, y_offset);
        }
        any
    }

    /// Shade the part of `selection` that falls into this message.
    pub fn paint_selection(
        &self,
        painter: &mut dyn Painter,
        message_index: usize,
        selection: &Selection,
        y_offset: f32,
        color: Color,
    ) {
        if selection.is_empty() || !selection.spans_message(message_index) {
            return;
        }

        if selection.min.message_index < message_index && message_index < selection.max.message_index {
            for line in &self.lines {
                self.paint_line_span(painter, line, None, None, y_offset, color);
            }
            return;
        }

        let mut line_index = 0;
        if selection.min.message_index == message_index {
            match self.paint_selection_start(painter, message_index, selection, y_offset, color) {
                Some(next) => line_index = next,
                None => return,
            }
        }

        self.paint_selection_end(painter, line_index, selection.max.char_index, y_offset, color);
    }

    /// Paint from the selection start. Returns the line to continue on when
    /// the selection ends later in this message.
    fn paint_selection_start(
        &self,
        painter: &mut dyn Painter,
        message_index: usize,
        selection: &Selection,
        y_offset: f32,
        color: Color,
    ) -> Option<usize> {
        let min = selection.min.char_index;
        let ends_here = selection.max.message_index == message_index;

        for (index, line) in self.lines.iter().enumerate() {
            if line.end_char_index <= min || line.is_empty() {
                continue;
            }

            let x = self.x_for_char(line, min);
            if ends_here && line.end_char_index > selection.max.char_index {
                let right = self.x_for_char(line, selection.max.char_index);
                self.paint_line_span(painter, line, Some(x), Some(right), y_offset, color);
                return None;
            }

            self.paint_line_span(painter, line, Some(x), None, y_offset, color);
            if !ends_here {
                for rest in &self.lines[index + 1..] {
                    self.paint_line_span(painter, rest, None, None, y_offset, color);
                }
                return None;
            }
            return Some(index + 1);
        }
        None
    }

    /// Paint full lines from `first_line` until the one holding `max_char`,
    /// which is painted up to that char.
    fn paint_selection_end(
        &self,
        painter: &mut dyn Painter,
        first_line: usize,
        max_char: usize,
        y_offset: f32,
        color: Color,
    ) {
        let first_line = first_line.min(self.lines.len());
        for line in &self.lines[first_line..] {
            if line.is_empty() {
                continue;
            }
            if line.end_char_index < max_char {
                self.paint_line_span(painter, line, None, None, y_offset, color);
            } else {
                let right = self.x_for_char(line, max_char);
                self.paint_line_span(painter, line, None, Some(right), y_offset, color);
                return;
            }
        }
    }

    /// X coordinate of flat `char_index` inside `line`, clamped to the line.
    fn x_for_char(&self, line: &Line, char_index: usize) -> f32 {
        let mut index = line.start_char_index;
        for element in &self.elements[line.start_index..line.end_index] {
            let count = element.selection_index_count();
            if char_index < index + count {
                return element.x_from_index(char_index.saturating_sub(index));
            }
            index += count;
        }
        self.elements[line.end_index - 1].rect.right()
    }

    /// Fill part of a line band. Missing ends default to the line's content
    /// edges.
    fn paint_line_span(
        &self,
        painter: &mut dyn Painter,
        line: &Line,
        left: Option<f32>,
        right: Option<f32>,
        y_offset: f32,
        color: Color,
    ) {
        if line.is_empty() {
            return;
        }
        let left = left.unwrap_or(self.elements[line.start_index].rect.left());
        let right = right.unwrap_or(self.elements[line.end_index - 1].rect.right());
        if right <= left {
            return;
        }
        let top = line.top.max(0.0) + y_offset;
        let bottom = line.bottom.min(self.height) + y_offset;
        painter.fill_rect(Rect::from_edges(left, top, right, bottom), color);
    }

    // ========================================================================
    // Copy text
    // ========================================================================

    /// Append the text of flat slots `from..to` to `out`.
    ///
    /// Elements excluded by `copy_mode` still advance the index.
    pub fn add_selection_text(&self, out: &mut String, from: usize, to: usize, copy_mode: CopyMode) {
        let mut index = 0;
        for element in &self.elements {
            if index >= to {
                break;
            }
            let count = element.selection_index_count();
            if is_skipped(element.flags, copy_mode) {
                index += count;
                continue;
            }
            if index + count > from {
                element.add_copy_text(out, from.saturating_sub(index), (to - index).min(count));
            }
            index += count;
        }
    }
}

fn is_skipped(flags: ElementFlags, copy_mode: CopyMode) -> bool {
    match copy_mode {
        CopyMode::Everything => false,
        CopyMode::EverythingButReplies => flags.contains(ElementFlags::REPLIED_MESSAGE),
        CopyMode::OnlyTextAndEmotes => flags.intersects(
            ElementFlags::REPLIED_MESSAGE
                | ElementFlags::TIMESTAMP
                | ElementFlags::USERNAME
                | ElementFlags::BADGES
                | ElementFlags::CHANNEL_NAME,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MessageColors;
    use crate::context::RenderingContext;
    use crate::flags::MessageFlags;
    use crate::image::MemoryImageCache;
    use crate::metrics::{FontStyle, MetricsProvider, MonospaceMetrics};
    use crate::paint::PaintRecorder;
    use crate::selection::SelectionItem;
    use crate::settings::Settings;

    fn word(text: &str, flags: ElementFlags) -> LayoutElement {
        let metrics = MonospaceMetrics::default().measure(text, FontStyle::ChatMedium, 1.0);
        LayoutElement::text(text, metrics, FontStyle::ChatMedium, Color::WHITE).with_flags(flags)
    }

    fn layout(width: f32, words: Vec<LayoutElement>) -> LayoutContainer {
        let settings = Settings::default();
        let colors = MessageColors::default();
        let metrics = MonospaceMetrics::default();
        let images = MemoryImageCache::new();
        let ctx = RenderingContext::new(&settings, &colors, &metrics, &images).with_width(width);
        let mut container = LayoutContainer::new();
        container.begin_layout(&ctx, MessageFlags::empty());
        for element in words {
            container.add_element(element);
        }
        container.end_layout();
        container
    }

    fn chat_line() -> LayoutContainer {
        layout(
            400.0,
            vec![
                word("12:00", ElementFlags::TIMESTAMP),
                word("bob:", ElementFlags::USERNAME),
                word("hi", ElementFlags::TEXT),
                word("there", ElementFlags::TEXT).with_trailing_space(false),
            ],
        )
    }

    #[test]
    fn selection_index_maps_points() {
        let container = chat_line();
        // "12:00 " at 8..48(+8), "bob: " at 56..88(+8), "hi " at 96..112, "there" at 120..160
        assert_eq!(container.selection_index(Point::new(0.0, 10.0)), 0);
        assert_eq!(container.selection_index(Point::new(97.0, 10.0)), 11);
        assert_eq!(container.selection_index(Point::new(105.0, 10.0)), 12);
        assert_eq!(container.selection_index(Point::new(500.0, 10.0)), 19);
        // Points below the last line resolve into it.
        assert_eq!(container.selection_index(Point::new(121.0, 500.0)), 14);
    }

    #[test]
    fn first_message_character_index_skips_metadata() {
        assert_eq!(chat_line().first_message_character_index(), 11);
        assert_eq!(chat_line().last_character_index(), 19);
    }

    #[test]
    fn word_bounds_spans_fragments() {
        let container = layout(
            400.0,
            vec![
                word("ab", ElementFlags::TEXT),
                word("cd", ElementFlags::TEXT).with_word_id(7).with_trailing_space(false),
                word("ef", ElementFlags::TEXT).with_word_id(7),
            ],
        );
        let second = &container.elements()[1];
        assert_eq!(container.word_bounds(second), (3, 7));
    }

    #[test]
    fn copy_modes() {
        let container = chat_line();
        let mut out = String::new();
        container.add_selection_text(&mut out, 0, usize::MAX, CopyMode::Everything);
        assert_eq!(out, "12:00 bob: hi there");

        out.clear();
        container.add_selection_text(&mut out, 0, usize::MAX, CopyMode::OnlyTextAndEmotes);
        assert_eq!(out, "hi there");

        out.clear();
        container.add_selection_text(&mut out, 12, 16, CopyMode::Everything);
        assert_eq!(out, "i th");
    }

    #[test]
    fn paints_partial_single_line_selection() {
        let container = chat_line();
        let selection = Selection::new(SelectionItem::new(0, 11), SelectionItem::new(0, 13));
        let mut recorder = PaintRecorder::new();
        container.paint_selection(&mut recorder, 0, &selection, 0.0, Color::SELECTION);
        let rects = recorder.filled_rects(Color::SELECTION);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].left(), 96.0);
        assert_eq!(rects[0].right(), 112.0);
        assert_eq!(rects[0].top(), 0.0);
        assert_eq!(rects[0].bottom(), container.height());
    }

    #[test]
    fn selection_outside_message_paints_nothing() {
        let container = chat_line();
        let selection = Selection::new(SelectionItem::new(2, 0), SelectionItem::new(3, 4));
        let mut recorder = PaintRecorder::new();
        container.paint_selection(&mut recorder, 0, &selection, 0.0, Color::SELECTION);
        assert!(recorder.is_empty());
    }
}
