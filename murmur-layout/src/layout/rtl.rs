//! Right-to-left reordering of the current line.
//!
//! A two-pass approximation of bidi: classify each element, then build the
//! visual sequence by reversing maximal runs that disagree with the
//! paragraph direction. Neutral elements and mentions follow the reversal
//! state of their predecessor. The result is re-placed through the normal
//! placement routine, walking right to left for RTL paragraphs.

use crate::bidi::TextDirection;
use crate::flags::ElementFlags;

use super::container::{LayoutContainer, Placement};

impl LayoutContainer {
    /// Reorder the elements of the current line from `first_text_index` on.
    pub(super) fn reorder_rtl(&mut self, first_text_index: usize) {
        let start = self.line_start.max(first_text_index);
        let end = self.elements.len();
        if end.saturating_sub(start) < 2 {
            return;
        }

        let paragraph = self.paragraph_direction;
        let is_rtl = paragraph == TextDirection::Rtl;

        let mut correct_sequence = Vec::with_capacity(end - start);
        let mut swapped = Vec::new();
        for index in start..end {
            let element = &mut self.elements[index];
            let neutral = element.direction.is_neutral();
            let neutral_or_mention =
                neutral || element.flags.contains(ElementFlags::TEXT | ElementFlags::MENTION);

            if neutral
                && ((paragraph == TextDirection::Rtl && !self.was_prev_reversed)
                    || (paragraph == TextDirection::Ltr && self.was_prev_reversed))
            {
                element.reversed_neutral = true;
            }

            let disagrees = is_rtl != (element.direction == TextDirection::Rtl);
            if (disagrees && !neutral_or_mention) || (neutral_or_mention && self.was_prev_reversed) {
                swapped.push(index);
                self.was_prev_reversed = true;
            } else {
                while let Some(reversed) = swapped.pop() {
                    correct_sequence.push(reversed);
                }
                correct_sequence.push(index);
                self.was_prev_reversed = false;
            }
        }
        while let Some(reversed) = swapped.pop() {
            correct_sequence.push(reversed);
        }

        self.current_x = if is_rtl {
            self.elements[end - 1].rect.right()
        } else {
            self.elements[start].rect.x
        };

        let mut prev = None;
        for &index in &correct_sequence {
            let placement = Placement::of(&self.elements[index]);
            let origin = self.position(placement, prev, is_rtl);
            self.elements[index].rect.move_to(origin);
            prev = Some(index);
        }

        // Keep arena order, x order and flat char indices in agreement.
        self.elements[start..end].sort_by(|a, b| a.rect.x.total_cmp(&b.rect.x));

        tracing::trace!(start, end, rtl = is_rtl, "reordered line");
    }
}
