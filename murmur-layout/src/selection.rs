//! Selection addressing.
//!
//! A selection endpoint is a `(message_index, char_index)` pair. Char indices
//! are flat per message: every layout element consumes a fixed number of
//! slots (see `LayoutElement::selection_index_count`), so one integer
//! identifies a position anywhere in a wrapped, reordered message.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A position in the message buffer. Ordered by message, then char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SelectionItem {
    pub message_index: usize,
    pub char_index: usize,
}

impl SelectionItem {
    #[inline]
    pub const fn new(message_index: usize, char_index: usize) -> Self {
        Self {
            message_index,
            char_index,
        }
    }
}

impl PartialOrd for SelectionItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SelectionItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.message_index
            .cmp(&other.message_index)
            .then(self.char_index.cmp(&other.char_index))
    }
}

/// A range between an anchor (`start`) and a focus (`end`).
///
/// `min`/`max` hold the same endpoints in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: SelectionItem,
    pub end: SelectionItem,
    pub min: SelectionItem,
    pub max: SelectionItem,
}

impl Selection {
    pub fn new(start: SelectionItem, end: SelectionItem) -> Self {
        let (min, max) = if end < start { (end, start) } else { (start, end) };
        Self {
            start,
            end,
            min,
            max,
        }
    }

    /// Select a whole message, `0..=last_char_index`.
    pub fn whole_message(message_index: usize, last_char_index: usize) -> Self {
        Self::new(
            SelectionItem::new(message_index, 0),
            SelectionItem::new(message_index, last_char_index),
        )
    }

    /// Select a word given its `[start, end)` char bounds.
    pub fn word(message_index: usize, (start, end): (usize, usize)) -> Self {
        Self::new(
            SelectionItem::new(message_index, start),
            SelectionItem::new(message_index, end),
        )
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn is_single_message(&self) -> bool {
        self.min.message_index == self.max.message_index
    }

    /// Whether `message_index` lies inside the selected message range.
    #[inline]
    pub fn spans_message(&self, message_index: usize) -> bool {
        (self.min.message_index..=self.max.message_index).contains(&message_index)
    }

    /// Shift every endpoint after messages were removed from the front of the
    /// buffer. Endpoints that fall off the front pin to message 0.
    pub fn shift_message_index(&mut self, offset: usize) {
        for item in [
            &mut self.start,
            &mut self.end,
            &mut self.min,
            &mut self.max,
        ] {
            item.message_index = item.message_index.saturating_sub(offset);
        }
    }
}
