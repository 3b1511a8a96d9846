//! Messages and their cached layouts.
//!
//! A [`MessageLayout`] owns the [`LayoutContainer`] of one message and only
//! re-runs the layout pass when something that affects it changed.

use std::sync::Arc;

use crate::context::RenderingContext;
use crate::element::ContentElement;
use crate::flags::{ElementFlags, MessageFlags};
use crate::layout::{LayoutContainer, LayoutElement};
use crate::paint::Painter;
use crate::primitives::{Point, Rect};
use crate::selection::Selection;
use crate::settings::CopyMode;

/// One chat message as received.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub id: String,
    pub flags: MessageFlags,
    pub elements: Vec<ContentElement>,
}

impl Message {
    pub fn new(id: impl Into<String>, flags: MessageFlags, elements: Vec<ContentElement>) -> Self {
        Self {
            id: id.into(),
            flags,
            elements,
        }
    }
}

/// Inputs of the last pass. A pass is skipped while they are unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LayoutKey {
    width: f32,
    scale: f32,
    image_scale: f32,
    flags: ElementFlags,
    generation: u64,
}

impl LayoutKey {
    fn of(ctx: &RenderingContext<'_>) -> Self {
        Self {
            width: ctx.width,
            scale: ctx.scale,
            image_scale: ctx.image_scale,
            flags: ctx.flags,
            generation: ctx.generation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessageLayout {
    message: Arc<Message>,
    container: LayoutContainer,
    key: Option<LayoutKey>,
    requires_layout: bool,
    expanded: bool,
    layout_count: usize,
}

impl MessageLayout {
    pub fn new(message: Arc<Message>) -> Self {
        Self {
            message,
            container: LayoutContainer::new(),
            key: None,
            requires_layout: true,
            expanded: false,
            layout_count: 0,
        }
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Lay the message out for `ctx`. Returns whether a pass ran.
    pub fn layout(&mut self, ctx: &RenderingContext<'_>) -> bool {
        let key = LayoutKey::of(ctx);
        if !self.requires_layout && self.key == Some(key) {
            return false;
        }
        self.key = Some(key);
        self.requires_layout = false;
        self.actually_layout(ctx);
        true
    }

    fn actually_layout(&mut self, ctx: &RenderingContext<'_>) {
        self.layout_count += 1;

        let mut flags = self.message.flags;
        let moderating = ctx.flags.contains(ElementFlags::MODERATOR_TOOLS)
            && !self.message.flags.contains(MessageFlags::DISABLED);
        if self.expanded || moderating {
            flags.remove(MessageFlags::COLLAPSED);
        }

        let hidden = ctx.settings.hide_moderated && self.message.flags.contains(MessageFlags::DISABLED);

        self.container.begin_layout(ctx, flags);
        if !hidden {
            for element in &self.message.elements {
                element.add_to_container(&mut self.container, ctx);
            }
        }
        self.container.end_layout();

        tracing::trace!(
            id = %self.message.id,
            passes = self.layout_count,
            height = self.container.height(),
            "message laid out"
        );
    }

    /// Force the next [`layout`](Self::layout) call to run a pass.
    pub fn invalidate(&mut self) {
        self.requires_layout = true;
    }

    /// Show the whole message, dropping the collapse.
    pub fn expand(&mut self) {
        if !self.expanded {
            self.expanded = true;
            self.requires_layout = true;
        }
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.container.is_collapsed()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.container.height()
    }

    /// Number of passes run so far.
    #[inline]
    pub fn layout_count(&self) -> usize {
        self.layout_count
    }

    #[inline]
    pub fn container(&self) -> &LayoutContainer {
        &self.container
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn element_at(&self, point: Point) -> Option<&LayoutElement> {
        self.container.element_at(point)
    }

    pub fn selection_index(&self, point: Point) -> usize {
        self.container.selection_index(point)
    }

    pub fn word_bounds(&self, element: &LayoutElement) -> (usize, usize) {
        self.container.word_bounds(element)
    }

    pub fn first_message_character_index(&self) -> usize {
        self.container.first_message_character_index()
    }

    pub fn last_character_index(&self) -> usize {
        self.container.last_character_index()
    }

    pub fn add_selection_text(&self, out: &mut String, from: usize, to: usize, copy_mode: CopyMode) {
        self.container.add_selection_text(out, from, to, copy_mode);
    }

    // ========================================================================
    // Painting
    // ========================================================================

    /// Paint the message with its top at `y`. Returns whether it shows
    /// animated content.
    pub fn paint(
        &self,
        painter: &mut dyn Painter,
        ctx: &RenderingContext<'_>,
        y: f32,
        message_index: usize,
        selection: &Selection,
    ) -> bool {
        self.container.paint_elements(painter, y);
        let animated = self.container.paint_animated_elements(painter, y);

        if self.message.flags.contains(MessageFlags::DISABLED) {
            let rect = Rect::new(0.0, y, self.container.width(), self.container.height());
            painter.fill_rect(rect, ctx.colors.disabled);
        }

        if !selection.is_empty() {
            self.container
                .paint_selection(painter, message_index, selection, y, ctx.colors.selection);
        }
        animated
    }
}

/// Copy text for `selection` across consecutive message layouts.
///
/// `layouts[i]` is the message at index `i`. Messages are joined with `'\n'`.
pub fn selected_text(layouts: &[MessageLayout], selection: &Selection, copy_mode: CopyMode) -> String {
    let mut out = String::new();
    if selection.is_empty() {
        return out;
    }

    let last = selection.max.message_index.min(layouts.len().saturating_sub(1));
    for index in selection.min.message_index..=last {
        let Some(layout) = layouts.get(index) else {
            break;
        };
        let from = if index == selection.min.message_index {
            selection.min.char_index
        } else {
            0
        };
        let to = if index == selection.max.message_index {
            selection.max.char_index
        } else {
            layout.last_character_index() + 1
        };

        layout.add_selection_text(&mut out, from, to, copy_mode);
        if index != last {
            out.push('\n');
        }
    }
    out
}
