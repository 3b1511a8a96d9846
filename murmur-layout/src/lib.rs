//! Murmur: chat message layout and selection engine
//!
//! Murmur turns a chat message, an ordered list of heterogeneous content
//! pieces, into wrapped lines of positioned boxes and answers the queries a
//! chat view needs afterwards:
//! - Word wrapping with grapheme-accurate hard splits
//! - Right-to-left reordering inside a line
//! - "Collapse after N lines" with an ellipsis
//! - Flat character addressing for hit-testing, selection painting and copy
//!
//! # Architecture
//!
//! [`ContentElement`]s are built once per message. Every layout pass they push
//! [`LayoutElement`]s into a [`LayoutContainer`], which breaks lines and
//! records [`Line`] bands. [`MessageLayout`] caches the container and only
//! re-runs a pass when the [`RenderingContext`] changed.
//!
//! # Usage
//!
//! ```ignore
//! use murmur_layout::{ContentElement, ElementFlags, MessageLayout, RenderingContext};
//!
//! let ctx = RenderingContext::new(&settings, &colors, &metrics, &images).with_width(400.0);
//! let mut layout = MessageLayout::new(message);
//! layout.layout(&ctx);
//! let index = layout.selection_index(point);
//! ```

// Core primitives
pub mod primitives;
pub mod flags;
pub mod link;
pub mod color;
pub mod error;

// Configuration
pub mod settings;

// Injected capabilities
pub mod metrics;
pub mod bidi;
pub mod image;
pub mod paint;

// Selection addressing
pub mod selection;

// Per-pass context
pub mod context;

// Layout engine
pub mod layout;

// Content model
pub mod element;
pub mod message;

// Re-export core types
pub use primitives::{Color, Margins, Point, Rect, Size};
pub use flags::{ElementFlags, MessageFlags};
pub use link::{Link, LinkKind};
pub use color::{MessageColor, MessageColors};
pub use error::{Error, Result};
pub use settings::{CopyMode, ModerationAction, Settings};
pub use metrics::{CosmicMetrics, FontStyle, MetricsProvider, MonospaceMetrics, TextMetrics};
pub use bidi::{DirectionDetector, TextDirection, UnicodeDirection};
pub use image::{Emote, Image, ImageCache, ImageId, ImageSet, MemoryImageCache};
pub use paint::{PaintCommand, PaintRecorder, Painter};
pub use selection::{Selection, SelectionItem};
pub use context::RenderingContext;
pub use layout::{LayoutContainer, LayoutElement, LayoutKind, Line};
pub use element::{BadgeKind, ContentElement, ElementKind};
pub use message::{Message, MessageLayout, selected_text};
