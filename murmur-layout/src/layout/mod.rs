//! Message layout engine.
//!
//! [`LayoutContainer`] turns the layout elements emitted by content elements
//! into positioned lines, reorders right-to-left runs and answers
//! hit-testing, selection painting and copy queries.

mod container;
pub mod element;
mod rtl;
mod selection;

pub use container::{COMPACT_EMOTES_OFFSET, ELLIPSIS, LayoutContainer, Line, MARGIN};
pub use element::{ImageBackground, ImageLayer, LayoutElement, LayoutKind, RTL_EMBEDDING};
