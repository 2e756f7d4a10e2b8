//! Shared rendering and input helpers.

pub mod scroll;
pub mod scrollbar;
pub mod text;

pub use scroll::{ScrollAction, ScrollViewport, Selection, scroll_action};
pub use scrollbar::Scrollbar;
