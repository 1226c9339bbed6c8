//! Widgets
//!
//! Borderless building blocks for the home screen.

mod page_view;

pub use page_view::{clip_left, PageLine, PageView};
