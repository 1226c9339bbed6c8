//! Companion TUI - Terminal home screen for the companion app
//!
//! A thin surface over `companion-core`: terminal events become gestures and
//! submissions, and every frame is painted from the core's projections.
//!
//! # Architecture
//!
//! - **App**: Event loop, input routing, frame pacing
//! - **Drag**: Mouse press/drag/release to pan translation and velocity
//! - **Layout**: Core points to terminal cells, screen regions
//! - **View**: Header, tab bar, sliding pages, input line
//! - **Widgets**: Borderless sliding text pages

pub mod app;
pub mod drag;
pub mod layout;
pub mod theme;
pub mod view;
pub mod widgets;

pub use app::App;
