//! Gesture Handling - Collapsible Header and Pager
//!
//! Two independent continuous values drive the home screen:
//!
//! ```text
//!  drag (vertical)  ──→ header height ──→ HeaderProjection (opacity, gradient, padding)
//!  drag (horizontal)──→ page offset   ──→ PagingProjection (parallax, indicator, fades)
//!  tab press / focus ─┘
//! ```
//!
//! Values flow one way: surfaces read projections, they never write back.

mod controller;
pub mod projection;

pub use controller::{Axis, HomeController, SettleTarget, PAGE_COUNT};
pub use projection::{interpolate, Extrapolation, HeaderProjection, PagingProjection};
