//! Animation System - Surface-Agnostic Timing
//!
//! The core describes motion as values over time; surfaces sample them at
//! whatever frame rate they render.
//!
//! # Architecture
//!
//! ```text
//! HomeController (owns Transitions, samples a Clock)
//!     │
//!     ├─→ TUI Surface (samples @ ~60fps, scales to terminal rows)
//!     └─→ Tests (ManualClock, sampled at exact instants)
//! ```

mod clock;
mod timing;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timing::{EasingFunction, Transition};
