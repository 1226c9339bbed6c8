//! Companion Core - Headless Home Screen for the companion app
//!
//! This crate holds everything the home screen does, independent of any UI
//! framework: the gesture-driven collapsible header and two-page pager, the
//! simulated chat assistant, notes and the birthday countdown. A surface
//! feeds it drags, taps and text, and renders what it reads back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                              │
//! │        ┌─────────────┐            ┌──────────────────┐          │
//! │        │     TUI     │            │  Tests / Drivers │          │
//! │        │ (ratatui)   │            │  (ManualClock)   │          │
//! │        └──────┬──────┘            └────────┬─────────┘          │
//! │               └─────────────┬──────────────┘                    │
//! │          drags, taps, text  │  projections, snapshots           │
//! └─────────────────────────────┼───────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────┼───────────────────────────────────┐
//! │                      COMPANION CORE                             │
//! │  ┌──────────────────────────┴────────────────────────────────┐  │
//! │  │                        AppState                           │  │
//! │  │  ┌────────────────┐  ┌──────────────┐  ┌───────────────┐  │  │
//! │  │  │ HomeController │  │ Conversation │  │   NoteBook    │  │  │
//! │  │  │ (height, x)    │  │  Simulator   │  │   Countdown   │  │  │
//! │  │  └───────┬────────┘  └──────┬───────┘  └───────────────┘  │  │
//! │  │     Transition/Clock   tokio interval                     │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use companion_core::{load_config, ActiveTab, AppState, Axis};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_config().unwrap_or_default();
//!     let mut state = AppState::new(&config);
//!
//!     // Finger drags the header down by 40px, then lets go
//!     state.home_mut().on_drag_start(Axis::Vertical);
//!     state.home_mut().on_drag_update(Axis::Vertical, 40.0);
//!     state.home_mut().on_drag_end(Axis::Vertical, 120.0);
//!
//!     // Talk to the assistant; replies stream in on the runtime
//!     state.submit("hello");
//!     let mut chat = state.conversation().subscribe();
//!     while chat.changed().await.is_ok() {
//!         // Render chat.borrow().turns()
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`animation`]: Easing curves, transitions and injectable clocks
//! - [`gesture`]: Header/pager gesture controller and render projections
//! - [`conversation`]: Simulated assistant turn-taking
//! - [`notes`]: Timestamped notes
//! - [`countdown`]: Days-until and long-form date line
//! - [`app_state`]: The owned state object surfaces hold
//! - [`messages`]: Identifiers and chat turns
//! - [`config`]: TOML/env configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod app_state;
pub mod config;
pub mod conversation;
pub mod countdown;
pub mod gesture;
pub mod messages;
pub mod notes;

// Re-exports for convenience
pub use animation::{Clock, EasingFunction, ManualClock, SystemClock, Transition};
pub use app_state::{ActiveTab, AppState, Submission};
pub use conversation::{ConversationSimulator, ConversationState, ResponsePhase};
pub use countdown::{date_line, days_until, ordinal_suffix, Countdown};
pub use gesture::{
    interpolate, Axis, Extrapolation, HeaderProjection, HomeController, PagingProjection,
    SettleTarget, PAGE_COUNT,
};
pub use messages::{ChatTurn, NoteId, Speaker, TurnId};
pub use notes::{Note, NoteBook};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, CompanionConfig, ConfigError,
    ConfigOverrides, ConfigSource,
};
