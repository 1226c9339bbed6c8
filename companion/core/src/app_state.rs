//! Application State
//!
//! The one owned object behind the home screen. Surfaces hold an `AppState`
//! and mutate it only through the operations below; nothing is global.
//!
//! ```text
//!             ┌───────────── AppState ─────────────┐
//!  submit ───→│ active_tab ──Notes──→ NoteBook      │
//!             │            └─Chat───→ Conversation  │──→ snapshots / watch
//!  drags  ───→│ HomeController (height, offset)     │──→ projections
//!             └─────────────────────────────────────┘
//! ```

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::animation::{Clock, SystemClock};
use crate::config::CompanionConfig;
use crate::conversation::ConversationSimulator;
use crate::countdown::Countdown;
use crate::gesture::{Axis, HomeController, SettleTarget};
use crate::messages::{NoteId, TurnId};
use crate::notes::NoteBook;

/// Which page the tab bar shows as selected
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActiveTab {
    /// Left page
    Notes,
    /// Right page
    #[default]
    Chat,
}

impl ActiveTab {
    /// Page index in the pager
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Notes => 0,
            Self::Chat => 1,
        }
    }

    /// Tab for a page index; anything past the first page is chat
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Self::Notes
        } else {
            Self::Chat
        }
    }

    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Notes => "Notes",
            Self::Chat => "Chat",
        }
    }
}

/// Outcome of submitting input text
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Appended to the notebook
    Note(NoteId),
    /// Appended to the chat log
    Chat(TurnId),
    /// Blank input; nothing changed
    Rejected,
}

/// Owned home-screen state
#[derive(Debug)]
pub struct AppState<C: Clock = SystemClock> {
    active_tab: ActiveTab,
    notes: NoteBook,
    conversation: ConversationSimulator,
    home: HomeController<C>,
    countdown_target: NaiveDateTime,
}

impl AppState<SystemClock> {
    /// Build state from configuration on the system clock
    #[must_use]
    pub fn new(config: &CompanionConfig) -> Self {
        let conversation = ConversationSimulator::new(&config.conversation);
        Self::with_parts(config, SystemClock, conversation)
    }
}

impl<C: Clock> AppState<C> {
    /// Build state around an explicit clock and simulator
    #[must_use]
    pub fn with_parts(config: &CompanionConfig, clock: C, conversation: ConversationSimulator) -> Self {
        let home = HomeController::with_clock(config.header, config.paging, config.motion, clock);
        Self {
            active_tab: ActiveTab::from_index(home.current_page()),
            notes: NoteBook::new(),
            conversation,
            home,
            countdown_target: config.countdown.target,
        }
    }

    /// Replace the notebook contents
    #[must_use]
    pub fn with_notes(mut self, notes: NoteBook) -> Self {
        self.notes = notes;
        self
    }

    // ========================================================================
    // Readers
    // ========================================================================

    /// Currently selected tab
    #[must_use]
    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    /// Notes page contents
    #[must_use]
    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    /// Chat simulator
    #[must_use]
    pub fn conversation(&self) -> &ConversationSimulator {
        &self.conversation
    }

    /// Header and pager controller
    #[must_use]
    pub fn home(&self) -> &HomeController<C> {
        &self.home
    }

    /// Mutable controller access for drag input
    pub fn home_mut(&mut self) -> &mut HomeController<C> {
        &mut self.home
    }

    /// Countdown against the local wall clock
    #[must_use]
    pub fn countdown(&self) -> Countdown {
        Countdown::now(self.countdown_target)
    }

    /// Countdown as seen at `now`
    #[must_use]
    pub fn countdown_at(&self, now: NaiveDateTime) -> Countdown {
        Countdown::at(self.countdown_target, now)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Route input text to the active page, stamping notes with the local time
    pub fn submit(&mut self, text: &str) -> Submission {
        self.submit_at(text, Local::now())
    }

    /// Route input text to the active page
    ///
    /// Chat submissions spawn the reply task, so they need a Tokio runtime.
    pub fn submit_at(&mut self, text: &str, at: DateTime<Local>) -> Submission {
        let outcome = match self.active_tab {
            ActiveTab::Notes => self.notes.add_note(text, at).map(Submission::Note),
            ActiveTab::Chat => self.conversation.submit_user_turn(text).map(Submission::Chat),
        };
        outcome.unwrap_or(Submission::Rejected)
    }

    /// Select a tab and animate the pager to it
    ///
    /// Ignored while a page drag is in progress; returns whether it applied.
    pub fn set_active_tab(&mut self, tab: ActiveTab) -> bool {
        if !self.home.set_page(tab.index()) {
            return false;
        }
        debug!(?tab, "Active tab changed");
        self.active_tab = tab;
        true
    }

    /// Tab bar press by page index
    pub fn press_tab(&mut self, index: usize) -> bool {
        self.set_active_tab(ActiveTab::from_index(index))
    }

    /// Release a page drag and follow the settled page with the tab bar
    pub fn end_page_drag(&mut self, velocity: f32) -> ActiveTab {
        if let SettleTarget::Page(page) = self.home.on_drag_end(Axis::Horizontal, velocity) {
            self.active_tab = ActiveTab::from_index(page);
        }
        self.active_tab
    }

    /// Soft keyboard appeared; collapse the header to make room
    pub fn on_keyboard_shown(&mut self, height: f32) -> bool {
        if height > 0.0 {
            self.home.collapse_on_focus()
        } else {
            false
        }
    }

    /// Advance header and pager animations
    pub fn tick(&mut self) -> bool {
        self.home.tick()
    }
}
