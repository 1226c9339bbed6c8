//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin surface over
//! [`AppState`]:
//! - Event loop (keyboard, mouse, resize)
//! - Mouse drags mapped onto header/pager gestures
//! - Frame ticks that sample the core's animations and render
//!
//! # Event Loop
//!
//! ```text
//! tokio::select! (biased)
//!   ├─ terminal event  → handle_key / handle_mouse
//!   ├─ chat changed    → mark dirty (reply streamed a word)
//!   ├─ 1s tick         → refresh countdown
//!   └─ frame tick      → AppState::tick, render if anything moved
//! ```

use std::io;
use std::time::{Duration, Instant};

use companion_core::{
    ActiveTab, AppState, Axis, Clock, CompanionConfig, Countdown, Submission, SystemClock,
};
use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::drag::ActiveDrag;
use crate::layout::{HomeLayout, Region, Scale};
use crate::view::HomeView;

/// Frame interval (~60 FPS) while anything is moving
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Countdown refresh interval
const COUNTDOWN_INTERVAL: Duration = Duration::from_secs(1);

/// Height reported to the core when typing starts (a phone keyboard)
const KEYBOARD_HEIGHT: f32 = 300.0;

/// Main application state
pub struct App<C: Clock = SystemClock> {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Owned home-screen state
    state: AppState<C>,
    /// Countdown shown in the header
    countdown: Countdown,

    // === Input State ===
    /// Text being typed
    input: String,
    /// Press currently being dragged
    drag: Option<ActiveDrag>,

    // === Render State ===
    /// Regions from the last frame (for hit-testing)
    layout: HomeLayout,
    /// Point/cell conversion from the last frame
    scale: Scale,
    /// Something changed since the last frame
    dirty: bool,
    /// Animations were running on the previous frame
    was_moving: bool,
}

impl App<SystemClock> {
    /// Create a new App from resolved configuration
    #[must_use]
    pub fn new(config: &CompanionConfig) -> Self {
        Self::with_state(AppState::new(config))
    }
}

impl<C: Clock> App<C> {
    /// Wrap an existing state
    #[must_use]
    pub fn with_state(state: AppState<C>) -> Self {
        let home = state.home();
        let scale = Scale::for_terminal(80, 24, home.header_config(), home.paging_config());
        let countdown = state.countdown();
        Self {
            running: true,
            state,
            countdown,
            input: String::new(),
            drag: None,
            layout: HomeLayout::default(),
            scale,
            dirty: true,
            was_moving: false,
        }
    }

    /// Owned state (read-only)
    #[must_use]
    pub fn state(&self) -> &AppState<C> {
        &self.state
    }

    /// Current input buffer
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Is the app still running?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut chat = self.state.conversation().subscribe();
        let mut chat_open = true;

        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut countdown_tick = tokio::time::interval(COUNTDOWN_INTERVAL);
        countdown_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Render initial frame immediately so user sees UI
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event, Instant::now()),
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },

                changed = chat.changed(), if chat_open => {
                    if changed.is_ok() {
                        let _ = chat.borrow_and_update();
                        self.dirty = true;
                    } else {
                        chat_open = false;
                    }
                }

                _ = countdown_tick.tick() => {
                    let countdown = self.state.countdown();
                    if countdown != self.countdown {
                        self.countdown = countdown;
                        self.dirty = true;
                    }
                }

                _ = frames.tick() => {
                    let moving = self.state.tick();
                    if moving || self.was_moving || self.dirty {
                        self.render(terminal)?;
                    }
                    self.was_moving = moving;
                }
            }
        }

        Ok(())
    }

    /// Dispatch one terminal event
    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(width, height) => self.handle_resize(width, height),
            _ => {}
        }
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        self.dirty = true;
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Page switching
            KeyCode::Tab | KeyCode::BackTab => {
                let next = match self.state.active_tab() {
                    ActiveTab::Notes => ActiveTab::Chat,
                    ActiveTab::Chat => ActiveTab::Notes,
                };
                self.state.set_active_tab(next);
            }
            KeyCode::Char(c @ ('1' | '2')) if self.input.is_empty() => {
                let index = if c == '1' { 0 } else { 1 };
                self.state.press_tab(index);
            }

            // Submit
            KeyCode::Enter => {
                let outcome = self.state.submit(&self.input);
                debug!(?outcome, "Input submitted");
                if outcome != Submission::Rejected {
                    self.input.clear();
                }
            }

            // Typing
            KeyCode::Char(c) => {
                if self.input.is_empty() {
                    // First keystroke focuses the input and raises the keyboard
                    self.state.on_keyboard_shown(KEYBOARD_HEIGHT);
                }
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }

            _ => {}
        }
    }

    /// Handle mouse input
    ///
    /// A left press in the header drags it vertically; a press on the tab bar
    /// or pages drags the pager. The core gesture starts only once the
    /// pointer leaves its starting cell, so a press that never moves is a tap:
    /// on the tab bar it selects a tab, elsewhere it does nothing.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let axis = match self.layout.hit(col, row) {
                    Some(Region::Header) => Axis::Vertical,
                    Some(Region::Tabs | Region::Pages) => Axis::Horizontal,
                    _ => return,
                };
                self.drag = Some(ActiveDrag::begin(axis, col, row, now));
                trace!(?axis, col, row, "Press");
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                let axis = drag.axis();
                if drag.try_activate(col, row) {
                    self.state.home_mut().on_drag_start(axis);
                    trace!(?axis, "Pan started");
                }
                let translation = drag.update(col, row, &self.scale, now);
                if drag.is_active() {
                    self.state.home_mut().on_drag_update(axis, translation);
                    self.dirty = true;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if !drag.is_active() {
                    if self.layout.hit(col, row) == Some(Region::Tabs) {
                        self.press_tab_at(col);
                        self.dirty = true;
                    }
                    return;
                }
                let velocity = drag.velocity();
                match drag.axis() {
                    Axis::Vertical => {
                        self.state.home_mut().on_drag_end(Axis::Vertical, velocity);
                    }
                    Axis::Horizontal => {
                        let tab = self.state.end_page_drag(velocity);
                        debug!(?tab, velocity, "Page drag released");
                    }
                }
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn press_tab_at(&mut self, col: u16) {
        let tabs = self.layout.tabs;
        let index = usize::from(col >= tabs.x + tabs.width / 2);
        self.state.press_tab(index);
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        let home = self.state.home();
        self.scale = Scale::for_terminal(width, height, home.header_config(), home.paging_config());
        self.layout = HomeLayout::split(
            Rect::new(0, 0, width, height),
            self.scale.rows(home.height()),
        );
        self.dirty = true;
    }

    /// Render the UI
    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        let view = HomeView {
            state: &self.state,
            input: &self.input,
            countdown: &self.countdown,
        };
        let mut regions = None;
        terminal.draw(|frame| {
            let area = frame.area();
            regions = Some(view.render(area, frame.buffer_mut()));
        })?;
        if let Some((layout, scale)) = regions {
            self.layout = layout;
            self.scale = scale;
        }
        self.dirty = false;
        Ok(())
    }
}
