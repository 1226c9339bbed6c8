//! Home Screen Rendering
//!
//! Reads the core's projections and snapshots and paints one frame. Nothing
//! here mutates state; the returned layout is kept by the app for hit-testing
//! the next mouse press.

use companion_core::{
    interpolate, ActiveTab, AppState, Clock, Countdown, Extrapolation, ResponsePhase, Speaker,
};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::layout::{HomeLayout, Scale};
use crate::theme::{
    fade, ASSISTANT_TEXT, COUNTDOWN_GOLD, DATE_TEXT, DIM_GRAY, HANDLE, HEADER_BG, NOTE_TIME,
    PAGE_BG, TAB_ACTIVE, TAB_INACTIVE, USER_TEXT,
};
use crate::widgets::{PageLine, PageView};

/// Width of the tab indicator pill
const INDICATOR: &str = "▔▔▔▔▔▔";

/// Cursor drawn after a streaming reply
const STREAM_CURSOR: &str = "▍";

/// Everything one frame needs to read
pub struct HomeView<'a, C: Clock> {
    /// Owned home-screen state
    pub state: &'a AppState<C>,
    /// Current input buffer
    pub input: &'a str,
    /// Last computed countdown
    pub countdown: &'a Countdown,
}

impl<C: Clock> HomeView<'_, C> {
    /// Paint the frame into `buf`; returns the regions used
    pub fn render(&self, area: Rect, buf: &mut Buffer) -> (HomeLayout, Scale) {
        let home = self.state.home();
        let scale = Scale::for_terminal(
            area.width,
            area.height,
            home.header_config(),
            home.paging_config(),
        );
        let header = home.header_projection();
        let layout = HomeLayout::split(area, scale.rows(header.height));

        buf.set_style(area, Style::default().bg(PAGE_BG));
        self.render_header(layout.header, buf, header.content_opacity);
        self.render_tabs(layout.tabs, buf);
        self.render_pages(layout.pages, buf, &scale);
        self.render_input(layout.input, buf);
        self.render_status(layout.status, buf);

        (layout, scale)
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, opacity: f32) {
        if area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(HEADER_BG));

        let title = Style::default().fg(DATE_TEXT).add_modifier(Modifier::BOLD);
        set_centered(buf, area, area.y, "Birthday", title);

        // Countdown content fades in once the header opens past the fade window
        let today = format!("It's {}", self.countdown.date_line);
        let days = format!("{} days remaining", self.countdown.days_left);
        let rows: [(String, Style); 2] = [
            (
                today,
                Style::default().fg(fade(DATE_TEXT, HEADER_BG, opacity)),
            ),
            (
                days,
                Style::default()
                    .fg(fade(COUNTDOWN_GOLD, HEADER_BG, opacity))
                    .add_modifier(Modifier::BOLD),
            ),
        ];
        let last_content_row = area.bottom().saturating_sub(1);
        let mut y = area.y.saturating_add(2);
        for (text, style) in &rows {
            if y >= last_content_row {
                break;
            }
            set_centered(buf, area, y, text, *style);
            y += 1;
        }

        if area.height > 1 {
            let handle = "━".repeat(usize::from(area.width / 6).max(3));
            set_centered(buf, area, last_content_row, &handle, Style::default().fg(HANDLE));
        }
    }

    fn render_tabs(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width < 8 {
            return;
        }
        let home = self.state.home();
        let paging = home.paging_config();
        let p = home.paging_projection();

        let notes_col = area.width / 4;
        let chat_col = area.width * 3 / 4;
        let label_style = |active: f32| {
            Style::default()
                .fg(fade(TAB_ACTIVE, TAB_INACTIVE, active))
                .add_modifier(if active >= 0.5 { Modifier::BOLD } else { Modifier::empty() })
        };
        let notes = ActiveTab::Notes.label();
        let chat = ActiveTab::Chat.label();
        let notes_x = area.x + notes_col.saturating_sub(half_width(notes));
        let chat_x = area.x + chat_col.saturating_sub(half_width(chat));
        buf.set_string(notes_x, area.y, notes, label_style(p.notes_active_opacity));
        buf.set_string(chat_x, area.y, chat, label_style(p.chat_active_opacity));

        if area.height > 1 {
            let start = f32::from(notes_col.saturating_sub(half_width(INDICATOR)));
            let end = f32::from(chat_col.saturating_sub(half_width(INDICATOR)));
            let col = interpolate(
                p.tab_indicator_offset,
                (paging.indicator_left, paging.indicator_right),
                (start, end),
                Extrapolation::Clamp,
            );
            // Bounded by the tab row width
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let col = col.round().max(0.0) as u16;
            buf.set_stringn(
                area.x + col,
                area.y + 1,
                INDICATOR,
                usize::from(area.width.saturating_sub(col)),
                Style::default().fg(TAB_ACTIVE),
            );
        }
    }

    fn render_pages(&self, area: Rect, buf: &mut Buffer, scale: &Scale) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let p = self.state.home().paging_projection();
        let track = scale.cols(p.track_translate);
        let width = i32::from(area.width);

        let notes = self.notes_lines();
        let chat = self.chat_lines();
        let pages = [
            (0, scale.cols(p.notes_translate), &notes, "No notes yet"),
            (width, scale.cols(p.chat_translate), &chat, "Say hello"),
        ];

        for (page_left, parallax, lines, empty) in pages {
            let left = track + page_left;
            let Some(viewport) = page_viewport(area, left) else {
                continue;
            };
            let shift = i32::from(area.x) + left + parallax - i32::from(viewport.x);
            PageView::new(lines)
                .wrap_width(area.width)
                .shift(shift)
                .placeholder(PageLine::new(empty, Style::default().fg(DIM_GRAY)))
                .render(viewport, buf);
        }
    }

    fn notes_lines(&self) -> Vec<PageLine> {
        self.state
            .notes()
            .notes()
            .iter()
            .flat_map(|note| {
                [
                    PageLine::new(note.timestamp.clone(), Style::default().fg(NOTE_TIME)),
                    PageLine::new(note.text.clone(), Style::default()),
                    PageLine::blank(),
                ]
            })
            .collect()
    }

    fn chat_lines(&self) -> Vec<PageLine> {
        let snapshot = self.state.conversation().snapshot();
        let streaming = match snapshot.phase() {
            ResponsePhase::Streaming { turn } => Some(turn.clone()),
            _ => None,
        };

        let mut lines = Vec::with_capacity(snapshot.turns().len() * 2 + 1);
        for turn in snapshot.turns() {
            let (prefix, color) = match turn.speaker {
                Speaker::User => ("You", USER_TEXT),
                Speaker::Assistant => ("Companion", ASSISTANT_TEXT),
            };
            let cursor = if streaming.as_ref() == Some(&turn.id) {
                STREAM_CURSOR
            } else {
                ""
            };
            lines.push(PageLine::new(
                format!("{prefix}: {}{cursor}", turn.text),
                Style::default().fg(color),
            ));
            lines.push(PageLine::blank());
        }
        if matches!(snapshot.phase(), ResponsePhase::Pending) {
            lines.push(PageLine::new(
                "Companion is typing…",
                Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
            ));
        }
        lines
    }

    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let (text, style) = if self.input.is_empty() {
            let hint = match self.state.active_tab() {
                ActiveTab::Notes => "> Write a note…",
                ActiveTab::Chat => "> Message…",
            };
            (hint.to_string(), Style::default().fg(DIM_GRAY))
        } else {
            (format!("> {}_", self.input), Style::default().fg(USER_TEXT))
        };
        // Keep the end of long input visible
        let width = usize::from(area.width);
        let skip = text.chars().count().saturating_sub(width);
        let visible: String = text.chars().skip(skip).collect();
        buf.set_stringn(area.x, area.y, visible, width, style);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let responding = if self.state.conversation().is_assistant_responding() {
            " | replying"
        } else {
            ""
        };
        let status = format!(
            " {} | Tab switch | drag header/pages | Enter send | Esc quit{responding}",
            self.state.active_tab().label()
        );
        buf.set_stringn(
            area.x,
            area.y,
            status,
            usize::from(area.width),
            Style::default().fg(DIM_GRAY),
        );
    }
}

/// Visible part of a page whose left edge sits `left` columns into `area`
fn page_viewport(area: Rect, left: i32) -> Option<Rect> {
    let area_left = i32::from(area.x);
    let area_right = i32::from(area.right());
    let page_left = area_left + left;
    let page_right = page_left + i32::from(area.width);

    let vis_left = page_left.max(area_left);
    let vis_right = page_right.min(area_right);
    if vis_right <= vis_left {
        return None;
    }
    let x = u16::try_from(vis_left).ok()?;
    let width = u16::try_from(vis_right - vis_left).ok()?;
    Some(Rect::new(x, area.y, width, area.height))
}

fn half_width(text: &str) -> u16 {
    u16::try_from(unicode_width::UnicodeWidthStr::width(text) / 2).unwrap_or(0)
}

fn set_centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let width = u16::try_from(unicode_width::UnicodeWidthStr::width(text)).unwrap_or(u16::MAX);
    let x = area.x + area.width.saturating_sub(width) / 2;
    buf.set_stringn(x, y, text, usize::from(area.width), style);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use companion_core::config::ConversationConfig;
    use companion_core::{CompanionConfig, ConversationSimulator, ManualClock};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn countdown() -> Countdown {
        Countdown {
            days_left: 42,
            date_line: "Friday — October 16th 2026".to_string(),
        }
    }

    fn state() -> (AppState<ManualClock>, ManualClock) {
        let config = CompanionConfig::default();
        let clock = ManualClock::new();
        let sim = ConversationSimulator::with_rng(&ConversationConfig::default(), StdRng::seed_from_u64(5));
        (AppState::with_parts(&config, clock.clone(), sim), clock)
    }

    fn screen(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_expanded_header_shows_countdown() {
        let (state, _) = state();
        let countdown = countdown();
        let view = HomeView {
            state: &state,
            input: "",
            countdown: &countdown,
        };
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        let (layout, _) = view.render(area, &mut buf);

        assert_eq!(layout.header.height, 20);
        let text = screen(&buf);
        assert!(text.contains("It's Friday — October 16th 2026"));
        assert!(text.contains("42 days remaining"));
        assert!(text.contains("Say hello"));
        assert!(text.contains("> Message…"));
    }

    #[test]
    fn test_collapsed_header_shrinks() {
        let (mut state, clock) = state();
        state.on_keyboard_shown(300.0);
        clock.advance(Duration::from_millis(300));
        state.tick();

        let countdown = countdown();
        let view = HomeView {
            state: &state,
            input: "hi",
            countdown: &countdown,
        };
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        let (layout, _) = view.render(area, &mut buf);

        assert_eq!(layout.header.height, 5);
        assert!(screen(&buf).contains("> hi_"));
    }

    #[test]
    fn test_notes_page_visible_after_tab_switch() {
        let (mut state, clock) = state();
        state.press_tab(0);
        clock.advance(Duration::from_millis(300));
        state.tick();

        let countdown = countdown();
        let view = HomeView {
            state: &state,
            input: "",
            countdown: &countdown,
        };
        let area = Rect::new(0, 0, 80, 40);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        let text = screen(&buf);
        assert!(text.contains("No notes yet"));
        assert!(!text.contains("Say hello"));
        assert!(text.contains("> Write a note…"));
    }

    #[test]
    fn test_page_viewport_clips() {
        let area = Rect::new(0, 10, 80, 5);
        assert_eq!(page_viewport(area, 0), Some(area));
        assert_eq!(page_viewport(area, -30), Some(Rect::new(0, 10, 50, 5)));
        assert_eq!(page_viewport(area, 50), Some(Rect::new(50, 10, 30, 5)));
        assert_eq!(page_viewport(area, 80), None);
        assert_eq!(page_viewport(area, -80), None);
    }
}
