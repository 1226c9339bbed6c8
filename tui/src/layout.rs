//! Terminal Layout
//!
//! The core measures in points of a phone-sized screen (a 390pt page, a
//! 110–450pt header). The terminal maps those onto cells: one page spans the
//! full width, and a fully expanded header fills half the rows.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ header (height scales)       │
//! │ ────── handle ──────         │
//! ├──────────────────────────────┤
//! │  Notes    Chat    (tab row)  │
//! │  ▔▔▔▔▔                       │
//! ├──────────────────────────────┤
//! │ pages (offset by the pager)  │
//! ├──────────────────────────────┤
//! │ > input                      │
//! │ status                       │
//! └──────────────────────────────┘
//! ```

use companion_core::config::{HeaderConfig, PagingConfig};
use ratatui::layout::{Position, Rect};

/// Rows used by the tab bar (labels + indicator)
pub const TAB_ROWS: u16 = 2;

/// Rows used by the input line
pub const INPUT_ROWS: u16 = 1;

/// Rows used by the status bar
pub const STATUS_ROWS: u16 = 1;

/// Fewest rows the page area may shrink to
pub const MIN_PAGE_ROWS: u16 = 3;

/// Conversion between core points and terminal cells
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Points per terminal column
    pub pt_per_col: f32,
    /// Points per terminal row
    pub pt_per_row: f32,
}

impl Scale {
    /// Fit the core geometry to a terminal of `width` x `height` cells
    #[must_use]
    pub fn for_terminal(
        width: u16,
        height: u16,
        header: &HeaderConfig,
        paging: &PagingConfig,
    ) -> Self {
        let cols = f32::from(width.max(1));
        let header_rows = f32::from((height / 2).max(1));
        Self {
            pt_per_col: paging.page_width / cols,
            pt_per_row: header.expanded_height / header_rows,
        }
    }

    /// Rows covering `pt`, rounded
    #[must_use]
    pub fn rows(&self, pt: f32) -> u16 {
        let rows = (pt / self.pt_per_row).round();
        if rows.is_nan() || rows <= 0.0 {
            0
        } else {
            // Saturates at u16::MAX
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rows = rows.min(f32::from(u16::MAX)) as u16;
            rows
        }
    }

    /// Signed columns covering `pt`, rounded
    #[must_use]
    pub fn cols(&self, pt: f32) -> i32 {
        let cols = (pt / self.pt_per_col).round();
        if cols.is_nan() {
            0
        } else {
            // Terminal widths are far inside i32
            #[allow(clippy::cast_possible_truncation)]
            let cols = cols.clamp(-1.0e6, 1.0e6) as i32;
            cols
        }
    }

    /// Points spanned by a column delta
    #[must_use]
    pub fn pt_from_cols(&self, cols: i32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let cols = cols as f32;
        cols * self.pt_per_col
    }

    /// Points spanned by a row delta
    #[must_use]
    pub fn pt_from_rows(&self, rows: i32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let rows = rows as f32;
        rows * self.pt_per_row
    }
}

/// Screen regions for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HomeLayout {
    /// Collapsible header
    pub header: Rect,
    /// Tab labels and indicator
    pub tabs: Rect,
    /// Two-page track viewport
    pub pages: Rect,
    /// Input line
    pub input: Rect,
    /// Status bar
    pub status: Rect,
}

impl HomeLayout {
    /// Split `area` around a header of `header_rows`
    ///
    /// The header gives up rows first when the terminal is short.
    #[must_use]
    pub fn split(area: Rect, header_rows: u16) -> Self {
        let fixed = TAB_ROWS + INPUT_ROWS + STATUS_ROWS + MIN_PAGE_ROWS;
        let header_rows = header_rows.min(area.height.saturating_sub(fixed));

        let mut y = area.y;
        let mut take = |rows: u16| {
            let rows = rows.min(area.bottom().saturating_sub(y));
            let rect = Rect::new(area.x, y, area.width, rows);
            y += rows;
            rect
        };

        let header = take(header_rows);
        let tabs = take(TAB_ROWS);
        let pages_rows = area
            .height
            .saturating_sub(header_rows + TAB_ROWS + INPUT_ROWS + STATUS_ROWS);
        let pages = take(pages_rows);
        let input = take(INPUT_ROWS);
        let status = take(STATUS_ROWS);

        Self {
            header,
            tabs,
            pages,
            input,
            status,
        }
    }

    /// Which region a cell belongs to
    #[must_use]
    pub fn hit(&self, col: u16, row: u16) -> Option<Region> {
        let pos = Position::new(col, row);
        [
            (self.header, Region::Header),
            (self.tabs, Region::Tabs),
            (self.pages, Region::Pages),
            (self.input, Region::Input),
            (self.status, Region::Status),
        ]
        .into_iter()
        .find(|(rect, _)| rect.contains(pos))
        .map(|(_, region)| region)
    }
}

/// A named screen region
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Collapsible header
    Header,
    /// Tab bar
    Tabs,
    /// Page track
    Pages,
    /// Input line
    Input,
    /// Status bar
    Status,
}
