//! PageView Widget
//!
//! A borderless text page that can slide sideways. Lines are wrapped to the
//! page width, anchored to the bottom (newest last), and drawn shifted by a
//! signed column offset with anything outside the viewport clipped.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;
use unicode_width::UnicodeWidthChar;

/// One logical line before wrapping
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLine {
    /// Text content
    pub text: String,
    /// Style for every wrapped row
    pub style: Style,
}

impl PageLine {
    /// Create a styled line
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// An empty spacer line
    #[must_use]
    pub fn blank() -> Self {
        Self::new(String::new(), Style::default())
    }
}

/// A page of wrapped lines offset horizontally within its viewport
pub struct PageView<'a> {
    lines: &'a [PageLine],
    shift: i32,
    wrap_width: Option<u16>,
    placeholder: Option<PageLine>,
}

impl<'a> PageView<'a> {
    /// Create a page over `lines`
    #[must_use]
    pub fn new(lines: &'a [PageLine]) -> Self {
        Self {
            lines,
            shift: 0,
            wrap_width: None,
            placeholder: None,
        }
    }

    /// Wrap at `cols` instead of the render area width
    ///
    /// Used while a page is partly off screen so it keeps its layout.
    #[must_use]
    pub fn wrap_width(mut self, cols: u16) -> Self {
        self.wrap_width = Some(cols);
        self
    }

    /// Columns to move the page right (negative moves it left)
    #[must_use]
    pub fn shift(mut self, cols: i32) -> Self {
        self.shift = cols;
        self
    }

    /// Line shown when the page is empty
    #[must_use]
    pub fn placeholder(mut self, line: PageLine) -> Self {
        self.placeholder = Some(line);
        self
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let wrap_width = self.wrap_width.unwrap_or(area.width).max(1);
        if area.width == 0
            || area.height == 0
            || self.shift >= i32::from(area.width)
            || self.shift <= -i32::from(wrap_width)
        {
            return;
        }

        let source: Vec<&PageLine> = if self.lines.is_empty() {
            self.placeholder.iter().collect()
        } else {
            self.lines.iter().collect()
        };

        // Wrap to width
        let wrapped: Vec<(String, Style)> = source
            .iter()
            .flat_map(|line| {
                if line.text.is_empty() {
                    vec![(String::new(), line.style)]
                } else {
                    wrap(&line.text, wrap_width as usize)
                        .into_iter()
                        .map(|cow| (cow.into_owned(), line.style))
                        .collect()
                }
            })
            .collect();

        // Bottom-anchored: newest lines stay visible
        let height = area.height as usize;
        let skip = wrapped.len().saturating_sub(height);
        let top_pad = height.saturating_sub(wrapped.len());

        let clip = usize::try_from(-self.shift).unwrap_or(0);
        let x = area.x + u16::try_from(self.shift.max(0)).unwrap_or(0);
        let visible_width = area.right().saturating_sub(x) as usize;

        for (i, (line, style)) in wrapped.iter().skip(skip).enumerate() {
            let Ok(offset) = u16::try_from(top_pad + i) else {
                break;
            };
            let y = area.y + offset;
            let text = clip_left(line, clip);
            buf.set_stringn(x, y, &text, visible_width, *style);
        }
    }
}

/// Drop the leftmost `cols` display columns of `line`
#[must_use]
pub fn clip_left(line: &str, cols: usize) -> String {
    let mut skipped = 0;
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        if skipped < cols {
            skipped += ch.width().unwrap_or(0);
            // A wide glyph cut in half becomes a space
            if skipped > cols {
                out.push(' ');
            }
            continue;
        }
        out.push(ch);
    }
    out
}
