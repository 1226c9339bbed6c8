//! Theme and Colors
//!
//! Warm evening palette for the home screen. Terminal cells cannot be
//! translucent, so opacity from the core projections is applied by blending
//! a foreground color toward the background.

use ratatui::style::Color;

// ============================================================================
// Header Palette
// ============================================================================

/// Header background - deep plum
pub const HEADER_BG: Color = Color::Rgb(46, 26, 58);

/// Countdown number - warm gold
pub const COUNTDOWN_GOLD: Color = Color::Rgb(255, 206, 112);

/// Date line under the countdown
pub const DATE_TEXT: Color = Color::Rgb(230, 214, 240);

/// Drag handle at the bottom edge of the header
pub const HANDLE: Color = Color::Rgb(150, 120, 170);

// ============================================================================
// Page Palette
// ============================================================================

/// Page background
pub const PAGE_BG: Color = Color::Rgb(18, 16, 24);

/// Active tab label and indicator
pub const TAB_ACTIVE: Color = Color::Rgb(255, 160, 190);

/// Inactive tab label
pub const TAB_INACTIVE: Color = Color::Rgb(110, 100, 120);

/// User chat turns
pub const USER_TEXT: Color = Color::Rgb(130, 220, 130);

/// Assistant chat turns
pub const ASSISTANT_TEXT: Color = Color::Rgb(255, 160, 190);

/// Note timestamps
pub const NOTE_TIME: Color = Color::Rgb(255, 206, 112);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Blend `fg` toward `bg` by `opacity` (1.0 = pure `fg`)
///
/// Named colors have no RGB value to blend, so they snap: visible at or
/// above half opacity, background below.
#[must_use]
pub fn fade(fg: Color, bg: Color, opacity: f32) -> Color {
    let t = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            Color::Rgb(mix(fr, br, t), mix(fg_, bg_, t), mix(fb, bb, t))
        }
        _ if t >= 0.5 => fg,
        _ => bg,
    }
}

fn mix(fg: u8, bg: u8, t: f32) -> u8 {
    let value = f32::from(bg) + (f32::from(fg) - f32::from(bg)) * t;
    // Clamped to the u8 range first
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let channel = value.round().clamp(0.0, 255.0) as u8;
    channel
}
