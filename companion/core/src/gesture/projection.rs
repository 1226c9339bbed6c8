//! Render projections
//!
//! Pure functions from the two continuous values (header height, page offset)
//! to the numbers a surface styles itself with. Nothing here holds state.

use serde::Serialize;

use crate::config::{HeaderConfig, PagingConfig};

/// What happens to inputs outside the interpolation range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Pin to the nearest output bound
    Clamp,
    /// Continue the line
    #[default]
    Extend,
}

/// Map `value` linearly from `input` onto `output`
///
/// A degenerate input range and a NaN value both yield `output.0`.
#[must_use]
pub fn interpolate(
    value: f32,
    input: (f32, f32),
    output: (f32, f32),
    extrapolation: Extrapolation,
) -> f32 {
    let span = input.1 - input.0;
    if value.is_nan() || span == 0.0 || !span.is_finite() {
        return output.0;
    }
    let mut t = (value - input.0) / span;
    if extrapolation == Extrapolation::Clamp {
        t = t.clamp(0.0, 1.0);
    }
    output.0 + (output.1 - output.0) * t
}

/// Header styling derived from the current height
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeaderProjection {
    /// Height of the header itself
    pub height: f32,
    /// Opacity of the countdown and footer content
    pub content_opacity: f32,
    /// Height of the fade gradient under the header
    pub gradient_height: f32,
    /// Top padding of the scrolling pages
    pub scroll_top_padding: f32,
}

impl HeaderProjection {
    /// Project a header height
    #[must_use]
    pub fn from_height(height: f32, config: &HeaderConfig) -> Self {
        let window = (
            config.collapse_height,
            config.collapse_height + config.fade_window,
        );
        let gradient_base = config.collapse_height + config.gradient_offset;
        let padding_base = config.collapse_height + config.padding_offset;

        Self {
            height,
            content_opacity: interpolate(height, window, (0.0, 1.0), Extrapolation::Clamp),
            gradient_height: interpolate(
                height,
                window,
                (gradient_base, gradient_base + config.gradient_growth),
                Extrapolation::Extend,
            ),
            scroll_top_padding: interpolate(
                height,
                window,
                (padding_base, padding_base + config.padding_growth),
                Extrapolation::Extend,
            ),
        }
    }
}

/// Pager styling derived from the current horizontal offset
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PagingProjection {
    /// Translation of the two-page track (always `-x`)
    pub track_translate: f32,
    /// Parallax translation of the notes page content
    pub notes_translate: f32,
    /// Parallax translation of the chat page content
    pub chat_translate: f32,
    /// Position of the tab indicator pill
    pub tab_indicator_offset: f32,
    /// Opacity of the filled notes icon
    pub notes_active_opacity: f32,
    /// Opacity of the outlined notes icon
    pub notes_inactive_opacity: f32,
    /// Opacity of the filled chat icon
    pub chat_active_opacity: f32,
    /// Opacity of the outlined chat icon
    pub chat_inactive_opacity: f32,
}

impl PagingProjection {
    /// Project a page offset
    #[must_use]
    pub fn from_offset(x: f32, config: &PagingConfig) -> Self {
        let range = (0.0, config.page_width);
        let parallax = config.parallax_distance;
        let notes_active = interpolate(x, range, (1.0, 0.0), Extrapolation::Clamp);

        Self {
            track_translate: -x,
            notes_translate: interpolate(x, range, (0.0, parallax), Extrapolation::Clamp),
            chat_translate: interpolate(x, range, (-parallax, 0.0), Extrapolation::Clamp),
            tab_indicator_offset: interpolate(
                x,
                range,
                (config.indicator_left, config.indicator_right),
                Extrapolation::Clamp,
            ),
            notes_active_opacity: notes_active,
            notes_inactive_opacity: 1.0 - notes_active,
            chat_active_opacity: 1.0 - notes_active,
            chat_inactive_opacity: notes_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_interpolate_clamp_and_extend() {
        assert!(close(interpolate(5.0, (0.0, 10.0), (0.0, 1.0), Extrapolation::Clamp), 0.5));
        assert!(close(interpolate(20.0, (0.0, 10.0), (0.0, 1.0), Extrapolation::Clamp), 1.0));
        assert!(close(interpolate(20.0, (0.0, 10.0), (0.0, 1.0), Extrapolation::Extend), 2.0));
        assert!(close(interpolate(-5.0, (0.0, 10.0), (0.0, 1.0), Extrapolation::Clamp), 0.0));
    }

    #[test]
    fn test_interpolate_guards() {
        assert_eq!(interpolate(f32::NAN, (0.0, 10.0), (3.0, 4.0), Extrapolation::Extend), 3.0);
        assert_eq!(interpolate(7.0, (5.0, 5.0), (3.0, 4.0), Extrapolation::Extend), 3.0);
    }

    #[test]
    fn test_header_projection_collapsed_and_expanded() {
        let config = HeaderConfig::default();

        let collapsed = HeaderProjection::from_height(110.0, &config);
        assert!(close(collapsed.content_opacity, 0.0));
        assert!(close(collapsed.gradient_height, 210.0));
        assert!(close(collapsed.scroll_top_padding, 210.0));

        let faded_in = HeaderProjection::from_height(170.0, &config);
        assert!(close(faded_in.content_opacity, 1.0));
        assert!(close(faded_in.gradient_height, 310.0));
        assert!(close(faded_in.scroll_top_padding, 270.0));

        let expanded = HeaderProjection::from_height(450.0, &config);
        assert!(close(expanded.content_opacity, 1.0));
        assert!(expanded.gradient_height > faded_in.gradient_height);
    }

    #[test]
    fn test_paging_projection_endpoints() {
        let config = PagingConfig::default();

        let notes = PagingProjection::from_offset(0.0, &config);
        assert!(close(notes.notes_translate, 0.0));
        assert!(close(notes.chat_translate, -150.0));
        assert!(close(notes.tab_indicator_offset, 5.0));
        assert!(close(notes.notes_active_opacity, 1.0));
        assert!(close(notes.chat_active_opacity, 0.0));

        let chat = PagingProjection::from_offset(390.0, &config);
        assert!(close(chat.track_translate, -390.0));
        assert!(close(chat.notes_translate, 150.0));
        assert!(close(chat.chat_translate, 0.0));
        assert!(close(chat.tab_indicator_offset, 60.0));
        assert!(close(chat.chat_active_opacity, 1.0));
        assert!(close(chat.chat_inactive_opacity, 0.0));
    }

    #[test]
    fn test_cross_fades_are_complementary() {
        let config = PagingConfig::default();
        for step in 0..=10 {
            let x = config.page_width * step as f32 / 10.0;
            let p = PagingProjection::from_offset(x, &config);
            assert!(close(p.notes_active_opacity + p.notes_inactive_opacity, 1.0));
            assert!(close(p.chat_active_opacity + p.chat_inactive_opacity, 1.0));
            assert!(close(p.notes_active_opacity, p.chat_inactive_opacity));
        }
    }
}
