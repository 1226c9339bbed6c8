//! Transition Timing
//!
//! Easing curves and time-based transitions between two values. A transition
//! never stores per-frame state: its value is a pure function of the clock
//! time it is sampled at, so surfaces can render at any frame rate.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Easing functions for smooth settling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing (constant speed)
    Linear,

    /// Quadratic ease in
    EaseInQuad,

    /// Quadratic ease out (fast start, slow end)
    #[default]
    EaseOutQuad,

    /// Quadratic ease in and out
    EaseInOutQuad,

    /// Cubic ease out
    EaseOutCubic,

    /// Cubic ease in and out
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// An eased move from one value to another over a fixed duration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: f32,
    to: f32,
    started_at: Instant,
    duration: Duration,
    easing: EasingFunction,
}

impl Transition {
    /// Start a transition at `started_at`
    #[must_use]
    pub fn new(
        from: f32,
        to: f32,
        started_at: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing,
        }
    }

    /// Value the transition started from
    #[must_use]
    pub fn from(&self) -> f32 {
        self.from
    }

    /// Value the transition settles on
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Linear progress (0.0 to 1.0) at `now`
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the transition has reached its target at `now`
    #[must_use]
    pub fn is_complete(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.duration
    }

    /// Eased value at `now`; exactly the target once complete
    #[must_use]
    pub fn value_at(&self, now: Instant) -> f32 {
        if self.is_complete(now) {
            return self.to;
        }
        let eased = self.easing.apply(self.progress(now));
        self.from + (self.to - self.from) * eased
    }
}
