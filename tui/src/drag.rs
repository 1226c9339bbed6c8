//! Mouse Drag Tracking
//!
//! Turns crossterm mouse down/drag/up into the controller's pan gesture:
//! a translation relative to where the press started, and a release
//! velocity estimated from the most recent motion samples.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use companion_core::Axis;

use crate::layout::Scale;

/// How far back the velocity estimate looks
pub const VELOCITY_WINDOW: Duration = Duration::from_millis(100);

/// Most samples retained per drag
const MAX_SAMPLES: usize = 16;

/// Release-velocity estimator over a short sliding window
#[derive(Clone, Debug)]
pub struct VelocityTracker {
    samples: VecDeque<(Instant, f32)>,
    window: Duration,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(VELOCITY_WINDOW)
    }
}

impl VelocityTracker {
    /// Create a tracker looking back over `window`
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            samples: VecDeque::with_capacity(MAX_SAMPLES),
            window,
        }
    }

    /// Record a position (points) seen at `at`
    pub fn push(&mut self, at: Instant, position: f32) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back((at, position));
    }

    /// Velocity in points per second over the window ending at the last sample
    ///
    /// Zero with fewer than two samples in the window.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        let Some(&(last_at, last_pos)) = self.samples.back() else {
            return 0.0;
        };
        let first = self
            .samples
            .iter()
            .find(|(at, _)| last_at.duration_since(*at) <= self.window);
        let Some(&(first_at, first_pos)) = first else {
            return 0.0;
        };
        let dt = last_at.duration_since(first_at).as_secs_f32();
        if dt <= f32::EPSILON {
            return 0.0;
        }
        (last_pos - first_pos) / dt
    }
}

/// A press that may become a drag along one axis
///
/// The press stays a tap until the pointer leaves its starting cell along
/// the drag axis; only then does the pan gesture activate.
#[derive(Clone, Debug)]
pub struct ActiveDrag {
    axis: Axis,
    origin: (u16, u16),
    tracker: VelocityTracker,
    active: bool,
}

impl ActiveDrag {
    /// Start tracking a press at `(col, row)`
    #[must_use]
    pub fn begin(axis: Axis, col: u16, row: u16, at: Instant) -> Self {
        let mut tracker = VelocityTracker::default();
        tracker.push(at, 0.0);
        Self {
            axis,
            origin: (col, row),
            tracker,
            active: false,
        }
    }

    /// Whether the pointer has moved far enough to count as a pan
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activate once the pointer at `(col, row)` has left the starting cell
    ///
    /// Returns `true` only on the call that activates the pan.
    pub fn try_activate(&mut self, col: u16, row: u16) -> bool {
        if self.active {
            return false;
        }
        let moved = match self.axis {
            Axis::Vertical => row != self.origin.1,
            Axis::Horizontal => col != self.origin.0,
        };
        self.active = moved;
        moved
    }

    /// Axis this drag drives
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Translation in points for the pointer at `(col, row)`
    #[must_use]
    pub fn translation(&self, col: u16, row: u16, scale: &Scale) -> f32 {
        match self.axis {
            Axis::Vertical => scale.pt_from_rows(i32::from(row) - i32::from(self.origin.1)),
            Axis::Horizontal => scale.pt_from_cols(i32::from(col) - i32::from(self.origin.0)),
        }
    }

    /// Record a motion sample; returns the translation in points
    pub fn update(&mut self, col: u16, row: u16, scale: &Scale, at: Instant) -> f32 {
        let translation = self.translation(col, row, scale);
        self.tracker.push(at, translation);
        translation
    }

    /// Release velocity in points per second
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.tracker.velocity()
    }
}
