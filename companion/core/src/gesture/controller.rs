//! Header/Paging Gesture Controller
//!
//! Owns the header height and the page offset. Drags write values directly
//! (the surface tracks the finger exactly); releases pick a target and hand
//! it to an eased [`Transition`] sampled against the injected [`Clock`].

use std::time::Instant;

use tracing::debug;

use super::projection::{HeaderProjection, PagingProjection};
use crate::animation::{Clock, SystemClock, Transition};
use crate::config::{HeaderConfig, MotionConfig, PagingConfig};

/// Number of pages in the pager
pub const PAGE_COUNT: usize = 2;

/// Gesture axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Header expansion (drag down opens)
    Vertical,
    /// Page offset (drag left advances)
    Horizontal,
}

/// Where a released axis is settling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleTarget {
    /// Header opening to `expanded_height`
    Expanded,
    /// Header closing to `collapse_height`
    Collapsed,
    /// Pager moving to this page index
    Page(usize),
}

/// One continuous value plus its drag/settle bookkeeping
#[derive(Clone, Debug)]
struct AxisState {
    resting: f32,
    baseline: f32,
    dragging: bool,
    transition: Option<Transition>,
}

impl AxisState {
    fn new(value: f32) -> Self {
        Self {
            resting: value,
            baseline: value,
            dragging: false,
            transition: None,
        }
    }

    fn value_at(&self, now: Instant) -> f32 {
        self.transition
            .as_ref()
            .map_or(self.resting, |t| t.value_at(now))
    }

    fn settle_finished(&mut self, now: Instant) {
        if let Some(t) = self.transition {
            if t.is_complete(now) {
                self.resting = t.target();
                self.transition = None;
            }
        }
    }

    /// Freeze any in-flight transition at its current value
    fn halt(&mut self, now: Instant) {
        self.resting = self.value_at(now);
        self.transition = None;
    }

    fn animate_to(&mut self, target: f32, now: Instant, motion: &MotionConfig) {
        self.halt(now);
        if self.resting == target {
            return;
        }
        self.transition = Some(Transition::new(
            self.resting,
            target,
            now,
            motion.transition,
            motion.easing,
        ));
    }
}

/// Gesture controller for the collapsible header and two-page pager
#[derive(Debug)]
pub struct HomeController<C: Clock = SystemClock> {
    clock: C,
    header: HeaderConfig,
    paging: PagingConfig,
    motion: MotionConfig,
    vertical: AxisState,
    horizontal: AxisState,
}

impl HomeController<SystemClock> {
    /// Create a controller on the system clock
    ///
    /// Starts expanded, on the right-hand (chat) page.
    #[must_use]
    pub fn new(header: HeaderConfig, paging: PagingConfig, motion: MotionConfig) -> Self {
        Self::with_clock(header, paging, motion, SystemClock)
    }
}

impl<C: Clock> HomeController<C> {
    /// Create a controller sampling `clock`
    #[must_use]
    pub fn with_clock(
        header: HeaderConfig,
        paging: PagingConfig,
        motion: MotionConfig,
        clock: C,
    ) -> Self {
        Self {
            vertical: AxisState::new(header.expanded_height),
            horizontal: AxisState::new(paging.page_width),
            clock,
            header,
            paging,
            motion,
        }
    }

    /// Header geometry in use
    #[must_use]
    pub fn header_config(&self) -> &HeaderConfig {
        &self.header
    }

    /// Pager geometry in use
    #[must_use]
    pub fn paging_config(&self) -> &PagingConfig {
        &self.paging
    }

    /// Clock the controller samples
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Vertical => &self.vertical,
            Axis::Horizontal => &self.horizontal,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Vertical => &mut self.vertical,
            Axis::Horizontal => &mut self.horizontal,
        }
    }

    /// Current header height
    #[must_use]
    pub fn height(&self) -> f32 {
        self.vertical.value_at(self.clock.now())
    }

    /// Current page offset
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.horizontal.value_at(self.clock.now())
    }

    /// Whether a drag is in progress on `axis`
    #[must_use]
    pub fn is_dragging(&self, axis: Axis) -> bool {
        self.axis(axis).dragging
    }

    /// Whether `axis` is still easing toward a target
    #[must_use]
    pub fn is_animating(&self, axis: Axis) -> bool {
        let now = self.clock.now();
        self.axis(axis)
            .transition
            .is_some_and(|t| !t.is_complete(now))
    }

    /// Page the pager is on or heading to
    #[must_use]
    pub fn current_page(&self) -> usize {
        let x = self
            .horizontal
            .transition
            .map_or(self.horizontal.resting, |t| t.target());
        usize::from(x > self.paging.page_width / 2.0)
    }

    /// Retire completed transitions; returns `true` while anything is still moving
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.vertical.settle_finished(now);
        self.horizontal.settle_finished(now);
        self.vertical.transition.is_some() || self.horizontal.transition.is_some()
    }

    /// Begin a drag: capture the current value as the baseline
    ///
    /// An in-flight settle on the same axis stops where it is. The other axis
    /// is untouched.
    pub fn on_drag_start(&mut self, axis: Axis) {
        let now = self.clock.now();
        let state = self.axis_mut(axis);
        state.halt(now);
        state.baseline = state.resting;
        state.dragging = true;
        debug!(?axis, baseline = state.baseline, "Drag started");
    }

    /// Track a drag; returns the value written
    ///
    /// Vertical: `baseline + translation`, floored at `collapse_height`.
    /// Horizontal: `baseline - translation` (finger moving left advances),
    /// clamped to `[0, page_width]`.
    pub fn on_drag_update(&mut self, axis: Axis, translation: f32) -> f32 {
        if !self.axis(axis).dragging {
            self.on_drag_start(axis);
        }

        let value = match axis {
            Axis::Vertical => {
                let floor = self.header.collapse_height;
                let baseline = self.vertical.baseline;
                if translation.is_nan() {
                    baseline
                } else if translation == f32::INFINITY {
                    self.header.expanded_height
                } else {
                    (baseline + translation).max(floor)
                }
            }
            Axis::Horizontal => {
                let baseline = self.horizontal.baseline;
                if translation.is_nan() {
                    baseline
                } else {
                    (baseline - translation).clamp(0.0, self.paging.page_width)
                }
            }
        };

        self.axis_mut(axis).resting = value;
        value
    }

    /// Release a drag and start settling; returns the chosen target
    ///
    /// Vertical: positive velocity opens, anything else closes.
    /// Horizontal: a release faster than `velocity_threshold` picks the page
    /// by direction; otherwise the side of the midpoint decides.
    pub fn on_drag_end(&mut self, axis: Axis, velocity: f32) -> SettleTarget {
        let now = self.clock.now();
        let velocity = if velocity.is_nan() { 0.0 } else { velocity };
        let current = {
            let state = self.axis_mut(axis);
            state.dragging = false;
            state.halt(now);
            state.resting
        };

        let (target, value) = match axis {
            Axis::Vertical => {
                if velocity > 0.0 {
                    (SettleTarget::Expanded, self.header.expanded_height)
                } else {
                    (SettleTarget::Collapsed, self.header.collapse_height)
                }
            }
            Axis::Horizontal => {
                let page = self.snap_page(current, velocity);
                (SettleTarget::Page(page), self.page_position(page))
            }
        };

        debug!(?axis, velocity, from = current, to = value, ?target, "Drag released");
        let motion = self.motion;
        self.axis_mut(axis).animate_to(value, now, &motion);
        target
    }

    fn snap_page(&self, x: f32, velocity: f32) -> usize {
        if velocity.abs() > self.paging.velocity_threshold {
            usize::from(velocity < 0.0)
        } else {
            usize::from(x > self.paging.page_width / 2.0)
        }
    }

    fn page_position(&self, page: usize) -> f32 {
        page as f32 * self.paging.page_width
    }

    /// Animate to a page without a gesture (tab press)
    ///
    /// Ignored while a horizontal drag is active; returns whether it applied.
    pub fn set_page(&mut self, index: usize) -> bool {
        if self.horizontal.dragging {
            debug!(index, "Ignoring page change during horizontal drag");
            return false;
        }
        let page = index.min(PAGE_COUNT - 1);
        let now = self.clock.now();
        let value = self.page_position(page);
        let motion = self.motion;
        self.horizontal.animate_to(value, now, &motion);
        true
    }

    /// Collapse the header because the input gained focus
    ///
    /// Ignored while a vertical drag is active; returns whether it applied.
    pub fn collapse_on_focus(&mut self) -> bool {
        if self.vertical.dragging {
            debug!("Ignoring focus collapse during header drag");
            return false;
        }
        let now = self.clock.now();
        let value = self.header.collapse_height;
        let motion = self.motion;
        self.vertical.animate_to(value, now, &motion);
        true
    }

    /// Header styling at the current instant
    #[must_use]
    pub fn header_projection(&self) -> HeaderProjection {
        HeaderProjection::from_height(self.height(), &self.header)
    }

    /// Pager styling at the current instant
    #[must_use]
    pub fn paging_projection(&self) -> PagingProjection {
        PagingProjection::from_offset(self.offset(), &self.paging)
    }
}
