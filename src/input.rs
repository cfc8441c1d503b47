//! Input model: pointer events, button state, gesture timing, and the live selection.
//!
//! Three small state holders track one drag between pointer-down and
//! pointer-up. [`PointerButton`] knows whether the button is held,
//! [`GestureTimer`] measures how long the pointer moved, and
//! [`SelectionTracker`] carries the two corners of the rectangle being drawn.
//! [`InteractionState`] bundles them and answers the one question the
//! workflow cares about: was this a drag, or just a click?

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::config::RejectionThresholds;
use crate::geometry::{Point, SelectionCoordinates};

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Position in the canvas's local CSS-pixel space.
    pub position: Point,
    /// Event timestamp in milliseconds on a monotonic clock.
    pub time_ms: f64,
}

impl PointerInput {
    #[must_use]
    pub fn new(x: f64, y: f64, time_ms: f64) -> Self {
        Self { position: Point::new(x, y), time_ms }
    }
}

/// Device behind a pointer event, from the DOM `pointerType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
    Unknown,
}

impl PointerKind {
    #[must_use]
    pub fn from_pointer_type(raw: &str) -> Self {
        match raw {
            "mouse" => Self::Mouse,
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Unknown,
        }
    }

    /// Selections are drawn with a mouse only; touch and pen input is ignored.
    #[must_use]
    pub fn can_select(self) -> bool {
        self == Self::Mouse
    }
}

/// Whether the primary pointer button is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
}

/// Pointer button tracker. Repeated presses or releases are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerButton {
    state: ButtonState,
}

impl PointerButton {
    pub fn press(&mut self) {
        self.state = ButtonState::Down;
    }

    pub fn release(&mut self) {
        self.state = ButtonState::Up;
    }

    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    #[must_use]
    pub fn is_down(&self) -> bool {
        self.state == ButtonState::Down
    }

    #[must_use]
    pub fn is_up(&self) -> bool {
        self.state == ButtonState::Up
    }
}

/// Measures how long the pointer moved during a gesture.
///
/// `begin` only records the first move; later moves do not restart the clock
/// until `reset`. With neither timestamp set the duration is `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureTimer {
    started_at: Option<f64>,
    stopped_at: Option<f64>,
}

impl GestureTimer {
    /// Whether a move has been recorded since the last reset.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.started_at.is_some()
    }

    /// Record the start of movement. No-op if already moving.
    pub fn begin(&mut self, now_ms: f64) {
        if self.is_moving() {
            return;
        }
        self.started_at = Some(now_ms);
    }

    /// Record the end of movement. No-op if movement never began.
    pub fn stop(&mut self, now_ms: f64) {
        if !self.is_moving() {
            return;
        }
        self.stopped_at = Some(now_ms);
    }

    /// Forget both timestamps.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.stopped_at = None;
    }

    /// Milliseconds between `begin` and `stop`, or `0.0` if either is missing.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        match (self.started_at, self.stopped_at) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn exceeds(&self, threshold_ms: f64) -> bool {
        self.duration_ms() > threshold_ms
    }
}

/// Absolute per-axis movement of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

/// The corners of the selection being drawn, updated in place on every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionTracker {
    start: Point,
    end: Point,
}

impl SelectionTracker {
    pub fn set_start(&mut self, pt: Point) {
        self.start = pt;
    }

    pub fn set_end(&mut self, pt: Point) {
        self.end = pt;
    }

    /// Collapse both corners to the origin.
    pub fn reset(&mut self) {
        self.start = Point::ORIGIN;
        self.end = Point::ORIGIN;
    }

    #[must_use]
    pub fn coordinates(&self) -> SelectionCoordinates {
        SelectionCoordinates::new(self.start, self.end)
    }

    #[must_use]
    pub fn delta(&self) -> Delta {
        Delta {
            dx: (self.end.x - self.start.x).abs(),
            dy: (self.end.y - self.start.y).abs(),
        }
    }

    /// Both axes must move past their threshold; one long thin drag is not enough.
    #[must_use]
    pub fn exceeds(&self, dx: f64, dy: f64) -> bool {
        let delta = self.delta();
        delta.dx > dx && delta.dy > dy
    }
}

/// Everything tracked across one pointer gesture.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionState {
    pub button: PointerButton,
    pub timer: GestureTimer,
    pub selection: SelectionTracker,
}

impl InteractionState {
    /// Whether the gesture so far clears both rejection thresholds.
    #[must_use]
    pub fn is_drag(&self, thresholds: &RejectionThresholds) -> bool {
        self.timer.exceeds(thresholds.duration_ms) && self.selection.exceeds(thresholds.dx, thresholds.dy)
    }

    /// Drop all gesture state; the button state is left alone.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.selection.reset();
    }
}
