//! Selection-to-tag state machine.
//!
//! Turns raw pointer events into either a rejected click or a confirmed
//! selection awaiting its annotation. The machine is synchronous: it never
//! draws, waits, or persists. Each handler returns an [`Action`] telling the
//! orchestrator what to do next, and the orchestrator calls [`TagWorkflow::finish`]
//! once the annotation round trip is over, whatever its outcome.
//!
//! ```text
//! Idle --down--> Dragging --up (click)--> Idle
//!                   |
//!                   +--up (drag)--> AwaitingAnnotation --finish--> Idle
//!                   |
//!                   +--cancel--> Idle
//! ```

#[cfg(test)]
#[path = "workflow_test.rs"]
mod workflow_test;

use crate::config::RejectionThresholds;
use crate::geometry::SelectionCoordinates;
use crate::input::{InteractionState, PointerInput};

/// Where the current gesture is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Dragging,
    AwaitingAnnotation,
}

/// What the orchestrator must do after an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    /// A live redraw is due at the next animation frame.
    FrameRequested,
    /// The gesture was a click; redraw from cache and stop.
    SelectionRejected,
    /// The gesture was a drag; confirm the selection and prompt for text.
    AnnotationRequested(SelectionCoordinates),
}

/// Gesture state for one canvas.
#[derive(Debug, Clone, Default)]
pub struct TagWorkflow {
    phase: Phase,
    interaction: InteractionState,
    thresholds: RejectionThresholds,
    frame_pending: bool,
}

impl TagWorkflow {
    #[must_use]
    pub fn new(thresholds: RejectionThresholds) -> Self {
        Self { thresholds, ..Self::default() }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    /// The live (or just-confirmed) selection.
    #[must_use]
    pub fn selection(&self) -> SelectionCoordinates {
        self.interaction.selection.coordinates()
    }

    #[must_use]
    pub fn is_awaiting_annotation(&self) -> bool {
        self.phase == Phase::AwaitingAnnotation
    }

    /// Start a selection at the pointer. Ignored while a selection awaits its annotation.
    pub fn on_pointer_down(&mut self, input: PointerInput) -> Action {
        if self.is_awaiting_annotation() {
            log::debug!("workflow: pointer down ignored while awaiting annotation");
            return Action::None;
        }

        self.interaction.button.press();
        self.interaction.timer.reset();
        self.interaction.selection.set_start(input.position);
        self.interaction.selection.set_end(input.position);
        self.phase = Phase::Dragging;
        Action::None
    }

    /// Track the live selection; at most one frame request is outstanding.
    pub fn on_pointer_move(&mut self, input: PointerInput) -> Action {
        if self.phase != Phase::Dragging || !self.interaction.button.is_down() {
            return Action::None;
        }

        self.interaction.timer.begin(input.time_ms);
        self.interaction.selection.set_end(input.position);

        if self.frame_pending {
            return Action::None;
        }
        self.frame_pending = true;
        Action::FrameRequested
    }

    /// Consume the pending frame request.
    ///
    /// Returns the selection to highlight over the cached redraw, or `None`
    /// when no frame is pending or the drag has already ended.
    pub fn take_frame(&mut self) -> Option<SelectionCoordinates> {
        if !std::mem::take(&mut self.frame_pending) {
            return None;
        }
        (self.phase == Phase::Dragging).then(|| self.selection())
    }

    /// End the drag and classify it.
    ///
    /// Thresholds are checked against the selection as of the last move; only
    /// an accepted drag then adopts the release position as its end corner.
    pub fn on_pointer_up(&mut self, input: PointerInput) -> Action {
        self.interaction.button.release();
        if self.phase != Phase::Dragging {
            return Action::None;
        }

        self.interaction.timer.stop(input.time_ms);
        self.frame_pending = false;

        if !self.interaction.is_drag(&self.thresholds) {
            log::debug!(
                "workflow: rejected gesture ({:.0} ms, {:?})",
                self.interaction.timer.duration_ms(),
                self.interaction.selection.delta()
            );
            self.finish();
            return Action::SelectionRejected;
        }

        self.interaction.timer.reset();
        self.interaction.selection.set_end(input.position);
        self.phase = Phase::AwaitingAnnotation;
        Action::AnnotationRequested(self.selection())
    }

    /// Abandon a drag whose release never arrived.
    ///
    /// Returns whether a drag was in progress. A selection already awaiting
    /// its annotation is left alone.
    pub fn cancel(&mut self) -> bool {
        self.interaction.button.release();
        if self.phase != Phase::Dragging {
            return false;
        }
        log::debug!("workflow: drag cancelled");
        self.finish();
        true
    }

    /// Return to idle and forget the selection.
    pub fn finish(&mut self) {
        self.interaction.reset();
        self.frame_pending = false;
        self.phase = Phase::Idle;
    }
}
