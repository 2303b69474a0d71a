#![forbid(unsafe_code)]

//! Gesture coordination: live drag tracking, snap decisions and keyboard
//! navigation.
//!
//! [`GestureCoordinator`] turns drag and key input into viewport offsets and
//! navigation actions. It does not write the viewport or touch the slide
//! machine itself; the carousel applies what it returns, which keeps the
//! "one writer at a time" rule in one place.
//!
//! # Drag lifecycle
//!
//! - **Start**: capture the pointer X and the current scroll offset.
//! - **Move** (throttled, one per 10 ms): candidate offset is
//!   `clamp(start + (start_x - x), max(0, start - width), start + width)`;
//!   it is only reported when it differs from the start offset.
//! - **Stop**: if at least one move was observed, pick the neighbour in the
//!   drag direction and decide whether to snap (see [`SnapDecision`]).
//!
//! # Invariants
//!
//! 1. At most one drag session exists; a new start replaces the old one.
//! 2. A session without observed moves ends as a tap and never navigates.
//! 3. A single drag moves at most one slide in either direction.
//! 4. Keyboard actions are rate limited independently of drag input.

use fastcar_core::animation::TransitionRequest;
use fastcar_core::drag::{DragEvent, DragKind};
use fastcar_core::event::{KeyCode, KeyEvent};
use fastcar_core::geometry::{clamp_offset, is_aligned, slide_offset};
use web_time::{Duration, Instant};

use crate::rate_limit::Throttle;

/// Default minimum spacing between processed drag moves.
pub const DEFAULT_DRAG_THROTTLE: Duration = Duration::from_millis(10);

/// Default minimum spacing between keyboard navigation actions.
pub const DEFAULT_KEYBOARD_THROTTLE: Duration = Duration::from_millis(150);

/// State of one continuous pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Input family driving the gesture.
    pub kind: DragKind,
    /// Scroll offset when the gesture started.
    pub start_offset: f64,
    /// Pointer X when the gesture started.
    pub start_pointer_x: f64,
    /// Pointer X of the last processed move, `None` until one arrives.
    pub last_pointer_x: Option<f64>,
}

/// What to do when a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapDecision {
    /// No move was observed; the gesture was a tap.
    Tap,
    /// The offset is already aligned and the neighbour is out of range.
    Stay,
    /// Animate from the current offset to slide `target`.
    Snap {
        /// Slide to settle on.
        target: usize,
    },
}

impl SnapDecision {
    /// Transition request for a snap from `raw_offset`, if one is needed.
    #[must_use]
    pub fn request(self, raw_offset: f64, slide_width: f64) -> Option<TransitionRequest> {
        match self {
            Self::Snap { target } => Some(TransitionRequest::new(
                raw_offset,
                slide_offset(target, slide_width),
                target,
            )),
            Self::Tap | Self::Stay => None,
        }
    }
}

/// Navigation requested from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Go to the previous slide.
    Prev,
    /// Go to the next slide.
    Next,
}

/// Bridges drag and keyboard input to offsets and navigation.
#[derive(Debug, Clone)]
pub struct GestureCoordinator {
    session: Option<DragSession>,
    moves: Throttle,
    keys: Throttle,
}

impl Default for GestureCoordinator {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THROTTLE, DEFAULT_KEYBOARD_THROTTLE)
    }
}

impl GestureCoordinator {
    /// Create a coordinator with explicit rate limits.
    #[must_use]
    pub fn new(drag_throttle: Duration, keyboard_throttle: Duration) -> Self {
        Self {
            session: None,
            moves: Throttle::new(drag_throttle),
            keys: Throttle::new(keyboard_throttle),
        }
    }

    /// The live drag session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether a drag session is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Start a drag session at `start_offset`.
    ///
    /// Returns `false` (and keeps no session) if the event has no pointer
    /// position. Any previous session is discarded.
    pub fn begin(&mut self, drag: &DragEvent, start_offset: f64) -> bool {
        let Some(start_pointer_x) = drag.pointer_x() else {
            self.session = None;
            return false;
        };
        self.moves.reset();
        self.session = Some(DragSession {
            kind: drag.kind(),
            start_offset,
            start_pointer_x,
            last_pointer_x: None,
        });
        tracing::debug!(kind = ?drag.kind(), start_offset, start_pointer_x, "drag started");
        true
    }

    /// Process a drag move; returns the offset to write, if any.
    pub fn on_move(&mut self, drag: &DragEvent, now: Instant, slide_width: f64) -> Option<f64> {
        let session = self.session.as_mut()?;
        if drag.kind() != session.kind {
            return None;
        }
        if !self.moves.admit(now) {
            tracing::trace!("drag move throttled");
            return None;
        }
        let x = drag.pointer_x()?;
        session.last_pointer_x = Some(x);

        let start = session.start_offset;
        let candidate = clamp_offset(
            start + (session.start_pointer_x - x),
            start - slide_width,
            start + slide_width,
        );
        (candidate != start).then_some(candidate)
    }

    /// End the drag session and decide where to settle.
    pub fn end(
        &mut self,
        raw_offset: f64,
        index: usize,
        item_count: usize,
        slide_width: f64,
    ) -> SnapDecision {
        let Some(session) = self.session.take() else {
            return SnapDecision::Tap;
        };
        let Some(last_x) = session.last_pointer_x else {
            tracing::debug!("drag ended without movement");
            return SnapDecision::Tap;
        };

        let to_left = (session.start_pointer_x - last_x) < 0.0;
        let closest = if to_left {
            index.checked_sub(1)
        } else {
            index.checked_add(1)
        }
        .filter(|&candidate| candidate < item_count);
        let aligned = is_aligned(raw_offset, slide_width);

        let decision = match closest {
            Some(target) if target != index || !aligned => SnapDecision::Snap { target },
            Some(_) => SnapDecision::Stay,
            // Pulled past either end: settle back onto the current slide.
            None if !aligned && index < item_count => SnapDecision::Snap { target: index },
            None => SnapDecision::Stay,
        };
        tracing::debug!(to_left, raw_offset, index, ?decision, "drag ended");
        decision
    }

    /// Drop the live session without a snap decision.
    pub fn abort(&mut self) {
        if self.session.take().is_some() {
            tracing::debug!("drag aborted");
        }
    }

    /// Map a key event to a navigation action, rate limited.
    pub fn on_key(&mut self, key: &KeyEvent, now: Instant) -> Option<KeyAction> {
        if !key.is_down() {
            return None;
        }
        let action = match key.code {
            KeyCode::ArrowLeft => KeyAction::Prev,
            KeyCode::ArrowRight => KeyAction::Next,
            _ => return None,
        };
        if self.keys.admit(now) {
            Some(action)
        } else {
            tracing::trace!(?action, "key throttled");
            None
        }
    }
}
