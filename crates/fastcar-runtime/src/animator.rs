#![forbid(unsafe_code)]

//! Timed, cancelable transition animator.
//!
//! [`TransitionAnimator`] schedules a [`FrameSequence`] in wall-clock time: a
//! cancelable periodic timer that fires every `1000 / 60` ms and stops after
//! the last frame or on cancellation, whichever comes first.
//!
//! # Timing
//!
//! Frame `k` (zero-based) is due at `start + (k + 1) * frame_interval`, so the
//! first write happens one interval after the transition starts and the last
//! one at `start + total_frames * frame_interval`. An instant transition's
//! single terminal frame is due at `start`.
//!
//! # Invariants
//!
//! 1. [`TransitionAnimator::poll`] yields frames in order, each at most once.
//! 2. After [`TransitionAnimator::cancel`] no frame is ever yielded again.
//! 3. Polling late yields every overdue frame (catch-up), never skips one.

use fastcar_core::animation::{Frame, FrameSequence, TransitionRequest, frame_interval};
use web_time::Instant;

use crate::cancellation::CancellationSource;

/// A transition in flight.
pub struct TransitionAnimator {
    frames: FrameSequence,
    started_at: Instant,
    cancel: CancellationSource,
    span: tracing::Span,
}

impl std::fmt::Debug for TransitionAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionAnimator")
            .field("request", self.frames.request())
            .field("total_frames", &self.frames.total_frames())
            .field("emitted", &self.frames.frames_emitted())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl TransitionAnimator {
    /// Start animating `request` over `duration_ms` at `now`.
    #[must_use]
    pub fn start(request: TransitionRequest, duration_ms: f64, now: Instant) -> Self {
        let frames = FrameSequence::new(request, duration_ms);
        let span = tracing::debug_span!(
            "carousel.transition",
            source = request.source_offset,
            target = request.target_offset,
            index = request.resulting_index,
            frames = frames.total_frames(),
        );
        Self {
            frames,
            started_at: now,
            cancel: CancellationSource::new(),
            span,
        }
    }

    /// The request being animated.
    #[must_use]
    pub fn request(&self) -> &TransitionRequest {
        self.frames.request()
    }

    /// Stop the transition; no frame is yielded afterwards.
    pub fn cancel(&self) {
        if !self.cancel.is_cancelled() {
            let _entered = self.span.enter();
            tracing::debug!(
                emitted = self.frames.frames_emitted(),
                "transition cancelled"
            );
        }
        self.cancel.cancel();
    }

    /// Whether the transition was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the terminal frame has been yielded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.frames.is_finished()
    }

    /// Instant at which frame `frame_index` is due.
    #[must_use]
    pub fn due_at(&self, frame_index: u32) -> Instant {
        if self.frames.is_instant() {
            self.started_at
        } else {
            self.started_at + frame_interval() * (frame_index + 1)
        }
    }

    /// Instant at which the final frame is (or was) due.
    #[must_use]
    pub fn completes_at(&self) -> Instant {
        self.due_at(self.frames.total_frames().saturating_sub(1))
    }

    /// Instant at which the next frame is due, `None` when done or cancelled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.is_cancelled() || self.is_complete() {
            None
        } else {
            Some(self.due_at(self.frames.frames_emitted()))
        }
    }

    /// Frames due at or before `now`, in order.
    pub fn poll(&mut self, now: Instant) -> DueFrames<'_> {
        DueFrames {
            animator: self,
            now,
        }
    }
}

/// Iterator over the frames of a [`TransitionAnimator`] that are due.
#[derive(Debug)]
pub struct DueFrames<'a> {
    animator: &'a mut TransitionAnimator,
    now: Instant,
}

impl Iterator for DueFrames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let deadline = self.animator.next_deadline()?;
        if deadline > self.now {
            return None;
        }
        let frame = self.animator.frames.next()?;
        let _entered = self.animator.span.enter();
        tracing::trace!(
            frame = frame.frame_index,
            fraction = frame.fraction_complete,
            offset = frame.offset,
            last = frame.is_final(),
            "frame"
        );
        Some(frame)
    }
}
