#![forbid(unsafe_code)]

//! Slide state machine: the current index and the transition queue.
//!
//! # State Machine
//!
//! ```text
//!   Idle(i) ──next()/prev()/scroll_to_index()/submit()──▶ Transitioning(i → t)
//!   Transitioning(i → t) ──last frame written──▶ Idle(t)   emits t
//!   Transitioning(i → t) ──new request──▶ queued (FIFO), starts after t
//!   Transitioning(i → t) ──cancel_all()──▶ Idle(i)          emits nothing
//! ```
//!
//! # Invariants
//!
//! 1. At most one transition writes the viewport at a time; queued requests
//!    start only after their predecessor's final frame.
//! 2. Requests complete strictly in submission order, each reporting its own
//!    resulting index exactly once.
//! 3. [`SlideMachine::index`] changes only when a transition completes. It
//!    never reflects a target that is still animating or was cancelled.
//! 4. Navigation is computed from [`SlideMachine::pending_index`], the index
//!    the queue will settle on, so rapid `next()` calls each advance by one.
//! 5. Navigating past either end is a silent no-op.
//!
//! # Failure Modes
//!
//! - Zero width: every offset collapses to the origin; transitions still
//!   complete and report their index.
//! - Zero/negative duration: transitions complete within the same
//!   [`SlideMachine::pump`] call that starts them.

use std::collections::VecDeque;

use fastcar_core::animation::TransitionRequest;
use fastcar_core::geometry::slide_offset;
use fastcar_core::viewport::Viewport;
use web_time::Instant;

use crate::animator::TransitionAnimator;

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    /// Resting on a slide.
    Idle {
        /// Committed slide index.
        index: usize,
    },
    /// A transition is animating.
    Transitioning {
        /// Committed slide index (the one being left).
        index: usize,
        /// Index the running transition will commit.
        target: usize,
    },
}

/// Owns the slide index and serializes transitions.
#[derive(Debug)]
pub struct SlideMachine {
    index: usize,
    pending_index: usize,
    item_count: usize,
    slide_width: f64,
    duration_ms: f64,
    queue: VecDeque<TransitionRequest>,
    active: Option<TransitionAnimator>,
}

impl SlideMachine {
    /// A machine resting on slide 0.
    #[must_use]
    pub fn new(item_count: usize, slide_width: f64, duration_ms: f64) -> Self {
        Self {
            index: 0,
            pending_index: 0,
            item_count,
            slide_width,
            duration_ms,
            queue: VecDeque::new(),
            active: None,
        }
    }

    /// Index of the last completed transition.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index the machine settles on once every queued transition completes.
    #[must_use]
    pub fn pending_index(&self) -> usize {
        self.pending_index
    }

    /// Number of slides.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Uniform slide width used for offset arithmetic.
    #[must_use]
    pub fn slide_width(&self) -> f64 {
        self.slide_width
    }

    /// Update the slide width for future requests.
    pub fn set_slide_width(&mut self, width: f64) {
        self.slide_width = width;
    }

    /// Transition duration in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SlideState {
        match &self.active {
            Some(animator) => SlideState::Transitioning {
                index: self.index,
                target: animator.request().resulting_index,
            },
            None => SlideState::Idle { index: self.index },
        }
    }

    /// Whether a transition is running or waiting to run.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some() || !self.queue.is_empty()
    }

    /// Requests waiting behind the running transition.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// When the next frame is due, `None` when nothing is in flight.
    ///
    /// Queued requests with no running transition are due immediately; the
    /// caller reports that as `now` by pumping.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.as_ref().and_then(TransitionAnimator::next_deadline)
    }

    /// Request a move to the following slide. Returns `false` at the end.
    pub fn next(&mut self) -> bool {
        let target = self.pending_index + 1;
        if target < self.item_count {
            self.enqueue_to(target)
        } else {
            tracing::trace!(index = self.pending_index, "next ignored at last slide");
            false
        }
    }

    /// Request a move to the preceding slide. Returns `false` at the start.
    pub fn prev(&mut self) -> bool {
        match self.pending_index.checked_sub(1) {
            Some(target) => self.enqueue_to(target),
            None => {
                tracing::trace!("prev ignored at first slide");
                false
            }
        }
    }

    /// Request a move to an arbitrary slide.
    ///
    /// Returns `false` when `target` is out of range or already where the
    /// queue will settle.
    pub fn scroll_to_index(&mut self, target: usize) -> bool {
        if target >= self.item_count || target == self.pending_index {
            return false;
        }
        self.enqueue_to(target)
    }

    fn enqueue_to(&mut self, target: usize) -> bool {
        let request = TransitionRequest::new(
            slide_offset(self.pending_index, self.slide_width),
            slide_offset(target, self.slide_width),
            target,
        );
        self.submit(request)
    }

    /// Queue an explicit transition request.
    ///
    /// Returns `false` if the resulting index is out of range.
    pub fn submit(&mut self, request: TransitionRequest) -> bool {
        if request.resulting_index >= self.item_count {
            return false;
        }
        tracing::debug!(
            from = self.pending_index,
            to = request.resulting_index,
            queued = self.queue.len(),
            "transition requested"
        );
        self.pending_index = request.resulting_index;
        self.queue.push_back(request);
        true
    }

    /// Cancel the running transition and drop every queued request.
    ///
    /// Returns how many requests were discarded. The committed index is kept.
    pub fn cancel_all(&mut self) -> usize {
        let mut dropped = self.queue.len();
        self.queue.clear();
        if let Some(animator) = self.active.take() {
            animator.cancel();
            dropped += 1;
        }
        self.pending_index = self.index;
        if dropped > 0 {
            tracing::debug!(dropped, index = self.index, "transitions cancelled");
        }
        dropped
    }

    /// Advance the queue to `now`, writing every due frame to `viewport`.
    ///
    /// Starts queued transitions as their predecessors finish (a successor
    /// starts at the instant its predecessor completed) and returns the
    /// indices committed during this call, in order. Callers pump up to the
    /// current instant before submitting, otherwise a request made after an
    /// overdue completion inherits that completion's start time.
    pub fn pump<V: Viewport + ?Sized>(&mut self, now: Instant, viewport: &mut V) -> Vec<usize> {
        let mut completed = Vec::new();
        let mut start_at = now;
        loop {
            if self.active.is_none() {
                let Some(request) = self.queue.pop_front() else {
                    break;
                };
                self.active = Some(TransitionAnimator::start(request, self.duration_ms, start_at));
            }
            let Some(animator) = self.active.as_mut() else {
                break;
            };
            for frame in animator.poll(now) {
                viewport.scroll_to(frame.offset);
            }
            if !animator.is_complete() {
                break;
            }
            start_at = animator.completes_at();
            let index = animator.request().resulting_index;
            self.active = None;
            self.index = index;
            tracing::debug!(index, "transition complete");
            completed.push(index);
        }
        completed
    }
}
