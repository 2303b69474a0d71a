#![forbid(unsafe_code)]

//! Frame math for slide transitions.
//!
//! A transition moves the viewport from a source offset to a target offset in
//! a fixed number of frames at [`FRAME_RATE`]. [`FrameSequence`] produces the
//! frames lazily; the runtime's animator schedules them in wall-clock time.
//!
//! # Invariants
//!
//! 1. `total_frames(ms) == round(ms / 1000 * 60)`, and `0` for zero,
//!    negative or non-finite durations.
//! 2. `fraction_complete` is strictly increasing and the last frame reports
//!    exactly `1.0` with `offset == target_offset`.
//! 3. A zero-frame sequence yields one terminal frame and nothing else, so a
//!    zero duration completes instead of hanging.
//! 4. A sequence is finite and cannot be restarted; build a new one instead.
//!
//! # Example
//!
//! ```
//! use fastcar_core::animation::{FrameSequence, TransitionRequest};
//!
//! let request = TransitionRequest::new(400.0, 600.0, 3);
//! let frames: Vec<_> = FrameSequence::new(request, 150.0).collect();
//! assert_eq!(frames.len(), 9);
//! assert_eq!(frames.last().unwrap().fraction_complete, 1.0);
//! assert_eq!(frames.last().unwrap().offset, 600.0);
//! ```

use web_time::Duration;

/// Fixed animation frame rate (frames per second).
pub const FRAME_RATE: u32 = 60;

/// Default transition duration in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 150.0;

/// Interval between two animation frames (`1000 / 60` ms).
#[inline]
#[must_use]
pub fn frame_interval() -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(FRAME_RATE))
}

/// Number of frames a transition of `duration_ms` spans.
#[must_use]
pub fn total_frames(duration_ms: f64) -> u32 {
    let frames = (duration_ms / 1000.0 * f64::from(FRAME_RATE)).round();
    if frames.is_finite() && frames > 0.0 {
        // Saturating float-to-int cast.
        frames as u32
    } else {
        0
    }
}

/// One requested movement of the viewport between two slide boundaries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    /// Offset the animation starts from.
    pub source_offset: f64,
    /// Offset the animation ends on.
    pub target_offset: f64,
    /// Slide index committed once the animation completes.
    pub resulting_index: usize,
}

impl TransitionRequest {
    /// Create a transition request.
    #[must_use]
    pub const fn new(source_offset: f64, target_offset: f64, resulting_index: usize) -> Self {
        Self {
            source_offset,
            target_offset,
            resulting_index,
        }
    }

    /// Linear interpolation between source and target.
    #[inline]
    #[must_use]
    pub fn offset_at(&self, fraction: f64) -> f64 {
        self.source_offset + (self.target_offset - self.source_offset) * fraction
    }
}

/// A single animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Zero-based frame number.
    pub frame_index: u32,
    /// `(frame_index + 1) / total_frames`, or `1.0` for instant transitions.
    pub fraction_complete: f64,
    /// Interpolated viewport offset for this frame.
    pub offset: f64,
}

impl Frame {
    /// Whether this is the frame that completes the transition.
    #[inline]
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.fraction_complete >= 1.0
    }
}

/// Lazy, finite frame producer for one transition.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    request: TransitionRequest,
    total_frames: u32,
    next_frame: u32,
    finished: bool,
}

impl FrameSequence {
    /// Frames for `request` animated over `duration_ms`.
    #[must_use]
    pub fn new(request: TransitionRequest, duration_ms: f64) -> Self {
        Self::with_frames(request, total_frames(duration_ms))
    }

    /// Frames for `request` over an explicit frame count.
    #[must_use]
    pub fn with_frames(request: TransitionRequest, total_frames: u32) -> Self {
        Self {
            request,
            total_frames,
            next_frame: 0,
            finished: false,
        }
    }

    /// The request being animated.
    #[must_use]
    pub fn request(&self) -> &TransitionRequest {
        &self.request
    }

    /// Total frames, `0` for an instant transition.
    #[must_use]
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    /// Whether the transition completes without intermediate frames.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.total_frames == 0
    }

    /// Frames already produced.
    #[must_use]
    pub fn frames_emitted(&self) -> u32 {
        self.next_frame
    }

    /// Whether the terminal frame has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Iterator for FrameSequence {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }
        if self.total_frames == 0 {
            self.finished = true;
            return Some(Frame {
                frame_index: 0,
                fraction_complete: 1.0,
                offset: self.request.target_offset,
            });
        }

        let frame_index = self.next_frame;
        self.next_frame += 1;
        let fraction = f64::from(self.next_frame) / f64::from(self.total_frames);
        // Land exactly on the target; interpolation may drift by an ulp.
        let offset = if self.next_frame == self.total_frames {
            self.finished = true;
            self.request.target_offset
        } else {
            self.request.offset_at(fraction)
        };
        Some(Frame {
            frame_index,
            fraction_complete: fraction,
            offset,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.finished {
            0
        } else if self.total_frames == 0 {
            1
        } else {
            (self.total_frames - self.next_frame) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameSequence {}

impl std::iter::FusedIterator for FrameSequence {}
