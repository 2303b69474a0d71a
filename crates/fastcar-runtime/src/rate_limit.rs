#![forbid(unsafe_code)]

//! Time-based rate limiters for input streams.
//!
//! - [`Throttle`] lets the first event through and drops every further event
//!   until the interval has passed (leading edge). Drag moves are throttled to
//!   one per 10 ms, keyboard navigation to one per 150 ms.
//! - [`Debounce`] fires once the input has been quiet for a full period.
//!   Resize bursts settle after 50 ms before the slide width is recomputed.
//!
//! Both are driven by caller-supplied instants, so they are deterministic
//! under test and never own a timer themselves.

use web_time::{Duration, Instant};

/// Leading-edge throttle.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Throttle that admits at most one event per `interval`.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns `true` if an event at `now` passes, and opens a new window.
    pub fn admit(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the current window.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Trailing-edge debounce.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet: Duration,
    last_poke: Option<Instant>,
}

impl Debounce {
    /// Debounce that settles after `quiet` without input.
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            last_poke: None,
        }
    }

    /// Record an input at `now`, restarting the quiet period.
    pub fn poke(&mut self, now: Instant) {
        self.last_poke = Some(now);
    }

    /// Whether an input is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.last_poke.is_some()
    }

    /// Instant at which the pending input settles.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.last_poke.map(|t| t + self.quiet)
    }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.last_poke = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending input.
    pub fn cancel(&mut self) {
        self.last_poke = None;
    }
}
