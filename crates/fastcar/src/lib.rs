#![forbid(unsafe_code)]

//! fastcar public facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types of the internal crates and offers a prelude for day-to-day
//! usage.
//!
//! # Example
//!
//! ```
//! use fastcar::prelude::*;
//! use fastcar::core::MemoryViewport;
//! use web_time::{Duration, Instant};
//!
//! let mut carousel = Carousel::builder()
//!     .data_source(["intro", "features", "pricing"])
//!     .viewport(MemoryViewport::new(640.0))
//!     .duration_ms(120.0)
//!     .build()?;
//!
//! let t0 = Instant::now();
//! carousel.next(t0);
//! carousel.tick(t0 + Duration::from_secs(1));
//! assert_eq!(carousel.drain_events(), vec![CarouselEvent::SlideChanged { index: 1 }]);
//! # Ok::<(), fastcar::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use fastcar_core::animation::{Frame, FrameSequence, TransitionRequest};
pub use fastcar_core::drag::{DragEvent, DragKind, DragSource, MouseDrag, TouchDrag};
pub use fastcar_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerEvent,
    PointerEventKind, TouchEvent, TouchEventKind, TouchPoint,
};
pub use fastcar_core::viewport::{Axis, Viewport};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use fastcar_runtime::{
    Carousel, CarouselBuilder, CarouselConfig, CarouselEvent, CarouselProgram, Msg,
    ProgramHandle, SlideState,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type: carousel configuration failures.
#[cfg(feature = "runtime")]
pub use fastcar_runtime::ConfigError as Error;

/// Standard result type for fastcar APIs.
#[cfg(feature = "runtime")]
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{DragEvent, Event, KeyCode, KeyEvent, PointerEvent, TouchEvent, Viewport};

    #[cfg(feature = "runtime")]
    pub use crate::{
        Carousel, CarouselConfig, CarouselEvent, CarouselProgram, Error, ProgramHandle, Result,
    };

    pub use crate::core;
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use fastcar_core as core;
#[cfg(feature = "runtime")]
pub use fastcar_runtime as runtime;
