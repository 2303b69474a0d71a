#![forbid(unsafe_code)]

//! Core: input events, drag adapters, slide geometry and frame math.
//!
//! # Role in fastcar
//! `fastcar-core` is the input and primitive layer. It owns the canonical
//! event types the host feeds in, the mouse/touch drag adapters that turn them
//! into one drag signal, the pure geometry helpers, the frame sequence every
//! transition is built from, and the [`viewport::Viewport`] collaborator
//! trait.
//!
//! # How it fits in the system
//! The runtime (`fastcar-runtime`) consumes these types to run the slide state
//! machine, the gesture coordinator and the timed animator. Nothing here keeps
//! time or performs I/O, so everything in this crate is deterministic.

pub mod animation;
pub mod drag;
pub mod event;
pub mod geometry;
pub mod viewport;

pub use animation::{Frame, FrameSequence, TransitionRequest};
pub use drag::{DragEvent, DragKind, DragSource, MouseDrag, TouchDrag};
pub use event::Event;
pub use viewport::{Axis, Viewport};

#[cfg(any(test, feature = "test-helpers"))]
pub use viewport::MemoryViewport;
