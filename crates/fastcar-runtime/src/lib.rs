#![forbid(unsafe_code)]

//! fastcar runtime
//!
//! This crate turns the primitives of `fastcar-core` into a working carousel:
//! timed transitions, the slide state machine, gesture handling and an
//! optional message-driven event loop.
//!
//! # Key Components
//!
//! - [`Carousel`] - The component hosts build, feed input and tick
//! - [`SlideMachine`] - Committed index plus the FIFO transition queue
//! - [`TransitionAnimator`] - Cancelable 60 fps frame timer for one transition
//! - [`GestureCoordinator`] - Drag tracking, snap decisions, keyboard throttle
//! - [`CarouselConfig`] - Tunables, loadable from TOML/JSON
//! - [`CarouselProgram`] - Channel-driven loop with a frame ticker
//! - [`Subscription`] / [`Every`] - Background event sources
//!
//! # Role in fastcar
//! `fastcar-runtime` is the orchestrator. It consumes events and drag
//! adapters from `fastcar-core`, decides which single writer owns the
//! viewport offset at any instant, and reports every completed transition
//! as a [`CarouselEvent::SlideChanged`].
//!
//! # How it fits in the system
//! Hosts that already own an event loop drive [`Carousel`] directly with
//! `handle_event` and `tick`. Hosts that don't wrap it in a
//! [`CarouselProgram`] and talk to it through a [`ProgramHandle`].

pub mod animator;
pub mod cancellation;
pub mod carousel;
pub mod config;
pub mod gesture;
pub mod program;
pub mod rate_limit;
pub mod slide_machine;
pub mod subscription;

pub use animator::TransitionAnimator;
pub use cancellation::{CancellationSource, CancellationToken};
pub use carousel::{Carousel, CarouselBuilder, CarouselEvent};
pub use config::{CarouselConfig, ConfigError};
pub use gesture::{DragSession, GestureCoordinator, KeyAction, SnapDecision};
pub use program::{CarouselProgram, Msg, ProgramHandle};
pub use rate_limit::{Debounce, Throttle};
pub use slide_machine::{SlideMachine, SlideState};
pub use subscription::{Every, SubId, Subscription, SubscriptionManager};
