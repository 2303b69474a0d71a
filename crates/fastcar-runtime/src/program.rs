#![forbid(unsafe_code)]

//! Message-driven event loop around a [`Carousel`].
//!
//! [`CarouselProgram`] owns a carousel and a channel. Hosts send it [`Msg`]s
//! through a cloneable [`ProgramHandle`]: raw input events, navigation
//! requests and finally [`Msg::Shutdown`]. While the carousel has pending
//! work the program runs a 60 fps [`Every`] ticker that feeds [`Msg::Frame`]
//! back into the same channel; once the carousel is idle the ticker is
//! stopped, so an idle program only wakes up for host messages.
//!
//! # Example
//!
//! ```
//! use fastcar_core::viewport::MemoryViewport;
//! use fastcar_runtime::carousel::Carousel;
//! use fastcar_runtime::program::CarouselProgram;
//! use std::sync::mpsc;
//!
//! let carousel = Carousel::builder()
//!     .data_source(0..3)
//!     .viewport(MemoryViewport::new(100.0))
//!     .build()
//!     .unwrap();
//!
//! let (changed_tx, changed_rx) = mpsc::channel();
//! let program = CarouselProgram::new(carousel).on_slide_changed(move |index| {
//!     let _ = changed_tx.send(index);
//! });
//! let handle = program.handle();
//! let worker = std::thread::spawn(move || program.run());
//!
//! handle.next().unwrap();
//! assert_eq!(changed_rx.recv().unwrap(), 1);
//! handle.shutdown().unwrap();
//! let carousel = worker.join().unwrap();
//! assert!(carousel.is_torn_down());
//! ```

use std::sync::mpsc;

use fastcar_core::animation::frame_interval;
use fastcar_core::event::Event;
use fastcar_core::viewport::Viewport;
use web_time::Instant;

use crate::carousel::{Carousel, CarouselEvent};
use crate::subscription::{Every, SubId, Subscription, SubscriptionManager};

/// Id of the frame ticker subscription.
pub const FRAME_TICKER_ID: SubId = 0x4652_414D; // "FRAM"

/// Messages understood by [`CarouselProgram`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A host input event.
    Input(Event),
    /// Go to the next slide.
    Next,
    /// Go to the previous slide.
    Prev,
    /// Animate to a slide.
    GoTo(usize),
    /// A frame tick from the ticker.
    Frame,
    /// Tear the carousel down and leave the loop.
    Shutdown,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Self::Input(event)
    }
}

/// Cloneable sender for a running program.
#[derive(Debug, Clone)]
pub struct ProgramHandle {
    sender: mpsc::Sender<Msg>,
}

impl ProgramHandle {
    /// Send any message.
    pub fn send(&self, msg: impl Into<Msg>) -> Result<(), mpsc::SendError<Msg>> {
        self.sender.send(msg.into())
    }

    /// Forward a host input event.
    pub fn input(&self, event: Event) -> Result<(), mpsc::SendError<Msg>> {
        self.send(Msg::Input(event))
    }

    /// Request the next slide.
    pub fn next(&self) -> Result<(), mpsc::SendError<Msg>> {
        self.send(Msg::Next)
    }

    /// Request the previous slide.
    pub fn prev(&self) -> Result<(), mpsc::SendError<Msg>> {
        self.send(Msg::Prev)
    }

    /// Request slide `index`.
    pub fn go_to(&self, index: usize) -> Result<(), mpsc::SendError<Msg>> {
        self.send(Msg::GoTo(index))
    }

    /// Ask the program to tear down and return.
    pub fn shutdown(&self) -> Result<(), mpsc::SendError<Msg>> {
        self.send(Msg::Shutdown)
    }
}

type SlideListener = Box<dyn FnMut(usize) + Send>;

/// Event loop driving a [`Carousel`] from a message channel.
pub struct CarouselProgram<T, V> {
    carousel: Carousel<T, V>,
    sender: mpsc::Sender<Msg>,
    receiver: mpsc::Receiver<Msg>,
    subscriptions: SubscriptionManager<Msg>,
    on_slide_changed: Option<SlideListener>,
    running: bool,
}

impl<T, V> std::fmt::Debug for CarouselProgram<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselProgram")
            .field("subscriptions", &self.subscriptions)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl<T, V: Viewport> CarouselProgram<T, V> {
    /// Wrap a built carousel.
    pub fn new(carousel: Carousel<T, V>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            carousel,
            subscriptions: SubscriptionManager::new(sender.clone()),
            sender,
            receiver,
            on_slide_changed: None,
            running: true,
        }
    }

    /// Call `listener` with the index of every completed transition.
    #[must_use]
    pub fn on_slide_changed(mut self, listener: impl FnMut(usize) + Send + 'static) -> Self {
        self.on_slide_changed = Some(Box::new(listener));
        self
    }

    /// A handle for sending messages to this program.
    pub fn handle(&self) -> ProgramHandle {
        ProgramHandle {
            sender: self.sender.clone(),
        }
    }

    /// The wrapped carousel.
    pub fn carousel(&self) -> &Carousel<T, V> {
        &self.carousel
    }

    /// Whether the loop is still accepting messages.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the frame ticker is running.
    pub fn is_ticking(&self) -> bool {
        self.subscriptions.is_active(FRAME_TICKER_ID)
    }

    /// Run until [`Msg::Shutdown`], then tear down and return the carousel.
    ///
    /// The program keeps a sender of its own for the ticker, so dropping
    /// every [`ProgramHandle`] does not end the loop.
    pub fn run(mut self) -> Carousel<T, V> {
        tracing::debug!(items = self.carousel.item_count(), "carousel program started");
        while self.running {
            let Ok(msg) = self.receiver.recv() else {
                break;
            };
            self.update(msg, Instant::now());
        }
        self.shutdown();
        self.carousel
    }

    /// Apply one message at `now`, notify listeners and reconcile the ticker.
    pub fn update(&mut self, msg: Msg, now: Instant) {
        if !self.running {
            return;
        }
        match msg {
            Msg::Input(event) => self.carousel.handle_event(&event, now),
            Msg::Next => {
                self.carousel.next(now);
            }
            Msg::Prev => {
                self.carousel.prev(now);
            }
            Msg::GoTo(index) => {
                self.carousel.scroll_to_index(index, now);
            }
            Msg::Frame => self.carousel.tick(now),
            Msg::Shutdown => {
                self.shutdown();
                return;
            }
        }
        self.dispatch_events();
        self.reconcile();
    }

    fn dispatch_events(&mut self) {
        for event in self.carousel.drain_events() {
            let CarouselEvent::SlideChanged { index } = event;
            if let Some(listener) = self.on_slide_changed.as_mut() {
                listener(index);
            }
        }
    }

    fn reconcile(&mut self) {
        let mut wanted: Vec<Box<dyn Subscription<Msg>>> = Vec::new();
        if self.carousel.needs_tick() {
            wanted.push(Box::new(Every::with_id(
                FRAME_TICKER_ID,
                frame_interval(),
                || Msg::Frame,
            )));
        }
        self.subscriptions.reconcile(wanted);
    }

    fn shutdown(&mut self) {
        if !self.running && self.carousel.is_torn_down() {
            return;
        }
        self.running = false;
        self.subscriptions.stop_all();
        self.carousel.teardown();
        tracing::debug!(index = self.carousel.index(), "carousel program stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcar_core::event::{KeyCode, KeyEvent};
    use fastcar_core::viewport::MemoryViewport;
    use std::sync::{Arc, Mutex};
    use web_time::Duration;

    fn program(count: usize) -> CarouselProgram<usize, MemoryViewport> {
        let carousel = Carousel::builder()
            .data_source(0..count)
            .viewport(MemoryViewport::new(100.0))
            .build()
            .unwrap();
        CarouselProgram::new(carousel)
    }

    #[test]
    fn ticker_runs_only_while_animating() {
        let t0 = Instant::now();
        let mut p = program(3);
        assert!(!p.is_ticking());
        p.update(Msg::Next, t0);
        assert!(p.is_ticking());
        p.update(Msg::Frame, t0 + Duration::from_secs(1));
        assert!(!p.is_ticking());
        assert_eq!(p.carousel().index(), 1);
    }

    #[test]
    fn listener_sees_every_completed_transition() {
        let t0 = Instant::now();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut p = program(5).on_slide_changed(move |i| sink.lock().unwrap().push(i));
        p.update(Msg::Next, t0);
        p.update(Msg::Next, t0);
        p.update(Msg::GoTo(0), t0);
        p.update(Msg::Frame, t0 + Duration::from_secs(1));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn input_messages_reach_the_carousel() {
        let t0 = Instant::now();
        let mut p = program(3);
        p.update(Event::Key(KeyEvent::new(KeyCode::ArrowRight)).into(), t0);
        assert!(p.carousel().is_animating());
    }

    #[test]
    fn shutdown_tears_down_and_ignores_later_messages() {
        let t0 = Instant::now();
        let mut p = program(3);
        p.update(Msg::Next, t0);
        p.update(Msg::Shutdown, t0);
        assert!(!p.is_running());
        assert!(!p.is_ticking());
        assert!(p.carousel().is_torn_down());
        p.update(Msg::Next, t0);
        assert!(!p.carousel().is_animating());
    }

    #[test]
    fn threaded_run_returns_the_carousel() {
        let p = program(4);
        let handle = p.handle();
        let (tx, rx) = mpsc::channel();
        let p = p.on_slide_changed(move |i| {
            let _ = tx.send(i);
        });
        let worker = std::thread::spawn(move || p.run());

        handle.next().unwrap();
        handle.next().unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);
        handle.shutdown().unwrap();

        let carousel = worker.join().unwrap();
        assert_eq!(carousel.index(), 2);
        assert!(carousel.is_torn_down());
        assert!(handle.next().is_err());
    }
}
