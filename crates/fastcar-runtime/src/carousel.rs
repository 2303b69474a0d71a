#![forbid(unsafe_code)]

//! The carousel component: slide machine, gestures and viewport in one place.
//!
//! [`Carousel`] owns the data source, the viewport collaborator, the
//! [`SlideMachine`] and the [`GestureCoordinator`]. The host feeds it input
//! with [`Carousel::handle_event`] and drives time with [`Carousel::tick`];
//! completed transitions are collected as [`CarouselEvent`]s and handed out by
//! [`Carousel::drain_events`].
//!
//! # Writers
//!
//! Exactly one of the running transition or the live drag session writes the
//! viewport at any instant. A drag start cancels the running transition and
//! every queued one before the session takes over, and navigation requested
//! while the session is live is dropped.
//!
//! # Resize
//!
//! Resize events are debounced. Once they settle the slide width is
//! recomputed from the container and the viewport re-snapped onto the current
//! slide. While a transition or drag is in flight the re-snap waits until
//! both are done.
//!
//! # Example
//!
//! ```
//! use fastcar_core::event::{Event, KeyCode, KeyEvent};
//! use fastcar_core::viewport::MemoryViewport;
//! use fastcar_runtime::carousel::{Carousel, CarouselEvent};
//! use web_time::{Duration, Instant};
//!
//! let mut carousel = Carousel::builder()
//!     .data_source(["a", "b", "c"])
//!     .viewport(MemoryViewport::new(300.0))
//!     .build()
//!     .unwrap();
//!
//! let t0 = Instant::now();
//! carousel.handle_event(&Event::Key(KeyEvent::new(KeyCode::ArrowRight)), t0);
//! carousel.tick(t0 + Duration::from_millis(200));
//!
//! assert_eq!(carousel.drain_events(), vec![CarouselEvent::SlideChanged { index: 1 }]);
//! assert_eq!(carousel.viewport().offset(), 300.0);
//! ```

use fastcar_core::drag::DragEvent;
use fastcar_core::event::Event;
use fastcar_core::geometry::{resolve_slide_width, slide_offset, window_around};
use fastcar_core::viewport::{Axis, Viewport};
use web_time::Instant;

use crate::config::{CarouselConfig, ConfigError};
use crate::gesture::{GestureCoordinator, KeyAction};
use crate::rate_limit::Debounce;
use crate::slide_machine::{SlideMachine, SlideState};

/// Notification emitted by a carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CarouselEvent {
    /// A transition completed and the carousel now rests on `index`.
    SlideChanged {
        /// Committed slide index.
        index: usize,
    },
}

/// Builder for [`Carousel`].
///
/// The data source and the viewport are required; everything else falls back
/// to [`CarouselConfig::default`].
#[derive(Debug)]
pub struct CarouselBuilder<T, V> {
    items: Option<Vec<T>>,
    viewport: Option<V>,
    config: CarouselConfig,
}

impl<T, V> Default for CarouselBuilder<T, V> {
    fn default() -> Self {
        Self {
            items: None,
            viewport: None,
            config: CarouselConfig::default(),
        }
    }
}

impl<T, V: Viewport> CarouselBuilder<T, V> {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The items to present, one per slide.
    #[must_use]
    pub fn data_source(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items = Some(items.into_iter().collect());
        self
    }

    /// The scrollable container to drive.
    #[must_use]
    pub fn viewport(mut self, viewport: V) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: CarouselConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the slide width instead of measuring the container.
    #[must_use]
    pub fn width(mut self, width: f64) -> Self {
        self.config.width = Some(width);
        self
    }

    /// Transition duration in milliseconds.
    #[must_use]
    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.config.duration_ms = duration_ms;
        self
    }

    /// Background color passed through to the host.
    #[must_use]
    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.config.background_color = Some(color.into());
        self
    }

    /// Validate the configuration and assemble the carousel.
    ///
    /// The container is measured once, the slide width resolved and the
    /// viewport snapped onto slide 0.
    pub fn build(self) -> Result<Carousel<T, V>, ConfigError> {
        let items = self.items.ok_or(ConfigError::MissingDataSource)?;
        let mut viewport = self.viewport.ok_or(ConfigError::MissingViewport)?;
        let config = self.config.validated()?;

        let slide_width = resolve_slide_width(config.width, viewport.container_width());
        viewport.scroll_to(0.0);
        tracing::debug!(
            items = items.len(),
            slide_width,
            duration_ms = config.duration_ms,
            "carousel built"
        );

        Ok(Carousel {
            machine: SlideMachine::new(items.len(), slide_width, config.duration_ms),
            gestures: GestureCoordinator::new(config.drag_throttle(), config.keyboard_throttle()),
            resize: Debounce::new(config.resize_debounce()),
            resnap_pending: false,
            events: Vec::new(),
            torn_down: false,
            items,
            viewport,
            config,
        })
    }
}

/// A gesture-driven, one-slide-at-a-time carousel.
#[derive(Debug)]
pub struct Carousel<T, V> {
    items: Vec<T>,
    viewport: V,
    config: CarouselConfig,
    machine: SlideMachine,
    gestures: GestureCoordinator,
    resize: Debounce,
    resnap_pending: bool,
    events: Vec<CarouselEvent>,
    torn_down: bool,
}

impl<T, V: Viewport> Carousel<T, V> {
    /// Start building a carousel.
    #[must_use]
    pub fn builder() -> CarouselBuilder<T, V> {
        CarouselBuilder::new()
    }

    /// Feed one host input event.
    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        if self.torn_down {
            return;
        }
        match event {
            Event::Resize { width, height } => {
                tracing::trace!(width, height, "resize");
                self.resize.poke(now);
            }
            Event::Key(key) => {
                if self.gestures.is_dragging() {
                    tracing::trace!(code = ?key.code, "key ignored during drag");
                    return;
                }
                match self.gestures.on_key(key, now) {
                    Some(KeyAction::Next) => {
                        self.next(now);
                    }
                    Some(KeyAction::Prev) => {
                        self.prev(now);
                    }
                    None => {}
                }
            }
            Event::Pointer(_) | Event::Touch(_) => self.handle_drag(event, now),
        }
    }

    fn handle_drag(&mut self, event: &Event, now: Instant) {
        if let Some(start) = DragEvent::start(event) {
            self.begin_drag(&start);
            return;
        }
        let Some(kind) = self.gestures.session().map(|s| s.kind) else {
            return;
        };
        if kind.is_stop(event) {
            self.end_drag(now);
        } else if let Some(drag) = kind.moved(event) {
            if let Some(offset) = self.gestures.on_move(&drag, now, self.slide_width()) {
                tracing::trace!(offset, "drag write");
                self.viewport.scroll_to(offset);
            }
        }
    }

    fn begin_drag(&mut self, start: &DragEvent) {
        // The session is the only writer from here on.
        self.machine.cancel_all();
        let start_offset = self.viewport.measure_offset(Axis::Horizontal);
        self.gestures.begin(start, start_offset);
    }

    fn end_drag(&mut self, now: Instant) {
        let raw_offset = self.viewport.measure_offset(Axis::Horizontal);
        let width = self.slide_width();
        let decision = self.gestures.end(
            raw_offset,
            self.machine.index(),
            self.machine.item_count(),
            width,
        );
        if let Some(request) = decision.request(raw_offset, width) {
            self.machine.submit(request);
        }
        self.pump(now);
    }

    /// Advance time: write due frames, commit finished transitions and apply
    /// a settled resize.
    pub fn tick(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.pump(now);
        if self.resize.poll(now) {
            let measured = self.viewport.container_width();
            let width = resolve_slide_width(self.config.width, measured);
            tracing::debug!(measured, width, "resize settled");
            self.machine.set_slide_width(width);
            self.resnap_pending = true;
        }
        self.resnap_if_idle();
    }

    fn pump(&mut self, now: Instant) {
        let completed = self.machine.pump(now, &mut self.viewport);
        self.events.extend(
            completed
                .into_iter()
                .map(|index| CarouselEvent::SlideChanged { index }),
        );
        self.resnap_if_idle();
    }

    fn resnap_if_idle(&mut self) {
        if !self.resnap_pending || self.machine.is_animating() || self.gestures.is_dragging() {
            return;
        }
        self.resnap_pending = false;
        let offset = slide_offset(self.machine.index(), self.slide_width());
        tracing::debug!(index = self.machine.index(), offset, "re-snap");
        self.viewport.scroll_to(offset);
    }

    fn accepts_navigation(&self) -> bool {
        if self.torn_down {
            return false;
        }
        if self.gestures.is_dragging() {
            tracing::trace!("navigation ignored during drag");
            return false;
        }
        true
    }

    /// Queue a request built by `request` and start it at `now` at the
    /// earliest.
    fn navigate(
        &mut self,
        now: Instant,
        request: impl FnOnce(&mut SlideMachine) -> bool,
    ) -> bool {
        if !self.accepts_navigation() {
            return false;
        }
        // Commit overdue transitions first so the new request never starts
        // before it was made.
        self.pump(now);
        if !request(&mut self.machine) {
            return false;
        }
        self.pump(now);
        true
    }

    /// Move to the following slide. Returns `false` if nothing was queued.
    pub fn next(&mut self, now: Instant) -> bool {
        self.navigate(now, SlideMachine::next)
    }

    /// Move to the preceding slide. Returns `false` if nothing was queued.
    pub fn prev(&mut self, now: Instant) -> bool {
        self.navigate(now, SlideMachine::prev)
    }

    /// Animate to slide `index`. Returns `false` if nothing was queued.
    pub fn scroll_to_index(&mut self, index: usize, now: Instant) -> bool {
        self.navigate(now, |machine| machine.scroll_to_index(index))
    }

    /// Take every notification emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<CarouselEvent> {
        std::mem::take(&mut self.events)
    }

    /// Index of the slide the carousel rests on.
    #[must_use]
    pub fn index(&self) -> usize {
        self.machine.index()
    }

    /// Slide machine state.
    #[must_use]
    pub fn state(&self) -> SlideState {
        self.machine.state()
    }

    /// Effective slide width.
    #[must_use]
    pub fn slide_width(&self) -> f64 {
        self.machine.slide_width()
    }

    /// Number of slides.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The data source.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether a transition is running or queued.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.machine.is_animating()
    }

    /// Whether a drag session is live.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    /// Whether [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        !self.torn_down
            && (self.machine.is_animating() || self.resize.is_pending() || self.resnap_pending)
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.torn_down {
            return None;
        }
        match (self.machine.next_deadline(), self.resize.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Configured background color.
    #[must_use]
    pub fn background_color(&self) -> Option<&str> {
        self.config.background_color.as_deref()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// The viewport collaborator.
    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access to the viewport collaborator.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// Render the slides within `overscan` of the current position.
    ///
    /// While a transition is queued the window also covers the slide the
    /// queue settles on. `template` receives each slide's index and item.
    pub fn render_window<R>(
        &self,
        overscan: usize,
        mut template: impl FnMut(usize, &T) -> R,
    ) -> Vec<R> {
        let count = self.items.len();
        let low = self.machine.index().min(self.machine.pending_index());
        let high = self.machine.index().max(self.machine.pending_index());
        let range =
            window_around(low, overscan, count).start..window_around(high, overscan, count).end;
        self.items[range.clone()]
            .iter()
            .zip(range)
            .map(|(item, index)| template(index, item))
            .collect()
    }

    /// Release every timer, transition and gesture. Later input is ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let dropped = self.machine.cancel_all();
        self.gestures.abort();
        self.resize.cancel();
        self.resnap_pending = false;
        self.torn_down = true;
        tracing::debug!(dropped, index = self.machine.index(), "carousel torn down");
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastcar_core::animation::frame_interval;
    use fastcar_core::event::{KeyCode, KeyEvent, PointerButton, PointerEvent};
    use fastcar_core::viewport::MemoryViewport;
    use web_time::Duration;

    fn carousel(count: usize) -> Carousel<usize, MemoryViewport> {
        Carousel::builder()
            .data_source(0..count)
            .viewport(MemoryViewport::new(200.0).with_slides(count, 200.0))
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_collaborators() {
        let missing_viewport = Carousel::<u8, MemoryViewport>::builder()
            .data_source([1, 2])
            .build()
            .unwrap_err();
        assert!(matches!(missing_viewport, ConfigError::MissingViewport));

        let missing_items = Carousel::<u8, MemoryViewport>::builder()
            .viewport(MemoryViewport::new(100.0))
            .build()
            .unwrap_err();
        assert!(matches!(missing_items, ConfigError::MissingDataSource));
    }

    #[test]
    fn build_rejects_invalid_config() {
        let err = Carousel::builder()
            .data_source([1])
            .viewport(MemoryViewport::new(100.0))
            .width(f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn build_measures_container_and_snaps_to_origin() {
        let mut vp = MemoryViewport::new(320.0);
        vp.set_offset_silently(90.0);
        let c = Carousel::builder()
            .data_source(["a", "b"])
            .viewport(vp)
            .background_color("#000")
            .build()
            .unwrap();
        assert_eq!(c.slide_width(), 320.0);
        assert_eq!(c.viewport().offset(), 0.0);
        assert_eq!(c.background_color(), Some("#000"));
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn configured_width_wins_over_measurement() {
        let c = Carousel::builder()
            .data_source([1, 2, 3])
            .viewport(MemoryViewport::new(500.0))
            .width(120.0)
            .build()
            .unwrap();
        assert_eq!(c.slide_width(), 120.0);
    }

    #[test]
    fn unmeasured_container_collapses_to_zero_width() {
        let mut c = Carousel::builder()
            .data_source([1, 2, 3])
            .viewport(MemoryViewport::new(0.0))
            .duration_ms(0.0)
            .build()
            .unwrap();
        assert_eq!(c.slide_width(), 0.0);
        assert!(c.next(Instant::now()));
        assert_eq!(c.drain_events(), vec![CarouselEvent::SlideChanged { index: 1 }]);
        assert_eq!(c.viewport().offset(), 0.0);
    }

    #[test]
    fn keyboard_navigates_and_is_throttled() {
        let t0 = Instant::now();
        let mut c = carousel(5);
        let right = Event::Key(KeyEvent::new(KeyCode::ArrowRight));
        c.handle_event(&right, t0);
        c.handle_event(&right, t0 + Duration::from_millis(50));
        c.tick(t0 + Duration::from_secs(1));
        assert_eq!(c.drain_events(), vec![CarouselEvent::SlideChanged { index: 1 }]);
    }

    #[test]
    fn navigation_is_ignored_during_drag() {
        let t0 = Instant::now();
        let mut c = carousel(5);
        c.handle_event(&Event::Pointer(PointerEvent::down(100.0, 0.0)), t0);
        assert!(c.is_dragging());
        assert!(!c.next(t0));
        assert!(!c.scroll_to_index(3, t0));
        c.handle_event(&Event::Key(KeyEvent::new(KeyCode::ArrowRight)), t0);
        assert!(!c.is_animating());
    }

    #[test]
    fn secondary_button_does_not_start_a_drag() {
        let mut c = carousel(5);
        let down = PointerEvent::down(100.0, 0.0).with_button(PointerButton::Secondary);
        c.handle_event(&Event::Pointer(down), Instant::now());
        assert!(!c.is_dragging());
    }

    #[test]
    fn render_window_covers_current_and_pending_slides() {
        let t0 = Instant::now();
        let mut c = carousel(10);
        assert_eq!(c.render_window(1, |i, item| (i, *item)), vec![(0, 0), (1, 1)]);
        c.scroll_to_index(4, t0);
        let rendered = c.render_window(1, |i, _| i);
        assert_eq!(rendered, vec![0, 1, 2, 3, 4, 5]);
        c.tick(t0 + frame_interval() * 9);
        assert_eq!(c.render_window(1, |i, _| i), vec![3, 4, 5]);
    }

    #[test]
    fn needs_tick_tracks_pending_work() {
        let t0 = Instant::now();
        let mut c = carousel(3);
        assert!(!c.needs_tick());
        assert_eq!(c.next_deadline(), None);
        c.next(t0);
        assert!(c.needs_tick());
        assert_eq!(c.next_deadline(), Some(t0 + frame_interval()));
        c.tick(t0 + Duration::from_secs(1));
        assert!(!c.needs_tick());
    }

    #[test]
    fn teardown_is_idempotent_and_final() {
        let t0 = Instant::now();
        let mut c = carousel(3);
        c.next(t0);
        c.teardown();
        c.teardown();
        let writes = c.viewport().writes().len();
        c.tick(t0 + Duration::from_secs(1));
        c.handle_event(&Event::Key(KeyEvent::new(KeyCode::ArrowRight)), t0);
        assert!(!c.next(t0));
        assert_eq!(c.viewport().writes().len(), writes);
        assert!(c.drain_events().is_empty());
        assert!(!c.needs_tick());
        assert!(c.is_torn_down());
    }
}
