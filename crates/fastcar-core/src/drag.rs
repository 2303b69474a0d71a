#![forbid(unsafe_code)]

//! Drag event adapters: one uniform drag signal over mouse and touch input.
//!
//! A drag gesture starts on a pointer-down (or touch-start) delivered to the
//! carousel element and continues with *global* move and stop events until the
//! button is released (or the finger lifted). [`DragSource`] captures that
//! lifecycle as a capability set:
//!
//! - [`DragSource::pointer_x`]: horizontal position of the event,
//! - [`DragSource::move_stream`]: further moves of the same input kind,
//! - [`DragSource::stop_stream`]: the events that end the gesture.
//!
//! Two variants implement it: [`MouseDrag`] and [`TouchDrag`]. [`DragEvent`]
//! is the tagged union used where the variant is only known at runtime, and
//! [`DragKind`] applies the streams of a live session's variant to events as
//! they arrive.
//!
//! # Invariants
//!
//! 1. A stream only ever yields events of its own variant; mouse moves never
//!    leak into a touch gesture and vice versa.
//! 2. Streams are lazy and restartable: every call wraps a fresh iterator.
//! 3. Only the primary mouse button starts a drag.
//!
//! # Example
//!
//! ```
//! use fastcar_core::drag::{DragSource, MouseDrag};
//! use fastcar_core::event::{Event, PointerEvent};
//!
//! let events = vec![
//!     Event::Pointer(PointerEvent::moved(90.0, 0.0)),
//!     Event::Pointer(PointerEvent::moved(70.0, 0.0)),
//!     Event::Pointer(PointerEvent::up(70.0, 0.0)),
//! ];
//!
//! let xs: Vec<_> = MouseDrag::move_stream(events.iter())
//!     .filter_map(|m| m.pointer_x())
//!     .collect();
//! assert_eq!(xs, vec![90.0, 70.0]);
//! assert_eq!(MouseDrag::stop_stream(events.iter()).count(), 1);
//! ```

use std::marker::PhantomData;

use crate::event::{
    Event, PointerButton, PointerEvent, PointerEventKind, TouchEvent, TouchEventKind,
};

/// Which input family drives a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragKind {
    /// Mouse / pen pointer.
    Mouse,
    /// Touch screen.
    Touch,
}

/// Push-side form of the drag streams.
///
/// Hosts deliver events one at a time, so a live session feeds each event
/// through its variant's [`DragSource::move_stream`] and
/// [`DragSource::stop_stream`] as a stream of one.
impl DragKind {
    /// Moves of this drag kind among `events`, in order.
    pub fn moves<'a, I>(self, events: I) -> impl Iterator<Item = DragEvent>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let events = events.into_iter();
        let (mouse, touch) = match self {
            Self::Mouse => (Some(MouseDrag::move_stream(events)), None),
            Self::Touch => (None, Some(TouchDrag::move_stream(events))),
        };
        mouse
            .into_iter()
            .flatten()
            .map(DragEvent::Mouse)
            .chain(touch.into_iter().flatten().map(DragEvent::Touch))
    }

    /// Classify a global event as a move of this drag kind.
    #[must_use]
    pub fn moved(self, event: &Event) -> Option<DragEvent> {
        self.moves(std::iter::once(event)).next()
    }

    /// Whether a global event ends a drag of this kind.
    #[must_use]
    pub fn is_stop(self, event: &Event) -> bool {
        let once = std::iter::once(event);
        match self {
            Self::Mouse => MouseDrag::stop_stream(once).next().is_some(),
            Self::Touch => TouchDrag::stop_stream(once).next().is_some(),
        }
    }
}

/// Capability set shared by every drag input variant.
pub trait DragSource: Sized {
    /// The discriminant of this variant.
    const KIND: DragKind;

    /// Recognize the event that starts a gesture of this variant.
    fn from_start(event: &Event) -> Option<Self>;

    /// Recognize a move belonging to a gesture of this variant.
    fn from_move(event: &Event) -> Option<Self>;

    /// Recognize the event that ends a gesture of this variant.
    fn from_stop(event: &Event) -> Option<Self>;

    /// Horizontal client position, if the event carries one.
    fn pointer_x(&self) -> Option<f64>;

    /// Lazily yield the moves of this variant found in `events`.
    fn move_stream<'a, I>(events: I) -> DragStream<I::IntoIter, Self>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        DragStream::new(events.into_iter(), Self::from_move)
    }

    /// Lazily yield the stop events of this variant found in `events`.
    fn stop_stream<'a, I>(events: I) -> DragStream<I::IntoIter, Self>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        DragStream::new(events.into_iter(), Self::from_stop)
    }
}

/// Lazy adapter that filters a global event stream down to one drag variant.
pub struct DragStream<I, D> {
    events: I,
    classify: fn(&Event) -> Option<D>,
    _variant: PhantomData<D>,
}

impl<I, D> DragStream<I, D> {
    fn new(events: I, classify: fn(&Event) -> Option<D>) -> Self {
        Self {
            events,
            classify,
            _variant: PhantomData,
        }
    }
}

impl<I, D> std::fmt::Debug for DragStream<I, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragStream").finish_non_exhaustive()
    }
}

impl<'a, I, D> Iterator for DragStream<I, D>
where
    I: Iterator<Item = &'a Event>,
{
    type Item = D;

    fn next(&mut self) -> Option<D> {
        let classify = self.classify;
        self.events.find_map(classify)
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// A drag event originating from a mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseDrag {
    event: PointerEvent,
}

impl MouseDrag {
    /// Wrap a pointer event.
    #[must_use]
    pub const fn new(event: PointerEvent) -> Self {
        Self { event }
    }

    /// The underlying pointer event.
    #[must_use]
    pub const fn event(&self) -> &PointerEvent {
        &self.event
    }

    fn pointer(event: &Event, kind: PointerEventKind) -> Option<Self> {
        match event {
            Event::Pointer(p) if p.kind == kind => Some(Self::new(*p)),
            _ => None,
        }
    }
}

impl DragSource for MouseDrag {
    const KIND: DragKind = DragKind::Mouse;

    fn from_start(event: &Event) -> Option<Self> {
        Self::pointer(event, PointerEventKind::Down).filter(|m| m.event.button == PointerButton::Primary)
    }

    fn from_move(event: &Event) -> Option<Self> {
        Self::pointer(event, PointerEventKind::Move)
    }

    fn from_stop(event: &Event) -> Option<Self> {
        Self::pointer(event, PointerEventKind::Up)
    }

    fn pointer_x(&self) -> Option<f64> {
        Some(self.event.client_x)
    }
}

// ---------------------------------------------------------------------------
// Touch
// ---------------------------------------------------------------------------

/// A drag event originating from a touch screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchDrag {
    event: TouchEvent,
}

impl TouchDrag {
    /// Wrap a touch event.
    #[must_use]
    pub fn new(event: TouchEvent) -> Self {
        Self { event }
    }

    /// The underlying touch event.
    #[must_use]
    pub fn event(&self) -> &TouchEvent {
        &self.event
    }

    fn touch(event: &Event, accept: impl Fn(TouchEventKind) -> bool) -> Option<Self> {
        match event {
            Event::Touch(t) if accept(t.kind) => Some(Self::new(t.clone())),
            _ => None,
        }
    }
}

impl DragSource for TouchDrag {
    const KIND: DragKind = DragKind::Touch;

    fn from_start(event: &Event) -> Option<Self> {
        Self::touch(event, |k| k == TouchEventKind::Start).filter(|t| t.pointer_x().is_some())
    }

    fn from_move(event: &Event) -> Option<Self> {
        Self::touch(event, |k| k == TouchEventKind::Move)
    }

    // Cancel ends the gesture too; otherwise the session would outlive the fingers.
    fn from_stop(event: &Event) -> Option<Self> {
        Self::touch(event, |k| matches!(k, TouchEventKind::End | TouchEventKind::Cancel))
    }

    fn pointer_x(&self) -> Option<f64> {
        self.event.first().map(|t| t.client_x)
    }
}

// ---------------------------------------------------------------------------
// Tagged union
// ---------------------------------------------------------------------------

/// A drag event of either variant.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Mouse-driven drag event.
    Mouse(MouseDrag),
    /// Touch-driven drag event.
    Touch(TouchDrag),
}

impl DragEvent {
    /// Recognize the start of a drag gesture of any variant.
    #[must_use]
    pub fn start(event: &Event) -> Option<Self> {
        MouseDrag::from_start(event)
            .map(Self::Mouse)
            .or_else(|| TouchDrag::from_start(event).map(Self::Touch))
    }

    /// The variant discriminant.
    #[must_use]
    pub fn kind(&self) -> DragKind {
        match self {
            Self::Mouse(_) => MouseDrag::KIND,
            Self::Touch(_) => TouchDrag::KIND,
        }
    }

    /// Horizontal client position, if the event carries one.
    #[must_use]
    pub fn pointer_x(&self) -> Option<f64> {
        match self {
            Self::Mouse(m) => m.pointer_x(),
            Self::Touch(t) => t.pointer_x(),
        }
    }
}
