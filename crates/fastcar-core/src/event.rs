#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The carousel consumes host input through these types only. The host maps
//! its native pointer, touch, keyboard and window signals onto [`Event`] and
//! feeds them to the runtime.
//!
//! # Design Notes
//!
//! - Coordinates are client-space pixels as `f64` (fractional on HiDPI).
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish it.
//! - `Modifiers` use bitflags for easy combination.
//! - `TouchEvent::touches` holds the touch points still active on the target,
//!   so it is usually empty for `End` and `Cancel`.

use bitflags::bitflags;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A mouse/pointer event.
    Pointer(PointerEvent),

    /// A touch event.
    Touch(TouchEvent),

    /// A keyboard event.
    Key(KeyEvent),

    /// The host window was resized.
    Resize {
        /// New window width in pixels.
        width: f64,
        /// New window height in pixels.
        height: f64,
    },
}

/// A pointer (mouse) event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// Horizontal client coordinate.
    pub client_x: f64,
    /// Vertical client coordinate.
    pub client_y: f64,
    /// Button involved in the event (`Primary` for plain moves).
    pub button: PointerButton,
}

impl PointerEvent {
    /// Create a pointer event with the primary button.
    #[must_use]
    pub const fn new(kind: PointerEventKind, client_x: f64, client_y: f64) -> Self {
        Self {
            kind,
            client_x,
            client_y,
            button: PointerButton::Primary,
        }
    }

    /// Primary button pressed at `(x, y)`.
    #[must_use]
    pub const fn down(client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Down, client_x, client_y)
    }

    /// Pointer moved to `(x, y)`.
    #[must_use]
    pub const fn moved(client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Move, client_x, client_y)
    }

    /// Primary button released at `(x, y)`.
    #[must_use]
    pub const fn up(client_x: f64, client_y: f64) -> Self {
        Self::new(PointerEventKind::Up, client_x, client_y)
    }

    /// Replace the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }
}

/// Pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released.
    Up,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Left button on a right-handed mouse.
    #[default]
    Primary,
    /// Right button.
    Secondary,
    /// Middle button / wheel click.
    Middle,
}

/// A touch event.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    /// What happened.
    pub kind: TouchEventKind,
    /// Touch points still active on the target, in host order.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a touch event.
    #[must_use]
    pub fn new(kind: TouchEventKind, touches: Vec<TouchPoint>) -> Self {
        Self { kind, touches }
    }

    /// Single finger touching down at `x`.
    #[must_use]
    pub fn start(client_x: f64) -> Self {
        Self::new(TouchEventKind::Start, vec![TouchPoint::new(0, client_x, 0.0)])
    }

    /// Single finger moved to `x`.
    #[must_use]
    pub fn moved(client_x: f64) -> Self {
        Self::new(TouchEventKind::Move, vec![TouchPoint::new(0, client_x, 0.0)])
    }

    /// All fingers lifted.
    #[must_use]
    pub fn end() -> Self {
        Self::new(TouchEventKind::End, Vec::new())
    }

    /// The host cancelled the touch sequence.
    #[must_use]
    pub fn cancel() -> Self {
        Self::new(TouchEventKind::Cancel, Vec::new())
    }

    /// First active touch point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// Touch event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventKind {
    /// A finger touched the surface.
    Start,
    /// A finger moved.
    Move,
    /// A finger was lifted.
    End,
    /// The host aborted the touch sequence.
    Cancel,
}

/// One touch contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Host-assigned identifier, stable for the life of the contact.
    pub id: u32,
    /// Horizontal client coordinate.
    pub client_x: f64,
    /// Vertical client coordinate.
    pub client_y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(id: u32, client_x: f64, client_y: f64) -> Self {
        Self {
            id,
            client_x,
            client_y,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is a key-down (press or auto-repeat).
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

/// Key codes the carousel distinguishes. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Left arrow key.
    ArrowLeft,
    /// Right arrow key.
    ArrowRight,
    /// Up arrow key.
    ArrowUp,
    /// Down arrow key.
    ArrowDown,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Tab key.
    Tab,
    /// Any other key.
    Other,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<TouchEvent> for Event {
    fn from(event: TouchEvent) -> Self {
        Self::Touch(event)
    }
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}
