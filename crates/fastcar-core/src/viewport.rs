#![forbid(unsafe_code)]

//! The scrollable container the carousel drives.
//!
//! The host owns layout and rendering; the carousel only needs to read the
//! current scroll offset, position it directly and know how wide the
//! container is. Writes are synchronous and immediate: easing happens frame
//! by frame in the animator, never in the host.

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left-to-right scrolling.
    #[default]
    Horizontal,
    /// Top-to-bottom scrolling.
    Vertical,
}

/// Scrollable container collaborator.
pub trait Viewport {
    /// Current scroll offset along `axis`, in pixels from the origin.
    fn measure_offset(&self, axis: Axis) -> f64;

    /// Position the horizontal scroll offset immediately.
    fn scroll_to(&mut self, offset: f64);

    /// Measured inner width of the container, `0.0` before layout.
    fn container_width(&self) -> f64;
}

impl<V: Viewport + ?Sized> Viewport for &mut V {
    fn measure_offset(&self, axis: Axis) -> f64 {
        (**self).measure_offset(axis)
    }

    fn scroll_to(&mut self, offset: f64) {
        (**self).scroll_to(offset);
    }

    fn container_width(&self) -> f64 {
        (**self).container_width()
    }
}

impl<V: Viewport + ?Sized> Viewport for Box<V> {
    fn measure_offset(&self, axis: Axis) -> f64 {
        (**self).measure_offset(axis)
    }

    fn scroll_to(&mut self, offset: f64) {
        (**self).scroll_to(offset);
    }

    fn container_width(&self) -> f64 {
        (**self).container_width()
    }
}

/// In-memory viewport that records every write.
///
/// Mirrors a browser scroll container: when a content width is set, writes
/// are clamped to `[0, content_width - container_width]` like native
/// scrolling.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryViewport {
    offset: f64,
    container_width: f64,
    content_width: Option<f64>,
    writes: Vec<f64>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryViewport {
    /// A viewport with the given container width and unbounded content.
    #[must_use]
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    /// Clamp writes like a container holding `count` slides of `slide_width`.
    #[must_use]
    pub fn with_slides(mut self, count: usize, slide_width: f64) -> Self {
        self.content_width = Some(count as f64 * slide_width);
        self
    }

    /// Change the measured container width (simulates a layout change).
    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    /// Move the offset without recording it (simulates native scrolling).
    pub fn set_offset_silently(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Current offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Every offset written through [`Viewport::scroll_to`], in order.
    #[must_use]
    pub fn writes(&self) -> &[f64] {
        &self.writes
    }

    /// Forget recorded writes.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Viewport for MemoryViewport {
    fn measure_offset(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.offset,
            Axis::Vertical => 0.0,
        }
    }

    fn scroll_to(&mut self, offset: f64) {
        let max = self
            .content_width
            .map_or(f64::INFINITY, |content| (content - self.container_width).max(0.0));
        self.offset = offset.max(0.0).min(max);
        self.writes.push(self.offset);
    }

    fn container_width(&self) -> f64 {
        self.container_width
    }
}
