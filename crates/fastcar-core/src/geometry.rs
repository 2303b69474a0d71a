#![forbid(unsafe_code)]

//! Slide geometry: clamping and slide-width arithmetic.
//!
//! All offsets are horizontal scroll positions in pixels. Slides have a
//! uniform width, so slide `i` starts at `i * width`.

/// Clamp a scroll offset into `[min, max]`.
///
/// A negative lower bound is raised to zero first: the viewport never scrolls
/// before its origin, whatever the caller computed.
#[inline]
#[must_use]
pub fn clamp_offset(value: f64, min: f64, max: f64) -> f64 {
    let min = if min < 0.0 { 0.0 } else { min };
    value.max(min).min(max)
}

/// Resolve the effective slide width.
///
/// A configured width always wins; otherwise the measured container width is
/// used. An unmeasured container yields `0.0`, which collapses every slide
/// onto the origin instead of failing.
#[inline]
#[must_use]
pub fn resolve_slide_width(configured: Option<f64>, measured: f64) -> f64 {
    match configured {
        Some(width) => width,
        None if measured.is_finite() && measured > 0.0 => measured,
        None => 0.0,
    }
}

/// Scroll offset at which slide `index` starts.
#[inline]
#[must_use]
pub fn slide_offset(index: usize, width: f64) -> f64 {
    index as f64 * width
}

/// Whether `offset` sits exactly on a slide boundary.
///
/// Zero width is never aligned (`x % 0` is `NaN`), so a drag over a
/// collapsed carousel always resolves through a snap.
#[inline]
#[must_use]
pub fn is_aligned(offset: f64, width: f64) -> bool {
    offset % width == 0.0
}

/// Range of slide indices within `overscan` of `index`, bounded by `count`.
#[must_use]
pub fn window_around(index: usize, overscan: usize, count: usize) -> std::ops::Range<usize> {
    if count == 0 {
        return 0..0;
    }
    let start = index.saturating_sub(overscan).min(count - 1);
    let end = index.saturating_add(overscan).saturating_add(1).min(count);
    start..end
}
