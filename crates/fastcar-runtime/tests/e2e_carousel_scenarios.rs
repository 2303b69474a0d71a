#![forbid(unsafe_code)]

//! End-to-end carousel scenarios driven through `handle_event` and `tick`.
//!
//! Each test scripts host input against a `MemoryViewport` and checks the
//! offsets written and the `SlideChanged` notifications emitted.
//!
//! Run:
//!   cargo test -p fastcar-runtime --test e2e_carousel_scenarios

use fastcar_core::animation::frame_interval;
use fastcar_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, PointerEvent, TouchEvent};
use fastcar_core::viewport::MemoryViewport;
use fastcar_runtime::carousel::{Carousel, CarouselEvent};
use fastcar_runtime::config::CarouselConfig;
use fastcar_runtime::slide_machine::SlideState;
use web_time::{Duration, Instant};

const WIDTH: f64 = 200.0;

fn carousel(count: usize) -> Carousel<usize, MemoryViewport> {
    Carousel::builder()
        .data_source(0..count)
        .viewport(MemoryViewport::new(WIDTH).with_slides(count, WIDTH))
        .build()
        .unwrap()
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn down(x: f64) -> Event {
    Event::Pointer(PointerEvent::down(x, 0.0))
}

fn moved(x: f64) -> Event {
    Event::Pointer(PointerEvent::moved(x, 0.0))
}

fn up(x: f64) -> Event {
    Event::Pointer(PointerEvent::up(x, 0.0))
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

fn changed(index: usize) -> CarouselEvent {
    CarouselEvent::SlideChanged { index }
}

/// Park the carousel on `index` without animation, then forget the writes.
fn park(c: &mut Carousel<usize, MemoryViewport>, index: usize, t0: Instant) {
    c.scroll_to_index(index, t0);
    c.tick(t0 + Duration::from_secs(1));
    let _ = c.drain_events();
    c.viewport_mut().clear_writes();
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn rapid_next_calls_complete_in_order() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    for _ in 0..5 {
        assert!(c.next(t0));
    }
    assert_eq!(c.index(), 0);

    for k in 1..=45u32 {
        c.tick(t0 + frame_interval() * k);
    }
    assert_eq!(
        c.drain_events(),
        vec![changed(1), changed(2), changed(3), changed(4), changed(5)]
    );
    let writes = c.viewport().writes();
    assert_eq!(writes.len(), 1 + 45, "initial snap plus 9 frames per transition");
    for pair in writes[1..].windows(2) {
        assert!(pair[1] > pair[0], "writes overlapped: {pair:?}");
    }
    assert_eq!(c.viewport().offset(), 1000.0);
}

#[test]
fn index_only_moves_when_a_transition_completes() {
    let t0 = Instant::now();
    let mut c = carousel(3);
    c.next(t0);
    c.tick(t0 + frame_interval() * 8);
    assert_eq!(c.index(), 0);
    assert_eq!(c.state(), SlideState::Transitioning { index: 0, target: 1 });
    assert!(c.drain_events().is_empty());
    c.tick(t0 + frame_interval() * 9);
    assert_eq!(c.index(), 1);
    assert_eq!(c.drain_events(), vec![changed(1)]);
}

#[test]
fn request_after_overdue_completion_still_animates() {
    let t0 = Instant::now();
    let mut c = carousel(5);
    c.next(t0);
    c.tick(t0 + frame_interval() * 8);
    assert!(c.drain_events().is_empty());

    // The first transition finished at 9 intervals but nobody ticked since.
    let t1 = t0 + ms(500);
    assert!(c.next(t1));
    assert_eq!(c.drain_events(), vec![changed(1)]);
    assert!(c.is_animating());
    assert_eq!(c.viewport().writes().len(), 1 + 9);
    assert_eq!(c.viewport().offset(), 200.0);

    for k in 1..=8u32 {
        c.tick(t1 + frame_interval() * k);
        assert_eq!(c.viewport().writes().len(), 10 + k as usize);
        assert_eq!(c.index(), 1);
    }
    c.tick(t1 + frame_interval() * 9);
    assert_eq!(c.drain_events(), vec![changed(2)]);
    assert_eq!(c.viewport().writes().len(), 1 + 18);
    assert_eq!(c.viewport().offset(), 400.0);
}

#[test]
fn boundaries_emit_nothing() {
    let t0 = Instant::now();
    let mut c = carousel(2);
    assert!(!c.prev(t0));
    park(&mut c, 1, t0);
    assert!(!c.next(t0));
    c.tick(t0 + Duration::from_secs(5));
    assert!(c.drain_events().is_empty());
    assert!(c.viewport().writes().is_empty());
}

#[test]
fn zero_duration_completes_instantly() {
    let t0 = Instant::now();
    let mut c = Carousel::builder()
        .data_source(0..4)
        .viewport(MemoryViewport::new(WIDTH))
        .config(CarouselConfig {
            duration_ms: 0.0,
            ..CarouselConfig::default()
        })
        .build()
        .unwrap();
    assert!(c.next(t0));
    assert_eq!(c.drain_events(), vec![changed(1)]);
    assert_eq!(c.viewport().offset(), WIDTH);
    assert!(!c.needs_tick());
}

#[test]
fn negative_duration_completes_instantly() {
    let t0 = Instant::now();
    let mut c = Carousel::builder()
        .data_source(0..4)
        .viewport(MemoryViewport::new(WIDTH))
        .duration_ms(-30.0)
        .build()
        .unwrap();
    assert!(!c.prev(t0));
    assert!(c.scroll_to_index(3, t0));
    assert_eq!(c.drain_events(), vec![changed(3)]);
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn arrow_keys_navigate_at_most_once_per_window() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    // Admitted at 0 ms and 160 ms only.
    for k in 0..10 {
        c.handle_event(&key(KeyCode::ArrowRight), t0 + ms(k * 20));
    }
    c.tick(t0 + Duration::from_secs(2));
    assert_eq!(c.drain_events(), vec![changed(1), changed(2)]);
}

#[test]
fn key_release_and_other_keys_are_ignored() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.handle_event(
        &Event::Key(KeyEvent::new(KeyCode::ArrowRight).with_kind(KeyEventKind::Release)),
        t0,
    );
    c.handle_event(&key(KeyCode::Char('l')), t0);
    assert!(!c.is_animating());
    c.handle_event(&key(KeyCode::ArrowLeft), t0);
    assert!(!c.is_animating(), "prev at slide 0 is a no-op");
}

// ============================================================================
// Drag
// ============================================================================

#[test]
fn drag_left_past_half_snaps_to_next_slide() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    assert_eq!(c.viewport().offset(), 400.0);

    c.handle_event(&down(500.0), t0);
    c.handle_event(&moved(250.0), t0 + ms(20));
    assert_eq!(c.viewport().offset(), 600.0);
    c.handle_event(&up(250.0), t0 + ms(30));
    assert!(!c.is_dragging());

    c.tick(t0 + ms(30) + Duration::from_secs(1));
    assert_eq!(c.drain_events(), vec![changed(3)]);
    assert_eq!(c.index(), 3);
    assert_eq!(c.viewport().offset(), 600.0);
}

#[test]
fn small_drag_right_snaps_to_previous_slide() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    c.handle_event(&down(500.0), t0);
    c.handle_event(&moved(530.0), t0 + ms(20));
    assert_eq!(c.viewport().offset(), 370.0);
    c.handle_event(&up(530.0), t0 + ms(30));
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.drain_events(), vec![changed(1)]);
    assert_eq!(c.viewport().offset(), 200.0);
}

#[test]
fn tap_does_not_navigate() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    c.handle_event(&down(500.0), t0);
    c.handle_event(&up(500.0), t0 + ms(50));
    c.tick(t0 + Duration::from_secs(1));
    assert!(c.drain_events().is_empty());
    assert!(c.viewport().writes().is_empty());
    assert_eq!(c.index(), 2);
}

#[test]
fn drag_start_cancels_in_flight_transition() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.next(t0);
    c.next(t0);
    c.tick(t0 + frame_interval() * 4);
    let writes_before = c.viewport().writes().len();

    c.handle_event(&down(300.0), t0 + frame_interval() * 4);
    assert!(!c.is_animating());
    c.tick(t0 + Duration::from_secs(2));
    assert_eq!(c.viewport().writes().len(), writes_before);
    assert!(c.drain_events().is_empty());
    assert_eq!(c.index(), 0);
}

#[test]
fn drag_after_cancel_settles_back_onto_committed_slide() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.next(t0);
    c.tick(t0 + frame_interval() * 4);
    let mid = c.viewport().offset();
    assert!(mid > 0.0 && mid < WIDTH);

    // Pull right from the mid-transition offset: the neighbour in that
    // direction is out of range, the offset is misaligned, snap back to 0.
    c.handle_event(&down(300.0), t0 + frame_interval() * 4);
    c.handle_event(&moved(320.0), t0 + frame_interval() * 5);
    c.handle_event(&up(320.0), t0 + frame_interval() * 6);
    c.tick(t0 + Duration::from_secs(2));
    assert_eq!(c.drain_events(), vec![changed(0)]);
    assert_eq!(c.viewport().offset(), 0.0);
}

#[test]
fn navigation_during_drag_is_dropped() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.handle_event(&down(300.0), t0);
    assert!(!c.next(t0));
    c.handle_event(&key(KeyCode::ArrowRight), t0);
    c.handle_event(&up(300.0), t0 + ms(10));
    c.tick(t0 + Duration::from_secs(1));
    assert!(c.drain_events().is_empty());
    // The keyboard window was not consumed while dragging.
    c.handle_event(&key(KeyCode::ArrowRight), t0 + ms(20));
    assert!(c.is_animating());
}

#[test]
fn touch_drag_snaps_like_mouse() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 1, t0);
    c.handle_event(&Event::Touch(TouchEvent::start(400.0)), t0);
    // Mouse moves never leak into a touch gesture.
    c.handle_event(&moved(0.0), t0 + ms(15));
    assert!(c.viewport().writes().is_empty());
    c.handle_event(&Event::Touch(TouchEvent::moved(300.0)), t0 + ms(30));
    assert_eq!(c.viewport().offset(), 300.0);
    c.handle_event(&Event::Touch(TouchEvent::end()), t0 + ms(40));
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.drain_events(), vec![changed(2)]);
}

#[test]
fn touch_cancel_ends_the_gesture() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.handle_event(&Event::Touch(TouchEvent::start(400.0)), t0);
    assert!(c.is_dragging());
    c.handle_event(&Event::Touch(TouchEvent::cancel()), t0 + ms(5));
    assert!(!c.is_dragging());
}

#[test]
fn touch_start_supersedes_live_mouse_drag() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    c.handle_event(&down(500.0), t0);
    c.handle_event(&moved(450.0), t0 + ms(20));
    assert_eq!(c.viewport().offset(), 450.0);

    // The new session anchors on the offset and pointer at its own start.
    c.handle_event(&Event::Touch(TouchEvent::start(300.0)), t0 + ms(30));
    assert!(c.is_dragging());
    c.handle_event(&moved(0.0), t0 + ms(45));
    assert_eq!(c.viewport().offset(), 450.0);
    c.handle_event(&Event::Touch(TouchEvent::moved(100.0)), t0 + ms(50));
    // 450 + 200 lies inside [250, 650]; the first session would clamp at 600.
    assert_eq!(c.viewport().offset(), 650.0);

    c.handle_event(&Event::Touch(TouchEvent::end()), t0 + ms(60));
    c.handle_event(&up(0.0), t0 + ms(70));
    assert!(!c.is_dragging());
    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.drain_events(), vec![changed(3)]);
    assert_eq!(c.viewport().offset(), 600.0);
}

#[test]
fn second_mouse_down_discards_earlier_moves() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    c.handle_event(&down(500.0), t0);
    c.handle_event(&moved(450.0), t0 + ms(20));
    c.handle_event(&down(300.0), t0 + ms(30));
    // No move in the replacing session: releasing it is a tap.
    c.handle_event(&up(300.0), t0 + ms(40));
    c.tick(t0 + Duration::from_secs(1));
    assert!(c.drain_events().is_empty());
    assert_eq!(c.viewport().writes(), &[450.0]);
    assert_eq!(c.index(), 2);
}

#[test]
fn drag_moves_are_throttled() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    park(&mut c, 2, t0);
    c.handle_event(&down(500.0), t0);
    c.handle_event(&moved(490.0), t0 + ms(1));
    c.handle_event(&moved(480.0), t0 + ms(5));
    c.handle_event(&moved(470.0), t0 + ms(11));
    assert_eq!(c.viewport().writes(), &[410.0, 430.0]);
}

// ============================================================================
// Resize and teardown
// ============================================================================

#[test]
fn resize_is_debounced_and_resnaps() {
    let t0 = Instant::now();
    let mut c = Carousel::builder()
        .data_source(0..5)
        .viewport(MemoryViewport::new(WIDTH))
        .build()
        .unwrap();
    park(&mut c, 2, t0);

    c.viewport_mut().set_container_width(300.0);
    let resize = Event::Resize {
        width: 300.0,
        height: 100.0,
    };
    c.handle_event(&resize, t0);
    c.handle_event(&resize, t0 + ms(30));
    assert!(c.needs_tick());
    c.tick(t0 + ms(60));
    assert_eq!(c.slide_width(), WIDTH, "still inside the quiet period");
    c.tick(t0 + ms(80));
    assert_eq!(c.slide_width(), 300.0);
    assert_eq!(c.viewport().writes(), &[600.0]);
    assert!(c.drain_events().is_empty());
    assert!(!c.needs_tick());
}

#[test]
fn resize_during_transition_resnaps_after_it_drains() {
    let t0 = Instant::now();
    let mut c = Carousel::builder()
        .data_source(0..5)
        .viewport(MemoryViewport::new(WIDTH))
        .build()
        .unwrap();
    c.next(t0);
    c.viewport_mut().set_container_width(250.0);
    c.handle_event(&Event::Resize { width: 250.0, height: 0.0 }, t0);
    c.tick(t0 + ms(60));
    assert_eq!(c.slide_width(), 250.0);
    assert!(c.is_animating());
    assert!(c.needs_tick());

    c.tick(t0 + Duration::from_secs(1));
    assert_eq!(c.drain_events(), vec![changed(1)]);
    assert_eq!(c.viewport().offset(), 250.0);
}

#[test]
fn fixed_width_ignores_container_resize() {
    let t0 = Instant::now();
    let mut c = Carousel::builder()
        .data_source(0..5)
        .viewport(MemoryViewport::new(WIDTH))
        .width(120.0)
        .build()
        .unwrap();
    c.viewport_mut().set_container_width(999.0);
    c.handle_event(&Event::Resize { width: 999.0, height: 0.0 }, t0);
    c.tick(t0 + ms(100));
    assert_eq!(c.slide_width(), 120.0);
}

#[test]
fn teardown_releases_everything() {
    let t0 = Instant::now();
    let mut c = carousel(10);
    c.next(t0);
    c.handle_event(&Event::Resize { width: 1.0, height: 1.0 }, t0);
    c.tick(t0 + frame_interval() * 2);
    c.teardown();
    assert!(!c.needs_tick());
    assert_eq!(c.next_deadline(), None);

    let writes = c.viewport().writes().len();
    c.handle_event(&down(10.0), t0);
    c.handle_event(&moved(0.0), t0 + ms(20));
    c.handle_event(&key(KeyCode::ArrowRight), t0 + ms(40));
    c.tick(t0 + Duration::from_secs(5));
    assert_eq!(c.viewport().writes().len(), writes);
    assert!(c.drain_events().is_empty());
    assert!(!c.is_dragging());
}
