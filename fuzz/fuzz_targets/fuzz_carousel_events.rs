#![no_main]

use arbitrary::Arbitrary;
use fastcar_core::event::{Event, KeyCode, KeyEvent, PointerEvent, TouchEvent};
use fastcar_core::viewport::MemoryViewport;
use fastcar_runtime::carousel::{Carousel, CarouselEvent};
use libfuzzer_sys::fuzz_target;
use web_time::{Duration, Instant};

#[derive(Debug, Arbitrary)]
enum Op {
    Down(i16),
    Move(i16),
    Up(i16),
    TouchStart(i16),
    TouchMove(i16),
    TouchEnd,
    TouchCancel,
    ArrowLeft,
    ArrowRight,
    Resize(u16),
    Next,
    Prev,
    GoTo(u8),
    Advance(u8),
}

#[derive(Debug, Arbitrary)]
struct Script {
    count: u8,
    width: u16,
    duration_ms: i16,
    ops: Vec<Op>,
}

fuzz_target!(|script: Script| {
    if script.ops.len() > 512 {
        return;
    }
    let count = usize::from(script.count % 32);
    let width = f64::from(script.width % 2000);

    let Ok(mut carousel) = Carousel::builder()
        .data_source(0..count)
        .viewport(MemoryViewport::new(width).with_slides(count, width))
        .duration_ms(f64::from(script.duration_ms))
        .build()
    else {
        return;
    };

    let t0 = Instant::now();
    let mut now = t0;
    let mut events = Vec::new();
    for op in script.ops {
        let input = match op {
            Op::Down(x) => Some(Event::Pointer(PointerEvent::down(x.into(), 0.0))),
            Op::Move(x) => Some(Event::Pointer(PointerEvent::moved(x.into(), 0.0))),
            Op::Up(x) => Some(Event::Pointer(PointerEvent::up(x.into(), 0.0))),
            Op::TouchStart(x) => Some(Event::Touch(TouchEvent::start(x.into()))),
            Op::TouchMove(x) => Some(Event::Touch(TouchEvent::moved(x.into()))),
            Op::TouchEnd => Some(Event::Touch(TouchEvent::end())),
            Op::TouchCancel => Some(Event::Touch(TouchEvent::cancel())),
            Op::ArrowLeft => Some(Event::Key(KeyEvent::new(KeyCode::ArrowLeft))),
            Op::ArrowRight => Some(Event::Key(KeyEvent::new(KeyCode::ArrowRight))),
            Op::Resize(w) => {
                let width = f64::from(w);
                carousel.viewport_mut().set_container_width(width);
                Some(Event::Resize { width, height: 0.0 })
            }
            Op::Next => {
                carousel.next(now);
                None
            }
            Op::Prev => {
                carousel.prev(now);
                None
            }
            Op::GoTo(i) => {
                carousel.scroll_to_index(usize::from(i), now);
                None
            }
            Op::Advance(ms) => {
                now += Duration::from_millis(u64::from(ms));
                carousel.tick(now);
                None
            }
        };
        if let Some(input) = input {
            carousel.handle_event(&input, now);
        }
        events.extend(carousel.drain_events());

        // Post-conditions that must always hold:
        assert!(count == 0 || carousel.index() < count, "index out of range");
        assert!(!(carousel.is_dragging() && carousel.is_animating()), "two writers");
    }

    // Release any live drag and let everything settle.
    carousel.handle_event(&Event::Pointer(PointerEvent::up(0.0, 0.0)), now);
    carousel.handle_event(&Event::Touch(TouchEvent::end()), now);
    carousel.tick(now + Duration::from_secs(100_000));
    events.extend(carousel.drain_events());

    assert!(!carousel.is_animating(), "queue did not drain");
    for event in &events {
        let CarouselEvent::SlideChanged { index } = *event;
        assert!(index < count, "notified index out of range");
    }
    for &offset in carousel.viewport().writes() {
        assert!(offset.is_finite() && offset >= 0.0, "bad offset {offset}");
    }

    carousel.teardown();
    let writes = carousel.viewport().writes().len();
    carousel.tick(now + Duration::from_secs(200_000));
    assert_eq!(carousel.viewport().writes().len(), writes);
});
