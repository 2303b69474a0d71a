#![no_main]

use fastcar_core::animation::{FrameSequence, TransitionRequest, total_frames};
use fastcar_core::geometry::clamp_offset;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (f64, f64, f64, f64)| {
    let (source, target, duration_ms, width) = input;
    if !(source.is_finite() && target.is_finite() && width.is_finite()) {
        return;
    }
    // Cap the duration to keep fuzzing fast (10 s is 600 frames).
    if duration_ms.abs() > 10_000.0 {
        return;
    }

    let request = TransitionRequest::new(source, target, 1);
    let frames: Vec<_> = FrameSequence::new(request, duration_ms).collect();

    // Post-conditions that must always hold:
    assert_eq!(frames.len(), total_frames(duration_ms).max(1) as usize);
    let last = frames.last().expect("at least one frame");
    assert_eq!(last.fraction_complete, 1.0);
    assert_eq!(last.offset, target);
    for pair in frames.windows(2) {
        assert!(pair[1].fraction_complete > pair[0].fraction_complete);
        assert_eq!(pair[1].frame_index, pair[0].frame_index + 1);
    }

    let clamped = clamp_offset(source, source - width, source + width);
    assert!(clamped >= 0.0 || source + width < 0.0);
});
