//! End-to-end mixing queue tests
//!
//! Drives push and pop through the pipeline combinations the queue
//! supports: passthrough per sample type, partial fills with additive
//! mixing, clamping, upmixing, ordering and cross-thread operation.

use mixqueue::{AudioContext, AudioQueue, SampleRate};
use std::sync::Arc;

/// Bind diagnostics to stderr so push-side warnings show up in test output
fn init_diagnostics() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Generate a ramp waveform for predictable verification
fn ramp_f32(samples: usize, step: f32) -> Vec<f32> {
    (0..samples).map(|i| i as f32 * step).collect()
}

/// Root-mean-square of element-wise differences
fn rms_diff(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len());
    let sum: f32 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (sum / a.len() as f32).sqrt()
}

#[test]
fn test_float_stereo_passthrough() {
    init_diagnostics();
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, None);

    let input = ramp_f32(256 * 2, 0.001);
    assert!(queue.push(&ctx, &input, 256));

    let mut output = vec![0.0f32; 256 * 2];
    assert!(queue.pop(&ctx, &mut output, 256));

    assert!(rms_diff(&input, &output) < 1e-6);
}

#[test]
fn test_int16_mono_passthrough() {
    let ctx = AudioContext::new(SampleRate::Sr44100, "Mono").unwrap();
    let queue = AudioQueue::new(ctx, None);

    let input: Vec<i16> = (0..256).map(|i| i * 10).collect();
    assert!(queue.push(&ctx, &input, 256));

    let mut output = vec![0i16; 256];
    assert!(queue.pop(&ctx, &mut output, 256));

    let input_f: Vec<f32> = input.iter().map(|&s| s as f32).collect();
    let output_f: Vec<f32> = output.iter().map(|&s| s as f32).collect();
    assert!(rms_diff(&input_f, &output_f) < 2.0);
}

#[test]
fn test_pop_mixes_instead_of_overwriting() {
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, None);

    // Push only half of what the pop will request
    let input = ramp_f32(64 * 2, 0.001);
    assert!(queue.push(&ctx, &input, 64));

    let mut output = vec![0.1f32; 128 * 2];
    assert!(!queue.pop(&ctx, &mut output, 128));

    // Mixed prefix: existing bus value plus pushed sample, clamped
    for (i, &pushed) in input.iter().enumerate() {
        let expected = (0.1 + pushed).clamp(-1.0, 1.0);
        assert!(
            (output[i] - expected).abs() < 1e-5,
            "sample {i}: expected {expected}, got {}",
            output[i]
        );
    }

    // Tail past the dequeued prefix keeps its original bit patterns
    for (i, &s) in output.iter().enumerate().skip(input.len()) {
        assert_eq!(s, 0.1, "sample {i} should be untouched");
    }
}

#[test]
fn test_mixing_clamps_output() {
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, None);

    // Ramp climbs past the clamp threshold when mixed onto a hot bus
    let input = ramp_f32(64 * 2, 0.02);
    assert!(queue.push(&ctx, &input, 64));

    let mut output = vec![0.5f32; 64 * 2];
    queue.pop(&ctx, &mut output, 64);

    for &s in &output {
        assert!(s <= 1.0, "sample {s} escaped the clamp");
    }
}

#[test]
fn test_mono_to_stereo_upmix_through_queue() {
    let expected = AudioContext::new(SampleRate::Sr44100, "Stereo").unwrap();
    let queue = AudioQueue::new(expected, None);

    let mono_input = AudioContext::new(SampleRate::Sr44100, "Mono").unwrap();
    let input = [0.5f32, -0.25, 0.75, -1.0];
    assert!(queue.push(&mono_input, &input, 4));

    let mut output = vec![0.0f32; 4 * 2];
    assert!(queue.pop(&expected, &mut output, 4));

    let expected_output = [0.5, 0.5, -0.25, -0.25, 0.75, 0.75, -1.0, -1.0];
    for (i, (&got, &want)) in output.iter().zip(expected_output.iter()).enumerate() {
        assert!((got - want).abs() < 1e-6, "sample {i}: {got} vs {want}");
    }
}

#[test]
fn test_push_preserves_sample_order_across_pops() {
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, None);

    let input = ramp_f32(128 * 2, 0.001);
    assert!(queue.push(&ctx, &input, 128));

    // Drain in two pops; the second continues exactly where the first ended
    let mut first = vec![0.0f32; 64 * 2];
    let mut second = vec![0.0f32; 64 * 2];
    assert!(queue.pop(&ctx, &mut first, 64));
    assert!(queue.pop(&ctx, &mut second, 64));

    let drained: Vec<f32> = first.into_iter().chain(second).collect();
    assert!(rms_diff(&input, &drained) < 1e-6);
}

#[test]
fn test_push_rejects_size_mismatch() {
    init_diagnostics();
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, None);

    // 64 stereo frames need 128 samples
    let input = vec![0.0f32; 100];
    assert!(!queue.push(&ctx, &input, 64));
    assert_eq!(queue.occupied(), 0);
}

#[test]
fn test_pop_rejects_wrong_context() {
    let expected = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(expected, None);

    let input = vec![0.25f32; 2 * 32];
    assert!(queue.push(&expected, &input, 32));

    // Wrong rate and wrong layout are both rejected without draining
    let mut output = vec![0.0f32; 2 * 32];
    let wrong_rate = AudioContext::new(SampleRate::Sr44100, "Stereo").unwrap();
    assert!(!queue.pop(&wrong_rate, &mut output, 32));

    let wrong_layout = AudioContext::new(SampleRate::Sr48000, "Mono").unwrap();
    assert!(!queue.pop(&wrong_layout, &mut output, 32));

    assert_eq!(queue.occupied(), 64);
    assert!(output.iter().all(|&s| s == 0.0));
}

#[test]
fn test_saturated_push_reports_drop_count() {
    init_diagnostics();
    // 2 ms of stereo at 48 kHz: 192 slots
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(ctx, Some(2));
    assert_eq!(queue.capacity(), 192);

    let input = ramp_f32(200 * 2, 0.001);
    assert!(!queue.push(&ctx, &input, 200));

    assert_eq!(queue.occupied(), 192);
    assert_eq!(queue.dropped_samples(), 208);

    // The committed prefix is intact and in order
    let mut output = vec![0.0f32; 192];
    assert!(queue.pop(&ctx, &mut output, 96));
    assert!(rms_diff(&input[..192], &output) < 1e-6);
}

#[test]
fn test_resampled_push_lands_near_expected_frame_count() {
    let expected = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(expected, None);

    let input_ctx = AudioContext::new(SampleRate::Sr44100, "Stereo").unwrap();
    let frames = 1024usize;
    let input = ramp_f32(frames * 2, 0.0001);
    assert!(queue.push(&input_ctx, &input, frames));

    // Whole frames only, near frames * (48000 / 44100)
    let occupied = queue.occupied();
    assert_eq!(occupied % 2, 0);

    let expected_samples = (frames as f64 * 48_000.0 / 44_100.0) as usize * 2;
    assert!(
        occupied + 256 >= expected_samples && occupied <= expected_samples + 256,
        "expected ~{expected_samples} samples, got {occupied}"
    );
}

#[test]
fn test_resample_and_downmix_combined() {
    let expected = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = AudioQueue::new(expected, None);

    // 5.1 at 96 kHz halves the rate and folds six channels into two
    let input_ctx = AudioContext::new(SampleRate::Sr96000, "5.1").unwrap();
    let frames = 512usize;
    let input = vec![0.1f32; frames * 6];
    assert!(queue.push(&input_ctx, &input, frames));

    let occupied = queue.occupied();
    assert_eq!(occupied % 2, 0);

    let expected_samples = frames / 2 * 2;
    assert!(
        occupied + 128 >= expected_samples && occupied <= expected_samples + 128,
        "expected ~{expected_samples} samples, got {occupied}"
    );
}

#[test]
fn test_mixed_sample_types_share_one_stream() {
    let ctx = AudioContext::new(SampleRate::Sr48000, "Mono").unwrap();
    let queue = AudioQueue::new(ctx, None);

    // An i16 producer and an f32 producer feed the same ring
    let int_input = vec![16_384i16; 8];
    assert!(queue.push(&ctx, &int_input, 8));

    let float_input = vec![0.25f32; 8];
    assert!(queue.push(&ctx, &float_input, 8));

    let mut output = vec![0.0f32; 16];
    assert!(queue.pop(&ctx, &mut output, 16));

    for &s in &output[..8] {
        assert!((s - 0.5).abs() < 1e-4);
    }
    for &s in &output[8..] {
        assert!((s - 0.25).abs() < 1e-6);
    }
}

#[test]
fn test_cross_thread_producer_consumer() {
    let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
    let queue = Arc::new(AudioQueue::new(ctx, None));

    const BLOCK_FRAMES: usize = 64;
    const BLOCKS: usize = 100;

    let producer = {
        let queue = Arc::clone(&queue);
        std::thread::spawn(move || {
            for block in 0..BLOCKS {
                let base = (block * BLOCK_FRAMES * 2) as f32;
                let input: Vec<f32> = (0..BLOCK_FRAMES * 2)
                    .map(|i| (base + i as f32) * 1e-5)
                    .collect();
                assert!(queue.push(&ctx, &input, BLOCK_FRAMES));
            }
        })
    };

    let mut drained = Vec::with_capacity(BLOCKS * BLOCK_FRAMES * 2);
    while drained.len() < BLOCKS * BLOCK_FRAMES * 2 {
        // Wait until a whole block is buffered so every pop succeeds
        if queue.occupied() < BLOCK_FRAMES * 2 {
            std::thread::yield_now();
            continue;
        }
        let mut output = vec![0.0f32; BLOCK_FRAMES * 2];
        assert!(queue.pop(&ctx, &mut output, BLOCK_FRAMES));
        drained.extend(output);
    }

    producer.join().unwrap();

    for (i, &s) in drained.iter().enumerate() {
        let expected = i as f32 * 1e-5;
        assert!(
            (s - expected).abs() < 1e-6,
            "sample {i}: expected {expected}, got {s}"
        );
    }
}
