//! The audio mixing queue
//!
//! Accepts pushes of interleaved audio in any supported context, normalizes
//! them to the queue's expected context (normalized f32 at the expected
//! rate and layout) and stores them in a flat lock-free ring. The consumer
//! drains the ring by additive mixing into its own buffer, treating that
//! buffer as a pre-existing bus.
//!
//! # Thread Safety
//!
//! The ring is split into producer and consumer halves at construction.
//! Each half sits behind a Mutex so both operations take `&self` and the
//! queue can be shared by reference across threads:
//! - the producer mutex serializes concurrent pushers (the ring itself is
//!   single-producer),
//! - the consumer mutex belongs to the one consumer thread and is never
//!   contended; it is held only for the drain loop.
//!
//! Fill level and drop statistics are relaxed atomics; the ring's own
//! acquire/release ordering publishes sample data between threads.
//!
//! # Real-time constraints
//!
//! The push path may allocate and log; it runs on producer threads. The
//! pop path allocates nothing after construction (it converts through a
//! preallocated scratch in chunks), never blocks on the producer side and
//! emits no diagnostics.

use crate::audio::context::AudioContext;
use crate::audio::mixdown;
use crate::audio::resampler::Resampler;
use crate::audio::sample::Sample;
use crate::error::{Error, Result};
use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Default queue capacity expressed as buffered latency
pub const DEFAULT_LATENCY_MS: u32 = 200;

/// Frames converted per scratch pass on the pop path
const POP_CHUNK_FRAMES: usize = 1024;

/// Consumer half of the ring plus its preallocated conversion scratch
struct PopState {
    cons: HeapCons<f32>,
    scratch: Vec<f32>,
}

/// Snapshot of queue counters for monitoring and tests
#[derive(Debug, Clone, Copy)]
pub struct QueueStats {
    /// Ring capacity in f32 slots
    pub capacity: usize,

    /// Currently buffered f32 slots
    pub occupied: usize,

    /// Cumulative samples dropped by saturated pushes
    pub dropped_samples: u64,
}

/// Real-time audio mixing queue.
///
/// One queue serves N producers and exactly one consumer. Producers push
/// audio in their own context (rate, layout, sample type); the queue
/// converts everything to the expected context on the way in. The consumer
/// pops in the expected context only and receives the ring content mixed
/// additively into its buffer with a hard clamp to [-1.0, +1.0].
///
/// The queue is not cloneable; share it by reference (`&AudioQueue` or
/// `Arc<AudioQueue>`). The ring storage is heap-backed, so moving the
/// owning value never invalidates the halves.
pub struct AudioQueue {
    /// Output context fixed at construction
    expected: AudioContext,

    /// Ring capacity in f32 slots
    capacity: usize,

    /// Producer half; the mutex is the multi-producer serialization point
    prod: Mutex<HeapProd<f32>>,

    /// Consumer half with scratch; uncontended under the one-consumer rule
    cons: Mutex<PopState>,

    /// Buffered sample count (statistics only)
    fill_level: AtomicUsize,

    /// Total samples dropped by saturated pushes
    dropped_samples: AtomicU64,
}

impl AudioQueue {
    /// Create a queue for the given output context.
    ///
    /// # Arguments
    /// * `expected` - Context every pop must match; pushes are converted to it
    /// * `latency_ms` - Buffered latency determining ring capacity
    ///   (default: 200 ms)
    ///
    /// Capacity is `channels * rate_hz * latency_ms / 1000` f32 slots.
    pub fn new(expected: AudioContext, latency_ms: Option<u32>) -> Self {
        let latency_ms = latency_ms.unwrap_or(DEFAULT_LATENCY_MS);
        let capacity =
            expected.channels() * expected.rate_hz() as usize * latency_ms as usize / 1000;

        debug!(
            "Creating audio queue: {} ({} f32 slots, {} ms latency)",
            expected, capacity, latency_ms
        );

        let rb = HeapRb::<f32>::new(capacity);
        let (prod, cons) = rb.split();

        let scratch = vec![0.0f32; POP_CHUNK_FRAMES * expected.channels()];

        Self {
            expected,
            capacity,
            prod: Mutex::new(prod),
            cons: Mutex::new(PopState { cons, scratch }),
            fill_level: AtomicUsize::new(0),
            dropped_samples: AtomicU64::new(0),
        }
    }

    /// Context every pop must match
    pub fn expected_context(&self) -> AudioContext {
        self.expected
    }

    /// Ring capacity in f32 slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Currently buffered f32 slots (statistics; may lag the ring briefly)
    pub fn occupied(&self) -> usize {
        self.fill_level.load(Ordering::Relaxed)
    }

    /// Cumulative samples dropped by saturated pushes
    pub fn dropped_samples(&self) -> u64 {
        self.dropped_samples.load(Ordering::Relaxed)
    }

    /// Snapshot of the queue counters
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            capacity: self.capacity,
            occupied: self.occupied(),
            dropped_samples: self.dropped_samples(),
        }
    }

    /// Verify a consumer context against the queue.
    ///
    /// `pop` performs the same check silently on every call; consumers can
    /// run this once at setup to get the mismatch as a typed error instead.
    pub fn check_output_context(&self, output_ctx: &AudioContext) -> Result<()> {
        if *output_ctx != self.expected {
            return Err(Error::ContextMismatch {
                expected: self.expected,
                actual: *output_ctx,
            });
        }
        Ok(())
    }

    /// Push a block of interleaved audio into the queue.
    ///
    /// The block is normalized to f32, resampled when the input rate
    /// differs from the expected rate, remapped when the layout differs,
    /// then enqueued sample by sample. A full ring drops the remainder but
    /// keeps the committed prefix.
    ///
    /// # Arguments
    /// * `input_ctx` - Context describing `data`
    /// * `data` - Interleaved samples, `frame_count * input channels` long
    /// * `frame_count` - Number of frames in `data`
    ///
    /// # Returns
    /// `true` when every converted sample was enqueued. `false` (after one
    /// warn event) on a size mismatch, a resampler failure, or a partial
    /// commit caused by a full ring; `dropped_samples` records the latter.
    pub fn push<T: Sample>(&self, input_ctx: &AudioContext, data: &[T], frame_count: usize) -> bool {
        match self.push_inner(input_ctx, data, frame_count) {
            Ok(()) => true,
            Err(err) => {
                warn!("audio queue push failed: {}", err);
                false
            }
        }
    }

    fn push_inner<T: Sample>(
        &self,
        input_ctx: &AudioContext,
        data: &[T],
        frame_count: usize,
    ) -> Result<()> {
        let input_channels = input_ctx.channels();
        let expected_len = frame_count * input_channels;
        if data.len() != expected_len {
            return Err(Error::SizeMismatch {
                expected: expected_len,
                actual: data.len(),
            });
        }

        // Normalize the caller's sample type
        let mut samples: Vec<f32> = data.iter().map(|s| s.to_float()).collect();

        if let Some(ratio) = self.expected.needs_resample(input_ctx) {
            samples = Resampler::resample(&samples, frame_count, input_channels, ratio)?;
        }

        if let Some(matrix) = self.expected.needs_remap(input_ctx) {
            samples = mixdown::remap(&samples, input_channels, &matrix);
        }

        // Enqueue everything that fits. Drops are counted rather than
        // aborting so the committed prefix stays contiguous and ordered.
        let mut dropped = 0usize;
        {
            let mut prod = self.prod.lock().unwrap();
            for &sample in &samples {
                if prod.try_push(sample).is_err() {
                    dropped += 1;
                }
            }
        }

        let enqueued = samples.len() - dropped;
        self.fill_level.fetch_add(enqueued, Ordering::Relaxed);

        if dropped > 0 {
            self.dropped_samples
                .fetch_add(dropped as u64, Ordering::Relaxed);
            return Err(Error::QueueFull { dropped });
        }

        Ok(())
    }

    /// Mix buffered audio into the caller's buffer.
    ///
    /// Treats `buffer` as a live bus: each dequeued sample is added to the
    /// corresponding slot and the sum is clamped to [-1.0, +1.0]. Slots
    /// past the last dequeued sample are left untouched. An empty ring is
    /// a normal condition, not an error.
    ///
    /// Real-time safe: no allocation, no logging, no waiting on producers.
    ///
    /// # Arguments
    /// * `output_ctx` - Must equal the queue's expected context; requesting
    ///   a conversion on the consumer path is rejected
    /// * `buffer` - Interleaved samples, at least `frame_count * channels`
    ///   long
    /// * `frame_count` - Frames to fill
    ///
    /// # Returns
    /// `true` when the full request was satisfied, `false` on a context
    /// mismatch, an undersized buffer, or ring underflow.
    pub fn pop<T: Sample>(
        &self,
        output_ctx: &AudioContext,
        buffer: &mut [T],
        frame_count: usize,
    ) -> bool {
        if self.check_output_context(output_ctx).is_err() {
            return false;
        }

        let total_samples = frame_count * self.expected.channels();
        if buffer.len() < total_samples {
            return false;
        }

        let mut state = self.cons.lock().unwrap();
        let PopState { cons, scratch } = &mut *state;

        let mut done = 0usize;
        while done < total_samples {
            let chunk = (total_samples - done).min(scratch.len());

            for (slot, sample) in scratch[..chunk].iter_mut().zip(&buffer[done..done + chunk]) {
                *slot = sample.to_float();
            }

            let mut popped = 0usize;
            while popped < chunk {
                match cons.try_pop() {
                    Some(sample) => {
                        scratch[popped] = (scratch[popped] + sample).clamp(-1.0, 1.0);
                        popped += 1;
                    }
                    None => break,
                }
            }

            // Write back only the mixed prefix; the tail keeps the
            // caller's original bit patterns
            for (sample, slot) in buffer[done..done + popped].iter_mut().zip(&scratch[..popped]) {
                *sample = T::from_float(*slot);
            }

            done += popped;
            if popped < chunk {
                break;
            }
        }

        drop(state);
        // Saturate instead of wrapping: the producer publishes samples to
        // the ring before its counter update lands, so a pop can briefly
        // observe more ring content than the counter reports
        let _ = self
            .fill_level
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |level| {
                Some(level.saturating_sub(done))
            });

        done == total_samples
    }
}
