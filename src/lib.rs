//! # mixqueue
//!
//! Real-time audio mixing queue: N producers push interleaved audio in
//! whatever context they have (sample rate, channel layout, sample type);
//! one consumer pops a uniform stream and receives it mixed additively
//! into its own buffer.
//!
//! **Architecture:** push path (sample normalization, sinc resampling,
//! channel remap, lock-free enqueue) feeding a flat normalized-f32 ring;
//! pop path (lock-free dequeue, additive mix with hard clamp,
//! denormalization) built for an audio callback: no allocation, no
//! blocking, no logging.
//!
//! ```
//! use mixqueue::{AudioContext, AudioQueue, SampleRate};
//!
//! let ctx = AudioContext::new(SampleRate::Sr48000, "Stereo").unwrap();
//! let queue = AudioQueue::new(ctx, None);
//!
//! let input = vec![0.25f32; 2 * 128];
//! assert!(queue.push(&ctx, &input, 128));
//!
//! let mut out = vec![0.0f32; 2 * 128];
//! assert!(queue.pop(&ctx, &mut out, 128));
//! assert_eq!(out[0], 0.25);
//! ```

pub mod audio;
pub mod error;
pub mod queue;

pub use audio::{
    make_converters, AudioContext, ChannelLayout, ChannelMatrix, Resampler, Sample, SampleRate,
};
pub use error::{Error, Result};
pub use queue::{AudioQueue, QueueStats, DEFAULT_LATENCY_MS};
