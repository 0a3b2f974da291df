//! Error types for the mixing queue
//!
//! Defines the crate error type using thiserror for clear error propagation.
//! Name-parsing constructors return these directly; the queue's push path
//! renders them into a single diagnostic event before reporting failure to
//! the caller as a boolean.

use crate::audio::AudioContext;
use thiserror::Error;

/// Main error type for the mixing queue crate
#[derive(Error, Debug)]
pub enum Error {
    /// Unrecognized channel layout name
    #[error("invalid channel layout name: {0:?}")]
    InvalidChannelName(String),

    /// Unrecognized sample rate name
    #[error("invalid sample rate name: {0:?}")]
    InvalidRateName(String),

    /// Consumer requested a context other than the queue's expected context
    #[error("output context mismatch: expected {expected}, got {actual}")]
    ContextMismatch {
        expected: AudioContext,
        actual: AudioContext,
    },

    /// Input slice length inconsistent with frame count times channel count
    #[error("input size mismatch: expected {expected} samples, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Resampler construction or processing failure
    #[error("resampling failed: {0}")]
    ResampleFailed(String),

    /// At least one sample could not be enqueued; the prefix before
    /// saturation remains committed
    #[error("queue full: dropped {dropped} samples")]
    QueueFull { dropped: usize },
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;
