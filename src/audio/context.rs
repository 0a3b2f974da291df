//! Audio context: a sample rate paired with a channel layout
//!
//! The context is the unit of format negotiation. The queue fixes one
//! expected context at construction; every push compares its input context
//! against it to decide which conversion stages run.

use crate::audio::layout::{ChannelLayout, ChannelMatrix};
use crate::audio::rate::SampleRate;
use crate::error::Result;
use std::fmt;

/// A (rate, layout) pair identifying one audio stream format.
///
/// Value type with structural equality. Two equal contexts never need
/// conversion between each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioContext {
    pub rate: SampleRate,
    pub layout: ChannelLayout,
}

impl AudioContext {
    /// Build a context from a parsed rate and a layout name.
    ///
    /// # Errors
    /// `Error::InvalidChannelName` when the layout name is not one of
    /// `"Mono"`, `"Stereo"`, `"5.1"`, `"7.1"`.
    pub fn new(rate: SampleRate, layout_name: &str) -> Result<Self> {
        Ok(Self {
            rate,
            layout: layout_name.parse()?,
        })
    }

    /// Build a context from already-parsed parts
    pub fn from_parts(rate: SampleRate, layout: ChannelLayout) -> Self {
        Self { rate, layout }
    }

    /// Channels per frame in this context
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Sample rate in Hz
    pub fn rate_hz(&self) -> u32 {
        self.rate.hz()
    }

    /// Resampling ratio required to bring `other` into this context.
    ///
    /// Returns `None` when the rates already match. The ratio is this
    /// context's rate over the other's, the factor applied to input frame
    /// counts to obtain output frame counts.
    pub fn needs_resample(&self, other: &AudioContext) -> Option<f64> {
        (self.rate != other.rate).then(|| self.rate.hz() as f64 / other.rate.hz() as f64)
    }

    /// Remap matrix required to bring `other` into this context's layout.
    ///
    /// Returns `None` when the layouts already match, otherwise a matrix of
    /// shape `[self.channels() x other.channels()]`.
    pub fn needs_remap(&self, other: &AudioContext) -> Option<ChannelMatrix> {
        (self.layout != other.layout).then(|| other.layout.matrix_to(self.layout))
    }
}

impl Default for AudioContext {
    /// 44.1 kHz stereo
    fn default() -> Self {
        Self {
            rate: SampleRate::Sr44100,
            layout: ChannelLayout::Stereo,
        }
    }
}

impl fmt::Display for AudioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz {}", self.rate.hz(), self.layout)
    }
}
