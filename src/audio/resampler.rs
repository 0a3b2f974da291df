//! One-shot SINC resampling for the push path
//!
//! Wraps rubato's band-limited sinc resampler. Each call builds a fresh
//! resampler sized to the pushed block and discards it afterwards, so no
//! state leaks between pushes (producers are not guaranteed to be the same
//! thread push-to-push). The cost is an edge discontinuity per push, which
//! the queue accepts in exchange for statelessness.

use crate::error::{Error, Result};
use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};
use tracing::debug;

/// Stateless wrapper over rubato's best-quality sinc resampler.
pub struct Resampler;

impl Resampler {
    /// Resample one interleaved block by a fixed ratio.
    ///
    /// # Arguments
    /// - `input`: interleaved samples, `input_frames * channels` long
    /// - `input_frames`: frame count of `input`
    /// - `channels`: interleaved channel count (unchanged by resampling)
    /// - `ratio`: output rate divided by input rate
    ///
    /// # Returns
    /// Interleaved output at the new rate. The produced frame count is
    /// approximately `input_frames * ratio` but may vary by a few frames;
    /// callers size downstream buffers from the actual output length.
    pub fn resample(
        input: &[f32],
        input_frames: usize,
        channels: usize,
        ratio: f64,
    ) -> Result<Vec<f32>> {
        if input_frames == 0 {
            return Ok(Vec::new());
        }

        // rubato works on planar data
        let planar_input = Self::deinterleave(input, channels);

        let mut resampler = Self::create_resampler(ratio, input_frames, channels)?;

        let planar_output = resampler
            .process(&planar_input, None)
            .map_err(|e| Error::ResampleFailed(e.to_string()))?;

        let output = Self::interleave(planar_output);

        debug!(
            "Resampled {} frames to {} frames (ratio {:.4}, {} channels)",
            input_frames,
            output.len() / channels,
            ratio,
            channels
        );

        Ok(output)
    }

    /// Build a sinc resampler covering one block in a single process call.
    ///
    /// The parameters are the high-quality set: long kernel, tight cutoff,
    /// heavy oversampling with linear interpolation between table entries.
    fn create_resampler(ratio: f64, chunk_size: usize, channels: usize) -> Result<SincFixedIn<f32>> {
        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        SincFixedIn::<f32>::new(ratio, 1.0, params, chunk_size, channels)
            .map_err(|e| Error::ResampleFailed(e.to_string()))
    }

    /// Convert interleaved samples to planar format.
    ///
    /// Input:  [L, R, L, R, ...]
    /// Output: [[L, L, ...], [R, R, ...]]
    fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
        let num_frames = samples.len() / channels;

        let mut planar = vec![Vec::with_capacity(num_frames); channels];

        for frame_idx in 0..num_frames {
            for (ch_idx, channel) in planar.iter_mut().enumerate() {
                channel.push(samples[frame_idx * channels + ch_idx]);
            }
        }

        planar
    }

    /// Convert planar samples back to interleaved format.
    fn interleave(planar: Vec<Vec<f32>>) -> Vec<f32> {
        if planar.is_empty() {
            return Vec::new();
        }

        let channels = planar.len();
        let num_frames = planar[0].len();
        let mut interleaved = Vec::with_capacity(num_frames * channels);

        for frame_idx in 0..num_frames {
            for channel in &planar {
                interleaved.push(channel[frame_idx]);
            }
        }

        interleaved
    }
}
