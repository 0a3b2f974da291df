//! Channel layouts and their remap matrices
//!
//! A layout names the set and order of channels in an interleaved frame.
//! `matrix_to` produces the gain matrix used to downmix or upmix between
//! any two supported layouts.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Gain matrix for channel remapping, `dst_rows x src_cols`.
///
/// Row `i` holds the source-to-destination gain vector for output
/// channel `i`.
pub type ChannelMatrix = Vec<Vec<f32>>;

// Remap gain coefficients
const FULL_GAIN: f32 = 1.0;
const HALF_GAIN: f32 = 0.5;
const SURROUND_GAIN: f32 = 0.707;
const CENTER_GAIN: f32 = 0.45;
const MONO_MIX_GAIN: f32 = 0.325;
const LFE_GAIN: f32 = 0.1;

/// Supported channel layouts.
///
/// The discriminant is the channel count. Channel order within a frame is
/// fixed: 5.1 = {FL, FR, C, LFE, SL, SR}, 7.1 adds {BL, BR}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Mono = 1,
    Stereo = 2,
    FivePointOne = 6,
    SevenPointOne = 8,
}

impl ChannelLayout {
    /// Number of interleaved samples per frame
    pub fn channels(self) -> usize {
        self as usize
    }

    /// Canonical name, also accepted by the parser
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelLayout::Mono => "Mono",
            ChannelLayout::Stereo => "Stereo",
            ChannelLayout::FivePointOne => "5.1",
            ChannelLayout::SevenPointOne => "7.1",
        }
    }

    /// Build the `[target.channels() x self.channels()]` gain matrix that
    /// remaps frames in this layout to `target`.
    ///
    /// Layout pairs without a dedicated mix table fall back to an identity
    /// prefix: channel `i` copies to channel `i` for the channels both
    /// layouts share, everything else is silent.
    pub fn matrix_to(self, target: ChannelLayout) -> ChannelMatrix {
        use ChannelLayout::*;

        let src = self.channels();
        let dst = target.channels();
        let mut matrix = vec![vec![0.0f32; src]; dst];

        match (self, target) {
            (Mono, Stereo) => {
                matrix[0][0] = FULL_GAIN;
                matrix[1][0] = FULL_GAIN;
            }
            (Stereo, Mono) => {
                matrix[0][0] = HALF_GAIN;
                matrix[0][1] = HALF_GAIN;
            }
            (Stereo, FivePointOne) => {
                matrix[0][0] = FULL_GAIN;
                matrix[1][1] = FULL_GAIN;
                // Center carries an equal blend of left and right
                matrix[2][0] = HALF_GAIN;
                matrix[2][1] = HALF_GAIN;
            }
            (FivePointOne, Stereo) => {
                matrix[0][0] = FULL_GAIN;
                matrix[1][1] = FULL_GAIN;
                matrix[0][2] = SURROUND_GAIN;
                matrix[1][2] = SURROUND_GAIN;
                matrix[0][4] = SURROUND_GAIN;
                matrix[1][5] = SURROUND_GAIN;
            }
            (FivePointOne, Mono) => {
                matrix[0][0] = MONO_MIX_GAIN;
                matrix[0][1] = MONO_MIX_GAIN;
                matrix[0][2] = CENTER_GAIN;
                matrix[0][3] = LFE_GAIN;
                matrix[0][4] = MONO_MIX_GAIN;
                matrix[0][5] = MONO_MIX_GAIN;
            }
            (SevenPointOne, Stereo) => {
                matrix[0][0] = FULL_GAIN;
                matrix[1][1] = FULL_GAIN;
                matrix[0][2] = SURROUND_GAIN;
                matrix[1][2] = SURROUND_GAIN;
                matrix[0][4] = HALF_GAIN;
                matrix[1][5] = HALF_GAIN;
                matrix[0][6] = HALF_GAIN;
                matrix[1][7] = HALF_GAIN;
            }
            (SevenPointOne, FivePointOne) => {
                matrix[0][0] = FULL_GAIN;
                matrix[1][1] = FULL_GAIN;
                matrix[2][2] = FULL_GAIN;
                matrix[3][3] = FULL_GAIN;
                // Side channels absorb the back pair at half gain
                matrix[4][4] = HALF_GAIN;
                matrix[4][6] = HALF_GAIN;
                matrix[5][5] = HALF_GAIN;
                matrix[5][7] = HALF_GAIN;
            }
            _ => {
                for i in 0..src.min(dst) {
                    matrix[i][i] = FULL_GAIN;
                }
            }
        }

        matrix
    }
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelLayout {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "Mono" => Ok(ChannelLayout::Mono),
            "Stereo" => Ok(ChannelLayout::Stereo),
            "5.1" => Ok(ChannelLayout::FivePointOne),
            "7.1" => Ok(ChannelLayout::SevenPointOne),
            _ => Err(Error::InvalidChannelName(name.to_string())),
        }
    }
}
