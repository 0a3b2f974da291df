//! Supported sample rates

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// Supported sample rates. The discriminant is the rate in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Sr44100 = 44_100,
    Sr48000 = 48_000,
    Sr88200 = 88_200,
    Sr96000 = 96_000,
    Sr176400 = 176_400,
    Sr192000 = 192_000,
}

impl SampleRate {
    /// Rate in Hz
    pub fn hz(self) -> u32 {
        self as u32
    }

    /// Canonical name, also accepted by the parser
    pub fn as_str(self) -> &'static str {
        match self {
            SampleRate::Sr44100 => "SR44100",
            SampleRate::Sr48000 => "SR48000",
            SampleRate::Sr88200 => "SR88200",
            SampleRate::Sr96000 => "SR96000",
            SampleRate::Sr176400 => "SR176400",
            SampleRate::Sr192000 => "SR192000",
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleRate {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "SR44100" => Ok(SampleRate::Sr44100),
            "SR48000" => Ok(SampleRate::Sr48000),
            "SR88200" => Ok(SampleRate::Sr88200),
            "SR96000" => Ok(SampleRate::Sr96000),
            "SR176400" => Ok(SampleRate::Sr176400),
            "SR192000" => Ok(SampleRate::Sr192000),
            _ => Err(Error::InvalidRateName(name.to_string())),
        }
    }
}
