//! Audio domain types and the push-path processing stages
//!
//! Contexts, layouts and rates describe stream formats; sample conversion,
//! resampling and channel remapping move data between them.

pub mod context;
pub mod layout;
pub mod mixdown;
pub mod rate;
pub mod resampler;
pub mod sample;

pub use context::AudioContext;
pub use layout::{ChannelLayout, ChannelMatrix};
pub use rate::SampleRate;
pub use resampler::Resampler;
pub use sample::{make_converters, Sample};
