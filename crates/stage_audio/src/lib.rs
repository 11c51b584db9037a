//! WAV playback through a small software mixer.

pub mod clip;
pub mod device;
pub mod error;
pub mod mixer;
pub mod sound;

pub use clip::Clip;
pub use device::AudioDevice;
pub use error::AudioError;
pub use mixer::{Mixer, OUTPUT_CHANNELS, OUTPUT_SAMPLE_RATE};
pub use sound::Sound;
