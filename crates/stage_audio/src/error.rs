use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to decode sound {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("sound clip has no channels")]
    NoChannels,

    #[error("sound clip has a sample rate of 0")]
    ZeroSampleRate,

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}
