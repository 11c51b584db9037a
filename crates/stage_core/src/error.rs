use std::path::PathBuf;

use crate::scene::{SpriteId, TextId};

/// Errors raised by scene bookkeeping and asset loading.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    #[error("no default font available; set `default_font` in the stage config")]
    NoDefaultFont,

    #[error("text size must be > 0")]
    InvalidTextSize,

    #[error("sprite needs at least one costume")]
    EmptyCostumes,

    #[error("costume index {index} out of range ({count} costumes)")]
    CostumeOutOfRange { index: usize, count: usize },

    #[error("screen size is not configured; call `screen` before spawning sprites")]
    ScreenNotConfigured,

    #[error("sprite {0} not found")]
    SpriteNotFound(SpriteId),

    #[error("text {0} not found")]
    TextNotFound(TextId),

    #[error("invalid mouse button index {0} (expected 0, 1 or 2)")]
    InvalidButton(usize),

    #[error("config validation failed: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StageResult<T> = Result<T, StageError>;
