//! Windowed runtime: opens the window, drives the frame loop at the
//! configured rate and presents each frame on the GPU.

mod app;
pub mod error;
pub mod stage;

pub use error::RuntimeError;
pub use stage::Stage;
pub use stage_audio::{AudioDevice, Sound};
pub use stage_core::{
    palette, Backdrop, Costume, Cursor, MouseButton, Rgb, Scene, ScreenSize, Sprite, SpriteId,
    StageConfig, StageError, TextId, TextSpec, WindowConfig,
};
