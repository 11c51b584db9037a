//! Scene model for a small blit-based 2D game helper.
//!
//! Everything here is window-independent: the runtime crate feeds input
//! events into the [`Scene`] and hands a [`Presenter`] to [`FrameLoop::tick`].

pub mod backdrop;
pub mod canvas;
pub mod config;
pub mod costume;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod mask;
pub mod palette;
pub mod scene;
pub mod sprite;
pub mod text;
pub mod time;

pub use backdrop::Backdrop;
pub use canvas::Canvas;
pub use config::{load_config_from_path, StageConfig, WindowConfig};
pub use costume::Costume;
pub use cursor::{Cursor, MouseButton};
pub use error::{StageError, StageResult};
pub use frame::{CapturePresenter, FrameCallback, FrameLoop, Presenter};
pub use geometry::{Rect, ScreenSize};
pub use mask::Mask;
pub use palette::Rgb;
pub use scene::{Scene, SpriteId, TextId};
pub use sprite::Sprite;
pub use text::{FontLibrary, TextLabel, TextSpec};
pub use time::FrameClock;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
