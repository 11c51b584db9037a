use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::error::OsError;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Icon, Window, WindowAttributes};

/// Decoded window icon, straight-alpha RGBA8.
#[derive(Debug, Clone)]
pub struct IconPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub icon: Option<IconPixels>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Stage".to_string(),
            width: 640,
            height: 480,
            icon: None,
        }
    }
}

/// Creates a fixed-size window with the configured title and icon.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, OsError> {
    let mut attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(false);

    if let Some(icon) = &config.icon {
        match Icon::from_rgba(icon.rgba.clone(), icon.width, icon.height) {
            Ok(icon) => attrs = attrs.with_window_icon(Some(icon)),
            Err(err) => log::warn!("Window icon rejected: {}", err),
        }
    }

    let window = event_loop.create_window(attrs)?;
    Ok(Arc::new(window))
}
