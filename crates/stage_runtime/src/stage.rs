use std::path::Path;

use stage_core::costume::load_rgba;
use stage_core::{
    FontLibrary, FrameClock, FrameLoop, Scene, ScreenSize, StageConfig, StageError, VERSION,
};
use stage_platform::{IconPixels, PlatformConfig};
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::error::RuntimeError;

/// Owns the scene and the window description until [`Stage::run`] hands
/// both to the event loop.
pub struct Stage {
    scene: Scene,
    clock: FrameClock,
    platform: PlatformConfig,
}

impl Stage {
    /// Validates `config`, starts the frame clock and applies the configured
    /// window, if any.
    pub fn init(config: StageConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        log::info!("Stage v{} (target {} fps)", VERSION, config.fps);

        let fonts = FontLibrary::new(config.default_font.clone());
        let mut stage = Self {
            scene: Scene::new(ScreenSize::ZERO, fonts),
            clock: FrameClock::new(config.fps),
            platform: PlatformConfig::default(),
        };
        if let Some(window) = &config.window {
            stage.screen(
                (window.width, window.height),
                &window.title,
                window.icon.as_deref(),
            )?;
        }
        Ok(stage)
    }

    /// Sets the window size, title and optional icon. The icon is decoded
    /// now so a bad path fails here rather than at window creation.
    pub fn screen(
        &mut self,
        size: impl Into<ScreenSize>,
        title: &str,
        icon: Option<&Path>,
    ) -> Result<(), RuntimeError> {
        let size = size.into();
        if size.is_zero() {
            return Err(StageError::Config("screen width and height must be > 0".to_string()).into());
        }
        let icon = icon
            .map(|path| {
                load_rgba(path).map(|image| IconPixels {
                    width: image.width(),
                    height: image.height(),
                    rgba: image.into_raw(),
                })
            })
            .transpose()?;

        self.platform = PlatformConfig {
            title: title.to_string(),
            width: size.width,
            height: size.height,
            icon,
        };
        self.scene.set_screen(size);
        log::debug!("Screen set to {}x{}", size.width, size.height);
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Runs the frame loop until the window is closed, calling `callback`
    /// once per frame before compositing.
    pub fn run<F: FnMut(&mut Scene)>(self, callback: F) -> Result<(), RuntimeError> {
        self.run_with(Some(callback))
    }

    /// Runs the frame loop with no per-frame callback.
    pub fn run_idle(self) -> Result<(), RuntimeError> {
        self.run_with(None::<fn(&mut Scene)>)
    }

    fn run_with<F: FnMut(&mut Scene)>(self, callback: Option<F>) -> Result<(), RuntimeError> {
        if self.scene.screen().is_zero() {
            return Err(StageError::ScreenNotConfigured.into());
        }

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let frame_loop = FrameLoop::new(self.clock, &self.scene);
        let mut app = App::new(self.platform, self.scene, frame_loop, callback);
        event_loop.run_app(&mut app)?;

        let frames = app.finish()?;
        log::debug!("Frame loop finished after {} frames", frames);
        Ok(())
    }
}
