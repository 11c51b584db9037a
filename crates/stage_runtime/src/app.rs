//! winit driver for the frame loop.
//!
//! Input events are applied to the scene as winit delivers them. Once the
//! queue is drained (`about_to_wait`) a frame runs if the clock says one is
//! due, and the loop sleeps until the next deadline.

use std::sync::Arc;
use std::time::Instant;

use stage_core::{FrameCallback, FrameLoop, MouseButton, Scene};
use stage_platform::{create_window, PlatformConfig};
use stage_render::GpuPresenter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::error::RuntimeError;

const FPS_LOG_INTERVAL: u64 = 600;

pub(crate) struct App<F> {
    platform: PlatformConfig,
    scene: Scene,
    frame_loop: FrameLoop,
    callback: Option<F>,
    // Dropped before the window: the surface borrows it.
    presenter: Option<GpuPresenter>,
    window: Option<Arc<Window>>,
    error: Option<RuntimeError>,
}

impl<F: FnMut(&mut Scene)> App<F> {
    pub(crate) fn new(
        platform: PlatformConfig,
        scene: Scene,
        frame_loop: FrameLoop,
        callback: Option<F>,
    ) -> Self {
        Self {
            platform,
            scene,
            frame_loop,
            callback,
            presenter: None,
            window: None,
            error: None,
        }
    }

    /// Frames presented so far and the first fatal error, if any.
    pub(crate) fn finish(self) -> Result<u64, RuntimeError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.frame_loop.clock().frame_count),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RuntimeError) {
        log::error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RuntimeError> {
        let window = create_window(event_loop, &self.platform)?;
        log::info!(
            "Window created: {}x{} \"{}\"",
            self.platform.width,
            self.platform.height,
            self.platform.title
        );
        self.presenter = Some(GpuPresenter::new(Arc::clone(&window))?);
        self.window = Some(window);
        Ok(())
    }
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Primary),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Secondary),
        _ => None,
    }
}

impl<F: FnMut(&mut Scene)> ApplicationHandler for App<F> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.open_window(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.resize(size.width, size.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f64>(window.scale_factor());
                self.scene.cursor_mut().track_position(logical.x, logical.y);
            }

            WindowEvent::CursorEntered { .. } => self.scene.cursor_mut().track_focus(true),
            WindowEvent::CursorLeft { .. } => self.scene.cursor_mut().track_focus(false),

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = map_button(button) {
                    match state {
                        ElementState::Pressed => self.scene.cursor_mut().press(button),
                        ElementState::Released => self.scene.cursor_mut().release(button),
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };

        let now = Instant::now();
        if self.frame_loop.is_due(now) {
            let callback = self
                .callback
                .as_mut()
                .map(|f| f as &mut FrameCallback<'_>);
            if let Err(err) = self.frame_loop.tick(now, &mut self.scene, callback, presenter) {
                self.fail(event_loop, err.into());
                return;
            }
            let clock = self.frame_loop.clock();
            if clock.frame_count % FPS_LOG_INTERVAL == 0 {
                log::debug!(
                    "Frame {}: {:.1} fps (target {})",
                    clock.frame_count,
                    clock.smoothed_fps,
                    clock.fps()
                );
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.frame_loop.next_deadline()));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.presenter = None;
        self.window = None;
        let clock = self.frame_loop.clock();
        log::info!(
            "Stage closed after {} frames ({:.1} fps, last frame {:.1}ms)",
            clock.frame_count,
            clock.smoothed_fps,
            clock.real_dt * 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_the_three_tracked_buttons() {
        assert_eq!(
            map_button(winit::event::MouseButton::Left),
            Some(MouseButton::Primary)
        );
        assert_eq!(
            map_button(winit::event::MouseButton::Middle),
            Some(MouseButton::Middle)
        );
        assert_eq!(
            map_button(winit::event::MouseButton::Right),
            Some(MouseButton::Secondary)
        );
        assert_eq!(map_button(winit::event::MouseButton::Back), None);
    }
}
