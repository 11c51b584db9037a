//! One iteration of the frame loop, independent of any window.
//!
//! The runtime drains window events first, then calls [`FrameLoop::tick`],
//! which runs the user callback, composites, refreshes the cursor and
//! presents, in that order. Pacing is left to the caller via the clock.

use std::time::Instant;

use crate::canvas::Canvas;
use crate::scene::Scene;
use crate::time::FrameClock;

/// Receives the finished canvas once per frame.
pub trait Presenter {
    type Error;

    fn present(&mut self, canvas: &Canvas) -> Result<(), Self::Error>;
}

/// Headless presenter that keeps a copy of the last frame.
#[derive(Debug, Default)]
pub struct CapturePresenter {
    pub frames_presented: u64,
    pub last_frame: Option<Canvas>,
}

impl Presenter for CapturePresenter {
    type Error = std::convert::Infallible;

    fn present(&mut self, canvas: &Canvas) -> Result<(), Self::Error> {
        self.frames_presented += 1;
        self.last_frame = Some(canvas.clone());
        Ok(())
    }
}

pub type FrameCallback<'a> = dyn FnMut(&mut Scene) + 'a;

pub struct FrameLoop {
    clock: FrameClock,
    canvas: Canvas,
}

impl FrameLoop {
    pub fn new(clock: FrameClock, scene: &Scene) -> Self {
        Self {
            clock,
            canvas: Canvas::new(scene.screen()),
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.clock.is_due(now)
    }

    pub fn next_deadline(&self) -> Instant {
        self.clock.next_deadline()
    }

    /// Runs the callback (if any) exactly once, composites one frame,
    /// refreshes the cursor and presents.
    pub fn tick<P: Presenter>(
        &mut self,
        now: Instant,
        scene: &mut Scene,
        callback: Option<&mut FrameCallback<'_>>,
        presenter: &mut P,
    ) -> Result<(), P::Error> {
        self.clock.begin_frame(now);
        if let Some(callback) = callback {
            callback(scene);
        }
        scene.composite(&mut self.canvas);
        scene.cursor_mut().refresh();
        presenter.present(&self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costume::Costume;
    use crate::geometry::ScreenSize;
    use crate::text::FontLibrary;
    use image::{Rgba, RgbaImage};

    const ORANGE_PX: [u8; 4] = [255, 165, 0, 255];

    fn setup() -> (Scene, FrameLoop) {
        let scene = Scene::new(ScreenSize::new(200, 200), FontLibrary::default());
        let frame_loop = FrameLoop::new(FrameClock::new(60), &scene);
        (scene, frame_loop)
    }

    fn square(size: u32) -> Costume {
        Costume::from_image(RgbaImage::from_pixel(size, size, Rgba(ORANGE_PX)))
    }

    #[test]
    fn single_frame_without_callback_draws_centered_sprite() {
        let (mut scene, mut frame_loop) = setup();
        let id = scene
            .spawn_sprite_from(vec![square(50)], 0, false)
            .expect("sprite");
        let sprite = scene.sprite(id).expect("live");
        assert_eq!((sprite.x, sprite.y), (75.0, 75.0));

        let mut presenter = CapturePresenter::default();
        frame_loop
            .tick(Instant::now(), &mut scene, None, &mut presenter)
            .expect("infallible");

        let frame = presenter.last_frame.expect("one frame presented");
        assert_eq!(frame.pixel(75, 75), Some(ORANGE_PX));
        assert_eq!(frame.pixel(124, 124), Some(ORANGE_PX));
        assert_eq!(frame.pixel(74, 75), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(125, 124), Some([0, 0, 0, 255]));
    }

    #[test]
    fn callback_runs_once_before_compositing() {
        let (mut scene, mut frame_loop) = setup();
        let id = scene
            .spawn_sprite_from(vec![square(10)], 0, false)
            .expect("sprite");
        let mut calls = 0;
        let mut callback = |scene: &mut Scene| {
            calls += 1;
            scene.sprite_mut(id).expect("live").move_to(0.0, 0.0);
        };

        let mut presenter = CapturePresenter::default();
        frame_loop
            .tick(Instant::now(), &mut scene, Some(&mut callback), &mut presenter)
            .expect("infallible");
        assert_eq!(calls, 1);
        let frame = presenter.last_frame.expect("frame");
        assert_eq!(frame.pixel(0, 0), Some(ORANGE_PX));
    }

    #[test]
    fn cursor_refreshes_after_callback() {
        let (mut scene, mut frame_loop) = setup();
        scene.cursor_mut().track_position(5.0, 6.0);
        let mut seen = None;
        let mut callback = |scene: &mut Scene| {
            seen = Some((scene.cursor().x, scene.cursor().y));
        };
        let mut presenter = CapturePresenter::default();
        frame_loop
            .tick(Instant::now(), &mut scene, Some(&mut callback), &mut presenter)
            .expect("infallible");
        // The callback saw the previous frame's latch; the refresh follows it.
        assert_eq!(seen, Some((0.0, 0.0)));
        assert_eq!((scene.cursor().x, scene.cursor().y), (5.0, 6.0));
    }

    #[test]
    fn tick_schedules_next_frame() {
        let (mut scene, mut frame_loop) = setup();
        let now = Instant::now();
        let mut presenter = CapturePresenter::default();
        assert!(frame_loop.is_due(now));
        frame_loop
            .tick(now, &mut scene, None, &mut presenter)
            .expect("infallible");
        assert!(!frame_loop.is_due(now));
        assert_eq!(frame_loop.next_deadline(), now + frame_loop.clock().target_dt());
        assert_eq!(presenter.frames_presented, 1);
    }
}
