use std::time::{Duration, Instant};

pub const DEFAULT_FPS: u32 = 60;

const FPS_SAMPLE_COUNT: usize = 60;

/// Frame pacing for a capped-rate loop.
///
/// Each frame pushes the next deadline to `max(now, deadline) + 1/fps`, so a
/// late frame delays the schedule instead of triggering catch-up frames:
/// the loop can run slower than the target rate, never faster.
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: u32,
    target_dt: Duration,
    next_deadline: Instant,
    last_instant: Option<Instant>,
    pub frame_count: u64,
    pub real_dt: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self::starting_at(fps, Instant::now())
    }

    /// Clock whose first frame is due at `start`.
    pub fn starting_at(fps: u32, start: Instant) -> Self {
        let fps = fps.max(1);
        Self {
            fps,
            target_dt: Duration::from_secs_f64(1.0 / fps as f64),
            next_deadline: start,
            last_instant: None,
            frame_count: 0,
            real_dt: 0.0,
            fps_samples: [1.0 / fps as f64; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: fps as f64,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn target_dt(&self) -> Duration {
        self.target_dt
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_deadline
    }

    /// Records a frame starting at `now` and schedules the next one.
    pub fn begin_frame(&mut self, now: Instant) {
        if let Some(last) = self.last_instant {
            self.real_dt = now.saturating_duration_since(last).as_secs_f64();
            self.fps_samples[self.fps_sample_index] = self.real_dt;
            self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
            let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
            self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        }

        let behind = now.saturating_duration_since(self.next_deadline);
        if behind > self.target_dt * 4 {
            log::debug!(
                "Frame {} started {:.1}ms late",
                self.frame_count,
                behind.as_secs_f64() * 1000.0
            );
        }

        self.last_instant = Some(now);
        self.next_deadline = now.max(self.next_deadline) + self.target_dt;
        self.frame_count += 1;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let start = Instant::now();
        let clock = FrameClock::starting_at(60, start);
        assert!(clock.is_due(start));
        assert_eq!(clock.fps(), 60);
    }

    #[test]
    fn frames_are_spaced_by_target_dt() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(60, start);
        clock.begin_frame(start);
        assert_eq!(clock.next_deadline(), start + clock.target_dt());
        assert!(!clock.is_due(start + Duration::from_millis(10)));
        assert!(clock.is_due(start + Duration::from_millis(17)));
    }

    #[test]
    fn late_frames_do_not_catch_up() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(60, start);
        clock.begin_frame(start);
        let late = start + Duration::from_millis(100);
        clock.begin_frame(late);
        // The next frame is a full interval after the late one, not a burst.
        assert_eq!(clock.next_deadline(), late + clock.target_dt());
        assert_eq!(clock.frame_count, 2);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.fps(), 1);
        assert_eq!(clock.target_dt(), Duration::from_secs(1));
    }

    #[test]
    fn smoothed_fps_tracks_real_frame_time() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(60, start);
        let step = Duration::from_millis(20);
        for i in 0..=FPS_SAMPLE_COUNT as u32 {
            clock.begin_frame(start + step * i);
        }
        assert!((clock.smoothed_fps - 50.0).abs() < 0.5);
    }
}
