/// Frame pacing for a variable-timestep loop
///
/// Each frame calls [`FrameClock::tick`] once: it sleeps off whatever is left
/// of the frame budget and returns the milliseconds since the previous tick.
/// Gameplay constants are tuned per 60 Hz frame, so updates scale their
/// per-frame amounts by [`frame_scale`].
use std::time::{Duration, Instant};

/// Length of the frame the gameplay constants are tuned for, in milliseconds
pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// How many reference frames `dt_ms` covers
pub fn frame_scale(dt_ms: f32) -> f32 {
    dt_ms / REFERENCE_FRAME_MS
}

/// Frame budget for a target rate; `None` means uncapped
fn frame_budget(target_fps: u32) -> Option<Duration> {
    (target_fps > 0).then(|| Duration::from_secs_f64(1.0 / target_fps as f64))
}

/// Frame timing state
pub struct FrameClock {
    /// Time of last tick
    last_tick: Instant,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl FrameClock {
    /// Create a new clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    /// End the current frame. Sleeps until at least `1 / target_fps` has
    /// passed since the previous tick, then returns the full frame time in
    /// milliseconds.
    pub fn tick(&mut self, target_fps: u32) -> f32 {
        if let Some(budget) = frame_budget(target_fps) {
            let spent = self.last_tick.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.record(frame_time);

        frame_time.as_secs_f32() * 1000.0
    }

    fn record(&mut self, frame_time: Duration) {
        self.frame_count += 1;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total number of ticks
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        // Calculate average frame time
        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        // Convert to FPS
        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_creation() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_frame_scale() {
        assert_relative_eq!(frame_scale(REFERENCE_FRAME_MS), 1.0);
        assert_relative_eq!(frame_scale(REFERENCE_FRAME_MS * 2.0), 2.0);
        assert_relative_eq!(frame_scale(0.0), 0.0);
    }

    #[test]
    fn test_frame_budget() {
        assert_eq!(frame_budget(0), None);
        let budget = frame_budget(60).unwrap();
        assert!(budget > Duration::from_millis(16) && budget < Duration::from_millis(17));
    }

    #[test]
    fn test_tick_waits_for_budget() {
        let mut clock = FrameClock::new();
        let dt = clock.tick(100);

        assert!(dt >= 10.0, "tick returned {dt} ms");
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_uncapped_tick_does_not_wait() {
        let mut clock = FrameClock::new();
        clock.tick(0);
        clock.tick(0);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_fps_average() {
        let mut clock = FrameClock::new();
        for _ in 0..10 {
            clock.record(Duration::from_millis(20));
        }
        assert_relative_eq!(clock.fps(), 50.0, epsilon = 0.01);
    }

    #[test]
    fn test_fps_window_is_bounded() {
        let mut clock = FrameClock::new();
        for _ in 0..(FPS_WINDOW_SIZE * 2) {
            clock.record(Duration::from_millis(10));
        }
        assert_eq!(clock.frame_times.len(), FPS_WINDOW_SIZE);
        assert_relative_eq!(clock.fps(), 100.0, epsilon = 0.01);
    }
}
