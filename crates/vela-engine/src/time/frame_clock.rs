use std::time::{Duration, Instant};

/// Timing snapshot taken once per frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock was created or reset.
    pub elapsed: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Monotonic frame clock.
///
/// Delta time is clamped to `[dt_min, dt_max]`; elapsed time is not.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock with a 0.1 ms floor and a 250 ms ceiling on delta time.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts both the delta and the elapsed baseline.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Seconds since creation or the last reset.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
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

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let ft = clock.tick();
        assert!((0.005..=0.010).contains(&ft.dt));
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn elapsed_grows_and_resets() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(2));
        let ft = clock.tick();
        assert!(ft.elapsed >= 0.002);
        assert!(clock.elapsed() >= ft.elapsed);

        clock.reset();
        assert_eq!(clock.tick().frame_index, 0);
        assert!(clock.elapsed() < ft.elapsed + 1.0);
    }
}
