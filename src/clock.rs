use std::time::{Duration, Instant};

/// Timestamps handed to one tick of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Monotonic time since the session started.
    pub now: Duration,
    /// Time since the previous tick.
    pub dt: Duration,
}

impl FrameTime {
    pub fn new(now: Duration, dt: Duration) -> Self {
        Self { now, dt }
    }

    /// The `index`-th tick of a perfectly paced loop.
    pub fn at_tick(index: u64, fps: u32) -> Self {
        let dt = Duration::from_secs(1) / fps.max(1);
        Self {
            now: dt.mul_f64(index as f64),
            dt,
        }
    }

    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}

/// Frame pacing against a fixed target rate.
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_start: Instant,
    frame_dur: Duration,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_start: now,
            frame_dur: Duration::from_secs(1) / fps.max(1),
        }
    }

    pub fn begin_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last);
        self.last = now;
        self.frame_start = now;
        FrameTime {
            now: now.saturating_duration_since(self.start),
            dt,
        }
    }

    /// Sleeps out whatever is left of the frame budget.
    pub fn end_frame(&self) {
        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_dur {
            std::thread::sleep(self.frame_dur - elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_ticks_are_evenly_spaced() {
        let t0 = FrameTime::at_tick(0, 60);
        let t60 = FrameTime::at_tick(60, 60);
        assert_eq!(t0.now, Duration::ZERO);
        assert!(t60.now >= Duration::from_millis(999));
        assert!(t60.now <= Duration::from_secs(1));
        assert_eq!(t60.dt, t0.dt);
    }

    #[test]
    fn tick_indices_past_u32_keep_counting() {
        let wrap = u64::from(u32::MAX) + 1;
        let before = FrameTime::at_tick(wrap - 1, 60);
        let after = FrameTime::at_tick(wrap, 60);
        assert!(after.now > before.now);
        let expected = wrap as f64 / 60.0;
        assert!((after.now.as_secs_f64() - expected).abs() < 1e-3);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut clock = FrameClock::new(1000);
        let a = clock.begin_frame();
        clock.end_frame();
        let b = clock.begin_frame();
        assert!(b.now >= a.now);
        assert!(b.dt >= Duration::from_micros(900));
    }
}
