//! Simulation clock.
//!
//! One source of truth for the time uniform fed to the curl-noise term.
//! Pausing freezes both the accumulator and the delta so a paused tick
//! observes exactly the state the last running tick left behind.

use std::time::{Duration, Instant};

/// Elapsed/delta tracking with pause support.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    paused: bool,
    pause_elapsed: Duration,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            pause_elapsed: Duration::ZERO,
        }
    }

    /// Advance the clock. Call once per tick; while paused this is a no-op
    /// that reports a zero delta and an unchanged accumulator.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, 0.0);
        }

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = (now.duration_since(self.start) - self.pause_elapsed).as_secs_f32();
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Elapsed simulation time in seconds (excludes paused spans).
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks advanced since start (paused ticks do not count).
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            let now = Instant::now();
            self.pause_elapsed += now.duration_since(self.last_frame);
            self.last_frame = now;
            self.paused = false;
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Restart the accumulator, e.g. together with a scheduler re-prime.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.pause_elapsed = Duration::ZERO;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_update_advances() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.update();
        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_paused_tick_leaves_accumulator_unchanged() {
        let mut clock = Clock::new();
        clock.update();
        clock.pause();

        let before = clock.elapsed();
        let frames = clock.frame();
        thread::sleep(Duration::from_millis(10));
        clock.update();

        assert_eq!(clock.elapsed(), before);
        assert_eq!(clock.delta(), 0.0);
        assert_eq!(clock.frame(), frames);
    }

    #[test]
    fn test_resume_excludes_paused_span() {
        let mut clock = Clock::new();
        clock.update();
        let before = clock.elapsed();

        clock.pause();
        thread::sleep(Duration::from_millis(20));
        clock.resume();
        clock.update();

        // The 20ms paused span must not appear in the accumulator
        assert!(clock.elapsed() - before < 0.015);
    }

    #[test]
    fn test_reset() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(5));
        clock.update();
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.frame(), 0);
    }
}
