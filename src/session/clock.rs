use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Longest frame delta reported to scripts, in seconds.
pub const MAX_DELTA_S: f64 = 1.0;

/// Monotonic time source driving the frame loop.
pub trait Clock: Send + Sync {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;
    fn sleep(&self, d: Duration);
}

/// Wall-clock time measured from construction.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Clock that only moves when told to. Sleeping advances it.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/// Timing values handed to scripts each frame, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameTime {
    pub elapsed: f64,
    pub delta: f64,
}

/// Derives [`FrameTime`] from successive clock readings.
#[derive(Clone, Copy, Debug)]
pub struct FrameTimer {
    start: Duration,
    last: Duration,
}

impl FrameTimer {
    pub fn start(now: Duration) -> Self {
        Self { start: now, last: now }
    }

    /// `delta` is clamped to [`MAX_DELTA_S`] so a long stall does not produce a runaway step.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        let delta = now.saturating_sub(self.last).as_secs_f64().min(MAX_DELTA_S);
        self.last = now;
        FrameTime { elapsed, delta }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
