use std::ops::ControlFlow;
use std::time::Duration;

use crate::foundation::error::{SketchError, SketchResult};
use crate::session::clock::Clock;

/// Fixed-interval frame loop.
///
/// Each frame runs, then the loop sleeps one full interval. Slow frames push the next one back;
/// nothing is skipped and there is no catch-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameScheduler {
    interval: Duration,
}

impl FrameScheduler {
    pub fn new(frame_rate: f64) -> SketchResult<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(SketchError::validation(
                "frame_rate must be finite and > 0",
            ));
        }
        Ok(Self {
            interval: Duration::from_secs_f64(1.0 / frame_rate),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `frame` until it breaks, fails, or `max_frames` frames have run. Returns the number of
    /// frames run.
    pub fn run<F>(&self, clock: &dyn Clock, max_frames: Option<u64>, mut frame: F) -> SketchResult<u64>
    where
        F: FnMut(u64) -> SketchResult<ControlFlow<()>>,
    {
        let mut count = 0u64;
        while max_frames.is_none_or(|max| count < max) {
            let flow = frame(count)?;
            count += 1;
            if flow.is_break() {
                break;
            }
            clock.sleep(self.interval);
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
