use std::time::{Duration, Instant};

/// Time source for inertia. `now` is monotonic from an arbitrary origin.
pub trait FrameClock {
    fn now(&mut self) -> Duration;
}

/// Wall-clock time, for interactive hosts.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Advances by a fixed step on every read. Makes headless rendering and
/// tests independent of how fast frames are actually produced.
#[derive(Debug, Clone)]
pub struct SteppedClock {
    step: Duration,
    now: Duration,
}

impl SteppedClock {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            now: Duration::ZERO,
        }
    }
}

impl FrameClock for SteppedClock {
    fn now(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}
