use std::time::Duration;

use crate::config::FlingConfig;

/// One-dimensional fling physics, driven by elapsed time.
pub trait InertiaSolver {
    /// Start a fling at `start` with `velocity` (pixels per second), bounded
    /// to `[min, max]`.
    fn fling(&mut self, start: i32, velocity: f32, min: i32, max: i32);

    /// Advance to `elapsed` since the fling began. Returns `true` if a new
    /// position was produced, including the final one; `false` once the
    /// solver had already finished.
    fn compute_offset(&mut self, elapsed: Duration) -> bool;

    /// Position after the last `compute_offset`.
    fn current(&self) -> i32;

    fn is_finished(&self) -> bool;

    /// Stop immediately at the current position.
    fn force_finished(&mut self);
}

/// Exponential velocity decay: `v(t) = v0 * e^(-k t)`.
///
/// Position follows `x(t) = x0 + v0 / k * (1 - e^(-k t))`, is clamped to the
/// fling bounds, and settles once `|v(t)|` drops to the minimum velocity or
/// the position reaches a bound.
#[derive(Clone, Debug)]
pub struct ExponentialFling {
    friction: f64,
    min_velocity: f64,
    max_velocity: f64,
    start: f64,
    velocity: f64,
    min: i32,
    max: i32,
    duration: f64,
    current: i32,
    finished: bool,
}

impl ExponentialFling {
    pub fn new(config: &FlingConfig) -> Self {
        Self {
            friction: f64::from(config.friction.max(f32::EPSILON)),
            min_velocity: f64::from(config.min_velocity.max(f32::EPSILON)),
            max_velocity: f64::from(config.max_velocity),
            start: 0.0,
            velocity: 0.0,
            min: 0,
            max: 0,
            duration: 0.0,
            current: 0,
            finished: true,
        }
    }

    /// Time until the fling settles on its own, ignoring bounds.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration)
    }

    /// Where the fling would come to rest without bounds.
    pub fn final_position(&self) -> f64 {
        self.position_at(self.duration)
    }

    fn position_at(&self, t: f64) -> f64 {
        self.start + self.velocity / self.friction * (1.0 - (-self.friction * t).exp())
    }
}

impl InertiaSolver for ExponentialFling {
    fn fling(&mut self, start: i32, velocity: f32, min: i32, max: i32) {
        let velocity = f64::from(velocity).clamp(-self.max_velocity, self.max_velocity);
        self.start = f64::from(start);
        self.velocity = velocity;
        self.min = min;
        self.max = max.max(min);
        self.current = start;

        if velocity.abs() <= self.min_velocity {
            self.duration = 0.0;
            self.finished = true;
        } else {
            self.duration = (velocity.abs() / self.min_velocity).ln() / self.friction;
            self.finished = false;
        }
    }

    fn compute_offset(&mut self, elapsed: Duration) -> bool {
        if self.finished {
            return false;
        }

        let mut t = elapsed.as_secs_f64();
        if t >= self.duration {
            t = self.duration;
            self.finished = true;
        }

        let position = self.position_at(t);
        let (lo, hi) = (f64::from(self.min), f64::from(self.max));
        let clamped = position.clamp(lo, hi);
        if (self.velocity < 0.0 && clamped <= lo) || (self.velocity > 0.0 && clamped >= hi) {
            self.finished = true;
        }

        self.current = clamped.round() as i32;
        true
    }

    fn current(&self) -> i32 {
        self.current
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn force_finished(&mut self) {
        self.finished = true;
    }
}
