use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FLING_FRICTION, DEFAULT_FLING_MAX_VELOCITY, DEFAULT_FLING_MIN_VELOCITY,
    DEFAULT_FRAME_INTERVAL_MS,
};
use crate::decode::PixelFormat;
use crate::window::BottomClampPolicy;

/// Settings for a [`LongImageView`](crate::view::LongImageView).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Format regions are decoded into.
    #[serde(default)]
    pub pixel_format: PixelFormat,
    #[serde(default)]
    pub bottom_clamp: BottomClampPolicy,
    #[serde(default)]
    pub fling: FlingConfig,
    /// Frame interval for headless rendering, in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::default(),
            bottom_clamp: BottomClampPolicy::default(),
            fling: FlingConfig::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl ViewerConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

/// Fling deceleration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlingConfig {
    /// Exponential decay rate of velocity, per second.
    pub friction: f32,
    /// Velocity (pixels/s) at which a fling counts as settled.
    pub min_velocity: f32,
    /// Release velocities are capped to this magnitude (pixels/s).
    pub max_velocity: f32,
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self {
            friction: DEFAULT_FLING_FRICTION,
            min_velocity: DEFAULT_FLING_MIN_VELOCITY,
            max_velocity: DEFAULT_FLING_MAX_VELOCITY,
        }
    }
}
