/// Minimum region pixel count (w*h) to convert decoded rows with Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Default exponential decay rate for fling velocity, per second.
/// Velocity falls to 1/e of its value every `1 / DEFAULT_FLING_FRICTION` seconds.
pub const DEFAULT_FLING_FRICTION: f32 = 4.0;

/// Fling velocity (image pixels per second) below which a fling is settled.
pub const DEFAULT_FLING_MIN_VELOCITY: f32 = 20.0;

/// Release velocities above this magnitude are capped before seeding a fling.
pub const DEFAULT_FLING_MAX_VELOCITY: f32 = 8_000.0;

/// Frame interval used by headless rendering (~60 Hz).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Largest sample value a netpbm header may declare.
pub const PNM_MAX_SAMPLE_VALUE: u32 = 65_535;
