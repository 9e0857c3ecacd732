//! Physical constants and renderer defaults

/// Mean Earth radius used by the haversine formula (meters)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Smallest forward distance accepted by the perspective divide
pub const PROJECTION_EPSILON: f64 = 1e-9;

/// Heading/tilt change applied by one manual nudge (degrees)
pub const NUDGE_STEP_DEG: f64 = 2.0;

/// Tilt limits: 0 looks straight down, 90 looks at the horizon
pub const MIN_TILT_DEG: f64 = 0.0;
pub const MAX_TILT_DEG: f64 = 90.0;
