//! Ground Grid
//!
//! Renders a first-person view of an infinite horizontal grid anchored to
//! real-world coordinates. A device's position and orientation drive a
//! geodetic-to-screen pipeline: local grid linearization, a rotate/tilt
//! camera, near-plane clipping and perspective projection onto any 2D
//! drawing surface.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod render;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GridPoint, Rgb, ScreenPoint, ViewPoint, EARTH_RADIUS_M, NUDGE_STEP_DEG};
pub use crate::algorithms::{Camera, CameraPose, ClipResult, GeoCoordinate, LocalGridMapper, ScaleFactors, SegmentClipper};
pub use crate::processing::ViewerState;
pub use crate::render::{DrawingSurface, FrameStats, GridRenderer, RecordingSurface};
pub use crate::utils::{ConfigError, ConfigurationManager, GridConfig};
pub use crate::api::{GroundGridView, OrientationReading, PositionFix};
