//! Geodetic-to-screen pipeline

pub mod geodesy;
pub mod local_grid;
pub mod camera;
pub mod clipping;

pub use geodesy::GeoCoordinate;
pub use local_grid::{LocalGridMapper, ScaleFactors};
pub use camera::{Camera, CameraPose, FieldOfView};
pub use clipping::{ClipResult, SegmentClipper};
