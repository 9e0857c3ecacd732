//! Grid rendering onto 2D drawing surfaces

pub mod grid;
pub mod surface;

pub use grid::{FrameStats, GridLine, GridRenderer};
pub use surface::{DrawCommand, DrawingSurface, RecordingSurface};
