//! Per-frame viewer state processing

pub mod smoothing;
pub mod viewer;

pub use smoothing::{PositionSmoother, SmoothingStep};
pub use viewer::ViewerState;
