//! Collaborator-facing API
//!
//! [`GroundGridView`] is the single owner of the per-surface state. Sensor
//! glue pushes [`PositionFix`] and [`OrientationReading`] values into it and
//! the frame loop asks it to draw onto a [`DrawingSurface`](crate::render::DrawingSurface).

pub mod types;
pub mod view;

pub use types::{OrientationReading, PositionFix};
pub use view::GroundGridView;
