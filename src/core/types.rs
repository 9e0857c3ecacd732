//! Core data types shared by the rendering pipeline

use nalgebra::{Point2, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Point in grid space (x east, y north), in grid units
pub type GridPoint = Vector2<f64>;

/// Point in view space: x lateral, y forward from the viewer, z up
pub type ViewPoint = Vector3<f64>;

/// Drawing-surface pixel coordinates, origin top-left, y down
pub type ScreenPoint = Point2<f64>;

/// 8-bit RGB stroke colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Grey level; the value is clamped to [0, 255] and truncated
    pub fn grey(level: f64) -> Self {
        let v = if level.is_finite() { level.clamp(0.0, 255.0) as u8 } else { 0 };
        Self { r: v, g: v, b: v }
    }

    /// CSS-style `rgb(r, g, b)` string
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
