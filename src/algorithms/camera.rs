//! Rotate/tilt camera and perspective projection
//!
//! Grid space is the flat lattice frame (x east, y north, ground at z = 0).
//! View space has x to the right, y forward along the view direction and
//! z up. The camera sits `eye_height` above the ground and is pulled back
//! by `backup_distance` along the view direction after tilting.

use nalgebra::{Rotation2, Rotation3, Vector3};

use crate::core::{GridPoint, ScreenPoint, ViewPoint, PROJECTION_EPSILON};
use crate::utils::config::CameraConfig;

/// Orientation and lattice anchor for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Compass heading, degrees clockwise from north
    pub heading_deg: f64,
    /// Degrees above straight down; 90 looks at the horizon
    pub tilt_deg: f64,
    /// Viewer position inside its lattice cell, grid units
    pub anchor: GridPoint,
}

impl CameraPose {
    pub fn new(heading_deg: f64, tilt_deg: f64, anchor: GridPoint) -> Self {
        Self { heading_deg, tilt_deg, anchor }
    }

    /// Pitch below the horizon used by the tilt rotation, in [-90, 0] degrees
    pub fn pitch_deg(&self) -> f64 {
        self.tilt_deg - 90.0
    }
}

/// Near-plane extents of the field of view for one surface size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub width_px: f64,
    pub height_px: f64,
    pub horizontal_rad: f64,
    pub vertical_rad: f64,
    /// Width of the visible window on the near plane
    pub near_width: f64,
    /// Height of the visible window on the near plane
    pub near_height: f64,
}

impl FieldOfView {
    /// Extents for a surface; `None` when either dimension is not positive
    pub fn new(width_px: f64, height_px: f64, horizontal_fov_deg: f64, near_plane: f64) -> Option<Self> {
        if !(width_px > 0.0 && height_px > 0.0) {
            return None;
        }
        Some(Self::compute(width_px, height_px, horizontal_fov_deg, near_plane))
    }

    fn compute(width_px: f64, height_px: f64, horizontal_fov_deg: f64, near_plane: f64) -> Self {
        let horizontal_rad = horizontal_fov_deg.to_radians();
        let near_width = 2.0 * near_plane * (horizontal_rad / 2.0).tan();

        // Square pixels: the near window keeps the surface aspect ratio.
        let near_height = near_width * height_px / width_px;
        let vertical_rad = 2.0 * (near_height / (2.0 * near_plane)).atan();

        Self {
            width_px,
            height_px,
            horizontal_rad,
            vertical_rad,
            near_width,
            near_height,
        }
    }
}

/// Perspective camera over the ground grid
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    fov: FieldOfView,
}

impl Camera {
    /// Camera for a surface of the given size
    ///
    /// A degenerate size falls back to a 1x1 surface until the first valid
    /// [`Camera::resize`].
    pub fn new(config: CameraConfig, width_px: f64, height_px: f64) -> Self {
        let fov = match FieldOfView::new(width_px, height_px, config.horizontal_fov_deg, config.near_plane) {
            Some(fov) => fov,
            None => {
                tracing::warn!(width_px, height_px, "degenerate surface size, using 1x1");
                FieldOfView::compute(1.0, 1.0, config.horizontal_fov_deg, config.near_plane)
            }
        };

        Self { config, fov }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn field_of_view(&self) -> &FieldOfView {
        &self.fov
    }

    pub fn near_plane(&self) -> f64 {
        self.config.near_plane
    }

    /// Recompute the field-of-view extents for a new surface size
    ///
    /// Returns false and keeps the previous extents if the size is degenerate.
    pub fn resize(&mut self, width_px: f64, height_px: f64) -> bool {
        match FieldOfView::new(width_px, height_px, self.config.horizontal_fov_deg, self.config.near_plane) {
            Some(fov) => {
                self.fov = fov;
                true
            }
            None => {
                tracing::warn!(width_px, height_px, "ignoring resize to degenerate surface");
                false
            }
        }
    }

    /// Transform a lattice point into view space
    pub fn to_view_space(&self, pose: &CameraPose, point: &GridPoint) -> ViewPoint {
        // Lattice frame to viewer-centred ground frame.
        let ground = point - pose.anchor;

        // Yaw: heading 90 turns the east axis into the forward axis.
        let yawed = Rotation2::new(pose.heading_deg.to_radians()) * ground;

        // Pitch about the lateral axis; the ground sits eye_height below the eye.
        let eye_relative = Vector3::new(yawed.x, yawed.y, -self.config.eye_height);
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), -pose.pitch_deg().to_radians());
        let mut view = tilt * eye_relative;

        view.y += self.config.backup_distance;
        view
    }

    /// Perspective-project a view-space point onto the drawing surface
    ///
    /// Returns `None` for points with a forward distance below
    /// [`PROJECTION_EPSILON`] or a non-finite result.
    pub fn project(&self, point: &ViewPoint) -> Option<ScreenPoint> {
        if !(point.y >= PROJECTION_EPSILON) {
            return None;
        }

        // Slide along the ray onto the near plane.
        let depth_scale = self.config.near_plane / point.y;
        let near_x = point.x * depth_scale;
        let near_z = point.z * depth_scale;

        // Near-plane window to pixels, y flipped, origin at the centre.
        let x = near_x / self.fov.near_width * self.fov.width_px + self.fov.width_px / 2.0;
        let y = -near_z / self.fov.near_height * self.fov.height_px + self.fov.height_px / 2.0;

        if x.is_finite() && y.is_finite() {
            Some(ScreenPoint::new(x, y))
        } else {
            None
        }
    }

    /// Whether a view-space point lies on or beyond the near plane
    pub fn is_visible(&self, point: &ViewPoint) -> bool {
        point.y >= self.config.near_plane
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(CameraConfig::default(), 800.0, 600.0)
    }

    fn level_pose(heading_deg: f64) -> CameraPose {
        CameraPose::new(heading_deg, 90.0, GridPoint::zeros())
    }

    #[test]
    fn test_level_camera_keeps_ground_below_eye() {
        let camera = camera();
        let view = camera.to_view_space(&level_pose(0.0), &GridPoint::new(0.0, 10.0));

        assert_relative_eq!(view.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(view.y, 10.0 + camera.config().backup_distance, epsilon = 1e-12);
        assert_relative_eq!(view.z, -camera.config().eye_height, epsilon = 1e-12);
    }

    #[test]
    fn test_heading_turns_east_into_forward() {
        let camera = camera();
        let view = camera.to_view_space(&level_pose(90.0), &GridPoint::new(5.0, 0.0));

        assert_relative_eq!(view.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(view.y, 5.0 + camera.config().backup_distance, epsilon = 1e-12);
    }

    #[test]
    fn test_looking_down_maps_forward_to_up() {
        let camera = camera();
        let pose = CameraPose::new(0.0, 0.0, GridPoint::zeros());
        let view = camera.to_view_space(&pose, &GridPoint::new(0.0, 4.0));

        // Straight down: every ground point is eye_height + backup away.
        let cfg = camera.config();
        assert_relative_eq!(view.y, cfg.eye_height + cfg.backup_distance, epsilon = 1e-12);
        assert_relative_eq!(view.z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_anchor_is_subtracted() {
        let camera = camera();
        let anchor = GridPoint::new(0.3, 0.6);
        let pose = CameraPose::new(0.0, 90.0, anchor);

        let at_anchor = camera.to_view_space(&pose, &anchor);
        assert_relative_eq!(at_anchor.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(at_anchor.y, camera.config().backup_distance, epsilon = 1e-12);
    }

    #[test]
    fn test_project_centre_and_flip() {
        let camera = camera();

        let centre = camera.project(&ViewPoint::new(0.0, 5.0, 0.0)).unwrap();
        assert_relative_eq!(centre.x, 400.0, epsilon = 1e-9);
        assert_relative_eq!(centre.y, 300.0, epsilon = 1e-9);

        let above = camera.project(&ViewPoint::new(1.0, 5.0, 1.0)).unwrap();
        assert!(above.x > 400.0);
        assert!(above.y < 300.0);
    }

    #[test]
    fn test_project_is_repeatable() {
        let camera = camera();
        let p = ViewPoint::new(-1.25, 7.5, 0.4);

        assert_eq!(camera.project(&p), camera.project(&p));
    }

    #[test]
    fn test_project_rejects_points_at_eye() {
        let camera = camera();

        assert!(camera.project(&ViewPoint::new(1.0, 0.0, 1.0)).is_none());
        assert!(camera.project(&ViewPoint::new(1.0, -3.0, 1.0)).is_none());
        assert!(camera.project(&ViewPoint::new(1.0, f64::NAN, 1.0)).is_none());
    }

    #[test]
    fn test_fov_edge_maps_to_surface_edge() {
        let camera = camera();
        let fov = *camera.field_of_view();
        let near = camera.near_plane();

        // A point at the right edge of the near-plane window.
        let edge = camera.project(&ViewPoint::new(fov.near_width / 2.0, near, 0.0)).unwrap();
        assert_relative_eq!(edge.x, 800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_resize_scales_horizontal_extent() {
        let mut camera = camera();
        let p = ViewPoint::new(1.0, 5.0, 0.0);

        let before = camera.project(&p).unwrap().x - 400.0;
        assert!(camera.resize(1600.0, 600.0));
        let after = camera.project(&p).unwrap().x - 800.0;

        assert_relative_eq!(after, before * 2.0, max_relative = 1e-9);
    }

    #[test]
    fn test_tall_surface_keeps_up_above_midline() {
        let camera = Camera::new(CameraConfig::default(), 300.0, 1400.0);
        let fov = camera.field_of_view();

        assert!(fov.near_height > 0.0);
        assert!(fov.vertical_rad > 0.0 && fov.vertical_rad < std::f64::consts::PI);

        let above = camera.project(&ViewPoint::new(0.0, 5.0, 1.0)).unwrap();
        assert!(above.y < 700.0);
    }

    #[test]
    fn test_pixels_are_square() {
        let camera = camera();
        let centre = camera.project(&ViewPoint::new(0.0, 5.0, 0.0)).unwrap();
        let right = camera.project(&ViewPoint::new(1.0, 5.0, 0.0)).unwrap();
        let up = camera.project(&ViewPoint::new(0.0, 5.0, 1.0)).unwrap();

        assert_relative_eq!(right.x - centre.x, centre.y - up.y, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_resize_is_ignored() {
        let mut camera = camera();
        let before = *camera.field_of_view();

        assert!(!camera.resize(0.0, 600.0));
        assert_eq!(*camera.field_of_view(), before);
    }
}
