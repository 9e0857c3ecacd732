//! Live ground grid view driven by sensor and frame callbacks

use std::time::Instant;

use crate::algorithms::camera::Camera;
use crate::algorithms::geodesy::GeoCoordinate;
use crate::api::types::{OrientationReading, PositionFix};
use crate::processing::viewer::ViewerState;
use crate::render::grid::{FrameStats, GridRenderer};
use crate::render::surface::DrawingSurface;
use crate::utils::config::GridConfig;

/// Owns the viewer state, camera and renderer for one drawing surface
///
/// Location and orientation collaborators call the `update_*` methods as
/// readings arrive; the host loop calls [`GroundGridView::render_frame`] at
/// roughly the configured frame rate.
pub struct GroundGridView {
    config: GridConfig,
    viewer: ViewerState,
    camera: Camera,
    renderer: GridRenderer,
    last_stats: FrameStats,
    frames: u64,
    /// Last surface size the camera refused
    rejected_size: Option<(f64, f64)>,
}

impl GroundGridView {
    pub fn new(config: GridConfig, initial: GeoCoordinate, width_px: f64, height_px: f64) -> Self {
        Self {
            viewer: ViewerState::new(initial, &config),
            camera: Camera::new(config.camera.clone(), width_px, height_px),
            renderer: GridRenderer::new(&config),
            last_stats: FrameStats::default(),
            frames: 0,
            rejected_size: None,
            config,
        }
    }

    pub fn update_true_position(&mut self, fix: PositionFix) {
        self.viewer.update_true_position(fix.coordinate, fix.speed_mps, fix.accuracy_m);
    }

    pub fn update_orientation(&mut self, reading: OrientationReading) {
        self.viewer.update_orientation(reading.heading_deg, reading.tilt_deg);
        tracing::debug!(
            heading = self.viewer.heading_deg(),
            tilt = self.viewer.tilt_deg(),
            "orientation update"
        );
    }

    /// Manual heading/tilt adjustment in degrees
    pub fn nudge(&mut self, d_heading_deg: f64, d_tilt_deg: f64) {
        self.viewer.nudge(d_heading_deg, d_tilt_deg);
    }

    /// Recompute the field of view for a new surface size
    pub fn on_resize(&mut self, width_px: f64, height_px: f64) {
        if self.camera.resize(width_px, height_px) {
            self.rejected_size = None;
            tracing::debug!(width_px, height_px, "field of view recomputed");
        } else {
            self.rejected_size = Some((width_px, height_px));
        }
    }

    /// Advance the smoothed position and draw one frame at `now`
    ///
    /// A surface whose size no longer matches the field of view is treated
    /// as resized before drawing. A size the camera already refused is not
    /// retried until it changes.
    pub fn render_frame<S: DrawingSurface + ?Sized>(&mut self, now: Instant, surface: &mut S) {
        let size = surface.size();
        let fov = self.camera.field_of_view();
        if (fov.width_px, fov.height_px) != size && self.rejected_size != Some(size) {
            self.on_resize(size.0, size.1);
        }

        self.viewer.advance_frame(now);
        let pose = self.viewer.pose();

        self.last_stats = self.renderer.render(&self.camera, &pose, surface);
        self.frames += 1;
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::RecordingSurface;
    use std::time::Duration;

    #[test]
    fn test_surface_size_change_triggers_resize() {
        let mut view = GroundGridView::new(GridConfig::default(), GeoCoordinate::new(0.0, 0.0), 800.0, 600.0);
        let mut surface = RecordingSurface::new(1024.0, 768.0);

        view.render_frame(Instant::now(), &mut surface);

        assert_eq!(view.camera().field_of_view().width_px, 1024.0);
        assert_eq!(view.camera().field_of_view().height_px, 768.0);
        assert_eq!(view.frame_count(), 1);
    }

    #[test]
    fn test_degenerate_surface_is_tried_once() {
        let mut view = GroundGridView::new(GridConfig::default(), GeoCoordinate::new(0.0, 0.0), 800.0, 600.0);
        let mut surface = RecordingSurface::new(0.0, 0.0);
        let t0 = Instant::now();

        view.render_frame(t0, &mut surface);
        assert_eq!(view.rejected_size, Some((0.0, 0.0)));
        view.render_frame(t0 + Duration::from_millis(33), &mut surface);
        assert_eq!(view.camera().field_of_view().width_px, 800.0);

        // Restored surface is picked up again.
        surface.resize(640.0, 480.0);
        view.render_frame(t0 + Duration::from_millis(66), &mut surface);
        assert_eq!(view.rejected_size, None);
        assert_eq!(view.camera().field_of_view().width_px, 640.0);
    }

    #[test]
    fn test_negative_dt_limit_does_not_break_frames() {
        let mut config = GridConfig::default();
        config.smoothing.max_frame_dt_s = -1.0;
        let mut view = GroundGridView::new(config, GeoCoordinate::new(0.0, 0.0), 800.0, 600.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let t0 = Instant::now();

        view.render_frame(t0, &mut surface);
        view.update_true_position(PositionFix::new(0.0001, 0.0001));
        view.render_frame(t0 + Duration::from_millis(33), &mut surface);

        assert_eq!(view.frame_count(), 2);
        assert_ne!(view.viewer().render_position(), GeoCoordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_orientation_flows_into_frame() {
        let mut view = GroundGridView::new(GridConfig::default(), GeoCoordinate::new(0.0, 0.0), 800.0, 600.0);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let t0 = Instant::now();

        view.render_frame(t0, &mut surface);
        let top_down = view.last_frame_stats();
        assert_eq!(top_down.lines_culled, 0);

        view.update_orientation(OrientationReading::new(None, Some(90.0)));
        view.render_frame(t0 + Duration::from_millis(33), &mut surface);
        let level = view.last_frame_stats();

        assert!(level.lines_culled > 0);
        assert_eq!(view.viewer().tilt_deg(), 90.0);
    }
}
