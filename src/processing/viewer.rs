//! Viewer position and orientation carried across frames
//!
//! Sensor collaborators write the latest fix and orientation through the
//! update methods; the frame loop calls [`ViewerState::advance_frame`] once
//! per frame to move the smoothed render position. Everything runs on one
//! thread, so an update always lands entirely before or after a frame.

use std::time::Instant;

use crate::algorithms::camera::CameraPose;
use crate::algorithms::geodesy::GeoCoordinate;
use crate::algorithms::local_grid::LocalGridMapper;
use crate::core::{MAX_TILT_DEG, MIN_TILT_DEG};
use crate::processing::smoothing::{PositionSmoother, SmoothingStep};
use crate::utils::config::GridConfig;

/// Latest sensor readings plus the smoothed position the grid is drawn from
///
/// Heading is kept in [0, 360) and tilt in [0, 90]; readings outside those
/// ranges are normalised or clamped on the way in.
pub struct ViewerState {
    true_position: GeoCoordinate,
    render_position: GeoCoordinate,
    heading_deg: f64,
    tilt_deg: f64,
    speed_mps: Option<f64>,
    accuracy_m: Option<f64>,
    fix_count: u64,
    last_fix_jump_m: Option<f64>,
    mapper: LocalGridMapper,
    smoother: PositionSmoother,
}

impl ViewerState {
    /// Viewer resting at `initial`, facing north and looking straight down
    pub fn new(initial: GeoCoordinate, config: &GridConfig) -> Self {
        Self {
            true_position: initial,
            render_position: initial,
            heading_deg: 0.0,
            tilt_deg: MIN_TILT_DEG,
            speed_mps: None,
            accuracy_m: None,
            fix_count: 0,
            last_fix_jump_m: None,
            mapper: LocalGridMapper::new(initial, config.meters_per_gridline, config.gridline_spacing),
            smoother: PositionSmoother::new(&config.smoothing),
        }
    }

    /// Record a new position fix
    ///
    /// The coordinate is taken as is. A missing or non-finite speed or
    /// accuracy leaves the previous value in place.
    pub fn update_true_position(&mut self, position: GeoCoordinate, speed_mps: Option<f64>, accuracy_m: Option<f64>) {
        let jump_m = self.true_position.distance_to(&position);

        self.true_position = position;
        self.fix_count += 1;
        self.last_fix_jump_m = Some(jump_m);

        if let Some(speed) = speed_mps.filter(|s| s.is_finite()) {
            self.speed_mps = Some(speed);
        }
        if let Some(accuracy) = accuracy_m.filter(|a| a.is_finite()) {
            self.accuracy_m = Some(accuracy);
        }

        tracing::debug!(
            lat = position.latitude,
            lng = position.longitude,
            jump_m,
            fixes = self.fix_count,
            speed_mps = ?self.speed_mps,
            accuracy_m = ?self.accuracy_m,
            "position fix"
        );
    }

    /// Apply an orientation reading; `None` fields are left unchanged
    pub fn update_orientation(&mut self, heading_deg: Option<f64>, tilt_deg: Option<f64>) {
        if let Some(heading) = heading_deg {
            self.set_heading(heading);
        }
        if let Some(tilt) = tilt_deg {
            self.set_tilt(tilt);
        }
    }

    /// Set the compass heading, normalized into [0, 360); non-finite values are ignored
    pub fn set_heading(&mut self, heading_deg: f64) {
        if heading_deg.is_finite() {
            self.heading_deg = heading_deg.rem_euclid(360.0);
        }
    }

    /// Set the tilt, clamped into [0, 90]; non-finite values are ignored
    pub fn set_tilt(&mut self, tilt_deg: f64) {
        if tilt_deg.is_finite() {
            self.tilt_deg = tilt_deg.clamp(MIN_TILT_DEG, MAX_TILT_DEG);
        }
    }

    /// Relative heading/tilt adjustment, as from arrow keys
    pub fn nudge(&mut self, d_heading_deg: f64, d_tilt_deg: f64) {
        self.set_heading(self.heading_deg + d_heading_deg);
        self.set_tilt(self.tilt_deg + d_tilt_deg);
    }

    /// Move the render position for a frame drawn at `now`
    ///
    /// Returns the smoothing step taken. The local linearization is rebuilt
    /// at the new render position every frame.
    pub fn advance_frame(&mut self, now: Instant) -> SmoothingStep {
        let dt = self.smoother.frame_dt(now);
        let step = self.smoother.step(self.render_position, self.true_position, &self.mapper, dt);

        if let SmoothingStep::Snapped(p) = step {
            tracing::debug!(lat = p.latitude, lng = p.longitude, "render position snapped to fix");
        }

        self.render_position = step.position();
        self.mapper.rebase(self.render_position);
        step
    }

    /// Camera pose for the current orientation and render position
    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.heading_deg, self.tilt_deg, self.mapper.sub_cell_offset())
    }

    pub fn true_position(&self) -> GeoCoordinate {
        self.true_position
    }

    pub fn render_position(&self) -> GeoCoordinate {
        self.render_position
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    pub fn tilt_deg(&self) -> f64 {
        self.tilt_deg
    }

    pub fn speed_mps(&self) -> Option<f64> {
        self.speed_mps
    }

    pub fn accuracy_m(&self) -> Option<f64> {
        self.accuracy_m
    }

    pub fn fix_count(&self) -> u64 {
        self.fix_count
    }

    /// Distance between the two most recent fixes (meters)
    pub fn last_fix_jump_m(&self) -> Option<f64> {
        self.last_fix_jump_m
    }

    pub fn mapper(&self) -> &LocalGridMapper {
        &self.mapper
    }
}
