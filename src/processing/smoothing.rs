use std::time::Instant;

use crate::algorithms::geodesy::GeoCoordinate;
use crate::algorithms::local_grid::LocalGridMapper;
use crate::utils::config::SmoothingConfig;

/// What one smoothing step did to the render position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingStep {
    /// The target was too far away; the render position jumped onto it
    Snapped(GeoCoordinate),
    /// The render position moved part of the way toward the target
    Eased(GeoCoordinate),
}

impl SmoothingStep {
    pub fn position(&self) -> GeoCoordinate {
        match *self {
            SmoothingStep::Snapped(p) | SmoothingStep::Eased(p) => p,
        }
    }
}

/// First-order filter pulling the render position toward the latest fix
///
/// Each frame closes `dt` (seconds, clamped to `[0, max_frame_dt_s]`) of the
/// remaining gap per axis. Gaps beyond `snap_threshold_lines` gridlines are
/// treated as discontinuities and closed at once.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    snap_threshold_lines: f64,
    max_frame_dt_s: f64,
    last_frame: Option<Instant>,
}

impl PositionSmoother {
    /// A non-positive or non-finite `max_frame_dt_s` falls back to the default
    pub fn new(config: &SmoothingConfig) -> Self {
        let max_frame_dt_s = if config.max_frame_dt_s > 0.0 && config.max_frame_dt_s.is_finite() {
            config.max_frame_dt_s
        } else {
            let fallback = SmoothingConfig::default().max_frame_dt_s;
            tracing::warn!(max_frame_dt_s = config.max_frame_dt_s, fallback, "invalid frame dt limit");
            fallback
        };

        Self {
            snap_threshold_lines: config.snap_threshold_lines,
            max_frame_dt_s,
            last_frame: None,
        }
    }

    /// Seconds since the previous frame, clamped; zero on the first frame
    pub fn frame_dt(&mut self, now: Instant) -> f64 {
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        dt.clamp(0.0, self.max_frame_dt_s)
    }

    /// Move `render` toward `target`; `mapper` must be based at `render`
    pub fn step(
        &self,
        render: GeoCoordinate,
        target: GeoCoordinate,
        mapper: &LocalGridMapper,
        dt: f64,
    ) -> SmoothingStep {
        let (threshold_lat, threshold_lng) = mapper.snap_threshold_degrees(self.snap_threshold_lines);
        let d_lat = target.latitude - render.latitude;
        let d_lng = target.longitude - render.longitude;

        if d_lat.abs() > threshold_lat || d_lng.abs() > threshold_lng {
            return SmoothingStep::Snapped(target);
        }

        SmoothingStep::Eased(render.offset_by(d_lat * dt, d_lng * dt))
    }

    /// Forget the previous frame time
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
