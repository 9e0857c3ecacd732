//! Input types passed in by the sensor collaborators

use serde::{Deserialize, Serialize};

use crate::algorithms::geodesy::GeoCoordinate;
use crate::core::{MAX_TILT_DEG, MIN_TILT_DEG};

/// Position fix from a location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub coordinate: GeoCoordinate,
    /// Ground speed (m/s); `None` or NaN leaves the previous value
    pub speed_mps: Option<f64>,
    /// Horizontal accuracy radius (m)
    pub accuracy_m: Option<f64>,
}

impl PositionFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinate: GeoCoordinate::new(latitude, longitude),
            speed_mps: None,
            accuracy_m: None,
        }
    }

    pub fn with_speed(mut self, speed_mps: f64) -> Self {
        self.speed_mps = Some(speed_mps);
        self
    }

    pub fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// Orientation reading; absent fields mean "no new data"
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientationReading {
    /// Compass heading, degrees clockwise from north
    pub heading_deg: Option<f64>,
    /// Degrees above straight down, 90 = horizon
    pub tilt_deg: Option<f64>,
}

impl OrientationReading {
    pub fn new(heading_deg: Option<f64>, tilt_deg: Option<f64>) -> Self {
        Self { heading_deg, tilt_deg }
    }

    /// Convert a raw device-orientation event
    ///
    /// `alpha` is the device yaw (counter-clockwise), `beta` the front-back
    /// pitch (0 lying flat, 90 held upright) and `compass_heading` a
    /// clockwise compass reading that takes precedence over `alpha` when the
    /// platform provides one. Missing or non-finite inputs yield `None`.
    pub fn from_device(alpha: Option<f64>, beta: Option<f64>, compass_heading: Option<f64>) -> Self {
        let heading_deg = compass_heading
            .filter(|h| h.is_finite())
            .or_else(|| alpha.filter(|a| a.is_finite()).map(|a| 360.0 - a))
            .map(|h| h.rem_euclid(360.0));

        let tilt_deg = beta.filter(|b| b.is_finite()).map(|b| {
            // Wrap into (-180, 180] before clamping so 270 reads as -90.
            let mut wrapped = b.rem_euclid(360.0);
            if wrapped > 180.0 {
                wrapped -= 360.0;
            }
            wrapped.clamp(MIN_TILT_DEG, MAX_TILT_DEG)
        });

        Self { heading_deg, tilt_deg }
    }
}
