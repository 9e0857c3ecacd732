//! Spherical-Earth geodesy for the viewer position
//!
//! Distances use the haversine formula on a sphere of radius
//! [`EARTH_RADIUS_M`]; bearings use the forward-azimuth formula. Inputs are
//! plain degrees and are not range checked: latitudes outside [-90, 90],
//! longitudes outside [-180, 180] or non-finite values give unspecified
//! (but non-panicking) results.

use serde::{Deserialize, Serialize};

use crate::core::EARTH_RADIUS_M;

/// Point on the Earth's surface in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &GeoCoordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_phi = (other.latitude - self.latitude).to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }

    /// Initial bearing toward `other` in radians, clockwise from north,
    /// in (-pi, pi]
    pub fn bearing_to(&self, other: &GeoCoordinate) -> f64 {
        let phi1 = self.latitude.to_radians();
        let phi2 = other.latitude.to_radians();
        let delta_lambda = (other.longitude - self.longitude).to_radians();

        let y = delta_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

        y.atan2(x)
    }

    /// Same point shifted by whole-degree deltas (no wrapping)
    pub fn offset_by(&self, d_lat: f64, d_lng: f64) -> GeoCoordinate {
        GeoCoordinate::new(self.latitude + d_lat, self.longitude + d_lng)
    }
}
