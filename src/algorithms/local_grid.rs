//! Local planar grid around the rendered viewer position
//!
//! The curved surface is linearized at a reference coordinate: one degree of
//! latitude and one degree of longitude are measured with the haversine
//! distance and inverted into degrees-per-meter scale factors. This is only
//! accurate for offsets far below one degree, which holds for a grid that
//! spans a few hundred meters. Near the poles the longitude scale grows
//! without bound and results are unspecified.

use serde::{Deserialize, Serialize};

use crate::algorithms::geodesy::GeoCoordinate;
use crate::core::GridPoint;

/// Degrees of latitude/longitude per meter at a reference point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    pub degrees_per_meter_lat: f64,
    pub degrees_per_meter_lng: f64,
}

impl ScaleFactors {
    /// Linearize the surface at `reference`
    pub fn at(reference: &GeoCoordinate) -> Self {
        let meters_per_degree_lat = reference.distance_to(&reference.offset_by(1.0, 0.0));
        let meters_per_degree_lng = reference.distance_to(&reference.offset_by(0.0, 1.0));

        Self {
            degrees_per_meter_lat: 1.0 / meters_per_degree_lat,
            degrees_per_meter_lng: 1.0 / meters_per_degree_lng,
        }
    }
}

/// Maps geographic coordinates near a reference point into grid units
///
/// One gridline cell spans `meters_per_gridline` meters on the ground and
/// `gridline_spacing` grid units on the lattice.
#[derive(Debug, Clone)]
pub struct LocalGridMapper {
    reference: GeoCoordinate,
    scale: ScaleFactors,
    meters_per_gridline: f64,
    gridline_spacing: f64,
}

impl LocalGridMapper {
    pub fn new(reference: GeoCoordinate, meters_per_gridline: f64, gridline_spacing: f64) -> Self {
        Self {
            scale: ScaleFactors::at(&reference),
            reference,
            meters_per_gridline,
            gridline_spacing,
        }
    }

    /// Move the reference point and recompute the linearization
    pub fn rebase(&mut self, reference: GeoCoordinate) {
        self.reference = reference;
        self.scale = ScaleFactors::at(&reference);
    }

    pub fn reference(&self) -> GeoCoordinate {
        self.reference
    }

    pub fn scale(&self) -> ScaleFactors {
        self.scale
    }

    pub fn grid_units_per_meter(&self) -> f64 {
        self.gridline_spacing / self.meters_per_gridline
    }

    /// Size of one lattice cell in degrees as (latitude, longitude)
    pub fn cell_size_degrees(&self) -> (f64, f64) {
        (
            self.meters_per_gridline * self.scale.degrees_per_meter_lat,
            self.meters_per_gridline * self.scale.degrees_per_meter_lng,
        )
    }

    /// Position of the reference inside its lattice cell, in grid units
    ///
    /// Both components lie in `[0, gridline_spacing)`, so the lattice stays
    /// pinned to real-world coordinates as the reference moves.
    pub fn sub_cell_offset(&self) -> GridPoint {
        let (cell_lat, cell_lng) = self.cell_size_degrees();

        let east_fraction = self.reference.longitude.rem_euclid(cell_lng) / cell_lng;
        let north_fraction = self.reference.latitude.rem_euclid(cell_lat) / cell_lat;

        GridPoint::new(
            east_fraction * self.gridline_spacing,
            north_fraction * self.gridline_spacing,
        )
    }

    /// Offset of `coord` from the reference in grid units (x east, y north)
    pub fn to_grid(&self, coord: &GeoCoordinate) -> GridPoint {
        let east_m = (coord.longitude - self.reference.longitude) / self.scale.degrees_per_meter_lng;
        let north_m = (coord.latitude - self.reference.latitude) / self.scale.degrees_per_meter_lat;

        GridPoint::new(east_m, north_m) * self.grid_units_per_meter()
    }

    /// Inverse of [`LocalGridMapper::to_grid`]
    pub fn to_geo(&self, point: &GridPoint) -> GeoCoordinate {
        let meters = point / self.grid_units_per_meter();

        self.reference.offset_by(
            meters.y * self.scale.degrees_per_meter_lat,
            meters.x * self.scale.degrees_per_meter_lng,
        )
    }

    /// Per-axis degree distance beyond which the render position snaps
    /// instead of easing, as (latitude, longitude)
    pub fn snap_threshold_degrees(&self, gridlines: f64) -> (f64, f64) {
        let (cell_lat, cell_lng) = self.cell_size_degrees();
        (gridlines * cell_lat, gridlines * cell_lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_factors_at_equator() {
        let scale = ScaleFactors::at(&GeoCoordinate::new(0.0, 0.0));

        assert_relative_eq!(1.0 / scale.degrees_per_meter_lat, 111_195.0, max_relative = 1e-3);
        assert_relative_eq!(
            scale.degrees_per_meter_lat,
            scale.degrees_per_meter_lng,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_rebase_recomputes_longitude_scale() {
        let mut mapper = LocalGridMapper::new(GeoCoordinate::new(0.0, 0.0), 10.0, 1.0);
        let equator = mapper.scale();

        mapper.rebase(GeoCoordinate::new(60.0, 0.0));
        let north = mapper.scale();

        assert_relative_eq!(north.degrees_per_meter_lng / equator.degrees_per_meter_lng, 2.0, max_relative = 1e-3);
    }

    #[test]
    fn test_sub_cell_offset_tracks_fraction() {
        let base = GeoCoordinate::new(0.0, 0.0);
        let mapper = LocalGridMapper::new(base, 10.0, 1.0);
        let (cell_lat, cell_lng) = mapper.cell_size_degrees();

        let quarter = LocalGridMapper::new(
            GeoCoordinate::new(cell_lat * 0.75, cell_lng * 0.25),
            10.0,
            1.0,
        );
        let offset = quarter.sub_cell_offset();

        assert_relative_eq!(offset.x, 0.25, epsilon = 1e-6);
        assert_relative_eq!(offset.y, 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_sub_cell_offset_negative_coordinates() {
        let mapper = LocalGridMapper::new(GeoCoordinate::new(-33.8688, -151.2093), 10.0, 2.0);
        let offset = mapper.sub_cell_offset();

        assert!(offset.x >= 0.0 && offset.x < 2.0);
        assert!(offset.y >= 0.0 && offset.y < 2.0);
    }

    #[test]
    fn test_grid_conversion_near_reference() {
        let reference = GeoCoordinate::new(47.6062, -122.3321);
        let mapper = LocalGridMapper::new(reference, 10.0, 1.0);
        let scale = mapper.scale();

        // 50 m north and 20 m east is 5 and 2 cells.
        let target = reference.offset_by(50.0 * scale.degrees_per_meter_lat, 20.0 * scale.degrees_per_meter_lng);
        let grid = mapper.to_grid(&target);

        assert_relative_eq!(grid.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(grid.y, 5.0, epsilon = 1e-9);

        let back = mapper.to_geo(&grid);
        assert_relative_eq!(back.latitude, target.latitude, epsilon = 1e-12);
        assert_relative_eq!(back.longitude, target.longitude, epsilon = 1e-12);

        // The linearization agrees with the haversine distance at this scale.
        let haversine = reference.distance_to(&target);
        assert_relative_eq!(haversine, (50.0f64.powi(2) + 20.0f64.powi(2)).sqrt(), max_relative = 1e-3);
    }

    #[test]
    fn test_snap_threshold() {
        let mapper = LocalGridMapper::new(GeoCoordinate::new(0.0, 0.0), 10.0, 1.0);
        let (lat, lng) = mapper.snap_threshold_degrees(10.0);

        assert_relative_eq!(lat, 100.0 * mapper.scale().degrees_per_meter_lat, max_relative = 1e-12);
        assert_relative_eq!(lng, 100.0 * mapper.scale().degrees_per_meter_lng, max_relative = 1e-12);
    }
}
