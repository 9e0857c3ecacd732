//! End-to-end frames through GroundGridView onto a RecordingSurface

use approx::assert_relative_eq;
use std::time::{Duration, Instant};

use ground_grid::{
    GeoCoordinate, GridConfig, GroundGridView, LocalGridMapper, OrientationReading, PositionFix, RecordingSurface,
};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

fn small_config() -> GridConfig {
    GridConfig { gridline_count: 10, ..GridConfig::default() }
}

fn view_at(lat: f64, lng: f64) -> (GroundGridView, RecordingSurface) {
    (
        GroundGridView::new(small_config(), GeoCoordinate::new(lat, lng), WIDTH, HEIGHT),
        RecordingSurface::new(WIDTH, HEIGHT),
    )
}

#[test]
fn test_line_ahead_renders_in_upper_half() {
    let (mut view, mut surface) = view_at(0.0, 0.0);
    view.update_orientation(OrientationReading::new(Some(0.0), Some(0.0)));
    view.render_frame(Instant::now(), &mut surface);

    // Top-down: nothing is culled, rows come first in index order -10..=10.
    let stats = view.last_frame_stats();
    assert_eq!(stats.lines_culled, 0);
    let lines: Vec<_> = surface.lines().collect();
    assert_eq!(lines.len(), 42);

    let (ahead_from, ahead_to, _) = lines[20];
    assert!(ahead_from.y < HEIGHT / 2.0);
    assert!(ahead_to.y < HEIGHT / 2.0);

    let (behind_from, _, _) = lines[0];
    assert!(behind_from.y > HEIGHT / 2.0);

    let (centre_from, _, _) = lines[10];
    assert_relative_eq!(centre_from.y, HEIGHT / 2.0, epsilon = 1e-9);
}

#[test]
fn test_resize_rescales_horizontal_extent() {
    let (mut view, mut surface) = view_at(0.0, 0.0);
    let t0 = Instant::now();

    view.render_frame(t0, &mut surface);
    let before: Vec<f64> = surface.lines().map(|(from, _, _)| from.x - WIDTH / 2.0).collect();

    view.on_resize(2.0 * WIDTH, HEIGHT);
    surface.resize(2.0 * WIDTH, HEIGHT);
    view.render_frame(t0 + Duration::from_millis(33), &mut surface);
    let after: Vec<f64> = surface.lines().map(|(from, _, _)| from.x - WIDTH).collect();

    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(&after) {
        assert_relative_eq!(*a, 2.0 * *b, epsilon = 1e-6);
    }
}

#[test]
fn test_large_jump_snaps_exactly() {
    let (mut view, mut surface) = view_at(47.6062, -122.3321);
    let t0 = Instant::now();
    view.render_frame(t0, &mut surface);

    let relock = GeoCoordinate::new(47.6162, -122.3221);
    view.update_true_position(PositionFix::new(relock.latitude, relock.longitude));
    view.render_frame(t0 + Duration::from_millis(33), &mut surface);

    assert_eq!(view.viewer().render_position(), relock);
}

#[test]
fn test_grid_stays_anchored_to_ground() {
    let (mut origin_view, mut origin_surface) = view_at(0.0, 0.0);
    origin_view.render_frame(Instant::now(), &mut origin_surface);

    let mapper = LocalGridMapper::new(GeoCoordinate::new(0.0, 0.0), 10.0, 1.0);
    let (_, cell_lng) = mapper.cell_size_degrees();
    let (mut shifted_view, mut shifted_surface) = view_at(0.0, cell_lng * 0.25);
    shifted_view.render_frame(Instant::now(), &mut shifted_surface);

    // Column 0 is the 11th column (after 21 rows).
    let (origin_col, _, _) = origin_surface.lines().nth(31).unwrap();
    let (shifted_col, _, _) = shifted_surface.lines().nth(31).unwrap();

    assert_relative_eq!(origin_col.x, WIDTH / 2.0, epsilon = 1e-9);
    // Walking east slides the lattice west on screen.
    assert!(shifted_col.x < WIDTH / 2.0);
}

#[test]
fn test_facing_east_puts_south_on_the_right() {
    let (mut view, mut surface) = view_at(0.0, 0.0);
    view.update_orientation(OrientationReading::new(Some(90.0), Some(90.0)));
    view.render_frame(Instant::now(), &mut surface);

    let horizontal: Vec<_> = surface
        .lines()
        .filter(|(from, to, _)| (from.y - to.y).abs() < 1e-6)
        .collect();
    assert!(!horizontal.is_empty());

    // North-south columns run across the screen, south end (start) on the right.
    for (from, to, _) in horizontal {
        assert!(from.x > to.x);
    }
}

#[test]
fn test_level_view_culls_lines_behind_and_keeps_output_finite() {
    let (mut view, mut surface) = view_at(0.0, 0.0);
    view.update_orientation(OrientationReading::from_device(Some(0.0), Some(90.0), None));
    view.render_frame(Instant::now(), &mut surface);

    let stats = view.last_frame_stats();
    assert_eq!(stats.lines_culled, 9);
    assert_eq!(stats.lines_drawn, 33);
    assert!(stats.marker_drawn);

    for (from, to, _) in surface.lines() {
        assert!(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite());
    }
}

#[test]
fn test_dimmer_grid_toward_horizon() {
    let brightest = |tilt: f64| {
        let (mut view, mut surface) = view_at(0.0, 0.0);
        view.update_orientation(OrientationReading::new(None, Some(tilt)));
        view.render_frame(Instant::now(), &mut surface);
        surface.lines().map(|(_, _, color)| color.r).max().unwrap()
    };

    assert!(brightest(0.0) > brightest(60.0));
    assert!(brightest(60.0) > brightest(90.0));
}
