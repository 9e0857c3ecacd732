//! Per-frame ground grid drawing
//!
//! `2N + 1` lines run along each grid axis at `spacing` apart, each
//! `2 * N * spacing` long. Every line goes through the camera transform,
//! near-plane clipping and projection before it is stroked. Brightness falls
//! off linearly from the centre line and dims as the view flattens toward
//! the horizon.

use crate::algorithms::camera::{Camera, CameraPose};
use crate::algorithms::clipping::{ClipResult, SegmentClipper};
use crate::core::{GridPoint, Rgb};
use crate::render::surface::DrawingSurface;
use crate::utils::config::{GridConfig, MarkerConfig, ShadingConfig};

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub lines_drawn: u32,
    pub lines_clipped: u32,
    pub lines_culled: u32,
    pub marker_drawn: bool,
}

/// A gridline segment in grid space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub index: i32,
    pub start: GridPoint,
    pub end: GridPoint,
}

/// Draws the lattice and viewer marker for one camera pose per frame
pub struct GridRenderer {
    gridline_count: u32,
    gridline_spacing: f64,
    extent: f64,
    shading: ShadingConfig,
    marker: MarkerConfig,
}

impl GridRenderer {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            gridline_count: config.gridline_count,
            gridline_spacing: config.gridline_spacing,
            extent: config.extent(),
            shading: config.shading.clone(),
            marker: config.marker.clone(),
        }
    }

    /// All gridlines: first those parallel to the x axis, then the y axis
    pub fn gridlines(&self) -> impl Iterator<Item = GridLine> + '_ {
        let n = self.gridline_count as i32;
        let spacing = self.gridline_spacing;
        let extent = self.extent;

        let rows = (-n..=n).map(move |i| GridLine {
            index: i,
            start: GridPoint::new(-extent, i as f64 * spacing),
            end: GridPoint::new(extent, i as f64 * spacing),
        });
        let columns = (-n..=n).map(move |i| GridLine {
            index: i,
            start: GridPoint::new(i as f64 * spacing, -extent),
            end: GridPoint::new(i as f64 * spacing, extent),
        });

        rows.chain(columns)
    }

    /// Peak brightness for a tilt; highest looking straight down
    pub fn shade_factor(&self, tilt_deg: f64) -> f64 {
        self.shading.base + self.shading.tilt_gain * tilt_deg.to_radians().cos()
    }

    /// Grey level of line `index` for a given shade factor
    pub fn line_color(&self, index: i32, shade_factor: f64) -> Rgb {
        let n = self.gridline_count as f64;
        let falloff = (n - index.unsigned_abs() as f64) / n;
        Rgb::grey(falloff * shade_factor)
    }

    /// Draw one frame; the surface is cleared first
    pub fn render<S: DrawingSurface + ?Sized>(
        &self,
        camera: &Camera,
        pose: &CameraPose,
        surface: &mut S,
    ) -> FrameStats {
        let clipper = SegmentClipper::new(camera.near_plane());
        let shade_factor = self.shade_factor(pose.tilt_deg);
        let mut stats = FrameStats::default();

        surface.clear();

        for line in self.gridlines() {
            let start = camera.to_view_space(pose, &line.start);
            let end = camera.to_view_space(pose, &line.end);

            let result = clipper.clip(start, end);
            let projected = result.endpoints().and_then(|(a, b)| Some((camera.project(&a)?, camera.project(&b)?)));

            match projected {
                Some((from, to)) => {
                    if matches!(result, ClipResult::Clipped(..)) {
                        stats.lines_clipped += 1;
                    }
                    surface.stroke_line(from, to, self.line_color(line.index, shade_factor));
                    stats.lines_drawn += 1;
                }
                None => stats.lines_culled += 1,
            }
        }

        // Viewer marker at the viewer's own spot in the lattice.
        let viewer = camera.to_view_space(pose, &pose.anchor);
        if camera.is_visible(&viewer) {
            if let Some(center) = camera.project(&viewer) {
                surface.stroke_circle(center, self.marker.radius_px, self.marker.color);
                stats.marker_drawn = true;
            }
        }

        tracing::trace!(
            drawn = stats.lines_drawn,
            clipped = stats.lines_clipped,
            culled = stats.lines_culled,
            marker = stats.marker_drawn,
            "frame rendered"
        );
        stats
    }
}
