//! Drawing-surface seam and an in-memory recording surface

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::core::{Rgb, ScreenPoint};

/// 2D drawing target for the renderer (canvas, window, image, recorder)
pub trait DrawingSurface {
    /// Surface size in pixels as (width, height)
    fn size(&self) -> (f64, f64);

    /// Erase the previous frame
    fn clear(&mut self);

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb);

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line { from: [f64; 2], to: [f64; 2], color: Rgb },
    Circle { center: [f64; 2], radius: f64, color: Rgb },
}

/// Surface that keeps the draw calls of the current frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            clears: 0,
        }
    }

    /// Change the size reported to the renderer
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = (ScreenPoint, ScreenPoint, Rgb)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, color } => {
                Some((ScreenPoint::new(from[0], from[1]), ScreenPoint::new(to[0], to[1]), color))
            }
            DrawCommand::Circle { .. } => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (ScreenPoint, f64, Rgb)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Circle { center, radius, color } => {
                Some((ScreenPoint::new(center[0], center[1]), radius, color))
            }
            DrawCommand::Line { .. } => None,
        })
    }

    /// Number of frames cleared so far
    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Current frame as a standalone SVG document on a black background
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="black"/>"#);

        for command in &self.commands {
            let _ = match command {
                DrawCommand::Line { from, to, color } => writeln!(
                    svg,
                    r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
                    from[0],
                    from[1],
                    to[0],
                    to[1],
                    color.to_css()
                ),
                DrawCommand::Circle { center, radius, color } => writeln!(
                    svg,
                    r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}"/>"#,
                    center[0],
                    center[1],
                    radius,
                    color.to_css()
                ),
            };
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb) {
        self.commands.push(DrawCommand::Line {
            from: [from.x, from.y],
            to: [to.x, to.y],
            color,
        });
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgb) {
        self.commands.push(DrawCommand::Circle {
            center: [center.x, center.y],
            radius,
            color,
        });
    }
}
