//! Near-plane clipping of view-space segments

use crate::core::ViewPoint;

/// Outcome of clipping one segment against the near plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipResult {
    /// Both endpoints are on or beyond the near plane
    Unchanged(ViewPoint, ViewPoint),
    /// One endpoint was moved onto the near plane
    Clipped(ViewPoint, ViewPoint),
    /// Both endpoints are in front of the near plane
    Discarded,
}

impl ClipResult {
    /// Visible endpoints, in their original order
    pub fn endpoints(&self) -> Option<(ViewPoint, ViewPoint)> {
        match *self {
            ClipResult::Unchanged(a, b) | ClipResult::Clipped(a, b) => Some((a, b)),
            ClipResult::Discarded => None,
        }
    }
}

/// Clips segments so no endpoint reaches the perspective divide with a
/// forward distance below the near plane
#[derive(Debug, Clone, Copy)]
pub struct SegmentClipper {
    near_plane: f64,
}

impl SegmentClipper {
    pub fn new(near_plane: f64) -> Self {
        Self { near_plane }
    }

    pub fn near_plane(&self) -> f64 {
        self.near_plane
    }

    pub fn clip(&self, start: ViewPoint, end: ViewPoint) -> ClipResult {
        let start_hidden = start.y < self.near_plane;
        let end_hidden = end.y < self.near_plane;

        match (start_hidden, end_hidden) {
            (true, true) => ClipResult::Discarded,
            (false, false) => ClipResult::Unchanged(start, end),
            (true, false) => ClipResult::Clipped(self.intersect(&end, &start), end),
            (false, true) => ClipResult::Clipped(start, self.intersect(&start, &end)),
        }
    }

    /// Point on the segment where the forward distance equals the near plane
    fn intersect(&self, far: &ViewPoint, hidden: &ViewPoint) -> ViewPoint {
        let t = (self.near_plane - far.y) / (hidden.y - far.y);
        let mut point = far.lerp(hidden, t);
        // Pin the forward component against rounding in the lerp.
        point.y = self.near_plane;
        point
    }
}
