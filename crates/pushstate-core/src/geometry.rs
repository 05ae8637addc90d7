//! Corner reconstruction and planar point utilities.
//!
//! Objects are rectangles of known half-extents `(a, b)`. Their corners are
//! recovered from a tracked centre and orientation by rotating the four
//! canonical offsets `(±a, ±b)` and translating by the centre.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::error::GeometryError;
use crate::types::{Pose2, Shape};

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Rotate `point` about the origin by `angle` radians.
pub fn rotate(point: Point2<f64>, angle: f64) -> Point2<f64> {
    Rotation2::new(angle) * point
}

// ---------------------------------------------------------------------------
// CornerSet
// ---------------------------------------------------------------------------

/// The four corners of a rotated rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet {
    pub top_right: Point2<f64>,
    pub top_left: Point2<f64>,
    pub bottom_right: Point2<f64>,
    pub bottom_left: Point2<f64>,
}

impl CornerSet {
    /// Corners in column order: top-right, top-left, bottom-right, bottom-left.
    pub const fn to_array(&self) -> [Point2<f64>; 4] {
        [
            self.top_right,
            self.top_left,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Flattened `[x, y]` pairs in column order.
    pub fn flatten(&self) -> [f64; 8] {
        let mut out = [0.0; 8];
        for (i, p) in self.to_array().iter().enumerate() {
            out[2 * i] = p.x;
            out[2 * i + 1] = p.y;
        }
        out
    }
}

/// Corners of `shape` centred at `center` and rotated by `angle` radians.
pub fn corners(shape: Shape, center: Point2<f64>, angle: f64) -> CornerSet {
    let (a, b) = shape.half_extents();
    let offset = |dx: f64, dy: f64| center + rotate(Point2::new(dx, dy), angle).coords;
    CornerSet {
        top_right: offset(a, b),
        top_left: offset(-a, b),
        bottom_right: offset(a, -b),
        bottom_left: offset(-a, -b),
    }
}

/// Corners for an object pose.
pub fn corners_for_pose(shape: Shape, pose: Pose2) -> CornerSet {
    corners(shape, Point2::new(pose.x, pose.y), pose.theta)
}

// ---------------------------------------------------------------------------
// Polygon ordering
// ---------------------------------------------------------------------------

/// Reorder points around their centroid by polar angle, descending.
///
/// Produces a vertex order usable as a closed polygon outline. Equal angles
/// keep reversed input order.
pub fn order_by_angle(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if points.is_empty() {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector2::<f64>::zeros(), |acc, p| acc + p.coords)
        / n;

    let mut keyed: Vec<(f64, Point2<f64>)> = points
        .iter()
        .map(|p| {
            let ray = p.coords - centroid;
            (ray.y.atan2(ray.x), *p)
        })
        .collect();
    keyed.sort_by(|l, r| l.0.total_cmp(&r.0));
    keyed.into_iter().rev().map(|(_, p)| p).collect()
}

/// [`order_by_angle`] over flat `[x0, y0, x1, y1, ...]` coordinates.
///
/// Fails with [`GeometryError::InvalidPointSet`] unless the coordinates
/// form whole `(x, y)` pairs.
pub fn order_flat_by_angle(coords: &[f64]) -> Result<Vec<Point2<f64>>, GeometryError> {
    if coords.len() % 2 != 0 {
        return Err(GeometryError::InvalidPointSet { len: coords.len() });
    }
    let points: Vec<Point2<f64>> = coords
        .chunks_exact(2)
        .map(|c| Point2::new(c[0], c[1]))
        .collect();
    Ok(order_by_angle(&points))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
