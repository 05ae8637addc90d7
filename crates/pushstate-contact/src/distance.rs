//! Tip-to-edge distance.
//!
//! The edge a tip is closest to is taken as the line through the two object
//! corners nearest the tip. The distance is the perpendicular distance from
//! the tip to that (infinite) line.

use nalgebra::Point2;
use pushstate_core::error::GeometryError;
use pushstate_core::schema;

/// Segments shorter than this are treated as coincident corners.
pub const DEGENERATE_EDGE_EPS: f64 = 1e-12;

/// The two corners nearest `tip`, closest first.
///
/// Ties keep corner order (`t_r, t_l, b_r, b_l`).
pub fn nearest_corners(corners: &[Point2<f64>; 4], tip: Point2<f64>) -> [Point2<f64>; 2] {
    let mut order = [0_usize, 1, 2, 3];
    order.sort_by(|&i, &j| {
        let di = (corners[i] - tip).norm_squared();
        let dj = (corners[j] - tip).norm_squared();
        di.total_cmp(&dj)
    });
    [corners[order[0]], corners[order[1]]]
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// With `n = (b - a) / |b - a|` this is `|(a - p) - ((a - p) . n) n|`.
pub fn edge_distance(
    a: Point2<f64>,
    b: Point2<f64>,
    p: Point2<f64>,
) -> Result<f64, GeometryError> {
    let edge = b - a;
    let length = edge.norm();
    if length < DEGENERATE_EDGE_EPS {
        return Err(GeometryError::DegenerateEdge { x: a.x, y: a.y });
    }
    let n = edge / length;
    let ap = a - p;
    Ok((ap - n * ap.dot(&n)).norm())
}

/// Corner points read from the corner columns of a state row.
pub fn row_corners(row: &[f64]) -> Result<[Point2<f64>; 4], GeometryError> {
    let c = row
        .get(schema::CORNERS..schema::CORNERS + 8)
        .ok_or(GeometryError::InvalidPointSet { len: row.len() })?;
    Ok([
        Point2::new(c[0], c[1]),
        Point2::new(c[2], c[3]),
        Point2::new(c[4], c[5]),
        Point2::new(c[6], c[7]),
    ])
}

/// Tip position read from the tip pose columns of a state row.
pub fn row_tip(row: &[f64]) -> Result<Point2<f64>, GeometryError> {
    let t = row
        .get(schema::TIP_POSE..schema::TIP_POSE + 2)
        .ok_or(GeometryError::InvalidPointSet { len: row.len() })?;
    Ok(Point2::new(t[0], t[1]))
}

/// Distance from the tip of a state row to the nearest object edge.
pub fn tip_edge_distance(row: &[f64]) -> Result<f64, GeometryError> {
    let tip = row_tip(row)?;
    let [a, b] = nearest_corners(&row_corners(row)?, tip);
    edge_distance(a, b, tip)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pushstate_core::geometry::corners;
    use pushstate_core::types::Shape;

    fn square() -> [Point2<f64>; 4] {
        corners(Shape::Rect1, Point2::origin(), 0.0).to_array()
    }

    #[test]
    fn nearest_two_corners() {
        let c = square();
        let [a, b] = nearest_corners(&c, Point2::new(0.1, 0.01));
        assert_eq!(a, c[0]); // t_r (0.045, 0.045)
        assert_eq!(b, c[2]); // b_r (0.045, -0.045)
    }

    #[test]
    fn ties_keep_corner_order() {
        let c = square();
        let [a, b] = nearest_corners(&c, Point2::origin());
        assert_eq!(a, c[0]);
        assert_eq!(b, c[1]);
    }

    #[test]
    fn perpendicular_distance_to_line() {
        let d = edge_distance(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.3, 0.25),
        )
        .unwrap();
        assert_relative_eq!(d, 0.25, epsilon = 1e-12);

        // Beyond the segment end the infinite line still applies.
        let d = edge_distance(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(3.0, 3.0),
        )
        .unwrap();
        assert_relative_eq!(d, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_corners_are_degenerate() {
        let p = Point2::new(0.2, 0.3);
        assert_eq!(
            edge_distance(p, p, Point2::origin()),
            Err(GeometryError::DegenerateEdge { x: 0.2, y: 0.3 })
        );
    }

    #[test]
    fn tip_at_corner_is_zero() {
        let mut row = vec![0.0; schema::STATE_WIDTH];
        row[schema::CORNERS..schema::CORNERS + 8]
            .copy_from_slice(&corners(Shape::Rect2, Point2::new(1.0, 2.0), 0.4).flatten());
        row[schema::TIP_POSE] = row[schema::CORNERS + 2];
        row[schema::TIP_POSE + 1] = row[schema::CORNERS + 3];
        assert_relative_eq!(tip_edge_distance(&row).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn short_row_is_rejected() {
        assert_eq!(
            tip_edge_distance(&[0.0; 5]),
            Err(GeometryError::InvalidPointSet { len: 5 })
        );
    }
}
