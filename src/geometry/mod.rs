//! # Geometry Primitives
//!
//! Piecewise-linear geometry shared by centre lines and lane boundaries.
//! Everything here is pure math on `glam::DVec3`. No ids, no topology.

pub mod polyline;

pub use polyline::{Locus, Polyline, Projection};

/// A point in the snapshot-global frame.
pub type Point3 = glam::DVec3;

/// Curvature of the circle through three points (Menger curvature).
///
/// Returns 0 for collinear or coincident points.
pub fn menger_curvature(a: Point3, b: Point3, c: Point3) -> f64 {
    let denom = a.distance(b) * b.distance(c) * c.distance(a);
    if denom <= f64::EPSILON {
        return 0.0;
    }
    // |AB x AC| is twice the triangle area; kappa = 4 * area / (|AB||BC||CA|)
    2.0 * (b - a).cross(c - a).length() / denom
}

/// Right-pointing horizontal normal for a direction of travel.
///
/// `None` when the direction has no horizontal component.
pub fn right_normal(direction: Point3) -> Option<Point3> {
    Point3::new(direction.y, -direction.x, 0.0).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collinear_has_zero_curvature() {
        let k = menger_curvature(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        assert_eq!(k, 0.0);
    }

    #[test]
    fn test_unit_circle_curvature() {
        let k = menger_curvature(
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
        );
        assert!((k - 1.0).abs() < 1e-12, "got {k}");
    }

    #[test]
    fn test_right_normal_points_right_of_travel() {
        let n = right_normal(Point3::X).unwrap();
        assert!((n - Point3::new(0.0, -1.0, 0.0)).length() < 1e-12);
        assert!(right_normal(Point3::Z).is_none());
    }
}
