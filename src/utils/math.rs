// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Math utilities and shared tolerances

use nalgebra::Point;

/// Below this `|r × s|` (or closest-point denominator) lines count as parallel
pub const PARALLEL_EPS: f64 = 1e-6;

/// Coordinate-wise distance under which two 3D points are the same point
pub const POINT_EPS: f64 = 1e-6;

/// Distance under which a point counts as lying on a simplex edge
pub const EDGE_EPS: f64 = 1e-3;

/// `|dot|` above which two unit directions describe the same axis
pub const AXIS_DUPLICATE_DOT: f64 = 0.75;

/// Check if two floats are approximately equal
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Clamp a value between min and max
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Point equality: every coordinate differs by less than `epsilon`
pub fn points_coincide<const D: usize>(a: &Point<f64, D>, b: &Point<f64, D>, epsilon: f64) -> bool {
    a.coords
        .iter()
        .zip(b.coords.iter())
        .all(|(x, y)| approx_eq(*x, *y, epsilon))
}

/// Drop points that coincide with an earlier one, keeping first occurrences
pub fn dedup_points<const D: usize>(points: &[Point<f64, D>], epsilon: f64) -> Vec<Point<f64, D>> {
    let mut result: Vec<Point<f64, D>> = Vec::with_capacity(points.len());
    for point in points {
        if !result.iter().any(|kept| points_coincide(kept, point, epsilon)) {
            result.push(*point);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(1.0, 1.0001, 0.001));
        assert!(!approx_eq(1.0, 1.1, 0.001));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_points_coincide() {
        let a = Point3::new(1.0, 2.0, 3.0);
        assert!(points_coincide(&a, &Point3::new(1.0, 2.0, 3.0 + 1e-7), POINT_EPS));
        assert!(!points_coincide(&a, &Point3::new(1.0, 2.0 + 1e-5, 3.0), POINT_EPS));
        assert!(points_coincide(
            &Point2::new(0.0, 0.0),
            &Point2::new(5e-4, 0.0),
            EDGE_EPS
        ));
    }

    #[test]
    fn test_dedup_points_keeps_first() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1e-8, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let unique = dedup_points(&points, POINT_EPS);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], Point3::new(0.0, 0.0, 0.0));
    }
}
