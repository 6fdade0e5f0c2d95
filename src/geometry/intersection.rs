// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Intersection primitives for lines, rays, planes and triangles
//!
//! Every test returns `None` for parallel configurations and for
//! parameters outside the segment, so callers treat a missing hit as
//! "no segment here" rather than as an error.

use crate::utils::math::{clamp, PARALLEL_EPS, POINT_EPS};
use nalgebra::{Point2, Point3, Unit, UnitQuaternion, Vector3};
use serde::Serialize;

/// Plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plane {
    pub point: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    pub fn new(point: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self { point, normal }
    }

    /// Plane whose local up direction `(0, 1, 0)` is rotated by `orientation`
    pub fn from_orientation(point: Point3<f64>, orientation: &UnitQuaternion<f64>) -> Self {
        Self::new(point, orientation * Vector3::y_axis())
    }

    /// Plane through `point` rotated from local up onto `target`
    pub fn facing(point: Point3<f64>, target: &Unit<Vector3<f64>>) -> Self {
        Self::from_orientation(point, &orientation_from_up(target))
    }

    /// Signed distance of `p` along the normal
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.point))
    }
}

/// Rotation taking the local up direction onto `target`
pub fn orientation_from_up(target: &Unit<Vector3<f64>>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between_axis(&Vector3::y_axis(), target).unwrap_or_else(|| {
        // `target` points straight down: any half turn about a horizontal axis works
        UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI)
    })
}

/// Half-line from `origin` along `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Unit<Vector3<f64>>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Unit<Vector3<f64>>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Distance along the ray to `plane`, `None` if it points away or runs parallel off-plane
    pub fn distance_to_plane(&self, plane: &Plane) -> Option<f64> {
        let denominator = plane.normal.dot(self.direction.as_ref());
        if denominator.abs() < PARALLEL_EPS {
            // A ray inside the plane touches it at its origin
            return if plane.signed_distance(&self.origin).abs() < POINT_EPS {
                Some(0.0)
            } else {
                None
            };
        }

        let t = -plane.signed_distance(&self.origin) / denominator;
        (t >= 0.0).then_some(t)
    }
}

/// Intersection of segments `p1p2` and `q1q2` in the plane
pub fn line_line_2d(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> Option<Point2<f64>> {
    let r = p2 - p1;
    let s = q2 - q1;
    let rxs = r.perp(&s);
    if rxs.abs() < PARALLEL_EPS {
        return None;
    }

    let qp = q1 - p1;
    let t = qp.perp(&s) / rxs;
    let u = qp.perp(&r) / rxs;

    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    Some(p1 + r * t)
}

/// Closest-point intersection of segments `p1p2` and `q1q2` in space
///
/// Both segment parameters are clamped to `[0, 1]`; the segments
/// intersect when the clamped closest points are within [`POINT_EPS`],
/// in which case their midpoint is returned.
pub fn line_line_3d(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    q1: &Point3<f64>,
    q2: &Point3<f64>,
) -> Option<Point3<f64>> {
    let u = p2 - p1;
    let v = q2 - q1;
    let w0 = p1 - q1;

    let a = u.dot(&u);
    let b = u.dot(&v);
    let c = v.dot(&v);
    let d = u.dot(&w0);
    let e = v.dot(&w0);

    let denom = a * c - b * b;
    if denom.abs() < PARALLEL_EPS {
        return None;
    }

    let s = clamp((b * e - c * d) / denom, 0.0, 1.0);
    let t = clamp((a * e - b * d) / denom, 0.0, 1.0);

    let cp1 = p1 + u * s;
    let cp2 = q1 + v * t;

    if nalgebra::distance(&cp1, &cp2) < POINT_EPS {
        Some(nalgebra::center(&cp1, &cp2))
    } else {
        None
    }
}

/// Ray/triangle intersection (Möller–Trumbore), both windings accepted
pub fn ray_triangle(
    ray: &Ray,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<Point3<f64>> {
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = ray.direction.cross(&edge2);
    let det = edge1.dot(&pvec);
    if det.abs() < f64::EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - a;
    let u = tvec.dot(&pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(&edge1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(&qvec) * inv_det;
    (t >= 0.0).then(|| ray.at(t))
}

/// Closest hit of `ray` among `triangles`, by squared distance from the origin
pub fn closest_ray_hit<'a, I>(ray: &Ray, triangles: I) -> Option<Point3<f64>>
where
    I: IntoIterator<Item = &'a [Point3<f64>; 3]>,
{
    triangles
        .into_iter()
        .filter_map(|[a, b, c]| ray_triangle(ray, a, b, c))
        .min_by(|p, q| {
            let dp = (p - ray.origin).norm_squared();
            let dq = (q - ray.origin).norm_squared();
            dp.total_cmp(&dq)
        })
}

/// Intersection of edge `start → end` with `plane`, within the edge's length
pub fn plane_edge_intersection(
    start: &Point3<f64>,
    end: &Point3<f64>,
    plane: &Plane,
) -> Option<Point3<f64>> {
    let dir = end - start;
    let length = dir.norm();
    let direction = Unit::try_new(dir, f64::EPSILON)?;
    let ray = Ray::new(*start, direction);

    let dist = ray.distance_to_plane(plane)?;
    (dist <= length).then(|| ray.at(dist))
}

/// Segment where `plane` cuts triangle `abc`, valid when exactly two edges are hit
pub fn plane_triangle_intersection(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    plane: &Plane,
) -> Option<[Point3<f64>; 2]> {
    let hits: Vec<Point3<f64>> = [(a, b), (b, c), (c, a)]
        .into_iter()
        .filter_map(|(start, end)| plane_edge_intersection(start, end, plane))
        .collect();

    match hits.as_slice() {
        [first, second] => Some([*first, *second]),
        _ => None,
    }
}

/// Point of triangle `abc` closest to `p`
///
/// Classifies `p` against the Voronoi regions of the vertices, then the
/// edges, and projects onto the face only when neither claims it.
pub fn closest_point_on_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;

    let ap = p - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && d4 - d3 >= 0.0 && d5 - d6 >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = va + vb + vc;
    a + ab * (vb / denom) + ac * (vc / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_line_line_2d_crossing() {
        let hit = line_line_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(hit.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_line_line_2d_parallel_and_out_of_range() {
        let parallel = line_line_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        );
        assert!(parallel.is_none());

        let short = line_line_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(0.5, 0.5),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        );
        assert!(short.is_none());
    }

    #[test]
    fn test_line_line_3d() {
        let hit = line_line_3d(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, -1.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.coords.norm(), 0.0, epsilon = 1e-12);

        let skew = line_line_3d(
            &Point3::new(-1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(0.0, -1.0, 0.1),
            &Point3::new(0.0, 1.0, 0.1),
        );
        assert!(skew.is_none());
    }

    #[test]
    fn test_line_line_3d_touching_endpoints() {
        let hit = line_line_3d(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_triangle_both_sides() {
        let a = Point3::new(-1.0, -1.0, 0.0);
        let b = Point3::new(1.0, -1.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);

        let down = Ray::new(Point3::new(0.0, 0.0, 5.0), -Vector3::z_axis());
        let hit = ray_triangle(&down, &a, &b, &c).unwrap();
        assert_relative_eq!(hit.z, 0.0, epsilon = 1e-12);

        let up = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::z_axis());
        assert!(ray_triangle(&up, &a, &b, &c).is_some());

        let away = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::z_axis());
        assert!(ray_triangle(&away, &a, &b, &c).is_none());
    }

    #[test]
    fn test_closest_ray_hit() {
        let near = [
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let far = [
            Point3::new(-1.0, -1.0, 3.0),
            Point3::new(1.0, -1.0, 3.0),
            Point3::new(0.0, 1.0, 3.0),
        ];
        let ray = Ray::new(Point3::origin(), Vector3::z_axis());
        let hit = closest_ray_hit(&ray, [&far, &near]).unwrap();
        assert_relative_eq!(hit.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plane_edge_intersection() {
        let plane = Plane::new(Point3::new(0.0, 0.5, 0.0), Vector3::y_axis());
        let hit = plane_edge_intersection(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 2.0, 0.0),
            &plane,
        )
        .unwrap();
        assert_relative_eq!(hit.y, 0.5, epsilon = 1e-12);

        // Edge ends before reaching the plane
        assert!(plane_edge_intersection(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.0, 0.25, 0.0),
            &plane
        )
        .is_none());

        // Edge parallel to the plane
        assert!(plane_edge_intersection(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 0.0),
            &plane
        )
        .is_none());
    }

    #[test]
    fn test_plane_triangle_intersection() {
        let plane = Plane::new(Point3::new(0.0, 0.0, 0.0), Vector3::y_axis());
        let segment = plane_triangle_intersection(
            &Point3::new(-1.0, -1.0, 0.0),
            &Point3::new(1.0, -1.0, 0.0),
            &Point3::new(0.0, 1.0, 0.0),
            &plane,
        )
        .unwrap();
        for p in segment {
            assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(nalgebra::distance(&segment[0], &segment[1]), 1.0, epsilon = 1e-12);

        let missing = plane_triangle_intersection(
            &Point3::new(-1.0, 2.0, 0.0),
            &Point3::new(1.0, 2.0, 0.0),
            &Point3::new(0.0, 3.0, 0.0),
            &plane,
        );
        assert!(missing.is_none());
    }

    #[test]
    fn test_plane_facing_target() {
        let target = Unit::new_normalize(Vector3::new(1.0, 1.0, 0.0));
        let plane = Plane::facing(Point3::origin(), &target);
        assert_relative_eq!(plane.normal.dot(target.as_ref()), 1.0, epsilon = 1e-12);

        let down = -Vector3::y_axis();
        let flipped = Plane::facing(Point3::origin(), &down);
        assert_relative_eq!(flipped.normal.dot(down.as_ref()), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_closest_point_on_triangle_regions() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 0.0, 0.0);
        let c = Point3::new(0.0, 2.0, 0.0);

        // Above the face
        let face = closest_point_on_triangle(&Point3::new(0.5, 0.5, 3.0), &a, &b, &c);
        assert_relative_eq!(face, Point3::new(0.5, 0.5, 0.0), epsilon = 1e-12);

        // Beyond edge bc
        let edge = closest_point_on_triangle(&Point3::new(2.0, 2.0, 0.0), &a, &b, &c);
        assert_relative_eq!(edge, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);

        // Behind vertex a
        let vertex = closest_point_on_triangle(&Point3::new(-1.0, -1.0, 1.0), &a, &b, &c);
        assert_relative_eq!(vertex, a, epsilon = 1e-12);
    }
}
