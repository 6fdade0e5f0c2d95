// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Triangle and tetrahedron models
//!
//! Vertex order is fixed at construction and indexes every edge and face
//! table in the crate. Triangle edge `i` joins vertex `i` and vertex
//! `(i + 1) % 3`; the tetrahedron uses [`TETRAHEDRON_FACES`] and
//! [`TETRAHEDRON_EDGES`].

use crate::error::{Result, SimplexError};
use crate::geometry::intersection::closest_point_on_triangle;
use crate::utils::math::clamp;
use nalgebra::{Matrix3, Point2, Point3, Vector2};
use serde::{Deserialize, Serialize};

/// Vertex triples of the four tetrahedron faces
pub const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];

/// Vertex pairs of the six tetrahedron edges
pub const TETRAHEDRON_EDGES: [[usize; 2]; 6] = [[0, 1], [0, 2], [0, 3], [2, 1], [3, 2], [1, 3]];

/// Opaque 24-bit RGB color token, compared by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xff0000);
    pub const BLUE: Color = Color(0x0000ff);
    pub const ORANGE: Color = Color(0xffa500);
    pub const LIME: Color = Color(0xccff00);

    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// CSS style string, e.g. `#ff0000`
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Channels in `[0, 1]`
    pub fn to_rgb(&self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        ]
    }
}

/// Simplex vertex: position plus its immutable color and label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex<P> {
    pub position: P,
    pub color: Color,
    pub label: String,
}

impl<P> Vertex<P> {
    pub fn new(position: P, color: Color, label: impl Into<String>) -> Self {
        Self {
            position,
            color,
            label: label.into(),
        }
    }
}

pub type Vertex2 = Vertex<Point2<f64>>;
pub type Vertex3 = Vertex<Point3<f64>>;

/// Barycentric weights `(u, v, w)` of `p` with respect to `a`, `b`, `c`
pub fn barycentric_2d(
    p: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
    c: &Point2<f64>,
) -> (f64, f64, f64) {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);
    let denom = d00 * d11 - d01 * d01;
    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    (1.0 - v - w, v, w)
}

/// Barycentric weights of `p` with respect to four vertices, `None` if they are coplanar
pub fn barycentric_3d(p: &Point3<f64>, vertices: &[Point3<f64>; 4]) -> Option<[f64; 4]> {
    let [a, b, c, d] = vertices;
    let basis = Matrix3::from_columns(&[b - a, c - a, d - a]);
    let local = basis.try_inverse()? * (p - a);
    Some([1.0 - local.x - local.y - local.z, local.x, local.y, local.z])
}

/// Arithmetic mean of a set of points
pub fn centroid_of<const D: usize>(points: &[nalgebra::Point<f64, D>]) -> nalgebra::Point<f64, D> {
    let sum = points
        .iter()
        .fold(nalgebra::SVector::<f64, D>::zeros(), |acc, p| acc + p.coords);
    nalgebra::Point::from(sum / points.len().max(1) as f64)
}

/// Triangle with an inset interaction boundary
#[derive(Debug, Clone, Serialize)]
pub struct Triangle {
    vertices: [Vertex2; 3],
    centroid: Point2<f64>,
    inset: [Point2<f64>; 3],
}

impl Triangle {
    /// Build a triangle, insetting its interaction boundary by `inset_offset`
    pub fn new(vertices: [Vertex2; 3], inset_offset: f64) -> Result<Self> {
        let [a, b, c] = [
            vertices[0].position,
            vertices[1].position,
            vertices[2].position,
        ];
        let area = 0.5 * (b - a).perp(&(c - a));
        let scale = (b - a).norm_squared().max((c - a).norm_squared());
        if !area.is_finite() || area.abs() <= 1e-12 * scale.max(f64::MIN_POSITIVE) {
            return Err(SimplexError::Degenerate { measure: area });
        }

        let centroid = centroid_of(&[a, b, c]);
        let inset = inset_vertices(&[a, b, c], &centroid, inset_offset);

        Ok(Self {
            vertices,
            centroid,
            inset,
        })
    }

    /// Equilateral triangle of side `scale`, centred on the origin
    ///
    /// Vertices are A (top, red), B (right, blue) and C (left, orange).
    pub fn equilateral(scale: f64, inset_offset: f64) -> Result<Self> {
        let raw = [
            Point2::new(0.5, 3f64.sqrt() / 2.0) * scale,
            Point2::new(1.0, 0.0) * scale,
            Point2::new(0.0, 0.0) * scale,
        ];
        let center = centroid_of(&raw).coords;
        let at = |i: usize| Point2::from(raw[i].coords - center);

        Self::new(
            [
                Vertex::new(at(0), Color::RED, "A"),
                Vertex::new(at(1), Color::BLUE, "B"),
                Vertex::new(at(2), Color::ORANGE, "C"),
            ],
            inset_offset,
        )
    }

    pub fn vertices(&self) -> &[Vertex2; 3] {
        &self.vertices
    }

    pub fn position(&self, index: usize) -> Point2<f64> {
        self.vertices[index % 3].position
    }

    pub fn positions(&self) -> [Point2<f64>; 3] {
        [self.position(0), self.position(1), self.position(2)]
    }

    pub fn colors(&self) -> [Color; 3] {
        [
            self.vertices[0].color,
            self.vertices[1].color,
            self.vertices[2].color,
        ]
    }

    /// Endpoints of edge `index`
    pub fn edge(&self, index: usize) -> (Point2<f64>, Point2<f64>) {
        (self.position(index), self.position(index + 1))
    }

    pub fn centroid(&self) -> Point2<f64> {
        self.centroid
    }

    /// The inset ("clamped") vertices bounding the interaction area
    pub fn inset_vertices(&self) -> &[Point2<f64>; 3] {
        &self.inset
    }

    /// Largest edge length
    pub fn longest_edge(&self) -> f64 {
        (0..3)
            .map(|i| {
                let (a, b) = self.edge(i);
                nalgebra::distance(&a, &b)
            })
            .fold(0.0, f64::max)
    }

    /// Project `point` into the inset triangle
    ///
    /// A negative barycentric weight is zeroed and the other two are
    /// clamped so they still sum to one, which lands the result on the
    /// nearest edge or vertex of the inset boundary.
    pub fn clamp(&self, point: &Point2<f64>) -> Point2<f64> {
        let [a, b, c] = &self.inset;
        let (mut u, mut v, mut w) = barycentric_2d(point, a, b, c);

        if u < 0.0 {
            u = 0.0;
            v = clamp(v, 0.0, 1.0);
            w = 1.0 - v;
        }
        if v < 0.0 {
            v = 0.0;
            u = clamp(u, 0.0, 1.0);
            w = 1.0 - u;
        }
        if w < 0.0 {
            w = 0.0;
            u = clamp(u, 0.0, 1.0);
            v = 1.0 - u;
        }

        Point2::from(a.coords * u + b.coords * v + c.coords * w)
    }

    /// Distance from the centroid, 0 at the centroid and 1 at the farthest vertex
    ///
    /// Normalized by the vertex distance rather than the side length, so
    /// a vertex always reads 1 whatever the triangle's size.
    pub fn radius(&self, point: &Point2<f64>) -> f64 {
        let reach = self
            .positions()
            .iter()
            .map(|p| nalgebra::distance(p, &self.centroid))
            .fold(0.0, f64::max);
        nalgebra::distance(point, &self.centroid) / reach
    }
}

/// Move every vertex `offset` along its corner bisector, toward the centroid
fn inset_vertices(points: &[Point2<f64>; 3], centroid: &Point2<f64>, offset: f64) -> [Point2<f64>; 3] {
    let corner_normal = |prev: &Point2<f64>, curr: &Point2<f64>, next: &Point2<f64>| {
        let e1 = (curr - prev).normalize();
        let e2 = (next - curr).normalize();
        let n = Vector2::new(-e1.y, e1.x) + Vector2::new(-e2.y, e2.x);
        let n = n.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros);
        if n.dot(&(centroid - curr)) < 0.0 {
            -n
        } else {
            n
        }
    };

    let [a, b, c] = points;
    [
        a + corner_normal(c, a, b) * offset,
        b + corner_normal(a, b, c) * offset,
        c + corner_normal(b, c, a) * offset,
    ]
}

/// Tetrahedron with labelled vertices
#[derive(Debug, Clone, Serialize)]
pub struct Tetrahedron {
    vertices: [Vertex3; 4],
    centroid: Point3<f64>,
}

impl Tetrahedron {
    pub fn new(vertices: [Vertex3; 4]) -> Result<Self> {
        let positions = [
            vertices[0].position,
            vertices[1].position,
            vertices[2].position,
            vertices[3].position,
        ];
        let [a, b, c, d] = &positions;
        let volume = (b - a).dot(&(c - a).cross(&(d - a))) / 6.0;
        let scale = [b, c, d]
            .iter()
            .map(|p| (*p - a).norm())
            .fold(0.0, f64::max);
        if !volume.is_finite() || volume.abs() <= 1e-12 * scale.powi(3).max(f64::MIN_POSITIVE) {
            return Err(SimplexError::Degenerate { measure: volume });
        }

        Ok(Self {
            centroid: centroid_of(&positions),
            vertices,
        })
    }

    /// Regular tetrahedron with edge `a`, centred on the origin
    ///
    /// Vertex order is D (apex), A, B, C.
    pub fn regular(a: f64) -> Result<Self> {
        let height = 6f64.sqrt() / 3.0 * a;
        let base_height = 3f64.sqrt() / 2.0 * a;
        let raw = [
            Point3::new(0.0, 2.0 * height / 3.0, 0.0),
            Point3::new(-a / 2.0, -height / 3.0, -base_height / 3.0),
            Point3::new(a / 2.0, -height / 3.0, -base_height / 3.0),
            Point3::new(0.0, -height / 3.0, 2.0 * base_height / 3.0),
        ];
        let center = centroid_of(&raw).coords;
        let at = |i: usize| Point3::from(raw[i].coords - center);

        Self::new([
            Vertex::new(at(0), Color::LIME, "D"),
            Vertex::new(at(1), Color::RED, "A"),
            Vertex::new(at(2), Color::BLUE, "B"),
            Vertex::new(at(3), Color::ORANGE, "C"),
        ])
    }

    pub fn vertices(&self) -> &[Vertex3; 4] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> &Vertex3 {
        &self.vertices[index]
    }

    pub fn positions(&self) -> [Point3<f64>; 4] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
            self.vertices[3].position,
        ]
    }

    pub fn colors(&self) -> [Color; 4] {
        [
            self.vertices[0].color,
            self.vertices[1].color,
            self.vertices[2].color,
            self.vertices[3].color,
        ]
    }

    pub fn centroid(&self) -> Point3<f64> {
        self.centroid
    }

    /// Corner positions of face `index`
    pub fn face(&self, index: usize) -> [Point3<f64>; 3] {
        let [i, j, k] = TETRAHEDRON_FACES[index];
        [
            self.vertices[i].position,
            self.vertices[j].position,
            self.vertices[k].position,
        ]
    }

    /// Unit normal of face `index`, following the face's winding
    pub fn face_normal(&self, index: usize) -> nalgebra::Vector3<f64> {
        let [a, b, c] = self.face(index);
        (b - a).cross(&(c - a)).normalize()
    }

    pub fn edge_length(&self, index: usize) -> f64 {
        let [i, j] = TETRAHEDRON_EDGES[index];
        nalgebra::distance(&self.vertices[i].position, &self.vertices[j].position)
    }

    pub fn longest_edge(&self) -> f64 {
        (0..TETRAHEDRON_EDGES.len())
            .map(|e| self.edge_length(e))
            .fold(0.0, f64::max)
    }

    /// Distance from `point` to the closest point of every face
    pub fn face_distances(&self, point: &Point3<f64>) -> [f64; 4] {
        std::array::from_fn(|face| {
            let [a, b, c] = self.face(face);
            nalgebra::distance(point, &closest_point_on_triangle(point, &a, &b, &c))
        })
    }

    /// Faces closer to `point` than `threshold`
    pub fn near_faces(&self, point: &Point3<f64>, threshold: f64) -> [bool; 4] {
        self.face_distances(point).map(|d| d < threshold)
    }

    /// Vertices moved toward the centroid by `factor`
    pub fn scale_toward_centroid(&self, factor: f64) -> [Point3<f64>; 4] {
        self.positions()
            .map(|v| self.centroid + (v - self.centroid) * factor)
    }

    /// Barycentric weights of `point`, indexed like the vertices
    pub fn barycentric(&self, point: &Point3<f64>) -> [f64; 4] {
        // Construction rejected coplanar vertices, so the basis is invertible.
        barycentric_3d(point, &self.positions()).unwrap_or([0.25; 4])
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        self.barycentric(point).iter().all(|w| *w >= -1e-12)
    }

    /// Project `point` into the tetrahedron scaled by `factor`
    ///
    /// Negative barycentric weights are zeroed and the rest renormalized.
    pub fn clamp(&self, point: &Point3<f64>, factor: f64) -> Point3<f64> {
        let scaled = self.scale_toward_centroid(factor);
        let Some(weights) = barycentric_3d(point, &scaled) else {
            return self.centroid;
        };
        if weights.iter().all(|w| *w >= 0.0) {
            return *point;
        }

        let kept = weights.map(|w| w.max(0.0));
        let total: f64 = kept.iter().sum();
        if total <= 0.0 {
            return self.centroid;
        }

        let coords = scaled
            .iter()
            .zip(kept.iter())
            .fold(nalgebra::Vector3::zeros(), |acc, (p, w)| acc + p.coords * (w / total));
        Point3::from(coords)
    }

    /// Distance from the centroid, 0 at the centroid and 1 at the farthest vertex
    ///
    /// Normalized by the vertex distance rather than the edge length, so
    /// a vertex always reads 1 whatever the tetrahedron's size.
    pub fn radius(&self, point: &Point3<f64>) -> f64 {
        let reach = self
            .positions()
            .iter()
            .map(|p| nalgebra::distance(p, &self.centroid))
            .fold(0.0, f64::max);
        nalgebra::distance(point, &self.centroid) / reach
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            [
                Vertex::new(Point2::new(0.0, 0.0), Color::RED, "A"),
                Vertex::new(Point2::new(1.0, 0.0), Color::BLUE, "B"),
                Vertex::new(Point2::new(0.5, 0.8660), Color::ORANGE, "C"),
            ],
            0.005,
        )
        .unwrap()
    }

    #[test]
    fn test_centroid() {
        let triangle = unit_triangle();
        assert_relative_eq!(triangle.centroid().x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(triangle.centroid().y, 0.8660 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_inset_vertices_lie_inside() {
        let triangle = unit_triangle();
        let [a, b, c] = triangle.positions();
        for (corner, inset) in triangle.positions().iter().zip(triangle.inset_vertices()) {
            let (u, v, w) = barycentric_2d(inset, &a, &b, &c);
            assert!(u > 0.0 && v > 0.0 && w > 0.0);
            assert_relative_eq!(nalgebra::distance(corner, inset), 0.005, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_clamp_inside_is_identity() {
        let triangle = unit_triangle();
        let p = Point2::new(0.5, 0.3);
        let clamped = triangle.clamp(&p);
        assert_relative_eq!(clamped.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(clamped.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn test_clamp_outside_lands_on_boundary() {
        let triangle = unit_triangle();
        let clamped = triangle.clamp(&Point2::new(0.5, -3.0));
        let [a, b, c] = triangle.inset_vertices();
        let (u, v, w) = barycentric_2d(&clamped, a, b, c);
        assert!(u >= -1e-12 && v >= -1e-12 && w >= -1e-12);
        assert!(u.abs() < 1e-9 || v.abs() < 1e-9 || w.abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let result = Triangle::new(
            [
                Vertex::new(Point2::new(0.0, 0.0), Color::RED, "A"),
                Vertex::new(Point2::new(1.0, 0.0), Color::BLUE, "B"),
                Vertex::new(Point2::new(2.0, 0.0), Color::ORANGE, "C"),
            ],
            0.005,
        );
        assert!(matches!(result, Err(SimplexError::Degenerate { .. })));
    }

    #[test]
    fn test_equilateral_is_centred() {
        let triangle = Triangle::equilateral(24.0, 0.005).unwrap();
        assert_relative_eq!(triangle.centroid().coords.norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(triangle.longest_edge(), 24.0, epsilon = 1e-9);
        assert_eq!(triangle.vertices()[0].label, "A");
    }

    #[test]
    fn test_regular_tetrahedron() {
        let tetra = Tetrahedron::regular(2.0).unwrap();
        assert_relative_eq!(tetra.centroid().coords.norm(), 0.0, epsilon = 1e-12);
        for edge in 0..6 {
            assert_relative_eq!(tetra.edge_length(edge), 2.0, epsilon = 1e-12);
        }
        let labels: Vec<&str> = tetra.vertices().iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["D", "A", "B", "C"]);
    }

    #[test]
    fn test_tetrahedron_barycentric_of_vertices() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        for (i, vertex) in tetra.positions().iter().enumerate() {
            let weights = tetra.barycentric(vertex);
            for (j, w) in weights.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(*w, expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_scale_toward_centroid() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let scaled = tetra.scale_toward_centroid(0.5);
        for (original, moved) in tetra.positions().iter().zip(scaled.iter()) {
            assert_relative_eq!(moved.coords.norm(), original.coords.norm() * 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_tetrahedron_clamp() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let outside = Point3::new(0.0, 10.0, 0.0);
        let clamped = tetra.clamp(&outside, 0.9995);
        assert!(tetra.contains(&clamped));
        let again = tetra.clamp(&clamped, 0.9995);
        assert_relative_eq!(nalgebra::distance(&clamped, &again), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_near_faces() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let threshold = 0.01;
        assert_eq!(tetra.near_faces(&tetra.centroid(), threshold), [false; 4]);

        // Just inside face 0, away from its edges
        let [a, b, c] = tetra.face(0);
        let on_face = centroid_of(&[a, b, c]);
        let inside = on_face + (tetra.centroid() - on_face).normalize() * 0.005;
        let distances = tetra.face_distances(&inside);
        assert_relative_eq!(distances[0], 0.005, epsilon = 1e-12);
        assert_eq!(tetra.near_faces(&inside, threshold), [true, false, false, false]);

        // Vertex 0 lies on faces 0, 1 and 2
        let vertex = tetra.positions()[0];
        assert_eq!(tetra.near_faces(&vertex, threshold), [true, true, true, false]);
        let inradius = tetra.face_distances(&tetra.centroid())[3];
        assert_relative_eq!(tetra.face_distances(&vertex)[3], 4.0 * inradius, epsilon = 1e-9);
    }

    #[test]
    fn test_radius_reads_one_at_vertices() {
        let tetra = Tetrahedron::regular(48.0).unwrap();
        for vertex in tetra.positions() {
            assert_relative_eq!(tetra.radius(&vertex), 1.0, epsilon = 1e-12);
        }
        let triangle = Triangle::equilateral(19.2, 0.005).unwrap();
        assert_relative_eq!(triangle.radius(&triangle.positions()[2]), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(Color::ORANGE.to_css(), "#ffa500");
        assert_eq!(Color::from_hex(0x01ff0000), Color::RED);
        assert_eq!(Color::BLUE.to_rgb(), [0.0, 0.0, 1.0]);
    }
}
