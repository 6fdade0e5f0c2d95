// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Tetrahedron decomposition by planes parallel to its faces
//!
//! Four planes pass through the query point P, each parallel to one face.
//! The plane parallel to the face opposite vertex `k` holds the weight of
//! `k` constant, so it meets every edge incident to `k` at a distance
//! proportional to that weight. Each edge is therefore split into three
//! side cuts whose normalized lengths are the probabilities of the
//! vertices.

use crate::config::Tolerances;
use crate::geometry::intersection::{plane_edge_intersection, plane_triangle_intersection, Plane};
use crate::geometry::segment::{IntersectionPoint3, Paint, Segment3};
use crate::geometry::simplex::{Color, Tetrahedron, TETRAHEDRON_EDGES, TETRAHEDRON_FACES};
use crate::probability::ProbabilityVector;
use nalgebra::{Point3, Unit};
use serde::Serialize;

/// Segment where a cutting plane crosses a tetrahedron face
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceCut {
    /// Index of the cutting plane, equal to the face it is parallel to
    pub plane: usize,
    /// Face the segment lies on
    pub face: usize,
    pub segment: Segment3,
}

/// Two plane hits on one edge, ordered from the edge's first vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeMatch {
    pub edge: usize,
    /// Edge vertices, swapped if needed so `near` is closer to `vertices[0]`
    pub vertices: [usize; 2],
    pub near: Point3<f64>,
    pub far: Point3<f64>,
}

/// One of the three pieces of a split edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideCut {
    pub edge: usize,
    /// Vertex whose weight the length measures; `None` for the middle piece
    pub vertex: Option<usize>,
    pub segment: Segment3,
}

/// Everything one 3D update produces
#[derive(Debug, Clone, Serialize)]
pub struct PlaneSlice {
    pub point: Point3<f64>,
    pub planes: [Plane; 4],
    pub face_cuts: Vec<FaceCut>,
    pub hits: Vec<IntersectionPoint3>,
    pub edges: Vec<EdgeMatch>,
    pub side_cuts: Vec<SideCut>,
    pub probabilities: Option<ProbabilityVector<4>>,
}

/// Decompose `tetra` around `point`, which should already be clamped
pub fn slice_tetrahedron(tetra: &Tetrahedron, point: &Point3<f64>, tolerances: &Tolerances) -> PlaneSlice {
    let planes = cutting_planes(tetra, point);
    let face_cuts = face_cuts(tetra, &planes);
    let hits = edge_hits(tetra, &planes);
    let edges = match_edges(tetra, &hits, tolerances.edge_membership);
    let side_cuts = side_cuts(tetra, &edges);
    let probabilities = probabilities(&side_cuts);

    if edges.len() < TETRAHEDRON_EDGES.len() {
        log::warn!(
            "only {} of {} edges split at ({:.4}, {:.4}, {:.4})",
            edges.len(),
            TETRAHEDRON_EDGES.len(),
            point.x,
            point.y,
            point.z
        );
    }
    log::debug!(
        "plane slice: {} face cuts, {} edge hits, {} side cuts",
        face_cuts.len(),
        hits.len(),
        side_cuts.len()
    );

    PlaneSlice {
        point: *point,
        planes,
        face_cuts,
        hits,
        edges,
        side_cuts,
        probabilities,
    }
}

/// One plane through `point` per face, rotated from local up onto the face normal
pub fn cutting_planes(tetra: &Tetrahedron, point: &Point3<f64>) -> [Plane; 4] {
    std::array::from_fn(|face| {
        let normal = Unit::new_normalize(tetra.face_normal(face));
        Plane::facing(*point, &normal)
    })
}

/// The vertex not on face `face`
pub fn opposite_vertex(face: usize) -> usize {
    (0..4)
        .find(|v| !TETRAHEDRON_FACES[face].contains(v))
        .unwrap_or(0)
}

/// Plane/face crossings, plane-major
///
/// Each cut is painted and labelled with the vertex opposite the plane's
/// face, whose weight stays constant along it.
pub fn face_cuts(tetra: &Tetrahedron, planes: &[Plane; 4]) -> Vec<FaceCut> {
    let mut cuts = Vec::new();
    for (p, plane) in planes.iter().enumerate() {
        let vertex = tetra.vertex(opposite_vertex(p));
        for face in 0..4 {
            let [a, b, c] = tetra.face(face);
            if let Some([start, end]) = plane_triangle_intersection(&a, &b, &c, plane) {
                let segment = Segment3::new(start, end, Paint::Single(vertex.color)).with_label(vertex.label.clone());
                cuts.push(FaceCut {
                    plane: p,
                    face,
                    segment,
                });
            }
        }
    }
    cuts
}

/// Every plane/edge crossing, tagged with plane and edge
pub fn edge_hits(tetra: &Tetrahedron, planes: &[Plane; 4]) -> Vec<IntersectionPoint3> {
    let positions = tetra.positions();
    let mut hits = Vec::new();
    for (p, plane) in planes.iter().enumerate() {
        for (e, [i, j]) in TETRAHEDRON_EDGES.iter().enumerate() {
            if let Some(position) = plane_edge_intersection(&positions[*i], &positions[*j], plane) {
                hits.push(IntersectionPoint3 {
                    position,
                    cutter: p,
                    edge: e,
                });
            }
        }
    }
    hits
}

/// Pair up the hits lying on each edge
///
/// A hit belongs to an edge when its distances to both endpoints add up
/// to the edge length within `tolerance`; hits computed on the edge itself
/// are taken first. Edges with fewer than two such hits are left out.
pub fn match_edges(tetra: &Tetrahedron, hits: &[IntersectionPoint3], tolerance: f64) -> Vec<EdgeMatch> {
    let positions = tetra.positions();
    let mut matches = Vec::new();

    for (e, [i, j]) in TETRAHEDRON_EDGES.iter().enumerate() {
        let (v0, v1) = (positions[*i], positions[*j]);
        let length = tetra.edge_length(e);

        let mut on_edge: Vec<(bool, Point3<f64>)> = hits
            .iter()
            .filter(|hit| {
                let p = &hit.position;
                (nalgebra::distance(p, &v0) + nalgebra::distance(p, &v1) - length).abs() < tolerance
            })
            .map(|hit| (hit.edge == e, hit.position))
            .collect();
        // Near a vertex, hits on neighbouring edges also pass the test
        on_edge.sort_by_key(|(own, _)| !own);
        let on_edge: Vec<Point3<f64>> = on_edge.into_iter().map(|(_, p)| p).collect();

        let [first, second, ..] = on_edge.as_slice() else {
            continue;
        };

        let m = if nalgebra::distance(&v0, first) <= nalgebra::distance(&v0, second) {
            EdgeMatch {
                edge: e,
                vertices: [*i, *j],
                near: *first,
                far: *second,
            }
        } else {
            EdgeMatch {
                edge: e,
                vertices: [*j, *i],
                near: *first,
                far: *second,
            }
        };
        matches.push(m);
    }

    matches
}

/// Three normalized cuts per matched edge
///
/// With the edge ordered `v0 → v1`, the piece `v0 → near` measures the
/// weight of `v1` and the piece `v1 → far` the weight of `v0`; the
/// middle piece is shared by the other two vertices.
pub fn side_cuts(tetra: &Tetrahedron, edges: &[EdgeMatch]) -> Vec<SideCut> {
    let vertices = tetra.vertices();
    let mut cuts = Vec::with_capacity(edges.len() * 3);

    for m in edges {
        let [a, b] = m.vertices;
        let (v0, v1) = (&vertices[a], &vertices[b]);
        let length = tetra.edge_length(m.edge);

        cuts.push(SideCut {
            edge: m.edge,
            vertex: Some(b),
            segment: Segment3::normalized(v0.position, m.near, Paint::Single(v1.color), length)
                .with_label(v1.label.clone()),
        });
        cuts.push(SideCut {
            edge: m.edge,
            vertex: Some(a),
            segment: Segment3::normalized(v1.position, m.far, Paint::Single(v0.color), length)
                .with_label(v0.label.clone()),
        });

        let mut others = (0..4).filter(|v| *v != a && *v != b);
        if let (Some(c), Some(d)) = (others.next(), others.next()) {
            cuts.push(SideCut {
                edge: m.edge,
                vertex: None,
                segment: Segment3::normalized(
                    m.near,
                    m.far,
                    Paint::Pair(vertices[c].color, vertices[d].color),
                    length,
                ),
            });
        }
    }

    cuts
}

/// Probability of each vertex from the first cut measuring it
pub fn probabilities(cuts: &[SideCut]) -> Option<ProbabilityVector<4>> {
    let mut weights = [0.0; 4];
    for (v, weight) in weights.iter_mut().enumerate() {
        *weight = cuts
            .iter()
            .find(|cut| cut.vertex == Some(v))
            .map(|cut| cut.segment.length)?;
    }
    ProbabilityVector::from_weights(weights)
}

/// Paint a cut is displayed with
///
/// A two-colored cut drops a color whose vertex rounds to 0 whole
/// percent, that is below half a percent. Colors are matched by value.
pub fn display_paint(paint: Paint, colors: &[Color; 4], probabilities: &ProbabilityVector<4>) -> Paint {
    let reads_zero = |color: Color| {
        colors
            .iter()
            .position(|c| *c == color)
            .is_some_and(|v| (probabilities[v] * 100.0).round() == 0.0)
    };

    match paint {
        Paint::Pair(a, b) if reads_zero(a) && !reads_zero(b) => Paint::Single(b),
        Paint::Pair(a, b) if reads_zero(b) && !reads_zero(a) => Paint::Single(a),
        other => other,
    }
}
