// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Triangle decomposition by lines parallel to its edges
//!
//! Through the query point P one line is drawn parallel to every edge
//! and clipped to the triangle. The clipped endpoints split each edge
//! into three pieces whose lengths are the barycentric weights of P,
//! which is what the probability vector is read from.

use crate::config::Tolerances;
use crate::geometry::intersection::line_line_2d;
use crate::geometry::segment::{IntersectionPoint2, Paint, Segment2};
use crate::geometry::simplex::Triangle;
use crate::probability::ProbabilityVector;
use crate::utils::math::PARALLEL_EPS;
use nalgebra::{Point2, Unit, Vector2};
use serde::Serialize;

/// Edge whose partition gives the probability vector
///
/// Edge 2 runs from vertex 2 to vertex 0; its pieces, in order from
/// vertex 2, measure the weights of vertices 0, 1 and 2.
pub const PROBABILITY_EDGE: usize = 2;

/// Slack on the edge parameter when clipping, so hits at a vertex survive rounding
const CLIP_SLACK: f64 = 1e-9;

/// A line through the query point, parallel to `edge`, clipped to the triangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParallelLine {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub direction: Unit<Vector2<f64>>,
    /// Edge this line is parallel to
    pub edge: usize,
    /// Edges the start and end were clipped against
    pub clipped_by: [usize; 2],
}

/// Everything one 2D update produces
#[derive(Debug, Clone, Serialize)]
pub struct ParallelSlice {
    pub point: Point2<f64>,
    pub lines: Vec<ParallelLine>,
    /// Crossing of the first two parallel lines
    pub pivot: Option<Point2<f64>>,
    /// Clipped endpoints of every parallel line
    pub hits: Vec<IntersectionPoint2>,
    /// Parallel lines split at the pivot, colored
    pub segments: Vec<Segment2>,
    /// Triangle edges split at the hits, colored
    pub edge_segments: Vec<Segment2>,
    pub probabilities: Option<ProbabilityVector<3>>,
}

/// Decompose `triangle` around `point`, which should already be clamped
pub fn slice_triangle(triangle: &Triangle, point: &Point2<f64>, tolerances: &Tolerances) -> ParallelSlice {
    let lines = parallel_lines(triangle, point);
    let hits = clipped_endpoints(&lines);
    let segments = parallel_segments(triangle, &lines, tolerances);
    let edge_segments = edge_partitions(triangle, &hits, tolerances);
    let probabilities = edge_probabilities(triangle, &hits);

    if probabilities.is_none() {
        log::warn!(
            "edge {} split into an unexpected number of pieces at ({:.4}, {:.4})",
            PROBABILITY_EDGE,
            point.x,
            point.y
        );
    }
    log::debug!(
        "parallel slice: {} lines, {} hits, {} segments",
        lines.len(),
        hits.len(),
        segments.len()
    );

    ParallelSlice {
        point: *point,
        pivot: pivot(&lines),
        lines,
        hits,
        segments,
        edge_segments,
        probabilities,
    }
}

/// One clipped line per edge through `point`; edges whose line misses the triangle are skipped
pub fn parallel_lines(triangle: &Triangle, point: &Point2<f64>) -> Vec<ParallelLine> {
    let extent = 10.0 * triangle.longest_edge() + nalgebra::distance(point, &triangle.centroid());
    let mut lines = Vec::with_capacity(3);

    for i in 0..3 {
        let (edge_start, edge_end) = triangle.edge(i);
        let Some(direction) = Unit::try_new(edge_end - edge_start, f64::EPSILON) else {
            continue;
        };

        let far_start = point - direction.into_inner() * extent;
        let far_end = point + direction.into_inner() * extent;

        let mut clips = Vec::with_capacity(3);
        for j in 0..3 {
            let (q1, q2) = triangle.edge(j);
            if let Some(hit) = clip_against_edge(&far_start, &far_end, &q1, &q2) {
                clips.push((hit, j));
            }
        }

        if let [(start, first), (end, second)] = clips.as_slice() {
            lines.push(ParallelLine {
                start: *start,
                end: *end,
                direction,
                edge: i,
                clipped_by: [*first, *second],
            });
        }
    }

    lines
}

/// Where the line `p1p2` crosses the edge `q1q2`, snapped onto the edge
fn clip_against_edge(
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

    let u = (q1 - p1).perp(&r) / rxs;
    if !(-CLIP_SLACK..=1.0 + CLIP_SLACK).contains(&u) {
        return None;
    }
    Some(q1 + s * u.clamp(0.0, 1.0))
}

/// Both endpoints of every clipped line, tagged with the line's edge and the clipping edge
pub fn clipped_endpoints(lines: &[ParallelLine]) -> Vec<IntersectionPoint2> {
    lines
        .iter()
        .flat_map(|line| {
            [
                IntersectionPoint2 {
                    position: line.start,
                    cutter: line.edge,
                    edge: line.clipped_by[0],
                },
                IntersectionPoint2 {
                    position: line.end,
                    cutter: line.edge,
                    edge: line.clipped_by[1],
                },
            ]
        })
        .collect()
}

/// Crossing of the first two parallel lines
pub fn pivot(lines: &[ParallelLine]) -> Option<Point2<f64>> {
    match lines {
        [first, second, ..] => line_line_2d(&first.start, &first.end, &second.start, &second.end),
        _ => None,
    }
}

/// Endpoints of line `index` plus its crossings with the other lines, in order along it
pub fn points_on_line(lines: &[ParallelLine], index: usize) -> Vec<Point2<f64>> {
    let line = &lines[index];
    let mut points = vec![line.start, line.end];

    for (j, other) in lines.iter().enumerate() {
        if j == index {
            continue;
        }
        if let Some(hit) = line_line_2d(&line.start, &line.end, &other.start, &other.end) {
            points.push(hit);
        }
    }

    sort_along(&mut points, &line.start, &line.end);
    points
}

/// Each parallel line drawn as pieces ending at the pivot
///
/// The piece toward the line's end takes the color of the edge's second
/// vertex and the piece toward its start the first vertex's; the second
/// line swaps the two.
pub fn parallel_segments(triangle: &Triangle, lines: &[ParallelLine], tolerances: &Tolerances) -> Vec<Segment2> {
    let Some(pivot) = pivot(lines) else {
        return Vec::new();
    };
    let vertices = triangle.vertices();
    let mut segments = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let points = points_on_line(lines, i);

        let mut toward_end = (line.edge + 1) % 3;
        let mut toward_start = line.edge;
        if i == 1 {
            std::mem::swap(&mut toward_end, &mut toward_start);
        }

        for pair in points.windows(2) {
            for (from, vertex) in [(pair[1], toward_end), (pair[0], toward_start)] {
                let segment = Segment2::new(from, pivot, Paint::Single(vertices[vertex].color));
                if segment.length > tolerances.point_dedup {
                    segments.push(segment.with_label(vertices[vertex].label.clone()));
                }
            }
        }
    }

    segments
}

/// Hits clipped against edge `index`, plus the edge's endpoints, sorted from its start
///
/// Hits are taken by their clipping tag rather than by distance, so a
/// query on the boundary does not pull in endpoints that merely touch the
/// edge at a vertex.
pub fn edge_partition(triangle: &Triangle, index: usize, hits: &[IntersectionPoint2]) -> Vec<Point2<f64>> {
    let (start, end) = triangle.edge(index);

    let mut points: Vec<Point2<f64>> = hits
        .iter()
        .filter(|hit| hit.edge == index)
        .map(|hit| hit.position)
        .collect();

    points.push(start);
    points.push(end);
    sort_along(&mut points, &start, &end);
    points
}

/// Every triangle edge cut into colored pieces
///
/// A piece is colored with the vertex whose weight its length measures:
/// the end pieces take the vertex at the far end of the edge, the middle
/// piece the vertex opposite the edge.
pub fn edge_partitions(triangle: &Triangle, hits: &[IntersectionPoint2], tolerances: &Tolerances) -> Vec<Segment2> {
    let vertices = triangle.vertices();
    let mut segments = Vec::new();

    for i in 0..3 {
        let points = edge_partition(triangle, i, hits);
        let first = triangle.position(i);
        let second = triangle.position(i + 1);

        for (j, pair) in points.windows(2).enumerate() {
            let vertex = if j == 1 {
                (i + 2) % 3
            } else if nalgebra::distance(&first, &pair[0]) < nalgebra::distance(&second, &pair[1]) {
                (i + 1) % 3
            } else {
                i
            };

            let segment = Segment2::new(pair[0], pair[1], Paint::Single(vertices[vertex].color));
            if segment.length > tolerances.point_dedup {
                segments.push(segment.with_label(vertices[vertex].label.clone()));
            }
        }
    }

    segments
}

/// Probabilities from the piece lengths of [`PROBABILITY_EDGE`]
///
/// `None` unless the edge splits into exactly three pieces.
pub fn edge_probabilities(
    triangle: &Triangle,
    hits: &[IntersectionPoint2],
) -> Option<ProbabilityVector<3>> {
    let points = edge_partition(triangle, PROBABILITY_EDGE, hits);
    let lengths: Vec<f64> = points
        .windows(2)
        .map(|pair| nalgebra::distance(&pair[0], &pair[1]))
        .collect();
    ProbabilityVector::from_slice(&lengths)
}

fn sort_along(points: &mut [Point2<f64>], start: &Point2<f64>, end: &Point2<f64>) {
    let axis = end - start;
    points.sort_by(|a, b| {
        let pa = (a - start).dot(&axis);
        let pb = (b - start).dot(&axis);
        pa.total_cmp(&pb)
    });
}
