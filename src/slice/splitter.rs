// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Splitting segments at their mutual crossings

use crate::geometry::intersection::line_line_3d;
use crate::geometry::segment::Segment3;
use crate::utils::math::dedup_points;

/// Split every segment wherever another segment crosses it
///
/// Crossing points and the segment's own endpoints are merged when they
/// coincide within `tolerance`, ordered from the start, and consecutive
/// points further apart than `tolerance` become pieces. Pieces keep the
/// parent's paint and label.
pub fn split_segments(segments: &[Segment3], tolerance: f64) -> Vec<Segment3> {
    let mut result = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        let mut points = vec![segment.start, segment.end];
        for (j, other) in segments.iter().enumerate() {
            if i == j {
                continue;
            }
            if let Some(hit) = line_line_3d(&segment.start, &segment.end, &other.start, &other.end) {
                points.push(hit);
            }
        }

        let mut points = dedup_points(&points, tolerance);
        points.sort_by(|a, b| {
            let da = (a - segment.start).norm_squared();
            let db = (b - segment.start).norm_squared();
            da.total_cmp(&db)
        });

        for pair in points.windows(2) {
            if nalgebra::distance(&pair[0], &pair[1]) > tolerance {
                let mut piece = Segment3::new(pair[0], pair[1], segment.paint);
                piece.label = segment.label.clone();
                result.push(piece);
            }
        }
    }

    result
}
