// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Control axes derived from the face cuts, their chords and slider mapping

use crate::error::{Result, SimplexError};
use crate::geometry::intersection::{closest_ray_hit, Ray};
use crate::geometry::segment::Segment3;
use crate::geometry::simplex::Tetrahedron;
use nalgebra::{Point3, Unit, Vector3};
use serde::Serialize;

/// Number of slider axes exposed to the user
pub const CONTROL_AXES: usize = 3;

/// Directions of `segments` with near-duplicates removed, in first-seen order
///
/// A direction is a duplicate when `|dot|` with an already kept one
/// exceeds `threshold`, so opposite directions collapse too.
pub fn unique_directions(segments: &[Segment3], threshold: f64) -> Vec<Unit<Vector3<f64>>> {
    let directions: Vec<Unit<Vector3<f64>>> = segments.iter().filter_map(Segment3::direction).collect();
    unique_among(&directions, threshold)
}

fn unique_among(directions: &[Unit<Vector3<f64>>], threshold: f64) -> Vec<Unit<Vector3<f64>>> {
    let mut unique: Vec<Unit<Vector3<f64>>> = Vec::new();
    for direction in directions {
        if unique.iter().all(|kept| kept.dot(direction.as_ref()).abs() <= threshold) {
            unique.push(*direction);
        }
    }
    unique
}

/// Slider axes: unique directions 1 to 3
///
/// The first unique direction is skipped; with the regular tetrahedron it
/// is the edge shared by faces 0 and 1, already covered by the others'
/// span.
pub fn control_axes(unique: &[Unit<Vector3<f64>>]) -> Vec<Unit<Vector3<f64>>> {
    unique.iter().skip(1).take(CONTROL_AXES).copied().collect()
}

/// Chord of the tetrahedron through `point` along one axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisChord {
    pub direction: Unit<Vector3<f64>>,
    /// Boundary hit behind the point
    pub start: Point3<f64>,
    /// Boundary hit ahead of the point
    pub end: Point3<f64>,
    pub length: f64,
}

impl AxisChord {
    /// Chord through `point` along `direction`, `None` if either ray escapes
    pub fn through(tetra: &Tetrahedron, point: &Point3<f64>, direction: Unit<Vector3<f64>>) -> Option<Self> {
        let faces: Vec<[Point3<f64>; 3]> = (0..4).map(|f| tetra.face(f)).collect();
        let end = closest_ray_hit(&Ray::new(*point, direction), &faces)?;
        let start = closest_ray_hit(&Ray::new(*point, -direction), &faces)?;
        Some(Self {
            direction,
            start,
            end,
            length: nalgebra::distance(&start, &end),
        })
    }

    /// Point at fraction `value` of the chord, measured from its start
    pub fn point_at(&self, value: f64) -> Point3<f64> {
        self.start + self.direction.into_inner() * (value * self.length)
    }

    /// Slider position of `point` on this chord
    pub fn readback(&self, point: &Point3<f64>) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        1.0 - nalgebra::distance(&self.end, point) / self.length
    }
}

/// Chords for each axis; axes whose rays miss the boundary get `None`
pub fn axis_chords(tetra: &Tetrahedron, point: &Point3<f64>, axes: &[Unit<Vector3<f64>>]) -> Vec<Option<AxisChord>> {
    axes.iter()
        .map(|axis| AxisChord::through(tetra, point, *axis))
        .collect()
}

/// Target of moving slider `axis` to `value`
///
/// `Ok(None)` when the chord is shorter than `min_length`; the point
/// then stays where it is.
pub fn point_from_slider(
    chords: &[Option<AxisChord>],
    axis: usize,
    value: f64,
    min_length: f64,
) -> Result<Option<Point3<f64>>> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SimplexError::SliderOutOfRange(value));
    }
    let chord = chords
        .get(axis)
        .copied()
        .flatten()
        .ok_or(SimplexError::MissingAxis(axis))?;

    if chord.length < min_length {
        log::debug!("axis {} chord too short ({:.2e}), slider ignored", axis, chord.length);
        return Ok(None);
    }
    Ok(Some(chord.point_at(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::segment::Paint;
    use crate::geometry::simplex::Color;
    use approx::assert_relative_eq;

    fn seg(end: [f64; 3]) -> Segment3 {
        Segment3::new(Point3::origin(), Point3::from(end), Paint::Single(Color::RED))
    }

    #[test]
    fn test_duplicates_collapse() {
        let segments = [
            seg([1.0, 0.0, 0.0]),
            seg([1.0, 0.0, 0.0]),
            seg([0.0, 1.0, 0.0]),
            seg([0.0, 0.0, 1.0]),
        ];
        assert_eq!(unique_directions(&segments, 0.75).len(), 3);
    }

    #[test]
    fn test_opposite_directions_collapse() {
        let segments = [seg([1.0, 0.0, 0.0]), seg([-1.0, 0.1, 0.0]), seg([0.0, 0.0, 0.0])];
        assert_eq!(unique_directions(&segments, 0.75).len(), 1);
    }

    #[test]
    fn test_control_axes_skip_first() {
        let segments = [
            seg([1.0, 0.0, 0.0]),
            seg([0.0, 1.0, 0.0]),
            seg([0.0, 0.0, 1.0]),
            seg([1.0, 1.0, 1.0]),
            seg([1.0, -1.0, 1.0]),
        ];
        let unique = unique_directions(&segments, 0.75);
        let axes = control_axes(&unique);
        assert_eq!(axes.len(), 3);
        assert_relative_eq!(axes[0].y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(axes[1].z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_chord_through_centroid() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let center = tetra.centroid();
        let chord = AxisChord::through(&tetra, &center, Vector3::x_axis()).unwrap();

        for end in [chord.start, chord.end] {
            let weights = tetra.barycentric(&end);
            let lowest = weights.iter().copied().fold(f64::INFINITY, f64::min);
            assert_relative_eq!(lowest, 0.0, epsilon = 1e-9);
        }
        assert!(chord.start.x < center.x && chord.end.x > center.x);
        let through = nalgebra::distance(&chord.start, &center) + nalgebra::distance(&center, &chord.end);
        assert_relative_eq!(chord.length, through, epsilon = 1e-9);
    }

    #[test]
    fn test_slider_round_trip() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let center = tetra.centroid();
        let chords = axis_chords(&tetra, &center, &[Vector3::x_axis()]);

        let target = point_from_slider(&chords, 0, 0.3, 1e-3).unwrap().unwrap();
        let chord = chords[0].unwrap();
        assert_relative_eq!(chord.readback(&target), 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_slider_errors() {
        let tetra = Tetrahedron::regular(1.0).unwrap();
        let chords = axis_chords(&tetra, &tetra.centroid(), &[Vector3::x_axis()]);
        assert!(matches!(
            point_from_slider(&chords, 2, 0.5, 1e-3),
            Err(SimplexError::MissingAxis(2))
        ));
        assert!(matches!(
            point_from_slider(&chords, 0, 1.5, 1e-3),
            Err(SimplexError::SliderOutOfRange(_))
        ));
        assert_eq!(point_from_slider(&chords, 0, 0.5, 10.0).unwrap(), None);
    }
}
