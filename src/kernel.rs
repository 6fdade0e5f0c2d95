// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Kernel API: stateful sessions over a triangle or tetrahedron
//!
//! A kernel owns its simplex, configuration, RNG and the latest snapshot.
//! Every event produces a fresh snapshot; earlier snapshots are never
//! touched again.

use crate::config::EngineConfig;
use crate::error::{ensure_finite, Result, SimplexError};
use crate::geometry::segment::{Segment2, Segment3};
use crate::geometry::simplex::{Tetrahedron, Triangle};
use crate::probability::ProbabilityVector;
use crate::slice::axes::{axis_chords, control_axes, point_from_slider, unique_directions, AxisChord};
use crate::slice::parallel::slice_triangle;
use crate::slice::planes::{display_paint, slice_tetrahedron, FaceCut, SideCut};
use crate::slice::splitter::split_segments;
use nalgebra::{Point2, Point3, Unit, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Input events for the triangle kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleEvent {
    MoveTo(Point2<f64>),
    Measure,
}

/// Input events for the tetrahedron kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TetrahedronEvent {
    MoveTo(Point3<f64>),
    /// Move slider `axis` to `value` in `[0, 1]`
    Slide { axis: usize, value: f64 },
    Measure,
}

/// Result of one triangle update
#[derive(Debug, Clone, Serialize)]
pub struct TriangleSnapshot {
    pub point: Point2<f64>,
    pub radius: f64,
    pub probabilities: ProbabilityVector<3>,
    pub percentages: [String; 3],
    pub pivot: Option<Point2<f64>>,
    /// Parallel lines, split at the pivot
    pub segments: Vec<Segment2>,
    /// Triangle edges, split where the parallel lines meet them
    pub edge_segments: Vec<Segment2>,
    /// Outcome, when this snapshot came from a measurement
    pub measured: Option<usize>,
}

/// Result of one tetrahedron update
#[derive(Debug, Clone, Serialize)]
pub struct TetrahedronSnapshot {
    pub point: Point3<f64>,
    pub radius: f64,
    pub probabilities: ProbabilityVector<4>,
    pub percentages: [String; 4],
    pub face_cuts: Vec<FaceCut>,
    /// Face cuts split at their mutual crossings
    pub face_segments: Vec<Segment3>,
    /// Edge pieces, with display paint applied
    pub side_cuts: Vec<SideCut>,
    /// Faces within `face_proximity` of the point
    pub near_faces: [bool; 4],
    pub axes: Vec<Unit<Vector3<f64>>>,
    pub chords: Vec<Option<AxisChord>>,
    /// Slider positions read back from the chords
    pub sliders: Vec<Option<f64>>,
    pub measured: Option<usize>,
}

fn rng_from(config: &EngineConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Session over a triangle
pub struct TriangleKernel {
    triangle: Triangle,
    config: EngineConfig,
    rng: StdRng,
    snapshot: Option<TriangleSnapshot>,
}

impl TriangleKernel {
    /// Kernel over the equilateral triangle described by `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let inset = config.inset_offset * config.triangle_scale;
        let triangle = Triangle::equilateral(config.triangle_scale, inset)?;
        Ok(Self::with_triangle(triangle, config))
    }

    pub fn with_triangle(triangle: Triangle, config: EngineConfig) -> Self {
        Self {
            rng: rng_from(&config),
            triangle,
            config,
            snapshot: None,
        }
    }

    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Latest snapshot, if any event was processed
    pub fn snapshot(&self) -> Option<&TriangleSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn handle(&mut self, event: TriangleEvent) -> Result<&TriangleSnapshot> {
        match event {
            TriangleEvent::MoveTo(point) => self.update(point),
            TriangleEvent::Measure => self.measure(),
        }
    }

    /// Clamp `point` into the interaction area and decompose around it
    pub fn update(&mut self, point: Point2<f64>) -> Result<&TriangleSnapshot> {
        ensure_finite(point.coords.as_slice())?;
        let clamped = self.triangle.clamp(&point);
        let slice = slice_triangle(&self.triangle, &clamped, &self.config.tolerances);

        let probabilities = match slice.probabilities {
            Some(probabilities) => probabilities,
            None => {
                log::warn!("keeping previous triangle probabilities");
                self.previous_probabilities()
            }
        };

        let snapshot = TriangleSnapshot {
            point: clamped,
            radius: self.triangle.radius(&clamped),
            percentages: probabilities.percentages(),
            probabilities,
            pivot: slice.pivot,
            segments: slice.segments,
            edge_segments: slice.edge_segments,
            measured: None,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    /// Sample an outcome and collapse onto that vertex
    pub fn measure(&mut self) -> Result<&TriangleSnapshot> {
        let current = self.snapshot.as_ref().ok_or(SimplexError::NoSnapshot)?;
        let outcome = current.probabilities.sample(&mut self.rng);
        log::debug!("triangle measurement collapsed to vertex {}", outcome);

        let target = self.triangle.inset_vertices()[outcome];
        self.update(target)?;

        let probabilities = ProbabilityVector::one_hot(outcome);
        let snapshot = self.snapshot.as_mut().ok_or(SimplexError::NoSnapshot)?;
        snapshot.percentages = probabilities.percentages();
        snapshot.probabilities = probabilities;
        snapshot.measured = Some(outcome);
        Ok(snapshot)
    }

    fn previous_probabilities(&self) -> ProbabilityVector<3> {
        self.snapshot
            .as_ref()
            .map(|s| s.probabilities)
            .unwrap_or_else(ProbabilityVector::uniform)
    }
}

/// Session over a tetrahedron
pub struct TetrahedronKernel {
    tetrahedron: Tetrahedron,
    config: EngineConfig,
    rng: StdRng,
    snapshot: Option<TetrahedronSnapshot>,
}

impl TetrahedronKernel {
    /// Kernel over the regular tetrahedron described by `config`
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let tetrahedron = Tetrahedron::regular(config.tetrahedron_edge)?;
        Ok(Self::with_tetrahedron(tetrahedron, config))
    }

    pub fn with_tetrahedron(tetrahedron: Tetrahedron, config: EngineConfig) -> Self {
        Self {
            rng: rng_from(&config),
            tetrahedron,
            config,
            snapshot: None,
        }
    }

    pub fn tetrahedron(&self) -> &Tetrahedron {
        &self.tetrahedron
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Option<&TetrahedronSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn handle(&mut self, event: TetrahedronEvent) -> Result<&TetrahedronSnapshot> {
        match event {
            TetrahedronEvent::MoveTo(point) => self.update(point),
            TetrahedronEvent::Slide { axis, value } => self.slide(axis, value),
            TetrahedronEvent::Measure => self.measure(),
        }
    }

    /// Clamp `point` into the scaled tetrahedron and decompose around it
    pub fn update(&mut self, point: Point3<f64>) -> Result<&TetrahedronSnapshot> {
        ensure_finite(point.coords.as_slice())?;
        let tolerances = &self.config.tolerances;
        let clamped = self.tetrahedron.clamp(&point, self.config.interior_scale);
        let slice = slice_tetrahedron(&self.tetrahedron, &clamped, tolerances);

        let probabilities = match slice.probabilities {
            Some(probabilities) => probabilities,
            None => {
                log::warn!("keeping previous tetrahedron probabilities");
                self.previous_probabilities()
            }
        };

        let cut_segments: Vec<Segment3> = slice.face_cuts.iter().map(|cut| cut.segment.clone()).collect();
        let face_segments = split_segments(&cut_segments, tolerances.point_dedup);

        let unique = unique_directions(&cut_segments, tolerances.axis_duplicate_dot);
        let axes = control_axes(&unique);
        let chords = axis_chords(&self.tetrahedron, &clamped, &axes);
        let sliders = chords
            .iter()
            .map(|chord| chord.map(|c| c.readback(&clamped)))
            .collect();

        let proximity = self.config.face_proximity * self.tetrahedron.longest_edge();
        let near_faces = self.tetrahedron.near_faces(&clamped, proximity);

        let colors = self.tetrahedron.colors();
        let side_cuts = slice
            .side_cuts
            .into_iter()
            .map(|mut cut| {
                cut.segment.paint = display_paint(cut.segment.paint, &colors, &probabilities);
                cut
            })
            .collect();

        log::debug!(
            "tetrahedron update: {} face pieces, {} unique directions, {} axes",
            face_segments.len(),
            unique.len(),
            axes.len()
        );

        let snapshot = TetrahedronSnapshot {
            point: clamped,
            radius: self.tetrahedron.radius(&clamped),
            percentages: probabilities.percentages(),
            probabilities,
            face_cuts: slice.face_cuts,
            face_segments,
            side_cuts,
            near_faces,
            axes,
            chords,
            sliders,
            measured: None,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    /// Move along control axis `axis` to slider position `value`
    pub fn slide(&mut self, axis: usize, value: f64) -> Result<&TetrahedronSnapshot> {
        let current = self.snapshot.as_ref().ok_or(SimplexError::NoSnapshot)?;
        match point_from_slider(&current.chords, axis, value, self.config.min_axis_length)? {
            Some(target) => self.update(target),
            None => self.snapshot.as_ref().ok_or(SimplexError::NoSnapshot),
        }
    }

    /// Sample an outcome and collapse onto that vertex
    pub fn measure(&mut self) -> Result<&TetrahedronSnapshot> {
        let current = self.snapshot.as_ref().ok_or(SimplexError::NoSnapshot)?;
        let outcome = current.probabilities.sample(&mut self.rng);
        log::debug!("tetrahedron measurement collapsed to vertex {}", outcome);

        let target = self.tetrahedron.scale_toward_centroid(self.config.interior_scale)[outcome];
        self.update(target)?;

        let probabilities = ProbabilityVector::one_hot(outcome);
        let colors = self.tetrahedron.colors();
        let snapshot = self.snapshot.as_mut().ok_or(SimplexError::NoSnapshot)?;
        for cut in &mut snapshot.side_cuts {
            cut.segment.paint = display_paint(cut.segment.paint, &colors, &probabilities);
        }
        snapshot.percentages = probabilities.percentages();
        snapshot.probabilities = probabilities;
        snapshot.measured = Some(outcome);
        Ok(snapshot)
    }

    fn previous_probabilities(&self) -> ProbabilityVector<4> {
        self.snapshot
            .as_ref()
            .map(|s| s.probabilities)
            .unwrap_or_else(ProbabilityVector::uniform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seeded() -> EngineConfig {
        EngineConfig {
            seed: Some(42),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_triangle_update_at_centroid() {
        let mut kernel = TriangleKernel::new(seeded()).unwrap();
        let centroid = kernel.triangle().centroid();
        let snapshot = kernel.update(centroid).unwrap();
        for p in snapshot.probabilities.values() {
            assert_relative_eq!(*p, 1.0 / 3.0, epsilon = 1e-3);
        }
        assert_relative_eq!(snapshot.radius, 0.0, epsilon = 1e-12);
        assert_eq!(snapshot.percentages[0], "33.3");
    }

    #[test]
    fn test_triangle_rejects_non_finite() {
        let mut kernel = TriangleKernel::new(seeded()).unwrap();
        let result = kernel.update(Point2::new(f64::NAN, 0.0));
        assert!(matches!(result, Err(SimplexError::NonFinitePoint(_))));
        assert!(kernel.snapshot().is_none());
    }

    #[test]
    fn test_measure_needs_snapshot() {
        let mut kernel = TriangleKernel::new(seeded()).unwrap();
        assert!(matches!(kernel.measure(), Err(SimplexError::NoSnapshot)));
    }

    #[test]
    fn test_triangle_measure_collapses() {
        let mut kernel = TriangleKernel::new(seeded()).unwrap();
        let centroid = kernel.triangle().centroid();
        kernel.handle(TriangleEvent::MoveTo(centroid)).unwrap();

        let snapshot = kernel.handle(TriangleEvent::Measure).unwrap();
        let outcome = snapshot.measured.unwrap();
        assert_eq!(snapshot.probabilities, ProbabilityVector::one_hot(outcome));
        assert_eq!(snapshot.percentages[outcome], "100.0");
        let target = kernel.triangle().inset_vertices()[outcome];
        let point = kernel.snapshot().unwrap().point;
        assert_relative_eq!(nalgebra::distance(&point, &target), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tetrahedron_update_at_centroid() {
        let mut kernel = TetrahedronKernel::new(seeded()).unwrap();
        let centroid = kernel.tetrahedron().centroid();
        let snapshot = kernel.update(centroid).unwrap();
        for p in snapshot.probabilities.values() {
            assert_relative_eq!(*p, 0.25, epsilon = 1e-3);
        }
        assert_eq!(snapshot.face_cuts.len(), 12);
        assert_eq!(snapshot.near_faces, [false; 4]);
        assert_eq!(snapshot.axes.len(), 3);
        assert!(snapshot.chords.iter().all(Option::is_some));
    }

    #[test]
    fn test_slide_moves_along_axis() {
        let mut kernel = TetrahedronKernel::new(seeded()).unwrap();
        let centroid = kernel.tetrahedron().centroid();
        kernel.update(centroid).unwrap();

        let snapshot = kernel.handle(TetrahedronEvent::Slide { axis: 1, value: 0.4 }).unwrap();
        let moved = snapshot.point;
        assert!(nalgebra::distance(&moved, &centroid) > 1e-3);
        assert!(kernel.tetrahedron().contains(&moved));
        let sum: f64 = kernel.snapshot().unwrap().probabilities.sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_slide_rejects_bad_axis() {
        let mut kernel = TetrahedronKernel::new(seeded()).unwrap();
        let centroid = kernel.tetrahedron().centroid();
        kernel.update(centroid).unwrap();
        assert!(matches!(kernel.slide(5, 0.5), Err(SimplexError::MissingAxis(5))));
    }

    #[test]
    fn test_tetrahedron_measure_is_reproducible() {
        let run = || {
            let mut kernel = TetrahedronKernel::new(seeded()).unwrap();
            let centroid = kernel.tetrahedron().centroid();
            kernel.update(centroid).unwrap();
            kernel.measure().unwrap().measured
        };
        assert_eq!(run(), run());
    }
}
