// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Simplex decompositions around a query point
//!
//! `parallel` handles the triangle, `planes` the tetrahedron. `axes` and
//! `splitter` post-process the tetrahedron's face cuts into slider axes
//! and display pieces.

pub mod axes;
pub mod parallel;
pub mod planes;
pub mod splitter;

pub use axes::{axis_chords, control_axes, point_from_slider, unique_directions, AxisChord};
pub use parallel::{slice_triangle, ParallelSlice, PROBABILITY_EDGE};
pub use planes::{display_paint, slice_tetrahedron, PlaneSlice};
pub use splitter::split_segments;
