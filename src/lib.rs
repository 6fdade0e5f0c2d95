// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Qubitslice geometry engine
//!
//! Maps a point inside a triangle (qutrit) or tetrahedron (ququart) to a
//! probability vector over the simplex vertices by slicing the simplex
//! with lines or planes through the point. Also produces the colored
//! display segments, slider axes and measurement collapse used by a
//! renderer.

pub mod config;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod probability;
pub mod slice;
pub mod utils;

#[cfg(feature = "wasm")]
pub mod ffi;

pub use config::{EngineConfig, Tolerances};
pub use error::{Result, SimplexError};
pub use geometry::{Color, Paint, Segment2, Segment3, Tetrahedron, Triangle};
pub use kernel::{
    TetrahedronEvent, TetrahedronKernel, TetrahedronSnapshot, TriangleEvent, TriangleKernel,
    TriangleSnapshot,
};
pub use probability::{format_percent, ProbabilityVector};

use nalgebra::{Point2, Point3};

/// One-shot triangle update at `point`
pub fn query_triangle(config: EngineConfig, point: Point2<f64>) -> Result<TriangleSnapshot> {
    let mut kernel = TriangleKernel::new(config)?;
    kernel.update(point).cloned()
}

/// One-shot tetrahedron update at `point`
pub fn query_tetrahedron(config: EngineConfig, point: Point3<f64>) -> Result<TetrahedronSnapshot> {
    let mut kernel = TetrahedronKernel::new(config)?;
    kernel.update(point).cloned()
}
