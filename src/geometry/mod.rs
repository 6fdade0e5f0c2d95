// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Geometry module - simplex models, display segments and intersection tests

pub mod intersection;
pub mod segment;
pub mod simplex;

pub use intersection::{Plane, Ray};
pub use segment::{IntersectionPoint2, IntersectionPoint3, Paint, Segment2, Segment3};
pub use simplex::{Color, Tetrahedron, Triangle, Vertex, Vertex2, Vertex3};
