// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Shared helpers

pub mod math;

pub use math::{approx_eq, dedup_points, points_coincide};
