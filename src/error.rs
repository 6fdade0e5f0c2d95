// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Error types for the boundary of the geometry engine
//!
//! Degenerate intersections inside an update never surface here: they
//! come back as `None` from the primitives and just produce fewer
//! segments. Only the inputs and the construction of a simplex can fail.

/// Errors raised at the boundary of the engine
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimplexError {
    /// A query point carried a NaN or infinite coordinate.
    #[error("query point has non-finite coordinates: {0:?}")]
    NonFinitePoint(Vec<f64>),

    /// The simplex has (almost) zero area or volume.
    #[error("the simplex is degenerate (measure {measure:e})")]
    Degenerate { measure: f64 },

    /// A slider referenced an axis that the current update did not produce.
    #[error("control axis {0} is not available for the current query point")]
    MissingAxis(usize),

    /// A slider value outside of `[0, 1]`.
    #[error("slider value {0} is outside of [0, 1]")]
    SliderOutOfRange(f64),

    /// Measurement requested before any probability vector exists.
    #[error("no probability vector has been computed yet")]
    NoSnapshot,

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimplexError>;

/// Reject points with non-finite coordinates
pub fn ensure_finite(coords: &[f64]) -> Result<()> {
    if coords.iter().all(|c| c.is_finite()) {
        Ok(())
    } else {
        Err(SimplexError::NonFinitePoint(coords.to_vec()))
    }
}
