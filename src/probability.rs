// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Probability vectors over simplex vertices and measurement sampling

use rand::Rng;
use serde::ser::{Serialize, Serializer};
use std::ops::Index;

/// Non-negative weights summing to one, entry `i` belonging to vertex `i`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityVector<const N: usize> {
    values: [f64; N],
}

impl<const N: usize> ProbabilityVector<N> {
    /// Normalize raw weights, `None` if any is negative or non-finite or they sum to zero
    pub fn from_weights(weights: [f64; N]) -> Option<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }
        Some(Self {
            values: weights.map(|w| w / total),
        })
    }

    /// Normalize weights given as a slice of exactly `N` entries
    pub fn from_slice(weights: &[f64]) -> Option<Self> {
        let weights: [f64; N] = weights.try_into().ok()?;
        Self::from_weights(weights)
    }

    pub fn uniform() -> Self {
        Self {
            values: [1.0 / N as f64; N],
        }
    }

    /// All the weight on vertex `index`
    pub fn one_hot(index: usize) -> Self {
        let mut values = [0.0; N];
        values[index] = 1.0;
        Self { values }
    }

    pub fn values(&self) -> &[f64; N] {
        &self.values
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Index of the largest entry
    pub fn most_likely(&self) -> usize {
        self.values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Draw an outcome by walking the cumulative distribution
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (i, p) in self.values.iter().enumerate() {
            cumulative += p;
            if draw < cumulative {
                return i;
            }
        }
        N - 1
    }

    /// Display percentages, one decimal
    pub fn percentages(&self) -> [String; N] {
        self.values.map(format_percent)
    }
}

impl<const N: usize> Index<usize> for ProbabilityVector<N> {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl<const N: usize> Serialize for ProbabilityVector<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values.iter())
    }
}

/// Percentage with one decimal; anything that renders as 99.9 or more reads `100.0`
pub fn format_percent(fraction: f64) -> String {
    let rendered = format!("{:.1}", fraction * 100.0);
    match rendered.parse::<f64>() {
        Ok(value) if value >= 99.9 => "100.0".to_string(),
        _ => rendered,
    }
}
