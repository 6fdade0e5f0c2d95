// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Engine configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::SimplexError;
use crate::utils::math::{AXIS_DUPLICATE_DOT, EDGE_EPS, POINT_EPS};

/// Default configuration file looked up by [`EngineConfig::load`]
pub const CONFIG_FILE: &str = "qubitslice.toml";

/// Default triangle inset: 0.005 on a side of 19.2
pub const DEFAULT_INSET_OFFSET: f64 = 0.005 / 19.2;

/// Default face proximity: 0.15 on an edge of 48
pub const DEFAULT_FACE_PROXIMITY: f64 = 0.15 / 48.0;

/// Named tolerances used by the slicing operations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Coordinate-wise distance for merging 3D intersection points
    pub point_dedup: f64,
    /// Distance for accepting a point as lying on a simplex edge
    pub edge_membership: f64,
    /// `|dot|` above which two axis directions are duplicates
    pub axis_duplicate_dot: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point_dedup: POINT_EPS,
            edge_membership: EDGE_EPS,
            axis_duplicate_dot: AXIS_DUPLICATE_DOT,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the equilateral triangle
    pub triangle_scale: f64,
    /// Edge length of the regular tetrahedron
    pub tetrahedron_edge: f64,
    /// Inset of the triangle's interaction boundary, as a fraction of `triangle_scale`
    pub inset_offset: f64,
    /// Factor moving tetrahedron vertices toward the centroid for the interaction boundary
    pub interior_scale: f64,
    /// Axis chords shorter than this do not move the point
    pub min_axis_length: f64,
    /// Faces nearer the point than this fraction of the tetrahedron edge are flagged
    pub face_proximity: f64,
    /// Seed for measurement sampling; entropy when absent
    pub seed: Option<u64>,
    pub tolerances: Tolerances,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            triangle_scale: 1.0,
            tetrahedron_edge: 1.0,
            inset_offset: DEFAULT_INSET_OFFSET,
            interior_scale: 0.9995,
            min_axis_length: 1e-3,
            face_proximity: DEFAULT_FACE_PROXIMITY,
            seed: None,
            tolerances: Tolerances::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QUBITSLICE_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(seed) = lookup("QUBITSLICE_SEED") {
            let parsed = seed
                .parse::<u64>()
                .with_context(|| format!("Invalid QUBITSLICE_SEED: {}", seed))?;
            self.seed = Some(parsed);
        }

        if let Some(scale) = lookup("QUBITSLICE_TRIANGLE_SCALE") {
            self.triangle_scale = scale
                .parse()
                .with_context(|| format!("Invalid QUBITSLICE_TRIANGLE_SCALE: {}", scale))?;
        }

        if let Some(edge) = lookup("QUBITSLICE_TETRAHEDRON_EDGE") {
            self.tetrahedron_edge = edge
                .parse()
                .with_context(|| format!("Invalid QUBITSLICE_TETRAHEDRON_EDGE: {}", edge))?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject sizes and tolerances that would make every update degenerate
    pub fn validate(&self) -> std::result::Result<(), SimplexError> {
        let positive = [
            ("triangle_scale", self.triangle_scale),
            ("tetrahedron_edge", self.tetrahedron_edge),
            ("tolerances.point_dedup", self.tolerances.point_dedup),
            ("tolerances.edge_membership", self.tolerances.edge_membership),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimplexError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !(self.inset_offset >= 0.0 && self.inset_offset < 0.25) {
            return Err(SimplexError::InvalidConfig(format!(
                "inset_offset {} must lie in [0, 0.25)",
                self.inset_offset
            )));
        }

        if !(self.interior_scale > 0.0 && self.interior_scale <= 1.0) {
            return Err(SimplexError::InvalidConfig(format!(
                "interior_scale {} must lie in (0, 1]",
                self.interior_scale
            )));
        }

        let non_negative = [
            ("min_axis_length", self.min_axis_length),
            ("face_proximity", self.face_proximity),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(SimplexError::InvalidConfig(format!("{} {} must not be negative", name, value)));
            }
        }

        let dot = self.tolerances.axis_duplicate_dot;
        if !(dot > 0.0 && dot < 1.0) {
            return Err(SimplexError::InvalidConfig(format!(
                "tolerances.axis_duplicate_dot {} must lie in (0, 1)",
                dot
            )));
        }

        Ok(())
    }
}
