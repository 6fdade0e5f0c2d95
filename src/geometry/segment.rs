// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Qubitslice Team

//! Display segments and tagged intersection points

use super::simplex::Color;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// One or two colors carried by a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Single(Color),
    /// Shared segment, drawn striped with both colors
    Pair(Color, Color),
}

impl Paint {
    pub fn contains(&self, color: Color) -> bool {
        match *self {
            Paint::Single(c) => c == color,
            Paint::Pair(a, b) => a == color || b == color,
        }
    }

    pub fn colors(&self) -> Vec<Color> {
        match *self {
            Paint::Single(c) => vec![c],
            Paint::Pair(a, b) => vec![a, b],
        }
    }
}

/// Segment with paint, optional label and a (possibly normalized) length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment<P> {
    pub start: P,
    pub end: P,
    pub paint: Paint,
    pub label: Option<String>,
    pub length: f64,
}

pub type Segment2 = Segment<Point2<f64>>;
pub type Segment3 = Segment<Point3<f64>>;

impl<P> Segment<P> {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl Segment2 {
    pub fn new(start: Point2<f64>, end: Point2<f64>, paint: Paint) -> Self {
        Self {
            length: nalgebra::distance(&start, &end),
            start,
            end,
            paint,
            label: None,
        }
    }
}

impl Segment3 {
    pub fn new(start: Point3<f64>, end: Point3<f64>, paint: Paint) -> Self {
        Self {
            length: nalgebra::distance(&start, &end),
            start,
            end,
            paint,
            label: None,
        }
    }

    /// Segment whose length is divided by `reference`
    pub fn normalized(start: Point3<f64>, end: Point3<f64>, paint: Paint, reference: f64) -> Self {
        let mut segment = Self::new(start, end, paint);
        segment.length /= reference;
        segment
    }

    /// Unit direction from start to end, `None` for a zero-length segment
    pub fn direction(&self) -> Option<nalgebra::Unit<nalgebra::Vector3<f64>>> {
        nalgebra::Unit::try_new(self.end - self.start, f64::EPSILON)
    }
}

/// Point tagged with the cutter (parallel line or plane) and simplex edge that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntersectionPoint<P> {
    pub position: P,
    pub cutter: usize,
    pub edge: usize,
}

pub type IntersectionPoint2 = IntersectionPoint<Point2<f64>>;
pub type IntersectionPoint3 = IntersectionPoint<Point3<f64>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_contains_by_value() {
        let pair = Paint::Pair(Color(0xff0000), Color(0x0000ff));
        assert!(pair.contains(Color::RED));
        assert!(pair.contains(Color::BLUE));
        assert!(!pair.contains(Color::ORANGE));
        assert_eq!(Paint::Single(Color::LIME).colors(), vec![Color::LIME]);
    }

    #[test]
    fn test_normalized_length() {
        let segment = Segment3::normalized(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 3.0, 4.0),
            Paint::Single(Color::RED),
            10.0,
        );
        assert!((segment.length - 0.5).abs() < 1e-12);
        assert!(segment.direction().is_some());
        let empty = Segment3::new(Point3::origin(), Point3::origin(), Paint::Single(Color::RED));
        assert!(empty.direction().is_none());
    }
}
