//! Axis-aligned bounding box of a document shape.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in document units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundBox {
    /// Minimum corner of the bounding box.
    pub min: DVec3,
    /// Maximum corner of the bounding box.
    pub max: DVec3,
}

impl BoundBox {
    /// Creates a new bounding box from min and max points.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Creates an empty (inverted) bounding box.
    pub fn empty() -> Self {
        Self {
            min: DVec3::splat(f64::INFINITY),
            max: DVec3::splat(f64::NEG_INFINITY),
        }
    }

    /// Creates a bounding box that contains all given points.
    ///
    /// Returns an empty (inverted) box when no points are given.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox = bbox.expand_to_include(point);
        }
        bbox
    }

    /// Returns a new bounding box expanded to include the given point.
    pub fn expand_to_include(&self, point: DVec3) -> BoundBox {
        BoundBox {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Per-axis lengths (`max - min`). Negative on inverted boxes.
    pub fn lengths(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns the center of the bounding box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal.
    pub fn diagonal_length(&self) -> f64 {
        self.lengths().length()
    }

    /// Returns true if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

impl Default for BoundBox {
    fn default() -> Self {
        Self::empty()
    }
}
