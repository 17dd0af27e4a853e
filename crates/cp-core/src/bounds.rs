//! Bounding-box metrics and plausibility checks
//!
//! [`BoundingMetrics`] turns a shape's box into the position/size reported per part.
//! [`BoundsValidator`] rejects boxes that cannot belong to a physical part: non-finite
//! values, kernel-internal "infinite" construction geometry, and (optionally) boxes
//! that are flat on two or more axes.

use cp_cad::BoundBox;
use glam::DVec3;

use crate::constants::{DEFAULT_HUGE_THRESHOLD, DEGENERATE_EPSILON};

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

/// Derived metrics of one bounding box. Computed fresh for every use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingMetrics {
    /// Center point of the box
    pub center: DVec3,
    /// Per-axis length (`max - min`), never negative
    pub extent: DVec3,
    /// Length of the box diagonal
    pub diagonal: f64,
}

impl BoundingMetrics {
    /// Compute metrics, rejecting inverted boxes
    ///
    /// A NaN extent is not an error here; it is left for [`BoundsValidator`] to reject.
    pub fn from_bound_box(bbox: &BoundBox) -> Result<Self, BoundsError> {
        let extent = bbox.lengths();
        for (axis, value) in extent.to_array().into_iter().enumerate() {
            if value < 0.0 {
                return Err(BoundsError::Inverted {
                    axis: AXIS_NAMES[axis],
                    extent: value,
                });
            }
        }

        Ok(Self {
            center: bbox.center(),
            extent,
            diagonal: bbox.diagonal_length(),
        })
    }

    /// Center as `[x, y, z]`
    pub fn position(&self) -> [f64; 3] {
        self.center.to_array()
    }

    /// Extent as `[sx, sy, sz]`
    pub fn size(&self) -> [f64; 3] {
        self.extent.to_array()
    }
}

/// Bounds-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("Inverted bounding box: {axis} extent is {extent}")]
    Inverted { axis: char, extent: f64 },
    #[error("Shape has no bounding box")]
    Missing,
}

/// Why a box was rejected by [`BoundsValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsRejection {
    /// An axis is NaN or infinite
    NonFinite,
    /// An axis reaches the huge threshold
    Huge,
    /// Two or more axes are (near) zero
    Degenerate,
}

/// Rejects numerically or geometrically implausible boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsValidator {
    /// Any axis at or above this length is rejected
    pub huge_threshold: f64,
    /// Reject boxes with two or more near-zero axes
    pub skip_degenerate: bool,
}

impl Default for BoundsValidator {
    fn default() -> Self {
        Self {
            huge_threshold: DEFAULT_HUGE_THRESHOLD,
            skip_degenerate: false,
        }
    }
}

impl BoundsValidator {
    pub fn new(huge_threshold: f64, skip_degenerate: bool) -> Self {
        Self {
            huge_threshold,
            skip_degenerate,
        }
    }

    /// First rule the extent violates, if any
    pub fn check(&self, extent: DVec3) -> Option<BoundsRejection> {
        let values = extent.to_array();

        // Unconditional, regardless of toggles.
        if values.iter().any(|v| !v.is_finite()) {
            return Some(BoundsRejection::NonFinite);
        }

        if values.iter().any(|&v| v >= self.huge_threshold) {
            return Some(BoundsRejection::Huge);
        }

        if self.skip_degenerate {
            let zero_axes = values.iter().filter(|&&v| v <= DEGENERATE_EPSILON).count();
            if zero_axes >= 2 {
                return Some(BoundsRejection::Degenerate);
            }
        }

        None
    }

    /// Check if the extent should be rejected
    pub fn rejects(&self, extent: DVec3) -> bool {
        self.check(extent).is_some()
    }
}
