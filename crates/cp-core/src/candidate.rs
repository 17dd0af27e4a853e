//! Candidate selection: which document objects are real parts

use std::fmt;

use cp_cad::{Document, DocumentObject, Shape};
use serde::Serialize;

use crate::bounds::{BoundingMetrics, BoundsRejection, BoundsValidator};
use crate::filter::ReferenceFilter;

/// An object of the document that survived filtering
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub object: &'a DocumentObject,
    pub shape: &'a Shape,
}

impl<'a> Candidate<'a> {
    pub fn name(&self) -> &'a str {
        &self.object.name
    }
}

/// Why an object was not selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoShape,
    NullShape,
    NoBoundBox,
    InvalidBounds,
    TooSmall,
    Reference,
    Bounds(BoundsRejection),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoShape => "no shape",
            SkipReason::NullShape => "null shape",
            SkipReason::NoBoundBox => "no bounding box",
            SkipReason::InvalidBounds => "invalid bounding box",
            SkipReason::TooSmall => "below size threshold",
            SkipReason::Reference => "reference geometry",
            SkipReason::Bounds(BoundsRejection::NonFinite) => "non-finite bounds",
            SkipReason::Bounds(BoundsRejection::Huge) => "huge bounds",
            SkipReason::Bounds(BoundsRejection::Degenerate) => "degenerate bounds",
        };
        f.write_str(text)
    }
}

/// Per-reason counts of skipped objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub total: usize,
    pub selected: usize,
    pub no_shape: usize,
    pub invalid_bounds: usize,
    pub too_small: usize,
    pub reference: usize,
    pub non_finite: usize,
    pub huge: usize,
    pub degenerate: usize,
}

impl FilterStats {
    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::NoShape | SkipReason::NullShape => self.no_shape += 1,
            SkipReason::NoBoundBox | SkipReason::InvalidBounds => self.invalid_bounds += 1,
            SkipReason::TooSmall => self.too_small += 1,
            SkipReason::Reference => self.reference += 1,
            SkipReason::Bounds(BoundsRejection::NonFinite) => self.non_finite += 1,
            SkipReason::Bounds(BoundsRejection::Huge) => self.huge += 1,
            SkipReason::Bounds(BoundsRejection::Degenerate) => self.degenerate += 1,
        }
    }

    pub fn skipped(&self) -> usize {
        self.total - self.selected
    }
}

/// Applies shape, size, name and bounds rules to every document object
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    /// Drop objects whose diagonal is below this value; 0 disables
    pub skip_small: f64,
    pub reference: ReferenceFilter,
    pub bounds: BoundsValidator,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self {
            skip_small: 0.0,
            reference: ReferenceFilter::default(),
            bounds: BoundsValidator::default(),
        }
    }
}

impl CandidateSelector {
    /// Decide one object; `Ok` carries the candidate
    pub fn classify<'a>(&self, object: &'a DocumentObject) -> Result<Candidate<'a>, SkipReason> {
        let shape = object.shape.as_ref().ok_or(SkipReason::NoShape)?;
        if shape.is_null() {
            return Err(SkipReason::NullShape);
        }
        let bbox = shape.bound_box().ok_or(SkipReason::NoBoundBox)?;
        let metrics =
            BoundingMetrics::from_bound_box(bbox).map_err(|_| SkipReason::InvalidBounds)?;

        if self.skip_small > 0.0 && metrics.diagonal < self.skip_small {
            return Err(SkipReason::TooSmall);
        }

        if self
            .reference
            .is_reference(object.label.as_deref(), &object.name)
        {
            return Err(SkipReason::Reference);
        }

        if let Some(rejection) = self.bounds.check(metrics.extent) {
            return Err(SkipReason::Bounds(rejection));
        }

        Ok(Candidate { object, shape })
    }

    /// Select candidates in document order
    pub fn select<'a>(&self, document: &'a Document) -> (Vec<Candidate<'a>>, FilterStats) {
        let mut stats = FilterStats {
            total: document.len(),
            ..FilterStats::default()
        };
        let mut candidates = Vec::new();

        for object in document.objects() {
            match self.classify(object) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => {
                    tracing::debug!("Skipping {}: {}", object.display_name(), reason);
                    stats.record(reason);
                }
            }
        }

        stats.selected = candidates.len();
        (candidates, stats)
    }
}
