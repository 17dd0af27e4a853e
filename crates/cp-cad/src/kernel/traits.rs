//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, Shape};

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("Invalid tessellation parameters: {0}")]
    InvalidParameters(String),

    #[error("Shape not found in kernel store")]
    ShapeNotFound,

    #[error("Link resolution failed: {0}")]
    LinkResolution(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A tessellated mesh output from the CAD kernel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellatedMesh {
    /// Vertex positions (3 floats per vertex)
    pub vertices: Vec<[f32; 3]>,
    /// Vertex normals (3 floats per vertex, may be empty)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (3 indices per triangle)
    pub indices: Vec<u32>,
}

impl TessellatedMesh {
    /// Create an empty tessellated mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex triples, skipping out-of-range indices
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = *self.vertices.get(tri[0] as usize)?;
            let b = *self.vertices.get(tri[1] as usize)?;
            let c = *self.vertices.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

/// Tessellation quality parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationParams {
    /// Maximum chordal deviation (bigger = coarser, faster, smaller files)
    pub linear_deflection: f64,
    /// Maximum angle between adjacent facet normals, in radians
    pub angular_deflection: f64,
    /// Interpret `linear_deflection` relative to each edge's size
    pub relative: bool,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            linear_deflection: 10.0,
            angular_deflection: 0.9,
            relative: false,
        }
    }
}

impl TessellationParams {
    /// Reject deflections a kernel cannot mesh with
    pub fn validate(&self) -> CadResult<()> {
        if !self.linear_deflection.is_finite() || self.linear_deflection <= 0.0 {
            return Err(CadError::InvalidParameters(format!(
                "linear deflection must be positive, got {}",
                self.linear_deflection
            )));
        }
        if !self.angular_deflection.is_finite() || self.angular_deflection <= 0.0 {
            return Err(CadError::InvalidParameters(format!(
                "angular deflection must be positive, got {}",
                self.angular_deflection
            )));
        }
        Ok(())
    }
}

/// The main CAD kernel trait
///
/// Implementations of this trait load documents and turn their shapes into
/// triangle meshes using different backends.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Load a file into a fresh document
    ///
    /// # Arguments
    /// * `path` - Path to the input file
    fn load_document(&self, path: &Path) -> CadResult<Document>;

    /// Tessellate a shape into triangles
    ///
    /// # Arguments
    /// * `shape` - A shape handle from a document loaded by this kernel
    /// * `params` - Deflection parameters
    fn tessellate(&self, shape: &Shape, params: &TessellationParams)
    -> CadResult<TessellatedMesh>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn load_document(&self, _path: &Path) -> CadResult<Document> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }

    fn tessellate(
        &self,
        _shape: &Shape,
        _params: &TessellationParams,
    ) -> CadResult<TessellatedMesh> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available".into(),
        ))
    }
}
