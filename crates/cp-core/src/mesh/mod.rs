//! Per-part mesh file writing (STL, PLY, OBJ)

mod normals;
mod obj;
mod ply;
mod stl;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use cp_cad::TessellatedMesh;
use serde::{Deserialize, Serialize};

pub use normals::facet_normal;
pub use obj::save_obj;
pub use ply::save_ply;
pub use stl::save_stl;

/// Output mesh format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    #[default]
    Stl,
    Ply,
    Obj,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 3] = [MeshFormat::Stl, MeshFormat::Ply, MeshFormat::Obj];

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "stl",
            MeshFormat::Ply => "ply",
            MeshFormat::Obj => "obj",
        }
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Ply => "PLY",
            MeshFormat::Obj => "OBJ",
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for MeshFormat {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stl" => Ok(MeshFormat::Stl),
            "ply" => Ok(MeshFormat::Ply),
            "obj" => Ok(MeshFormat::Obj),
            other => Err(MeshError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Write error: {0}")]
    Write(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::Io(e.to_string())
    }
}

/// Writes one tessellated mesh to disk
///
/// The exporter only talks to this trait, so tests can substitute a failing or
/// recording writer.
pub trait MeshWriter: Send + Sync {
    fn write(&self, mesh: &TessellatedMesh, path: &Path, format: MeshFormat)
    -> Result<(), MeshError>;
}

/// Writes meshes to the filesystem in the requested format
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMeshWriter;

impl MeshWriter for FileMeshWriter {
    fn write(
        &self,
        mesh: &TessellatedMesh,
        path: &Path,
        format: MeshFormat,
    ) -> Result<(), MeshError> {
        if mesh.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        check_indices(mesh)?;

        match format {
            MeshFormat::Stl => save_stl(mesh, path),
            MeshFormat::Ply => save_ply(mesh, path),
            MeshFormat::Obj => save_obj(mesh, path),
        }
    }
}

/// Every index must address an existing vertex
fn check_indices(mesh: &TessellatedMesh) -> Result<(), MeshError> {
    let count = mesh.vertices.len();
    match mesh.indices.iter().find(|&&i| i as usize >= count) {
        Some(bad) => Err(MeshError::Write(format!(
            "index {} out of range for {} vertices",
            bad, count
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) fn unit_triangle() -> TessellatedMesh {
    TessellatedMesh {
        vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: Vec::new(),
        indices: vec![0, 1, 2],
    }
}
