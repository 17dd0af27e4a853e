//! Export options for per-part mesh files

use std::path::PathBuf;

use cp_cad::TessellationParams;

use crate::mesh::MeshFormat;

/// Export options for one decomposition run
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving the mesh files
    pub output_dir: PathBuf,
    /// Mesh file format
    pub format: MeshFormat,
    /// Tessellation quality passed to the kernel
    pub tessellation: TessellationParams,
    /// Log per-part failures at debug instead of warn
    pub quiet: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: MeshFormat::default(),
            tessellation: TessellationParams::default(),
            quiet: false,
        }
    }
}
