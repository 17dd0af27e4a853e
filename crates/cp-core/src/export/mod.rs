//! Per-part export: tessellate, write the mesh, build the record

mod options;

use std::collections::HashMap;
use std::path::PathBuf;

use cp_cad::CadKernel;

use crate::bounds::{BoundingMetrics, BoundsError};
use crate::candidate::Candidate;
use crate::constants::{MESH_FILE_SEPARATOR, NODE_PATH_ROOT};
use crate::hierarchy::HierarchyMap;
use crate::keys::{KeySource, sanitize_filename, sanitize_node_segment};
use crate::mesh::MeshWriter;
use crate::record::PartRecord;

pub use options::ExportOptions;

/// Run-wide data the exporter reads for every candidate
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    /// Provenance prefix shared by all parts of the document
    pub source: KeySource,
    pub hierarchy: &'a HierarchyMap,
    /// Internal name -> display name of its first candidate
    pub display_names: HashMap<&'a str, &'a str>,
}

impl<'a> ExportContext<'a> {
    pub fn new(source: KeySource, hierarchy: &'a HierarchyMap, candidates: &[Candidate<'a>]) -> Self {
        let mut display_names = HashMap::new();
        for candidate in candidates {
            display_names
                .entry(candidate.name())
                .or_insert_with(|| candidate.object.display_name());
        }
        Self {
            source,
            hierarchy,
            display_names,
        }
    }

    /// `Root/<ancestors, outermost first>/<display name>`
    pub fn node_path(&self, name: &str, display_name: &str) -> String {
        let mut segments = vec![NODE_PATH_ROOT.to_string()];
        for ancestor in self.hierarchy.ancestors(name).into_iter().rev() {
            let display = self.display_names.get(ancestor).copied().unwrap_or(ancestor);
            segments.push(sanitize_node_segment(Some(display)));
        }
        segments.push(sanitize_node_segment(Some(display_name)));
        segments.join("/")
    }
}

/// Exports one candidate at a time; a failure only affects that candidate
pub struct PartExporter<'a> {
    kernel: &'a dyn CadKernel,
    writer: &'a dyn MeshWriter,
    options: &'a ExportOptions,
}

impl<'a> PartExporter<'a> {
    pub fn new(
        kernel: &'a dyn CadKernel,
        writer: &'a dyn MeshWriter,
        options: &'a ExportOptions,
    ) -> Self {
        Self {
            kernel,
            writer,
            options,
        }
    }

    /// `<output_dir>/<prefix>__<sanitized file stem>.<ext>`
    pub fn mesh_path(&self, source: KeySource, file_stem: &str) -> PathBuf {
        let filename = format!(
            "{}{}{}.{}",
            source.prefix(),
            MESH_FILE_SEPARATOR,
            sanitize_filename(file_stem),
            self.options.format.extension()
        );
        self.options.output_dir.join(filename)
    }

    /// Export a candidate under an already allocated key and file stem
    pub fn export(
        &self,
        candidate: &Candidate<'_>,
        part_key: &str,
        file_stem: &str,
        parent_key: Option<&str>,
        context: &ExportContext<'_>,
    ) -> Result<PartRecord, ExportError> {
        let bbox = candidate.shape.bound_box().ok_or(BoundsError::Missing)?;
        let metrics = BoundingMetrics::from_bound_box(bbox)?;

        let name = candidate.object.display_name();
        let node_path = context.node_path(candidate.name(), name);

        let mesh = self
            .kernel
            .tessellate(candidate.shape, &self.options.tessellation)
            .map_err(|e| ExportError::Tessellation(e.to_string()))?;
        if mesh.is_empty() {
            return Err(ExportError::EmptyMesh);
        }

        let path = self.mesh_path(context.source, file_stem);
        self.writer
            .write(&mesh, &path, self.options.format)
            .map_err(|e| ExportError::Write(e.to_string()))?;

        tracing::debug!(
            "Exported {} ({} triangles) to {}",
            part_key,
            mesh.triangle_count(),
            path.display()
        );

        Ok(PartRecord {
            part_key: part_key.to_string(),
            name: name.to_string(),
            mesh_path: path.to_string_lossy().replace('\\', "/"),
            node_path,
            parent_key: parent_key.map(str::to_string),
            node_index: None,
            position: metrics.position(),
            size: metrics.size(),
        })
    }
}

/// Per-part export errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid bounds: {0}")]
    Bounds(#[from] BoundsError),
    #[error("Tessellation failed: {0}")]
    Tessellation(String),
    #[error("Tessellation produced no triangles")]
    EmptyMesh,
    #[error("Mesh write failed: {0}")]
    Write(String),
}
