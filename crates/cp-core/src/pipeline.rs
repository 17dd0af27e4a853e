//! Decomposition pipeline: load, filter, infer hierarchy, export
//!
//! One run handles one document:
//!
//! ```text
//! Loaded -> Filtered -> HierarchyBuilt -> Exporting -> Done
//! ```
//!
//! Run-level problems (missing input, load failure, nothing exported) end the run with a
//! [`PipelineError`]. Problems with a single part are logged and that part is dropped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use cp_cad::{CadError, CadKernel, Document, DocumentObject, TessellationParams};
use serde::{Deserialize, Serialize};

use crate::bounds::BoundsValidator;
use crate::candidate::{CandidateSelector, FilterStats};
use crate::constants::{DEFAULT_EXCLUDE_KEYWORDS, DEFAULT_HUGE_THRESHOLD};
use crate::export::{ExportContext, ExportError, ExportOptions, PartExporter};
use crate::filter::ReferenceFilter;
use crate::hierarchy::{HierarchyMap, infer_parents};
use crate::keys::{KeyAllocator, KeySource, sanitize_filename};
use crate::mesh::{FileMeshWriter, MeshFormat, MeshWriter};
use crate::record::{PartRecord, PartsPayload};

/// Options of one decomposition run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionOptions {
    /// Mesh file format
    pub format: MeshFormat,
    /// Deflection settings for the kernel
    pub tessellation: TessellationParams,
    /// Stop after this many exported parts; 0 means no limit
    pub max_parts: usize,
    /// Drop parts whose diagonal is below this value; 0 disables
    pub skip_small: f64,
    /// Drop parts with any axis at or above this length
    pub skip_huge: f64,
    /// Drop boxes that are flat on two or more axes
    pub skip_degenerate: bool,
    /// Reference-geometry keywords
    pub exclude_keywords: Vec<String>,
    /// Apply the keyword filter
    pub name_filter: bool,
    /// Infer parent links
    pub hierarchy: bool,
    /// Log per-part failures at debug level only
    pub quiet: bool,
}

impl Default for DecompositionOptions {
    fn default() -> Self {
        Self {
            format: MeshFormat::default(),
            tessellation: TessellationParams::default(),
            max_parts: 0,
            skip_small: 0.0,
            skip_huge: DEFAULT_HUGE_THRESHOLD,
            skip_degenerate: false,
            exclude_keywords: DEFAULT_EXCLUDE_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            name_filter: true,
            hierarchy: true,
            quiet: false,
        }
    }
}

impl DecompositionOptions {
    /// Reject thresholds and deflections that make no sense
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.tessellation
            .validate()
            .map_err(|e| PipelineError::InvalidOptions(e.to_string()))?;

        if !self.skip_small.is_finite() || self.skip_small < 0.0 {
            return Err(PipelineError::InvalidOptions(format!(
                "skip-small must be a non-negative number, got {}",
                self.skip_small
            )));
        }
        if self.skip_huge.is_nan() || self.skip_huge <= 0.0 {
            return Err(PipelineError::InvalidOptions(format!(
                "skip-huge must be positive, got {}",
                self.skip_huge
            )));
        }
        Ok(())
    }

    /// Candidate selector configured from these options
    pub fn selector(&self) -> CandidateSelector {
        CandidateSelector {
            skip_small: self.skip_small,
            reference: ReferenceFilter::new(&self.exclude_keywords, self.name_filter),
            bounds: BoundsValidator::new(self.skip_huge, self.skip_degenerate),
        }
    }

    fn export_options(&self, output_dir: &Path) -> ExportOptions {
        ExportOptions {
            output_dir: output_dir.to_path_buf(),
            format: self.format,
            tessellation: self.tessellation,
            quiet: self.quiet,
        }
    }
}

/// Stage of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineState {
    Loaded,
    Filtered,
    HierarchyBuilt,
    Exporting,
    Done,
}

/// A part that was selected but could not be exported
#[derive(Debug, Clone)]
pub struct PartFailure {
    pub part_key: String,
    pub name: String,
    pub error: ExportError,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub payload: PartsPayload,
    pub stats: FilterStats,
    pub failures: Vec<PartFailure>,
}

/// Run-level errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum PipelineError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("Cannot create output directory {}: {message}", .path.display())]
    OutputDir { path: PathBuf, message: String },
    #[error("Failed to load document: {0}")]
    Load(#[from] CadError),
    #[error("No meshable parts found")]
    NoParts,
}

impl PipelineError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::InputNotFound(_)
            | PipelineError::InvalidOptions(_)
            | PipelineError::OutputDir { .. } => 2,
            PipelineError::Load(_) => 3,
            PipelineError::NoParts => 4,
        }
    }
}

/// Decomposes one document into per-part meshes and records
pub struct DecompositionPipeline<'a> {
    kernel: &'a dyn CadKernel,
    writer: Box<dyn MeshWriter>,
    options: DecompositionOptions,
    state: Option<PipelineState>,
}

impl<'a> DecompositionPipeline<'a> {
    pub fn new(kernel: &'a dyn CadKernel, options: DecompositionOptions) -> Self {
        Self {
            kernel,
            writer: Box::new(FileMeshWriter),
            options,
            state: None,
        }
    }

    /// Replace the mesh writer
    pub fn with_writer(mut self, writer: Box<dyn MeshWriter>) -> Self {
        self.writer = writer;
        self
    }

    pub fn options(&self) -> &DecompositionOptions {
        &self.options
    }

    /// Current stage; None before the first run
    pub fn state(&self) -> Option<PipelineState> {
        self.state
    }

    fn advance(&mut self, next: PipelineState) {
        tracing::debug!("Pipeline state: {:?} -> {:?}", self.state, next);
        self.state = Some(next);
    }

    /// Load `input` with the kernel and decompose it into `output_dir`
    pub fn run(&mut self, input: &Path, output_dir: &Path) -> Result<PipelineOutcome, PipelineError> {
        if !input.is_file() {
            return Err(PipelineError::InputNotFound(input.to_path_buf()));
        }
        self.options.validate()?;

        std::fs::create_dir_all(output_dir).map_err(|e| PipelineError::OutputDir {
            path: output_dir.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!(
            "Loading {} with {} kernel",
            input.display(),
            self.kernel.name()
        );
        let document = self.kernel.load_document(input)?;
        self.decompose(&document, output_dir)
    }

    /// Decompose an already loaded document
    pub fn decompose(
        &mut self,
        document: &Document,
        output_dir: &Path,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.state = None;
        self.options.validate()?;
        self.advance(PipelineState::Loaded);

        let (candidates, stats) = self.options.selector().select(document);
        tracing::info!(
            "Selected {} of {} objects ({} skipped: {} reference, {} small, {} bad bounds)",
            stats.selected,
            stats.total,
            stats.skipped(),
            stats.reference,
            stats.too_small,
            stats.invalid_bounds + stats.non_finite + stats.huge + stats.degenerate
        );
        self.advance(PipelineState::Filtered);

        let hierarchy = if self.options.hierarchy {
            let objects: Vec<&DocumentObject> = candidates.iter().map(|c| c.object).collect();
            infer_parents(&objects)
        } else {
            HierarchyMap::new()
        };
        self.advance(PipelineState::HierarchyBuilt);

        // One key and one file stem per candidate, even when names repeat
        let source = KeySource::for_document(document.kind);
        let mut key_allocator = KeyAllocator::new();
        let mut stem_allocator = KeyAllocator::for_file_stems();
        let slots: Vec<(String, String)> = candidates
            .iter()
            .map(|c| {
                (
                    key_allocator.allocate(&source.base_key(c.name())),
                    stem_allocator.allocate(&sanitize_filename(c.name())),
                )
            })
            .collect();

        // Parent links name objects; a repeated name resolves to its first candidate
        let mut first_by_name: HashMap<&str, usize> = HashMap::new();
        for (index, candidate) in candidates.iter().enumerate() {
            first_by_name.entry(candidate.name()).or_insert(index);
        }
        self.advance(PipelineState::Exporting);

        let export_options = self.options.export_options(output_dir);
        let context = ExportContext::new(source, &hierarchy, &candidates);
        let exporter = PartExporter::new(self.kernel, self.writer.as_ref(), &export_options);

        let mut records: Vec<PartRecord> = Vec::new();
        let mut failures = Vec::new();
        for (candidate, (part_key, file_stem)) in candidates.iter().zip(&slots) {
            if self.options.max_parts > 0 && records.len() >= self.options.max_parts {
                tracing::info!("Reached the limit of {} parts", self.options.max_parts);
                break;
            }

            let parent_key = hierarchy
                .parent_of(candidate.name())
                .and_then(|parent| first_by_name.get(parent))
                .map(|&index| slots[index].0.as_str());

            match exporter.export(candidate, part_key, file_stem, parent_key, &context) {
                Ok(record) => records.push(record),
                Err(error) => {
                    if export_options.quiet {
                        tracing::debug!("Mesh export failed for {}: {}", candidate.name(), error);
                    } else {
                        tracing::warn!("Mesh export failed for {}: {}", candidate.name(), error);
                    }
                    failures.push(PartFailure {
                        part_key: part_key.clone(),
                        name: candidate.name().to_string(),
                        error,
                    });
                }
            }
        }

        clear_dangling_parents(&mut records);
        self.advance(PipelineState::Done);

        tracing::info!(
            "Exported {} parts ({} failed)",
            records.len(),
            failures.len()
        );
        if records.is_empty() {
            return Err(PipelineError::NoParts);
        }

        Ok(PipelineOutcome {
            payload: PartsPayload::new(records),
            stats,
            failures,
        })
    }
}

/// Promote to root every record whose parent was not emitted
fn clear_dangling_parents(records: &mut [PartRecord]) {
    let emitted: HashSet<String> = records.iter().map(|r| r.part_key.clone()).collect();
    for record in records.iter_mut() {
        let dangling = record
            .parent_key
            .as_deref()
            .is_some_and(|parent| !emitted.contains(parent));
        if dangling {
            tracing::debug!(
                "Parent of {} was not exported; treating it as a root",
                record.part_key
            );
            record.parent_key = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshError;
    use crate::test_support::StubKernel;
    use cp_cad::{DocumentKind, NullKernel, TessellatedMesh};
    use tempfile::tempdir;

    fn run(kernel: &StubKernel, options: DecompositionOptions) -> Result<PipelineOutcome, PipelineError> {
        let temp = tempdir().unwrap();
        DecompositionPipeline::new(kernel, options).decompose(kernel.document(), temp.path())
    }

    fn keys(outcome: &PipelineOutcome) -> Vec<String> {
        outcome.payload.part_keys().map(str::to_string).collect()
    }

    #[test]
    fn test_three_solids_one_plane() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Body", 0.0)
            .cube("Body001", 2.0)
            .solid(
                DocumentObject::new("Body002").with_label("XY_Plane"),
                [0.0, 0.0, 0.0],
                [100.0, 100.0, 0.0],
            )
            .object(DocumentObject::new("Group"))
            .cube("Body003", 4.0);

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        assert_eq!(keys(&outcome), ["cad:Body", "cad:Body001", "cad:Body003"]);
        assert_eq!(outcome.stats.reference, 1);
        assert_eq!(outcome.stats.no_shape, 1);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_all_reference_geometry_is_no_parts() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Origin", 0.0)
            .cube("Sketch", 0.0)
            .cube("Z_Axis", 0.0);

        let err = run(&kernel, DecompositionOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::NoParts));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_name_filter_can_be_disabled() {
        let kernel = StubKernel::new(DocumentKind::Brep).cube("Origin", 0.0);
        let options = DecompositionOptions {
            name_filter: false,
            ..Default::default()
        };
        assert_eq!(run(&kernel, options).unwrap().payload.len(), 1);
    }

    #[test]
    fn test_runs_are_deterministic() {
        let kernel = StubKernel::new(DocumentKind::Scene)
            .cube("Wheel", 0.0)
            .cube("Wheel001", 1.0)
            .cube("Frame", 2.0);

        let first = run(&kernel, DecompositionOptions::default()).unwrap();
        let second = run(&kernel, DecompositionOptions::default()).unwrap();
        assert_eq!(keys(&first), keys(&second));
        assert_eq!(keys(&first), ["g:Wheel", "g:Wheel001", "g:Frame"]);
    }

    #[test]
    fn test_repeated_names_keep_separate_parts() {
        let temp = tempdir().unwrap();
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Body", 0.0)
            .cube("Body", 5.0)
            .cube("a:1", 10.0)
            .cube("a_1", 15.0);

        let outcome = DecompositionPipeline::new(&kernel, DecompositionOptions::default())
            .decompose(kernel.document(), temp.path())
            .unwrap();
        assert_eq!(
            keys(&outcome),
            ["cad:Body", "cad:Body:1", "cad:a:1", "cad:a_1"]
        );

        let paths: Vec<&str> = outcome
            .payload
            .part_keys()
            .filter_map(|key| outcome.payload.get(key))
            .map(|record| record.mesh_path.as_str())
            .collect();
        assert!(paths[0].ends_with("/cad__Body.stl"));
        assert!(paths[1].ends_with("/cad__Body_1.stl"));
        assert!(paths[2].ends_with("/cad__a_1.stl"));
        assert!(paths[3].ends_with("/cad__a_1_1.stl"));
        for path in &paths {
            assert!(Path::new(path).exists());
        }

        // Each part keeps its own geometry
        let position = |key: &str| outcome.payload.get(key).unwrap().position;
        assert_eq!(position("cad:Body"), [0.5; 3]);
        assert_eq!(position("cad:Body:1"), [5.5; 3]);
    }

    #[test]
    fn test_child_of_repeated_name_links_first() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Asm", 0.0)
            .cube("Asm", 2.0)
            .solid(
                DocumentObject::new("Pin").with_in_list(["Asm"]),
                [4.0; 3],
                [5.0; 3],
            );

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        let pin = outcome.payload.get("cad:Pin").unwrap();
        assert_eq!(pin.parent_key.as_deref(), Some("cad:Asm"));
    }

    #[test]
    fn test_max_parts_takes_first() {
        let mut kernel = StubKernel::new(DocumentKind::Brep);
        for i in 0..5 {
            kernel = kernel.cube(&format!("Part{i}"), i as f64 * 2.0);
        }
        let options = DecompositionOptions {
            max_parts: 1,
            ..Default::default()
        };

        let outcome = run(&kernel, options).unwrap();
        assert_eq!(keys(&outcome), ["cad:Part0"]);
        assert_eq!(kernel.tessellated(), ["Part0"]);
    }

    #[test]
    fn test_failed_part_does_not_abort_run() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Good", 0.0)
            .broken(DocumentObject::new("Bad"), [0.0; 3], [1.0; 3])
            .cube("AlsoGood", 2.0);

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        assert_eq!(keys(&outcome), ["cad:Good", "cad:AlsoGood"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].part_key, "cad:Bad");
    }

    #[test]
    fn test_failed_parts_do_not_count_toward_limit() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .broken(DocumentObject::new("Bad"), [0.0; 3], [1.0; 3])
            .cube("Good", 0.0)
            .cube("Spare", 2.0);
        let options = DecompositionOptions {
            max_parts: 1,
            ..Default::default()
        };
        assert_eq!(keys(&run(&kernel, options).unwrap()), ["cad:Good"]);
    }

    #[test]
    fn test_hierarchy_links_and_node_paths() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .solid(
                DocumentObject::new("A").with_label("Frame"),
                [0.0; 3],
                [4.0; 3],
            )
            .solid(
                DocumentObject::new("B").with_in_list(["A"]),
                [0.0; 3],
                [1.0; 3],
            );

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        let a = outcome.payload.get("cad:A").unwrap();
        let b = outcome.payload.get("cad:B").unwrap();
        assert_eq!(a.parent_key, None);
        assert_eq!(a.node_path, "Root/Frame");
        assert_eq!(b.parent_key.as_deref(), Some("cad:A"));
        assert_eq!(b.node_path, "Root/Frame/B");
    }

    #[test]
    fn test_no_hierarchy_option() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("A", 0.0)
            .solid(
                DocumentObject::new("B").with_in_list(["A"]),
                [0.0; 3],
                [1.0; 3],
            );
        let options = DecompositionOptions {
            hierarchy: false,
            ..Default::default()
        };

        let outcome = run(&kernel, options).unwrap();
        assert!(outcome.payload.parts.iter().all(|p| p.parent_key.is_none()));
        assert_eq!(outcome.payload.get("cad:B").unwrap().node_path, "Root/B");
    }

    #[test]
    fn test_filtered_parent_leaves_child_rootless() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .solid(
                DocumentObject::new("Sketch001"),
                [0.0; 3],
                [1.0; 3],
            )
            .solid(
                DocumentObject::new("Pad").with_in_list(["Sketch001"]),
                [0.0; 3],
                [1.0; 3],
            );

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        assert_eq!(keys(&outcome), ["cad:Pad"]);
        assert_eq!(outcome.payload.parts[0].parent_key, None);
    }

    #[test]
    fn test_parent_that_failed_export_is_cleared() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .broken(DocumentObject::new("A"), [0.0; 3], [2.0; 3])
            .solid(
                DocumentObject::new("B").with_in_list(["A"]),
                [0.0; 3],
                [1.0; 3],
            );

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        let b = outcome.payload.get("cad:B").unwrap();
        assert_eq!(b.parent_key, None);
        // The path still shows where the part sits in the document
        assert_eq!(b.node_path, "Root/A/B");
    }

    #[test]
    fn test_every_parent_key_is_emitted() {
        let kernel = StubKernel::new(DocumentKind::Brep)
            .cube("Root1", 0.0)
            .solid(DocumentObject::new("C1").with_in_list(["Root1"]), [0.0; 3], [1.0; 3])
            .broken(DocumentObject::new("C2").with_in_list(["Root1"]), [0.0; 3], [1.0; 3])
            .solid(DocumentObject::new("G1").with_in_list(["C2"]), [0.0; 3], [1.0; 3])
            .solid(DocumentObject::new("G2").with_in_list(["C1"]), [0.0; 3], [1.0; 3]);

        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        let emitted: HashSet<&str> = outcome.payload.part_keys().collect();
        for part in &outcome.payload.parts {
            if let Some(parent) = &part.parent_key {
                assert!(emitted.contains(parent.as_str()));
                assert_ne!(parent, &part.part_key);
            }
        }
        assert_eq!(
            outcome.payload.get("cad:G2").unwrap().parent_key.as_deref(),
            Some("cad:C1")
        );
    }

    #[test]
    fn test_mesh_document_uses_mesh_prefix() {
        let kernel = StubKernel::new(DocumentKind::Mesh).cube("bracket", 0.0);
        let outcome = run(&kernel, DecompositionOptions::default()).unwrap();
        let part = &outcome.payload.parts[0];
        assert_eq!(part.part_key, "m:bracket");
        assert!(part.mesh_path.ends_with("/m__bracket.stl"));
    }

    #[test]
    fn test_writer_failure_for_every_part_is_no_parts() {
        struct FailingWriter;
        impl MeshWriter for FailingWriter {
            fn write(
                &self,
                _mesh: &TessellatedMesh,
                _path: &Path,
                _format: MeshFormat,
            ) -> Result<(), MeshError> {
                Err(MeshError::Write("read-only".into()))
            }
        }

        let kernel = StubKernel::new(DocumentKind::Brep).cube("Body", 0.0);
        let temp = tempdir().unwrap();
        let mut pipeline = DecompositionPipeline::new(&kernel, DecompositionOptions::default())
            .with_writer(Box::new(FailingWriter));
        let result = pipeline.decompose(kernel.document(), temp.path());

        assert!(matches!(result, Err(PipelineError::NoParts)));
        assert_eq!(pipeline.state(), Some(PipelineState::Done));
    }

    #[test]
    fn test_state_reaches_done() {
        let kernel = StubKernel::new(DocumentKind::Brep).cube("Body", 0.0);
        let temp = tempdir().unwrap();
        let mut pipeline = DecompositionPipeline::new(&kernel, DecompositionOptions::default());
        assert_eq!(pipeline.state(), None);
        pipeline.decompose(kernel.document(), temp.path()).unwrap();
        assert_eq!(pipeline.state(), Some(PipelineState::Done));
        assert!(PipelineState::Loaded < PipelineState::Done);
    }

    #[test]
    fn test_run_error_exit_codes() {
        let temp = tempdir().unwrap();
        let kernel = StubKernel::new(DocumentKind::Brep).cube("Body", 0.0);

        let mut pipeline = DecompositionPipeline::new(&kernel, DecompositionOptions::default());
        let err = pipeline
            .run(&temp.path().join("missing.step"), temp.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound(_)));
        assert_eq!(err.exit_code(), 2);

        let input = temp.path().join("asm.step");
        std::fs::write(&input, "ISO-10303-21;").unwrap();
        let null = NullKernel;
        let err = DecompositionPipeline::new(&null, DecompositionOptions::default())
            .run(&input, &temp.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Load(CadError::KernelNotAvailable(_))));
        assert_eq!(err.exit_code(), 3);

        let options = DecompositionOptions {
            tessellation: TessellationParams {
                linear_deflection: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = DecompositionPipeline::new(&kernel, options)
            .run(&input, temp.path())
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidOptions(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_run_creates_output_dir() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("asm.step");
        std::fs::write(&input, "ISO-10303-21;").unwrap();
        let out = temp.path().join("nested").join("out");

        let kernel = StubKernel::new(DocumentKind::Brep).cube("Body", 0.0);
        let outcome = DecompositionPipeline::new(&kernel, DecompositionOptions::default())
            .run(&input, &out)
            .unwrap();
        assert_eq!(outcome.payload.len(), 1);
        assert!(out.join("cad__Body.stl").exists());
    }

    #[test]
    fn test_options_partial_deserialize() {
        let options: DecompositionOptions =
            serde_json::from_str(r#"{"max_parts": 3, "format": "ply"}"#).unwrap();
        assert_eq!(options.max_parts, 3);
        assert_eq!(options.format, MeshFormat::Ply);
        assert_eq!(options.skip_huge, DEFAULT_HUGE_THRESHOLD);
        assert!(options.name_filter);
        assert_eq!(options.exclude_keywords.len(), DEFAULT_EXCLUDE_KEYWORDS.len());
    }

    #[test]
    fn test_invalid_thresholds() {
        let options = DecompositionOptions {
            skip_small: -1.0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        let options = DecompositionOptions {
            skip_huge: f64::NAN,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        assert!(DecompositionOptions::default().validate().is_ok());
    }
}
