//! Mesh-file kernel backend
//!
//! Loads already-tessellated files (STL, OBJ, PLY) as documents so they can go
//! through the same decomposition pipeline as B-rep assemblies. B-rep formats are
//! reported as unavailable; they need a full geometry kernel.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::DVec3;
use parking_lot::Mutex;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use uuid::Uuid;

use super::{CadError, CadKernel, CadResult, TessellatedMesh, TessellationParams};
use crate::bound_box::BoundBox;
use crate::document::{Document, DocumentKind, DocumentObject, Shape};

/// Detect input format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Step,
    Iges,
    Stl,
    Obj,
    Ply,
    Unknown,
}

impl InputFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("step") | Some("stp") => InputFormat::Step,
            Some("iges") | Some("igs") => InputFormat::Iges,
            Some("stl") => InputFormat::Stl,
            Some("obj") => InputFormat::Obj,
            Some("ply") => InputFormat::Ply,
            _ => InputFormat::Unknown,
        }
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Step => "STEP",
            InputFormat::Iges => "IGES",
            InputFormat::Stl => "STL",
            InputFormat::Obj => "OBJ",
            InputFormat::Ply => "PLY",
            InputFormat::Unknown => "Unknown",
        }
    }

    /// Check if format requires a B-rep CAD kernel
    pub fn requires_brep_kernel(&self) -> bool {
        matches!(self, InputFormat::Step | InputFormat::Iges)
    }
}

/// Kernel over pre-tessellated mesh files
pub struct MeshFileKernel {
    /// Storage for shape geometry (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, TessellatedMesh>>,
}

impl MeshFileKernel {
    /// Create a new mesh-file kernel with an empty shape store
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
        }
    }

    /// Store mesh geometry and return a shape handle
    fn store_shape(&self, mesh: TessellatedMesh) -> Shape {
        let id = Uuid::new_v4();
        let bound_box = if mesh.vertices.is_empty() {
            None
        } else {
            Some(BoundBox::from_points(mesh.vertices.iter().map(|v| {
                DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64)
            })))
        };
        self.shapes.lock().insert(id, mesh);
        match bound_box {
            Some(bbox) => Shape::new(id, bbox),
            None => Shape::unbounded(id),
        }
    }

    fn load_stl(&self, path: &Path) -> CadResult<Document> {
        let file = File::open(path).map_err(|e| CadError::FileIo(e.to_string()))?;
        let mut reader = BufReader::new(file);
        let stl = stl_io::read_stl(&mut reader).map_err(|e| CadError::Import(e.to_string()))?;

        let vertices: Vec<[f32; 3]> = stl.vertices.iter().map(|v| [v[0], v[1], v[2]]).collect();
        let indices: Vec<u32> = stl
            .faces
            .iter()
            .flat_map(|face| face.vertices.iter().map(|&i| i as u32))
            .collect();

        let name = file_stem(path);
        let shape = self.store_shape(TessellatedMesh {
            vertices,
            normals: Vec::new(),
            indices,
        });

        let mut doc = Document::new(&name, DocumentKind::Mesh);
        doc.push(DocumentObject::new(name).with_shape(shape));
        Ok(doc)
    }

    fn load_obj(&self, path: &Path) -> CadResult<Document> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|e| CadError::Import(e.to_string()))?;

        if models.is_empty() {
            return Err(CadError::Import("OBJ file contains no geometry".into()));
        }

        let kind = if models.len() > 1 {
            DocumentKind::Scene
        } else {
            DocumentKind::Mesh
        };
        let mut doc = Document::new(file_stem(path), kind);
        let mut used_names = HashSet::new();

        for (i, model) in models.into_iter().enumerate() {
            let mesh = model.mesh;
            let vertices: Vec<[f32; 3]> = mesh
                .positions
                .chunks_exact(3)
                .map(|p| [p[0], p[1], p[2]])
                .collect();
            let normals: Vec<[f32; 3]> = if mesh.normals.len() == mesh.positions.len() {
                mesh.normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect()
            } else {
                Vec::new()
            };

            // tobj names objects without an `o`/`g` line "unnamed_object"
            let label = match model.name.trim() {
                TOBJ_DEFAULT_NAME => String::new(),
                name => name.to_string(),
            };
            let base = if label.is_empty() {
                format!("Part_{}", i + 1)
            } else {
                label.clone()
            };
            let name = unique_name(&base, &mut used_names);

            let shape = self.store_shape(TessellatedMesh {
                vertices,
                normals,
                indices: mesh.indices,
            });

            let mut object = DocumentObject::new(name).with_shape(shape);
            if !label.is_empty() {
                object = object.with_label(label);
            }
            doc.push(object);
        }

        Ok(doc)
    }

    fn load_ply(&self, path: &Path) -> CadResult<Document> {
        let file = File::open(path).map_err(|e| CadError::FileIo(e.to_string()))?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let header = parser
            .read_header(&mut reader)
            .map_err(|e| CadError::Import(format!("Failed to parse PLY header: {}", e)))?;
        let payload = parser
            .read_payload(&mut reader, &header)
            .map_err(|e| CadError::Import(format!("Failed to read PLY payload: {}", e)))?;

        let vertices: Vec<[f32; 3]> = payload
            .get("vertex")
            .map(|elements| {
                elements
                    .iter()
                    .map(|e| {
                        [
                            float_property(e, "x").unwrap_or(0.0),
                            float_property(e, "y").unwrap_or(0.0),
                            float_property(e, "z").unwrap_or(0.0),
                        ]
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut indices = Vec::new();
        for face in payload.get("face").into_iter().flatten() {
            let polygon = index_list(face);
            if polygon.iter().any(|&i| i as usize >= vertices.len()) {
                return Err(CadError::Import(format!(
                    "PLY face references a vertex past {}",
                    vertices.len()
                )));
            }
            // Fan-triangulate polygons
            for i in 1..polygon.len().saturating_sub(1) {
                indices.extend_from_slice(&[polygon[0], polygon[i], polygon[i + 1]]);
            }
        }

        let name = file_stem(path);
        let shape = self.store_shape(TessellatedMesh {
            vertices,
            normals: Vec::new(),
            indices,
        });

        let mut doc = Document::new(&name, DocumentKind::Mesh);
        doc.push(DocumentObject::new(name).with_shape(shape));
        Ok(doc)
    }
}

impl Default for MeshFileKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for MeshFileKernel {
    fn name(&self) -> &str {
        "mesh-file"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn load_document(&self, path: &Path) -> CadResult<Document> {
        let format = InputFormat::from_path(path);
        tracing::debug!("Loading {} document: {}", format.name(), path.display());

        match format {
            InputFormat::Stl => self.load_stl(path),
            InputFormat::Obj => self.load_obj(path),
            InputFormat::Step | InputFormat::Iges => Err(CadError::KernelNotAvailable(format!(
                "{} import requires a B-rep CAD kernel",
                format.name()
            ))),
            InputFormat::Ply => self.load_ply(path),
            InputFormat::Unknown => Err(CadError::UnsupportedFormat(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            )),
        }
    }

    fn tessellate(
        &self,
        shape: &Shape,
        params: &TessellationParams,
    ) -> CadResult<TessellatedMesh> {
        params.validate()?;
        if shape.is_null() {
            return Err(CadError::TessellationFailed("Shape is null".into()));
        }
        // Input is already triangulated; deflection cannot refine it further.
        self.shapes
            .lock()
            .get(&shape.id)
            .cloned()
            .ok_or(CadError::ShapeNotFound)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

const TOBJ_DEFAULT_NAME: &str = "unnamed_object";

fn float_property(element: &DefaultElement, key: &str) -> Option<f32> {
    match element.get(key)? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        _ => None,
    }
}

/// Face indices under either common property name
fn index_list(element: &DefaultElement) -> Vec<u32> {
    for key in ["vertex_indices", "vertex_index"] {
        let Some(prop) = element.get(key) else {
            continue;
        };
        return match prop {
            Property::ListInt(v) => v.iter().map(|&i| i.max(0) as u32).collect(),
            Property::ListUInt(v) => v.clone(),
            Property::ListUChar(v) => v.iter().map(|&i| i as u32).collect(),
            Property::ListChar(v) => v.iter().map(|&i| i.max(0) as u32).collect(),
            Property::ListShort(v) => v.iter().map(|&i| i.max(0) as u32).collect(),
            Property::ListUShort(v) => v.iter().map(|&i| i as u32).collect(),
            _ => continue,
        };
    }
    Vec::new()
}

/// `base`, or `base001`, `base002`, ... when already taken
pub(super) fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut n = 0;
    while used.contains(&name) {
        n += 1;
        name = format!("{}{:03}", base, n);
    }
    used.insert(name.clone());
    name
}
