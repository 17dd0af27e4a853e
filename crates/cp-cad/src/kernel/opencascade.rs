//! OpenCASCADE CAD Kernel Backend
//!
//! Reads STEP assemblies through opencascade-sys and meshes their solids with
//! BRepMesh. Mesh files are handed to the mesh-file kernel.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use glam::{DVec3, Vec3};
use parking_lot::Mutex;
use uuid::Uuid;

use opencascade_sys::ffi;

use super::mesh_file::{InputFormat, MeshFileKernel, unique_name};
use super::{CadError, CadKernel, CadResult, TessellatedMesh, TessellationParams};
use crate::bound_box::BoundBox;
use crate::document::{Document, DocumentKind, DocumentObject, Shape};

/// OpenCASCADE-based CAD kernel
pub struct OpenCascadeKernel {
    /// Storage for B-rep shapes (keyed by UUID)
    shapes: Mutex<HashMap<Uuid, OccShape>>,
    meshes: MeshFileKernel,
}

/// Wrapper for an OpenCASCADE shape
struct OccShape {
    shape: cxx::UniquePtr<ffi::TopoDS_Shape>,
}

// Stored shapes are only read or copied while the store lock is held.
unsafe impl Send for OccShape {}

impl Clone for OccShape {
    fn clone(&self) -> Self {
        Self {
            shape: ffi::BRepBuilderAPI_Copy_ctor(&self.shape).Shape(),
        }
    }
}

impl OpenCascadeKernel {
    /// Create a new OpenCASCADE kernel
    pub fn new() -> Self {
        Self {
            shapes: Mutex::new(HashMap::new()),
            meshes: MeshFileKernel::new(),
        }
    }

    /// Store a solid and return a shape handle bounded by a coarse mesh of it
    fn store_shape(&self, shape: cxx::UniquePtr<ffi::TopoDS_Shape>) -> Shape {
        let id = Uuid::new_v4();
        let coarse = mesh_shape(&shape, &TessellationParams::default());
        self.shapes.lock().insert(id, OccShape { shape });

        if coarse.vertices.is_empty() {
            Shape::unbounded(id)
        } else {
            let bbox = BoundBox::from_points(
                coarse
                    .vertices
                    .iter()
                    .map(|v| DVec3::new(v[0] as f64, v[1] as f64, v[2] as f64)),
            );
            Shape::new(id, bbox)
        }
    }

    fn load_step(&self, path: &Path) -> CadResult<Document> {
        let path_str = path.to_string_lossy().to_string();

        let mut reader = ffi::STEPControl_Reader_ctor();
        let status = ffi::read_step(reader.pin_mut(), path_str);
        if status != ffi::IFSelect_ReturnStatus::IFSelect_RetDone {
            return Err(CadError::Import(format!(
                "Failed to read STEP file: {:?}",
                status
            )));
        }

        let progress = ffi::Message_ProgressRange_ctor();
        let num_roots = reader.pin_mut().TransferRoots(&progress);
        if num_roots == 0 {
            return Err(CadError::Import("No valid shapes found in STEP file".into()));
        }

        let compound = ffi::one_shape(&reader);
        let mut doc = Document::new(file_stem(path), DocumentKind::Brep);
        let mut used_names = HashSet::new();

        // STEP entity names are not read; solids are numbered in file order.
        let mut explorer = ffi::TopExp_Explorer_ctor(&compound, ffi::TopAbs_ShapeEnum::TopAbs_SOLID);
        while ffi::TopExp_Explorer_More(&explorer) {
            let solid = ffi::TopExp_Explorer_Current(&explorer);
            let shape = self.store_shape(ffi::BRepBuilderAPI_Copy_ctor(&solid).Shape());
            let name = unique_name("Solid", &mut used_names);
            doc.push(DocumentObject::new(name).with_shape(shape));

            ffi::TopExp_Explorer_Next(&mut explorer);
        }

        // A file without solids (a lone shell, say) becomes one object
        if doc.is_empty() {
            let shape = self.store_shape(ffi::BRepBuilderAPI_Copy_ctor(&compound).Shape());
            doc.push(DocumentObject::new(file_stem(path)).with_shape(shape));
        }

        tracing::info!("Read {} solids from {}", doc.len(), path.display());
        Ok(doc)
    }
}

impl Default for OpenCascadeKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for OpenCascadeKernel {
    fn name(&self) -> &str {
        "opencascade"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn load_document(&self, path: &Path) -> CadResult<Document> {
        match InputFormat::from_path(path) {
            InputFormat::Step => {
                if !path.is_file() {
                    return Err(CadError::FileIo(format!(
                        "{}: no such file",
                        path.display()
                    )));
                }
                self.load_step(path)
            }
            InputFormat::Iges => Err(CadError::KernelNotAvailable(
                "IGES import is not available in the OpenCASCADE backend".into(),
            )),
            _ => self.meshes.load_document(path),
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

        let stored = self.shapes.lock().get(&shape.id).cloned();
        match stored {
            Some(occ) => {
                let mesh = mesh_shape(&occ.shape, params);
                if mesh.is_empty() {
                    Err(CadError::TessellationFailed(
                        "BRepMesh produced no triangles".into(),
                    ))
                } else {
                    Ok(mesh)
                }
            }
            None => self.meshes.tessellate(shape, params),
        }
    }
}

/// Mesh `shape` and collect the triangulation of every face
fn mesh_shape(
    shape: &cxx::UniquePtr<ffi::TopoDS_Shape>,
    params: &TessellationParams,
) -> TessellatedMesh {
    let _mesh_builder = ffi::BRepMesh_IncrementalMesh_ctor(
        shape,
        params.linear_deflection,
        params.relative,
        params.angular_deflection,
        true,
    );

    let mut result = TessellatedMesh::new();
    let mut explorer = ffi::TopExp_Explorer_ctor(shape, ffi::TopAbs_ShapeEnum::TopAbs_FACE);

    while ffi::TopExp_Explorer_More(&explorer) {
        let face_shape = ffi::TopExp_Explorer_Current(&explorer);
        let face = ffi::TopoDS_cast_to_face(&face_shape);

        let location = ffi::TopLoc_Location_ctor();
        let triangulation = ffi::BRep_Tool_Triangulation(&face, &location);

        if !triangulation.is_null() {
            let nb_nodes = ffi::Poly_Triangulation_NbNodes(&triangulation);
            let nb_triangles = ffi::Poly_Triangulation_NbTriangles(&triangulation);
            let vertex_offset = result.vertices.len() as u32;

            for i in 1..=nb_nodes {
                let node = ffi::Poly_Triangulation_Node(&triangulation, i);
                let transformed =
                    ffi::gp_Pnt_Transformed(&node, &ffi::TopLoc_Location_Transformation(&location));
                result.vertices.push([
                    ffi::gp_Pnt_X(&transformed) as f32,
                    ffi::gp_Pnt_Y(&transformed) as f32,
                    ffi::gp_Pnt_Z(&transformed) as f32,
                ]);
            }

            let reversed = ffi::TopoDS_Shape_Orientation(&face_shape)
                == ffi::TopAbs_Orientation::TopAbs_REVERSED;

            // Poly_Triangle indices are 1-based
            for i in 1..=nb_triangles {
                let triangle = ffi::Poly_Triangulation_Triangle(&triangulation, i);
                let n1 = ffi::Poly_Triangle_Value(&triangle, 1) as u32 - 1 + vertex_offset;
                let n2 = ffi::Poly_Triangle_Value(&triangle, 2) as u32 - 1 + vertex_offset;
                let n3 = ffi::Poly_Triangle_Value(&triangle, 3) as u32 - 1 + vertex_offset;

                if reversed {
                    result.indices.extend_from_slice(&[n1, n3, n2]);
                } else {
                    result.indices.extend_from_slice(&[n1, n2, n3]);
                }
            }
        }

        ffi::TopExp_Explorer_Next(&mut explorer);
    }

    result.normals = vertex_normals(&result);
    result
}

/// Area-weighted vertex normals
fn vertex_normals(mesh: &TessellatedMesh) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; mesh.vertices.len()];

    for tri in mesh.indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let v0 = Vec3::from(mesh.vertices[i0]);
        let face_normal =
            (Vec3::from(mesh.vertices[i1]) - v0).cross(Vec3::from(mesh.vertices[i2]) - v0);
        for i in [i0, i1, i2] {
            normals[i] += face_normal;
        }
    }

    normals
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string()
}
