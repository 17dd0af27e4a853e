//! In-memory kernel for unit tests

use std::collections::HashMap;
use std::path::Path;

use cp_cad::{
    BoundBox, CadError, CadKernel, CadResult, Document, DocumentKind, DocumentObject, Shape,
    TessellatedMesh, TessellationParams,
};
use glam::DVec3;
use parking_lot::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Tessellation {
    Mesh(TessellatedMesh),
    Fail(String),
}

/// Kernel serving a prepared document
///
/// Every solid gets a two-triangle mesh spanning its box. Individual shapes can be
/// made to fail tessellation or to return an empty mesh.
pub struct StubKernel {
    document: Document,
    meshes: HashMap<Uuid, Tessellation>,
    pub tessellate_calls: Mutex<Vec<String>>,
}

impl StubKernel {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            document: Document::new("stub", kind),
            meshes: HashMap::new(),
            tessellate_calls: Mutex::new(Vec::new()),
        }
    }

    fn add(mut self, object: DocumentObject, bbox: BoundBox, tessellation: Tessellation) -> Self {
        let id = Uuid::new_v4();
        self.meshes.insert(id, tessellation);
        self.document.push(object.with_shape(Shape::new(id, bbox)));
        self
    }

    /// A meshable solid spanning `min..max`
    pub fn solid(self, object: DocumentObject, min: [f64; 3], max: [f64; 3]) -> Self {
        let mesh = quad_mesh(min, max);
        self.add(object, bbox(min, max), Tessellation::Mesh(mesh))
    }

    /// A unit cube at `offset`
    pub fn cube(self, name: &str, offset: f64) -> Self {
        self.solid(
            DocumentObject::new(name),
            [offset; 3],
            [offset + 1.0; 3],
        )
    }

    /// A solid whose tessellation fails
    pub fn broken(self, object: DocumentObject, min: [f64; 3], max: [f64; 3]) -> Self {
        let reason = format!("cannot mesh {}", object.name);
        self.add(object, bbox(min, max), Tessellation::Fail(reason))
    }

    /// A solid whose tessellation yields no triangles
    pub fn hollow(self, object: DocumentObject, min: [f64; 3], max: [f64; 3]) -> Self {
        self.add(object, bbox(min, max), Tessellation::Mesh(TessellatedMesh::new()))
    }

    /// An object pushed as-is, without a registered mesh
    pub fn object(mut self, object: DocumentObject) -> Self {
        self.document.push(object);
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tessellated(&self) -> Vec<String> {
        self.tessellate_calls.lock().clone()
    }
}

impl CadKernel for StubKernel {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn load_document(&self, _path: &Path) -> CadResult<Document> {
        Ok(self.document.clone())
    }

    fn tessellate(
        &self,
        shape: &Shape,
        params: &TessellationParams,
    ) -> CadResult<TessellatedMesh> {
        params.validate()?;
        let name = self
            .document
            .objects()
            .iter()
            .find(|o| o.shape.as_ref().is_some_and(|s| s.id == shape.id))
            .map(|o| o.name.clone())
            .unwrap_or_default();
        self.tessellate_calls.lock().push(name);

        match self.meshes.get(&shape.id) {
            Some(Tessellation::Mesh(mesh)) => Ok(mesh.clone()),
            Some(Tessellation::Fail(reason)) => Err(CadError::TessellationFailed(reason.clone())),
            None => Err(CadError::ShapeNotFound),
        }
    }
}

fn bbox(min: [f64; 3], max: [f64; 3]) -> BoundBox {
    BoundBox::new(DVec3::from_array(min), DVec3::from_array(max))
}

fn quad_mesh(min: [f64; 3], max: [f64; 3]) -> TessellatedMesh {
    let [x0, y0, z0] = min.map(|v| v as f32);
    let [x1, y1, z1] = max.map(|v| v as f32);
    TessellatedMesh {
        vertices: vec![[x0, y0, z0], [x1, y0, z0], [x1, y1, z1], [x0, y1, z1]],
        normals: Vec::new(),
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
