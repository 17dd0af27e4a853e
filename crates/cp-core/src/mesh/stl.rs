//! Binary STL writing

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use cp_cad::TessellatedMesh;

use super::MeshError;
use super::normals::facet_normal;

/// Save a tessellated mesh as binary STL, with per-face normals
pub fn save_stl(mesh: &TessellatedMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|[v0, v1, v2]| stl_io::Triangle {
            normal: stl_io::Normal::new(facet_normal(v0, v1, v2)),
            vertices: [
                stl_io::Vertex::new(v0),
                stl_io::Vertex::new(v1),
                stl_io::Vertex::new(v2),
            ],
        })
        .collect();

    if triangles.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::Write(e.to_string()))?;

    Ok(())
}
