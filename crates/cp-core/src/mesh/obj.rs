//! Wavefront OBJ writing

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cp_cad::TessellatedMesh;

use super::MeshError;

/// Save a tessellated mesh as OBJ (1-based indices)
///
/// Vertex normals are written only when there is one per vertex.
pub fn save_obj(mesh: &TessellatedMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_obj<W: Write>(mesh: &TessellatedMesh, writer: &mut W) -> std::io::Result<()> {
    let with_normals = !mesh.normals.is_empty() && mesh.normals.len() == mesh.vertices.len();

    writeln!(writer, "# Generated by cadparts")?;
    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
    }
    if with_normals {
        for n in &mesh.normals {
            writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    for face in mesh.indices.chunks_exact(3) {
        let (a, b, c) = (face[0] + 1, face[1] + 1, face[2] + 1);
        if with_normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }

    Ok(())
}
