//! Binary little-endian PLY writing

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cp_cad::TessellatedMesh;

use super::MeshError;

/// Save a tessellated mesh as binary PLY (little-endian)
///
/// Vertices are written as `float x y z`, faces as `list uchar int vertex_indices`.
pub fn save_ply(mesh: &TessellatedMesh, path: impl AsRef<Path>) -> Result<(), MeshError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_ply(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_ply<W: Write>(mesh: &TessellatedMesh, writer: &mut W) -> std::io::Result<()> {
    let faces: Vec<&[u32]> = mesh.indices.chunks_exact(3).collect();

    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment Generated by cadparts")?;
    writeln!(writer, "element vertex {}", mesh.vertices.len())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &mesh.vertices {
        writer.write_all(&v[0].to_le_bytes())?;
        writer.write_all(&v[1].to_le_bytes())?;
        writer.write_all(&v[2].to_le_bytes())?;
    }

    for face in faces {
        writer.write_all(&[3u8])?;
        for &i in face {
            writer.write_all(&(i as i32).to_le_bytes())?;
        }
    }

    Ok(())
}
