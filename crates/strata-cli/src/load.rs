//! Mesh loading from STL and JSON files.

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{bail, Context, Result};
use strata_mesh::{IndexedTriangles, Mesh};
use tracing::info;

/// Load a mesh, picking the reader from the file extension.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let mesh = match ext.as_str() {
        "stl" => read_stl(&mut Cursor::new(bytes)),
        "json" => read_json(&bytes),
        _ => bail!("unknown mesh format: {:?} (expected .stl or .json)", ext),
    }
    .with_context(|| format!("failed to load mesh from {}", path.display()))?;

    info!(
        path = %path.display(),
        vertices = mesh.num_vertices(),
        faces = mesh.num_faces(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Read an ASCII or binary STL, welding shared corners.
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh> {
    let stl_reader = stl_io::create_stl_reader(reader)?;
    let mut triangles = Vec::new();
    for tri in stl_reader {
        let tri = tri?;
        triangles.push(tri.vertices.map(|v| [v[0] as f64, v[1] as f64, v[2] as f64]));
    }
    Ok(Mesh::from_triangle_soup(&triangles)?)
}

/// Read `{"positions": [[x, y, z], ..], "triangles": [[a, b, c], ..]}`.
pub fn read_json(bytes: &[u8]) -> Result<Mesh> {
    let desc: IndexedTriangles = serde_json::from_slice(bytes)?;
    Ok(Mesh::try_from(&desc)?)
}
