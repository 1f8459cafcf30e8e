#![warn(missing_docs)]

//! Face-adjacency triangle mesh for the strata slicer.
//!
//! Faces and vertices live in flat arrays and refer to each other by index.
//! Every face stores its three corner vertices (consistent winding) and the
//! face across each of its three edges; edge `e` joins corner `e` to corner
//! `(e + 1) % 3`. Every vertex stores the faces touching it.
//!
//! The slicer only ever borrows a [`Mesh`]; nothing here is mutated while a
//! slice job runs.

pub mod error;

pub use error::{MeshError, Result};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strata_math::Point3;
use tracing::debug;

/// A mesh vertex with the faces that touch it.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshVertex {
    /// Position in model space.
    pub position: Point3,
    /// Indices of every face using this vertex, ascending.
    pub connected_faces: Vec<usize>,
}

/// A triangular face with its edge neighbors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshFace {
    /// Corner vertex indices in winding order.
    pub vertex_indices: [usize; 3],
    /// Face across edge `e` (corner `e` to corner `e + 1`), or `None` on a boundary.
    pub connected_faces: [Option<usize>; 3],
}

/// Indexed triangle mesh with face adjacency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex array.
    pub vertices: Vec<MeshVertex>,
    /// Face array.
    pub faces: Vec<MeshFace>,
}

/// Plain indexed-triangle description, the on-disk JSON mesh format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexedTriangles {
    /// Vertex positions `[x, y, z]`.
    pub positions: Vec<[f64; 3]>,
    /// Triangles as vertex index triples.
    pub triangles: Vec<[usize; 3]>,
}

impl Mesh {
    /// Assemble a mesh from caller-supplied adjacency, validating every index.
    pub fn new(vertices: Vec<MeshVertex>, faces: Vec<MeshFace>) -> Result<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Build a mesh from positions and triangles, deriving the adjacency.
    ///
    /// The neighbor across directed edge `(a, b)` is the face holding the
    /// reverse edge `(b, a)`. Faces with flipped winding are still matched on
    /// the undirected edge. Unmatched edges are boundary edges.
    pub fn from_indexed(positions: &[[f64; 3]], triangles: &[[usize; 3]]) -> Result<Self> {
        if triangles.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        for (face, tri) in triangles.iter().enumerate() {
            for (slot, &index) in tri.iter().enumerate() {
                if index >= positions.len() {
                    return Err(MeshError::MalformedReference {
                        face,
                        slot,
                        index,
                        len: positions.len(),
                    });
                }
            }
        }

        let mut vertices: Vec<MeshVertex> = positions
            .iter()
            .map(|p| MeshVertex {
                position: Point3::new(p[0], p[1], p[2]),
                connected_faces: Vec::new(),
            })
            .collect();

        // Directed edge -> faces owning it, in face order.
        let mut edges: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (face, tri) in triangles.iter().enumerate() {
            for e in 0..3 {
                let a = tri[e];
                let b = tri[(e + 1) % 3];
                edges.entry((a, b)).or_default().push(face);
            }
            for &v in tri {
                // A degenerate triangle may list the same vertex twice.
                if vertices[v].connected_faces.last() != Some(&face) {
                    vertices[v].connected_faces.push(face);
                }
            }
        }

        let other_face = |key: (usize, usize), face: usize| -> Option<usize> {
            edges
                .get(&key)
                .and_then(|owners| owners.iter().copied().find(|&f| f != face))
        };

        let mut boundary_edges = 0usize;
        let faces: Vec<MeshFace> = triangles
            .iter()
            .enumerate()
            .map(|(face, tri)| {
                let mut connected_faces = [None; 3];
                for (e, slot) in connected_faces.iter_mut().enumerate() {
                    let a = tri[e];
                    let b = tri[(e + 1) % 3];
                    *slot = other_face((b, a), face).or_else(|| other_face((a, b), face));
                    if slot.is_none() {
                        boundary_edges += 1;
                    }
                }
                MeshFace {
                    vertex_indices: *tri,
                    connected_faces,
                }
            })
            .collect();

        debug!(
            vertices = vertices.len(),
            faces = faces.len(),
            boundary_edges,
            "built mesh adjacency"
        );

        Ok(Self { vertices, faces })
    }

    /// Build a mesh from flat `[x0, y0, z0, ...]` / `[i0, i1, i2, ...]` buffers.
    pub fn from_flat(vertices: &[f32], indices: &[u32]) -> Result<Self> {
        if vertices.len() % 3 != 0 {
            return Err(MeshError::InvalidBuffer(format!(
                "vertex buffer length {} is not a multiple of 3",
                vertices.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::InvalidBuffer(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }
        let positions: Vec<[f64; 3]> = vertices
            .chunks_exact(3)
            .map(|c| [c[0] as f64, c[1] as f64, c[2] as f64])
            .collect();
        let triangles: Vec<[usize; 3]> = indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .collect();
        Self::from_indexed(&positions, &triangles)
    }

    /// Build a mesh from unindexed triangles, welding bit-identical corners.
    ///
    /// This is the shape STL files arrive in.
    pub fn from_triangle_soup(triangles: &[[[f64; 3]; 3]]) -> Result<Self> {
        let mut lookup: HashMap<[u64; 3], usize> = HashMap::new();
        let mut positions: Vec<[f64; 3]> = Vec::new();
        let mut indexed: Vec<[usize; 3]> = Vec::with_capacity(triangles.len());

        for tri in triangles {
            let mut ids = [0usize; 3];
            for (id, p) in ids.iter_mut().zip(tri.iter()) {
                // -0.0 and 0.0 must weld together.
                let key = [
                    (p[0] + 0.0).to_bits(),
                    (p[1] + 0.0).to_bits(),
                    (p[2] + 0.0).to_bits(),
                ];
                *id = *lookup.entry(key).or_insert_with(|| {
                    positions.push(*p);
                    positions.len() - 1
                });
            }
            indexed.push(ids);
        }

        Self::from_indexed(&positions, &indexed)
    }

    /// Check that every vertex and face reference is in range.
    pub fn validate(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let nv = self.vertices.len();
        let nf = self.faces.len();

        for (face, f) in self.faces.iter().enumerate() {
            for (slot, &index) in f.vertex_indices.iter().enumerate() {
                if index >= nv {
                    return Err(MeshError::MalformedReference {
                        face,
                        slot,
                        index,
                        len: nv,
                    });
                }
            }
            for (edge, neighbor) in f.connected_faces.iter().enumerate() {
                if let Some(index) = *neighbor {
                    if index >= nf {
                        return Err(MeshError::MalformedNeighbor {
                            face,
                            edge,
                            index,
                            len: nf,
                        });
                    }
                }
            }
        }

        for (vertex, v) in self.vertices.iter().enumerate() {
            if let Some(&index) = v.connected_faces.iter().find(|&&f| f >= nf) {
                return Err(MeshError::MalformedVertexFace {
                    vertex,
                    index,
                    len: nf,
                });
            }
        }

        Ok(())
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Corner positions of a face, in winding order.
    pub fn face_positions(&self, face: usize) -> [&Point3; 3] {
        let [a, b, c] = self.faces[face].vertex_indices;
        [
            &self.vertices[a].position,
            &self.vertices[b].position,
            &self.vertices[c].position,
        ]
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().skip(1).fold((first, first), |(lo, hi), v| {
            let p = v.position;
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Lowest and highest vertex Z.
    pub fn z_extent(&self) -> Option<(f64, f64)> {
        self.bounds().map(|(lo, hi)| (lo.z, hi.z))
    }

    /// Number of edges without a neighbor face.
    pub fn boundary_edge_count(&self) -> usize {
        self.faces
            .iter()
            .flat_map(|f| f.connected_faces.iter())
            .filter(|n| n.is_none())
            .count()
    }
}

impl TryFrom<&IndexedTriangles> for Mesh {
    type Error = MeshError;

    fn try_from(value: &IndexedTriangles) -> Result<Self> {
        Mesh::from_indexed(&value.positions, &value.triangles)
    }
}
