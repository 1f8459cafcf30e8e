//! Error types for mesh construction.

use thiserror::Error;

/// Errors that can occur while building or validating a mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Mesh has no faces.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A face references a vertex that does not exist.
    #[error("face {face} vertex slot {slot} references vertex {index}, but mesh has {len} vertices")]
    MalformedReference {
        /// Offending face.
        face: usize,
        /// Corner of the face (0, 1 or 2).
        slot: usize,
        /// Referenced vertex index.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// A face names a neighbor face that does not exist.
    #[error("face {face} edge {edge} references neighbor face {index}, but mesh has {len} faces")]
    MalformedNeighbor {
        /// Offending face.
        face: usize,
        /// Edge of the face (0, 1 or 2).
        edge: usize,
        /// Referenced face index.
        index: usize,
        /// Number of faces in the mesh.
        len: usize,
    },

    /// A vertex lists a touching face that does not exist.
    #[error("vertex {vertex} lists connected face {index}, but mesh has {len} faces")]
    MalformedVertexFace {
        /// Offending vertex.
        vertex: usize,
        /// Referenced face index.
        index: usize,
        /// Number of faces in the mesh.
        len: usize,
    },

    /// Flat buffer layout is invalid.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
