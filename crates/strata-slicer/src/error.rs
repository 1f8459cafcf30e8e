//! Error types for the slicer.

use strata_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during slicing.
///
/// Chains that fail to close are not errors; they surface as open polygons
/// on the affected layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlicerError {
    /// Layer thickness, count or initial thickness is out of range.
    #[error("degenerate layer parameters: {0}")]
    DegenerateLayerParameters(String),

    /// Mesh references a vertex or face that does not exist.
    #[error("malformed mesh: {0}")]
    MalformedMesh(#[from] MeshError),

    /// The job was cancelled between layers.
    #[error("slicing cancelled after {completed} layers")]
    Cancelled {
        /// Layers finished before the flag was observed.
        completed: usize,
    },
}

/// Result type for slicer operations.
pub type Result<T> = std::result::Result<T, SlicerError>;
