#![warn(missing_docs)]

//! Mesh slicing engine for the strata slicer.
//!
//! Converts a triangle mesh with face adjacency into horizontal layers, each
//! holding the closed (and, for damaged meshes, open) 2D contours where the
//! layer plane cuts the surface.
//!
//! # Example
//!
//! ```ignore
//! use strata_mesh::Mesh;
//! use strata_slicer::{slice_mesh, SliceSettings};
//!
//! let mesh = Mesh::from_indexed(&positions, &triangles)?;
//! let settings = SliceSettings {
//!     layer_thickness: 0.2,
//!     layer_count: 50,
//!     initial_layer_thickness: 0.3,
//! };
//! let result = slice_mesh(&mesh, &settings)?;
//!
//! for layer in &result.layers {
//!     println!("z={:.2}: {} contours", layer.z, layer.closed_polygons.len());
//! }
//! ```
//!
//! Layers that could not close every chain keep those chains in
//! `open_polygons`; deciding what to do with them is up to the caller.

pub mod bounds;
pub mod error;
pub mod layers;
pub mod polygon;
pub mod segment;
pub mod slice;
pub mod stitch;

pub use bounds::ZBounds;
pub use error::{Result, SlicerError};
pub use layers::{layer_count_for_height, layer_heights};
pub use polygon::{Polygon, Polygons};
pub use segment::{build_segments, cut_face, LayerSegments, Segment};
pub use slice::{slice_mesh, Contour, SliceLayer, SliceResult, Slicer};
pub use stitch::{stitch, StitchedLayer};

pub use strata_math::Tolerance;

use serde::{Deserialize, Serialize};

/// Layering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceSettings {
    /// Thickness of every layer after the first.
    pub layer_thickness: f64,
    /// Number of layers to cut.
    pub layer_count: usize,
    /// Thickness of the first layer.
    pub initial_layer_thickness: f64,
}

impl Default for SliceSettings {
    fn default() -> Self {
        Self {
            layer_thickness: 0.2,
            layer_count: 1,
            initial_layer_thickness: 0.3,
        }
    }
}

impl SliceSettings {
    /// Settings whose layers cover an object `height` tall.
    pub fn for_height(height: f64, layer_thickness: f64, initial_layer_thickness: f64) -> Self {
        Self {
            layer_thickness,
            layer_count: layer_count_for_height(height, layer_thickness, initial_layer_thickness),
            initial_layer_thickness,
        }
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.layer_thickness.is_finite() || self.layer_thickness <= 0.0 {
            return Err(SlicerError::DegenerateLayerParameters(
                "layer_thickness must be positive".into(),
            ));
        }
        if self.layer_count == 0 {
            return Err(SlicerError::DegenerateLayerParameters(
                "layer_count must be at least 1".into(),
            ));
        }
        if !self.initial_layer_thickness.is_finite() || self.initial_layer_thickness < 0.0 {
            return Err(SlicerError::DegenerateLayerParameters(
                "initial_layer_thickness must not be negative".into(),
            ));
        }
        Ok(())
    }
}
