//! Mesh slicing - intersect a triangle mesh with horizontal planes.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strata_math::Tolerance;
use strata_mesh::Mesh;
use tracing::{debug, info, info_span, warn};

use crate::bounds::ZBounds;
use crate::error::{Result, SlicerError};
use crate::layers::layer_heights;
use crate::polygon::{Polygon, Polygons};
use crate::segment::build_segments;
use crate::stitch::stitch;
use crate::SliceSettings;

/// A single layer from slicing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceLayer {
    /// Layer index (0 = first layer).
    pub index: usize,
    /// Z height of the cutting plane.
    pub z: f64,
    /// Closed contours, in discovery order.
    pub closed_polygons: Polygons,
    /// Chains that could not be closed. Non-empty means the layer needs repair.
    pub open_polygons: Polygons,
}

/// A contour tagged with whether it closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contour<'a> {
    /// Returned to its first segment.
    Closed(&'a Polygon),
    /// Dead-ended before closing.
    Open(&'a Polygon),
}

impl SliceLayer {
    /// True when the layer produced no open chains.
    pub fn is_closed(&self) -> bool {
        self.open_polygons.is_empty()
    }

    /// Every contour of the layer, closed ones first.
    pub fn contours(&self) -> impl Iterator<Item = Contour<'_>> {
        self.closed_polygons
            .iter()
            .map(Contour::Closed)
            .chain(self.open_polygons.iter().map(Contour::Open))
    }
}

/// All layers of a slice job, ordered by layer index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceResult {
    /// Layers bottom to top.
    pub layers: Vec<SliceLayer>,
}

impl SliceResult {
    /// Indices of layers holding at least one open contour.
    pub fn open_layer_indices(&self) -> Vec<usize> {
        self.layers
            .iter()
            .filter(|l| !l.is_closed())
            .map(|l| l.index)
            .collect()
    }

    /// True when every layer closed all of its chains.
    pub fn is_clean(&self) -> bool {
        self.layers.iter().all(SliceLayer::is_closed)
    }
}

/// Slicing engine bound to one mesh.
///
/// Construction validates the settings and the mesh, plans the layer
/// heights and builds the per-face Z index. Each layer is then sliced
/// independently; the mesh is only read.
#[derive(Debug)]
pub struct Slicer<'m> {
    mesh: &'m Mesh,
    heights: Vec<f64>,
    bounds: ZBounds,
    tolerance: Tolerance,
}

impl<'m> Slicer<'m> {
    /// Prepare a slice job for `mesh`.
    pub fn new(mesh: &'m Mesh, settings: &SliceSettings) -> Result<Self> {
        settings.validate()?;
        mesh.validate()?;

        let heights = layer_heights(
            settings.layer_thickness,
            settings.layer_count,
            settings.initial_layer_thickness,
        );
        let bounds = ZBounds::build(mesh);

        Ok(Self {
            mesh,
            heights,
            bounds,
            tolerance: Tolerance::DEFAULT,
        })
    }

    /// Use custom chaining and cleanup tolerances.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Planned Z of every layer.
    pub fn layer_heights(&self) -> &[f64] {
        &self.heights
    }

    /// Number of planned layers.
    pub fn layer_count(&self) -> usize {
        self.heights.len()
    }

    /// Slice a single layer.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.layer_count()`.
    pub fn slice_layer(&self, index: usize) -> SliceLayer {
        let z = self.heights[index];
        let segments = build_segments(self.mesh, &self.bounds, z);
        let stitched = stitch(&segments, self.mesh, &self.tolerance);

        debug!(
            layer = index,
            z,
            segments = segments.len(),
            closed = stitched.closed.len(),
            open = stitched.open.len(),
            "sliced layer"
        );

        SliceLayer {
            index,
            z,
            closed_polygons: stitched.closed,
            open_polygons: stitched.open,
        }
    }

    /// Slice every layer in parallel.
    pub fn slice(&self) -> SliceResult {
        let span = info_span!("slice", layers = self.layer_count());
        let _entered = span.enter();
        let layers: Vec<SliceLayer> = (0..self.layer_count())
            .into_par_iter()
            .map(|i| span.in_scope(|| self.slice_layer(i)))
            .collect();
        self.finish(layers)
    }

    /// Slice every layer on the calling thread.
    pub fn slice_sequential(&self) -> SliceResult {
        let _span = info_span!("slice", layers = self.layer_count()).entered();
        let layers: Vec<SliceLayer> = (0..self.layer_count())
            .map(|i| self.slice_layer(i))
            .collect();
        self.finish(layers)
    }

    /// Slice in parallel, checking `cancel` before each layer.
    pub fn slice_with_cancel(&self, cancel: &AtomicBool) -> Result<SliceResult> {
        let span = info_span!("slice", layers = self.layer_count());
        let _entered = span.enter();
        let layers: Vec<Option<SliceLayer>> = (0..self.layer_count())
            .into_par_iter()
            .map(|i| {
                if cancel.load(Ordering::Relaxed) {
                    None
                } else {
                    Some(span.in_scope(|| self.slice_layer(i)))
                }
            })
            .collect();

        if layers.iter().any(Option::is_none) {
            let completed = layers.iter().filter(|l| l.is_some()).count();
            info!(completed, "slicing cancelled");
            return Err(SlicerError::Cancelled { completed });
        }

        Ok(self.finish(layers.into_iter().flatten().collect()))
    }

    fn finish(&self, layers: Vec<SliceLayer>) -> SliceResult {
        let mut open_layers = 0usize;
        for layer in layers.iter().filter(|l| !l.is_closed()) {
            open_layers += 1;
            warn!(
                layer = layer.index,
                z = layer.z,
                open = layer.open_polygons.len(),
                "layer has unclosed contours"
            );
        }

        info!(
            layers = layers.len(),
            faces = self.mesh.num_faces(),
            open_layers,
            "slicing complete"
        );

        SliceResult { layers }
    }
}

/// Slice `mesh` with `settings`.
pub fn slice_mesh(mesh: &Mesh, settings: &SliceSettings) -> Result<SliceResult> {
    Ok(Slicer::new(mesh, settings)?.slice())
}
