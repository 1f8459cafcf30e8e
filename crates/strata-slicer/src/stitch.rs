//! Chaining layer segments into contours by walking face adjacency.
//!
//! Each walk starts at the lowest-indexed unvisited segment and follows the
//! face across the segment's end edge. When a segment ends exactly on a mesh
//! vertex, every face touching that vertex is a candidate. A candidate is
//! accepted only if its start lies within the chain gap of the current end.
//! A walk that returns to its first segment yields a closed contour; one that
//! runs out of candidates yields an open contour.

use strata_math::Tolerance;
use strata_mesh::Mesh;
use tracing::trace;

use crate::polygon::{Polygon, Polygons};
use crate::segment::{LayerSegments, Segment};

/// Contours assembled from one layer's segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchedLayer {
    /// Chains that returned to their first segment.
    pub closed: Polygons,
    /// Chains that dead-ended.
    pub open: Polygons,
}

/// Walk state for one layer. The visited flags belong to this layer alone.
struct Stitcher<'a> {
    layer: &'a LayerSegments,
    mesh: &'a Mesh,
    tolerance: &'a Tolerance,
    visited: Vec<bool>,
}

/// Assemble the segments of `layer` into closed and open contours.
///
/// Degenerate vertices are removed from every contour afterwards. The
/// result depends only on segment order, so stitching the same segments
/// twice gives identical output.
pub fn stitch(layer: &LayerSegments, mesh: &Mesh, tolerance: &Tolerance) -> StitchedLayer {
    let mut stitcher = Stitcher {
        layer,
        mesh,
        tolerance,
        visited: vec![false; layer.len()],
    };

    let mut out = StitchedLayer::default();
    for start in 0..layer.len() {
        if stitcher.visited[start] {
            continue;
        }
        let (polygon, closed) = stitcher.walk(start);
        if closed {
            out.closed.add(polygon);
        } else {
            trace!(z = layer.z, start, points = polygon.len(), "chain did not close");
            out.open.add(polygon);
        }
    }

    out.closed.remove_degenerate_verts(tolerance, true);
    out.open.remove_degenerate_verts(tolerance, false);
    out
}

impl Stitcher<'_> {
    /// Follow the chain from `start`. Returns the path and whether it closed.
    fn walk(&mut self, start: usize) -> (Polygon, bool) {
        let layer = self.layer;
        let segments = &layer.segments;
        let mut polygon = Polygon::new(vec![segments[start].start]);

        let mut current = Some(start);
        while let Some(idx) = current {
            let segment = &segments[idx];
            polygon.add(segment.end);
            self.visited[idx] = true;

            current = self.next_segment(segment, start);
            if current == Some(start) {
                return (polygon, true);
            }
        }

        (polygon, false)
    }

    /// Resolve which segment continues the chain after `segment`.
    fn next_segment(&self, segment: &Segment, start: usize) -> Option<usize> {
        let Some(vertex) = segment.end_vertex else {
            return self.try_face(segment, segment.end_other_face?, start);
        };

        let mut next = None;
        for &face in &self.mesh.vertices[vertex].connected_faces {
            match self.try_face(segment, face, start) {
                Some(idx) if idx == start => return Some(start),
                Some(idx) if next.is_none() => next = Some(idx),
                _ => {}
            }
        }
        next
    }

    /// The segment of `face`, if it continues `segment` and is still free.
    fn try_face(&self, segment: &Segment, face: usize, start: usize) -> Option<usize> {
        let idx = self.layer.segment_for_face(face)?;
        let candidate = &self.layer.segments[idx];

        if !self.tolerance.chainable(&segment.end, &candidate.start) {
            return None;
        }
        if idx == start {
            return Some(start);
        }
        if self.visited[idx] {
            return None;
        }
        Some(idx)
    }
}
