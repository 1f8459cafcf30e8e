//! Triangle / plane intersection segments for one layer.

use std::collections::HashMap;

use strata_math::{edge_point_at_z, Point2};
use strata_mesh::Mesh;

use crate::bounds::ZBounds;

/// The chord where one face crosses a layer plane.
///
/// The segment runs from edge `A-B` to edge `A-C` of its face, where `A` is
/// the lone vertex on one side of the plane. Because faces share a winding,
/// the segment of the face across the `A-C` edge starts where this one ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Point on edge `A-B`.
    pub start: Point2,
    /// Point on edge `A-C`.
    pub end: Point2,
    /// Face this segment was cut from.
    pub face_index: usize,
    /// Face across the `A-C` edge; where the chain continues.
    pub end_other_face: Option<usize>,
    /// Mesh vertex the end point lands on exactly, if any.
    pub end_vertex: Option<usize>,
}

/// All segments of one layer plus the face lookup the stitcher needs.
#[derive(Debug, Clone, Default)]
pub struct LayerSegments {
    /// Plane height.
    pub z: f64,
    /// Segments in face order.
    pub segments: Vec<Segment>,
    face_to_segment: HashMap<usize, usize>,
}

impl LayerSegments {
    /// Empty segment list for the plane at `z`.
    pub fn new(z: f64) -> Self {
        Self {
            z,
            ..Default::default()
        }
    }

    /// Record a segment and index it by its face.
    pub fn push(&mut self, segment: Segment) {
        self.face_to_segment.insert(segment.face_index, self.segments.len());
        self.segments.push(segment);
    }

    /// Index of the segment cut from `face`, if that face crossed the plane.
    pub fn segment_for_face(&self, face: usize) -> Option<usize> {
        self.face_to_segment.get(&face).copied()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no face crossed the plane.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Cut every face of `mesh` whose Z range contains `z`.
pub fn build_segments(mesh: &Mesh, bounds: &ZBounds, z: f64) -> LayerSegments {
    let mut layer = LayerSegments::new(z);
    for face in 0..mesh.num_faces() {
        if !bounds.may_intersect(face, z) {
            continue;
        }
        if let Some(segment) = cut_face(mesh, face, z) {
            layer.push(segment);
        }
    }
    layer
}

/// Intersect one face with the plane at `z`.
///
/// Only faces with exactly one vertex strictly on one side and the other two
/// on the other side or on the plane produce a segment. A face that merely
/// touches the plane at a vertex, or lies on it, produces nothing; of two
/// faces sharing an edge that lies in the plane, only one claims that edge.
pub fn cut_face(mesh: &Mesh, face: usize, z: f64) -> Option<Segment> {
    let f = &mesh.faces[face];
    let p = mesh.face_positions(face);

    for a in 0..3 {
        let next = (a + 1) % 3;
        let prev = (a + 2) % 3;

        // (lone vertex, start edge far corner, end edge far corner, end edge)
        let rotation = if p[a].z < z && p[next].z >= z && p[prev].z >= z {
            Some((prev, next, a))
        } else if p[a].z > z && p[next].z < z && p[prev].z < z {
            Some((next, prev, prev))
        } else {
            None
        };

        if let Some((b, c, end_edge)) = rotation {
            let end_vertex = (p[c].z == z).then_some(f.vertex_indices[c]);
            return Some(Segment {
                start: edge_point_at_z(p[a], p[b], z),
                end: edge_point_at_z(p[a], p[c], z),
                face_index: face,
                end_other_face: f.connected_faces[end_edge],
                end_vertex,
            });
        }
    }

    None
}
