//! Per-face Z range index used to cull faces before intersection.

use strata_mesh::Mesh;

/// Minimum and maximum vertex Z of every face, indexed by face.
#[derive(Debug, Clone, Default)]
pub struct ZBounds {
    ranges: Vec<(f64, f64)>,
}

impl ZBounds {
    /// Compute the Z range of every face of `mesh`.
    pub fn build(mesh: &Mesh) -> Self {
        let ranges = (0..mesh.num_faces())
            .map(|face| {
                let [a, b, c] = mesh.face_positions(face);
                (a.z.min(b.z).min(c.z), a.z.max(b.z).max(c.z))
            })
            .collect();
        Self { ranges }
    }

    /// `(min_z, max_z)` of `face`.
    pub fn get(&self, face: usize) -> Option<(f64, f64)> {
        self.ranges.get(face).copied()
    }

    /// False when the plane at `z` lies strictly outside the face's Z range.
    #[inline]
    pub fn may_intersect(&self, face: usize, z: f64) -> bool {
        let (lo, hi) = self.ranges[face];
        !(z < lo || z > hi)
    }

    /// Number of indexed faces.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// True when no faces are indexed.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
