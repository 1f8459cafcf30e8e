#![warn(missing_docs)]

//! Math types for the strata mesh slicer.
//!
//! Thin wrappers around nalgebra providing the planar primitives the slicer
//! works in: points and vectors in the XY plane, 3D mesh positions, the
//! edge interpolation kernel and tolerance constants.

use nalgebra::Vector2;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A point in the XY plane of a layer.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in the XY plane.
pub type Vec2 = Vector2<f64>;

/// Difference `a - b` as a planar vector.
#[inline]
pub fn sub(a: &Point2, b: &Point2) -> Vec2 {
    a - b
}

/// True when `v` is no longer than `len`.
///
/// Compares squared lengths, so no square root is taken.
#[inline]
pub fn test_length(v: &Vec2, len: f64) -> bool {
    v.norm_squared() <= len * len
}

/// True when `a` and `b` are strictly closer than `len`.
#[inline]
pub fn shorter_than(a: &Point2, b: &Point2, len: f64) -> bool {
    (a - b).norm_squared() < len * len
}

/// Linear interpolation of a value along an edge, parameterized by height.
///
/// Given an edge running from height `z0` (carrying `v0`) to height `z1`
/// (carrying `v1`), returns the value at height `z`. The caller guarantees
/// `z0 != z1`.
#[inline]
pub fn interpolate(z: f64, z0: f64, z1: f64, v0: f64, v1: f64) -> f64 {
    v0 + (v1 - v0) * (z - z0) / (z1 - z0)
}

/// Point where the edge `a -> b` crosses the plane at height `z`, projected to XY.
#[inline]
pub fn edge_point_at_z(a: &Point3, b: &Point3, z: f64) -> Point2 {
    Point2::new(
        interpolate(z, a.z, b.z, a.x, b.x),
        interpolate(z, a.z, b.z, a.y, b.y),
    )
}

/// Tolerance constants for planar comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Largest gap between two segment endpoints still treated as one point.
    pub chain_gap: f64,
    /// Points closer than this collapse into one during cleanup.
    pub min_resolution: f64,
}

impl Tolerance {
    /// Default slicing tolerances (0.01 chain gap, 1e-4 resolution).
    pub const DEFAULT: Self = Self {
        chain_gap: 0.01,
        min_resolution: 1e-4,
    };

    /// Check if two segment endpoints may be chained together.
    pub fn chainable(&self, a: &Point2, b: &Point2) -> bool {
        test_length(&sub(a, b), self.chain_gap)
    }

    /// Check if two polygon points are degenerate duplicates.
    pub fn coincident(&self, a: &Point2, b: &Point2) -> bool {
        shorter_than(a, b, self.min_resolution)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Serde helpers that write point lists as `[{ "x": .., "y": .. }, ..]`.
pub mod serde_points {
    use super::Point2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xy {
        x: f64,
        y: f64,
    }

    /// Serialize a point list as an array of `{x, y}` objects.
    pub fn serialize<S: Serializer>(points: &[Point2], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(points.iter().map(|p| Xy { x: p.x, y: p.y }))
    }

    /// Deserialize an array of `{x, y}` objects.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point2>, D::Error> {
        let raw = Vec::<Xy>::deserialize(d)?;
        Ok(raw.into_iter().map(|p| Point2::new(p.x, p.y)).collect())
    }
}
