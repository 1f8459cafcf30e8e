//! Layer contour types and degenerate-vertex cleanup.

use serde::{Deserialize, Serialize};
use strata_math::{Point2, Tolerance};

/// A 2D contour. Point order defines the contour direction.
///
/// Whether the contour is closed (last point connects back to the first) is
/// decided by the [`Polygons`] set it lives in, not by the polygon itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    /// Vertices of the contour in order.
    #[serde(with = "strata_math::serde_points")]
    pub points: Vec<Point2>,
}

impl Polygon {
    /// Contour through `points`, in order.
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    /// Append the next point of the chain.
    pub fn add(&mut self, p: Point2) {
        self.points.push(p);
    }

    /// True before the first point is added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point count.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Shoelace area with the (last, first) edge included. Outer contours
    /// stitched from outward-facing triangles come out positive.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.closing_edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    /// Magnitude of [`Self::signed_area`].
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Wound counter-clockwise when seen from +Z.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Outline length including the (last, first) edge.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.closing_edges().map(|(a, b)| (*b - *a).norm()).sum()
    }

    /// Consecutive point pairs, wrapping from the last point to the first.
    fn closing_edges(&self) -> impl Iterator<Item = (&Point2, &Point2)> {
        self.points.iter().zip(self.points.iter().cycle().skip(1))
    }

    /// Length of the path without the closing edge.
    pub fn path_length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }

    /// Bounding box `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        let first = *self.points.first()?;
        Some(self.points.iter().skip(1).fold((first, first), |(lo, hi), p| {
            (
                Point2::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point2::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Collapse runs of points closer than `tol.min_resolution` into one.
    ///
    /// For a closed contour the wrap-around pair (last, first) is checked too.
    /// Running this twice changes nothing.
    pub fn remove_degenerate_verts(&mut self, tol: &Tolerance, closed: bool) {
        let mut kept: Vec<Point2> = Vec::with_capacity(self.points.len());
        for p in self.points.drain(..) {
            match kept.last() {
                Some(last) if tol.coincident(last, &p) => {}
                _ => kept.push(p),
            }
        }
        if closed {
            while kept.len() > 1 && tol.coincident(&kept[kept.len() - 1], &kept[0]) {
                kept.pop();
            }
        }
        self.points = kept;
    }
}

/// An unordered set of contours with stable iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygons {
    polygons: Vec<Polygon>,
}

impl Polygons {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contour.
    pub fn add(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Number of contours.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// True when the set holds no contours.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Iterate contours in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    /// Contour at `index`.
    pub fn get(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    /// Total number of points over all contours.
    pub fn point_count(&self) -> usize {
        self.polygons.iter().map(Polygon::len).sum()
    }

    /// Sum of signed areas (holes wound opposite to outlines subtract).
    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::signed_area).sum()
    }

    /// Remove degenerate vertices from every contour.
    ///
    /// Closed contours left with fewer than 3 points are dropped. Open
    /// chains are always kept, even when they collapse to a single point,
    /// so a layer with a dead-ended walk never looks clean.
    pub fn remove_degenerate_verts(&mut self, tol: &Tolerance, closed: bool) {
        for polygon in &mut self.polygons {
            polygon.remove_degenerate_verts(tol, closed);
        }
        if closed {
            self.polygons.retain(|p| p.len() >= 3);
        }
    }
}

impl<'a> IntoIterator for &'a Polygons {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl From<Vec<Polygon>> for Polygons {
    fn from(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_polygon_area() {
        let sq = square();
        assert_relative_eq!(sq.signed_area(), 1.0, epsilon = 1e-12);
        assert!(sq.is_ccw());
        assert_relative_eq!(sq.perimeter(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sq.path_length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_polygon_bounds() {
        let (lo, hi) = square().bounds().unwrap();
        assert_eq!(lo, Point2::new(0.0, 0.0));
        assert_eq!(hi, Point2::new(1.0, 1.0));
        assert!(Polygon::default().bounds().is_none());
    }

    #[test]
    fn test_adjacent_duplicates_collapse() {
        let tol = Tolerance::DEFAULT;
        let mut poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0 + 1e-6, 0.0),
            Point2::new(1.0, 1.0),
        ]);
        poly.remove_degenerate_verts(&tol, false);
        assert_eq!(poly.len(), 3);
        assert_eq!(poly.points[1], Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_closing_duplicate_removed() {
        let tol = Tolerance::DEFAULT;
        let mut poly = square();
        poly.add(Point2::new(1e-7, 0.0));
        poly.remove_degenerate_verts(&tol, true);
        assert_eq!(poly, square());

        // Open paths keep their final point.
        let mut open = square();
        open.add(Point2::new(1e-7, 0.0));
        open.remove_degenerate_verts(&tol, false);
        assert_eq!(open.len(), 5);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let tol = Tolerance::DEFAULT;
        let mut poly = Polygon::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.00005, 0.0),
            Point2::new(0.0002, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 0.00001),
        ]);
        poly.remove_degenerate_verts(&tol, true);
        let once = poly.clone();
        poly.remove_degenerate_verts(&tol, true);
        assert_eq!(poly, once);
        for w in poly.points.windows(2) {
            assert!(!tol.coincident(&w[0], &w[1]));
        }
    }

    #[test]
    fn test_collapsed_polygons_dropped() {
        let tol = Tolerance::DEFAULT;
        let mut set = Polygons::new();
        set.add(square());
        set.add(Polygon::new(vec![
            Point2::new(5.0, 5.0),
            Point2::new(5.0, 5.0),
            Point2::new(5.0, 5.0 + 1e-6),
        ]));
        set.remove_degenerate_verts(&tol, true);
        assert_eq!(set.len(), 1);
        assert_eq!(set.point_count(), 4);
        assert_relative_eq!(set.total_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collapsed_open_chain_kept() {
        let tol = Tolerance::DEFAULT;
        let mut set = Polygons::new();
        set.add(Polygon::new(vec![
            Point2::new(1e-5, 0.0),
            Point2::new(0.0, 1e-5),
        ]));
        set.remove_degenerate_verts(&tol, false);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().points, vec![Point2::new(1e-5, 0.0)]);
    }

    /// Points on a 5e-5 grid, so neighbours often fall within min resolution.
    fn grid_points() -> impl Strategy<Value = Vec<Point2>> {
        prop::collection::vec((0i32..6, 0i32..6), 0..24).prop_map(|cells| {
            cells
                .into_iter()
                .map(|(x, y)| Point2::new(x as f64 * 5e-5, y as f64 * 5e-5))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_cleanup_leaves_no_coincident_neighbours(
            points in grid_points(),
            closed in any::<bool>(),
        ) {
            let tol = Tolerance::DEFAULT;
            let mut poly = Polygon::new(points.clone());
            poly.remove_degenerate_verts(&tol, closed);

            prop_assert_eq!(poly.is_empty(), points.is_empty());
            prop_assert!(poly.points.windows(2).all(|w| !tol.coincident(&w[0], &w[1])));
            if closed && poly.len() > 1 {
                prop_assert!(!tol.coincident(&poly.points[poly.len() - 1], &poly.points[0]));
            }

            let once = poly.clone();
            poly.remove_degenerate_verts(&tol, closed);
            prop_assert_eq!(poly, once);
        }

        #[test]
        fn prop_open_chains_survive_cleanup(polys in prop::collection::vec(grid_points(), 0..6)) {
            let tol = Tolerance::DEFAULT;
            let non_empty = polys.iter().filter(|p| !p.is_empty()).count();
            let mut set = Polygons::from(
                polys.into_iter().filter(|p| !p.is_empty()).map(Polygon::new).collect::<Vec<_>>(),
            );
            set.remove_degenerate_verts(&tol, false);
            prop_assert_eq!(set.len(), non_empty);
            prop_assert!(set.iter().all(|p| !p.is_empty()));
        }
    }

    #[test]
    fn test_serializes_as_xy_objects() {
        let set = Polygons::from(vec![Polygon::new(vec![Point2::new(1.0, 2.0)])]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[[{"x":1.0,"y":2.0}]]"#);
        let back: Polygons = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
