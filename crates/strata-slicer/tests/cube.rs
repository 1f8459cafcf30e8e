//! End-to-end slicing of small closed meshes.

use approx::assert_relative_eq;
use strata_math::{Point2, Tolerance};
use strata_mesh::Mesh;
use strata_slicer::{build_segments, slice_mesh, stitch, SliceSettings, Slicer, ZBounds};

const CUBE_TRIANGLES: [[usize; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [2, 3, 7],
    [2, 7, 6],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

/// Unit cube spanning `[-0.5, 0.5]` in X and Y and `[z0, z0 + 1]` in Z.
fn unit_cube(z0: f64) -> Mesh {
    let z1 = z0 + 1.0;
    let positions = [
        [-0.5, -0.5, z0],
        [0.5, -0.5, z0],
        [0.5, 0.5, z0],
        [-0.5, 0.5, z0],
        [-0.5, -0.5, z1],
        [0.5, -0.5, z1],
        [0.5, 0.5, z1],
        [-0.5, 0.5, z1],
    ];
    Mesh::from_indexed(&positions, &CUBE_TRIANGLES).unwrap()
}

fn has_point(points: &[Point2], x: f64, y: f64) -> bool {
    points
        .iter()
        .any(|p| (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9)
}

fn assert_unit_square(points: &[Point2]) {
    for (x, y) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
        assert!(has_point(points, x, y), "missing corner ({x}, {y})");
    }
    for w in points.windows(2) {
        assert!(!Tolerance::DEFAULT.coincident(&w[0], &w[1]));
    }
}

#[test]
fn unit_cube_on_build_plate() {
    let mesh = unit_cube(0.0);
    let settings = SliceSettings {
        layer_thickness: 0.2,
        layer_count: 5,
        initial_layer_thickness: 0.2,
    };
    let result = slice_mesh(&mesh, &settings).unwrap();

    assert_eq!(result.layers.len(), 5);
    assert_relative_eq!(result.layers[0].z, 0.1, epsilon = 1e-12);
    assert!(result.layers.windows(2).all(|w| w[0].z < w[1].z));

    for layer in &result.layers {
        assert_eq!(layer.closed_polygons.len(), 1, "layer {}", layer.index);
        assert!(layer.open_polygons.is_empty());
        let poly = layer.closed_polygons.get(0).unwrap();
        assert_relative_eq!(poly.area(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(poly.perimeter(), 4.0, epsilon = 1e-9);
        assert_eq!(poly.len() % 2, 0);
        assert_unit_square(&poly.points);
    }
    assert!(result.is_clean());
}

#[test]
fn centered_cube_mid_height() {
    let mesh = unit_cube(-0.5);
    let bounds = ZBounds::build(&mesh);
    let segments = build_segments(&mesh, &bounds, 0.0);
    // Two triangles per side face.
    assert_eq!(segments.len(), 8);

    let out = stitch(&segments, &mesh, &Tolerance::DEFAULT);
    assert_eq!(out.closed.len(), 1);
    assert!(out.open.is_empty());
    let poly = out.closed.get(0).unwrap();
    assert_relative_eq!(poly.area(), 1.0, epsilon = 1e-9);
    assert!(poly.is_ccw());
    assert_unit_square(&poly.points);
}

#[test]
fn plane_through_top_face_follows_vertices() {
    let mesh = unit_cube(-0.5);
    let bounds = ZBounds::build(&mesh);
    let segments = build_segments(&mesh, &bounds, 0.5);
    // Only the side triangles owning a top edge cut; each ends on a corner.
    assert_eq!(segments.len(), 4);
    assert!(segments.segments.iter().all(|s| s.end_vertex.is_some()));

    let out = stitch(&segments, &mesh, &Tolerance::DEFAULT);
    assert_eq!(out.closed.len(), 1);
    assert!(out.open.is_empty());
    let poly = out.closed.get(0).unwrap();
    assert_eq!(poly.len(), 4);
    assert_relative_eq!(poly.area(), 1.0, epsilon = 1e-12);
}

#[test]
fn faces_off_the_plane_produce_no_segments() {
    let mesh = unit_cube(0.0);
    let bounds = ZBounds::build(&mesh);
    let segments = build_segments(&mesh, &bounds, 0.5);
    for face in [0, 1, 2, 3] {
        // Top and bottom caps never reach z = 0.5.
        assert_eq!(segments.segment_for_face(face), None);
    }
    assert!(build_segments(&mesh, &bounds, 1.5).is_empty());
    assert!(build_segments(&mesh, &bounds, -0.25).is_empty());
}

#[test]
fn octahedron_equator_chains_through_vertices() {
    // Equator vertices lie exactly on the plane z = 1.
    let positions = [
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [-1.0, 0.0, 1.0],
        [0.0, -1.0, 1.0],
        [0.0, 0.0, 2.0],
        [0.0, 0.0, 0.0],
    ];
    let triangles = [
        [4, 0, 1],
        [4, 1, 2],
        [4, 2, 3],
        [4, 3, 0],
        [5, 1, 0],
        [5, 2, 1],
        [5, 3, 2],
        [5, 0, 3],
    ];
    let mesh = Mesh::from_indexed(&positions, &triangles).unwrap();
    let settings = SliceSettings {
        layer_thickness: 0.5,
        layer_count: 1,
        initial_layer_thickness: 2.0,
    };
    let result = slice_mesh(&mesh, &settings).unwrap();
    let layer = &result.layers[0];
    assert_eq!(layer.z, 1.0);
    assert_eq!(layer.closed_polygons.len(), 1);
    assert!(layer.open_polygons.is_empty());

    let poly = layer.closed_polygons.get(0).unwrap();
    assert_eq!(poly.len(), 4);
    assert_relative_eq!(poly.area(), 2.0, epsilon = 1e-12);
    assert!(poly.is_ccw());
}

#[test]
fn missing_side_leaves_open_chains() {
    let positions: Vec<[f64; 3]> = (0..8)
        .map(|i| {
            let x = if matches!(i % 4, 1 | 2) { 1.0 } else { 0.0 };
            let y = if matches!(i % 4, 2 | 3) { 1.0 } else { 0.0 };
            let z = if i >= 4 { 1.0 } else { 0.0 };
            [x, y, z]
        })
        .collect();
    // Drop the two front triangles.
    let triangles: Vec<[usize; 3]> = CUBE_TRIANGLES
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 4 && *i != 5)
        .map(|(_, t)| *t)
        .collect();
    let mesh = Mesh::from_indexed(&positions, &triangles).unwrap();
    assert_eq!(mesh.boundary_edge_count(), 4);

    let settings = SliceSettings {
        layer_thickness: 0.5,
        layer_count: 1,
        initial_layer_thickness: 1.0,
    };
    let result = slice_mesh(&mesh, &settings).unwrap();
    let layer = &result.layers[0];
    assert!(layer.closed_polygons.is_empty());
    assert!(!layer.open_polygons.is_empty());
    assert!(!result.is_clean());
    assert_eq!(result.open_layer_indices(), vec![0]);
}

#[test]
fn restitching_is_bit_identical() {
    let mesh = unit_cube(0.0);
    let slicer = Slicer::new(
        &mesh,
        &SliceSettings {
            layer_thickness: 0.1,
            layer_count: 9,
            initial_layer_thickness: 0.1,
        },
    )
    .unwrap();
    let first = slicer.slice();
    let second = slicer.slice_sequential();
    for (a, b) in first.layers.iter().zip(&second.layers) {
        for (pa, pb) in a.closed_polygons.iter().zip(b.closed_polygons.iter()) {
            let bits = |p: &strata_slicer::Polygon| -> Vec<(u64, u64)> {
                p.points
                    .iter()
                    .map(|q| (q.x.to_bits(), q.y.to_bits()))
                    .collect()
            };
            assert_eq!(bits(pa), bits(pb));
        }
    }
}

#[test]
fn layer_output_serializes_in_camel_case() {
    let mesh = unit_cube(0.0);
    let settings = SliceSettings {
        layer_thickness: 0.2,
        layer_count: 1,
        initial_layer_thickness: 0.2,
    };
    let result = slice_mesh(&mesh, &settings).unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let layer = &json["layers"][0];
    assert!(layer["closedPolygons"][0][0]["x"].is_f64());
    assert_eq!(layer["openPolygons"].as_array().unwrap().len(), 0);
}
