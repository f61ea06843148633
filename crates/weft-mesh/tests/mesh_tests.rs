//! Integration tests for weft-mesh.

use weft_mesh::generators::cloth_grid;
use weft_mesh::normals::compute_vertex_normals;
use weft_mesh::{grid_side, ClothMesh, SpringSet};
use weft_types::WeftError;

// ─── ClothMesh Tests ──────────────────────────────────────────

#[test]
fn from_raw_basic() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let faces = vec![0, 1, 2];
    let mesh = ClothMesh::from_raw(&positions, &faces).unwrap();
    assert_eq!(mesh.particle_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.position(1), [1.0, 0.0, 0.0]);
    assert_eq!(mesh.triangle(0), [0, 1, 2]);
    assert!(mesh.needs_normal_update());
}

#[test]
fn from_raw_rejects_odd_vertex_stream() {
    let result = ClothMesh::from_raw(&[0.0, 1.0, 2.0, 3.0], &[]);
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn from_raw_rejects_odd_face_stream() {
    let positions = vec![0.0; 9];
    let result = ClothMesh::from_raw(&positions, &[0, 1]);
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn from_raw_rejects_out_of_range_face() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let result = ClothMesh::from_raw(&positions, &[0, 1, 7]);
    assert!(matches!(
        result,
        Err(WeftError::FaceIndexOutOfRange { index: 7, .. })
    ));
}

#[test]
fn from_raw_rejects_degenerate_triangle() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let result = ClothMesh::from_raw(&positions, &[0, 0, 1]);
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn particle_count_is_conserved_across_position_updates() {
    let mut mesh = cloth_grid(3, 1.0);
    let n = mesh.particle_count();
    for _ in 0..5 {
        let x = vec![0.5; n];
        let y = vec![0.25; n];
        let z = vec![0.0; n];
        mesh.set_positions(&x, &y, &z).unwrap();
        assert_eq!(mesh.particle_count(), n);
        assert_eq!(mesh.triangle_count(), 18);
    }
}

#[test]
fn set_positions_rejects_length_mismatch() {
    let mut mesh = cloth_grid(2, 1.0);
    let n = mesh.particle_count();
    let result = mesh.set_positions(&vec![0.0; n - 1], &vec![0.0; n], &vec![0.0; n]);
    assert!(matches!(result, Err(WeftError::InvariantViolation(_))));
}

#[test]
fn set_positions_marks_normals_dirty() {
    let mut mesh = cloth_grid(2, 1.0);
    compute_vertex_normals(&mut mesh);
    assert!(!mesh.needs_normal_update());

    let n = mesh.particle_count();
    mesh.set_positions(&vec![0.0; n], &vec![0.0; n], &vec![0.0; n])
        .unwrap();
    assert!(mesh.needs_normal_update());
}

#[test]
fn mesh_serialization_round_trip() {
    let mesh = cloth_grid(2, 1.0);
    let json = serde_json::to_string(&mesh).unwrap();
    let recovered: ClothMesh = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered.particle_count(), mesh.particle_count());
    assert_eq!(recovered.indices, mesh.indices);
}

// ─── Generator Tests ──────────────────────────────────────────

#[test]
fn cloth_grid_counts() {
    let mesh = cloth_grid(2, 1.0);
    assert_eq!(mesh.particle_count(), 9);
    assert_eq!(mesh.triangle_count(), 8);
}

#[test]
fn cloth_grid_extents() {
    let mesh = cloth_grid(4, 2.0);
    // First particle is the bottom-left corner, last the top-right.
    assert!((mesh.pos_x[0] - (-1.0)).abs() < 1e-6);
    assert!((mesh.pos_y[0] - (-1.0)).abs() < 1e-6);
    let last = mesh.particle_count() - 1;
    assert!((mesh.pos_x[last] - 1.0).abs() < 1e-6);
    assert!((mesh.pos_y[last] - 1.0).abs() < 1e-6);
}

#[test]
fn cloth_grid_last_row_is_top_edge() {
    let mesh = cloth_grid(3, 1.0);
    let side = 4;
    let n = mesh.particle_count();
    for i in (n - side)..n {
        assert!((mesh.pos_y[i] - 0.5).abs() < 1e-6);
    }
}

// ─── Spring Extraction Tests ──────────────────────────────────

#[test]
fn grid_side_accepts_perfect_squares() {
    assert_eq!(grid_side(9).unwrap(), 3);
    assert_eq!(grid_side(441).unwrap(), 21);
}

#[test]
fn grid_side_rejects_non_squares() {
    assert!(matches!(
        grid_side(12),
        Err(WeftError::NonSquareGrid { vertex_count: 12 })
    ));
    assert!(matches!(grid_side(0), Err(WeftError::NonSquareGrid { .. })));
}

#[test]
fn springs_from_3x3_grid() {
    let mesh = cloth_grid(2, 1.0);
    let springs = SpringSet::extract(&mesh).unwrap();
    // 2 horizontal per row × 3 rows + 2 vertical per column × 3 columns.
    assert_eq!(springs.len(), 12);
    for s in 0..springs.len() {
        assert!((springs.rest_length(s) - 0.5).abs() < 1e-6);
    }
    assert!((springs.rest_spacing() - 0.5).abs() < 1e-6);
}

#[test]
fn springs_exclude_diagonals() {
    let mesh = cloth_grid(2, 1.0);
    let springs = SpringSet::extract(&mesh).unwrap();
    let side = 3;
    for &[v1, v2] in springs.springs() {
        let gap = v2 - v1;
        assert!(gap == 1 || gap == side, "spring [{v1}, {v2}] is not grid-adjacent");
    }
}

#[test]
fn springs_are_unique_and_ordered() {
    let mesh = cloth_grid(4, 1.0);
    let springs = SpringSet::extract(&mesh).unwrap();
    let pairs = springs.springs();
    for w in pairs.windows(2) {
        assert!(w[0] < w[1], "springs must be strictly ordered");
    }
    for &[v1, v2] in pairs {
        assert!(v1 < v2);
    }
}

#[test]
fn springs_reject_non_grid_mesh() {
    let positions = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mesh = ClothMesh::from_raw(&positions, &[0, 1, 2]).unwrap();
    assert!(matches!(
        SpringSet::extract(&mesh),
        Err(WeftError::NonSquareGrid { .. })
    ));
}

// ─── Normal Tests ─────────────────────────────────────────────

#[test]
fn flat_grid_normals_face_z() {
    let mut mesh = cloth_grid(4, 1.0);
    compute_vertex_normals(&mut mesh);
    for i in 0..mesh.particle_count() {
        assert!(mesh.normal_x[i].abs() < 1e-5);
        assert!(mesh.normal_y[i].abs() < 1e-5);
        assert!(mesh.normal_z[i].abs() > 0.99);
    }
}

#[test]
fn normals_are_unit_length() {
    let mut mesh = cloth_grid(6, 2.0);
    // Perturb one particle out of plane so the surface is curved.
    mesh.pos_z[10] = 0.3;
    compute_vertex_normals(&mut mesh);
    for i in 0..mesh.particle_count() {
        let x = mesh.normal_x[i];
        let y = mesh.normal_y[i];
        let z = mesh.normal_z[i];
        let len = (x * x + y * y + z * z).sqrt();
        assert!((len - 1.0).abs() < 1e-5, "normal at {i} has length {len}");
    }
}
