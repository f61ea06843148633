//! Integration tests for weft-io.

use weft_io::{load_obj, parse_obj};
use weft_types::WeftError;

const QUAD: &str = "\
# 2x2 cloth patch
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
v 1.0 1.0 0.0
f 1 2 3
f 3 2 4
";

#[test]
fn parses_vertices_and_faces() {
    let (positions, faces) = parse_obj(QUAD).unwrap();
    assert_eq!(positions.len(), 12);
    assert_eq!(faces, vec![0, 1, 2, 2, 1, 3]);
}

#[test]
fn face_indices_are_rebased() {
    let (_, faces) = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    assert_eq!(faces, vec![0, 1, 2]);
}

#[test]
fn accepts_slash_face_forms() {
    let (_, faces) = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/1 2/2 3/3\n").unwrap();
    assert_eq!(faces, vec![0, 1, 2]);
}

#[test]
fn skips_unknown_records() {
    let input = "o cloth\nvn 0 0 1\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
    let (positions, faces) = parse_obj(input).unwrap();
    assert_eq!(positions.len(), 9);
    assert_eq!(faces.len(), 3);
}

#[test]
fn rejects_short_vertex_record() {
    let result = parse_obj("v 0.0 1.0\n");
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn rejects_unparseable_coordinate() {
    let result = parse_obj("v 0.0 abc 1.0\n");
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn rejects_short_face_record() {
    let result = parse_obj("v 0 0 0\nf 1 2\n");
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn rejects_zero_face_index() {
    let result = parse_obj("v 0 0 0\nf 0 1 2\n");
    assert!(matches!(result, Err(WeftError::InvalidMesh(_))));
}

#[test]
fn load_obj_missing_file_is_io_error() {
    let result = load_obj("/definitely/not/here.obj");
    assert!(matches!(result, Err(WeftError::Io(_))));
}

#[test]
fn load_obj_round_trip_through_tempfile() {
    let dir = std::env::temp_dir();
    let path = dir.join("weft_io_quad_test.obj");
    std::fs::write(&path, QUAD).unwrap();

    let mesh = load_obj(&path).unwrap();
    assert_eq!(mesh.particle_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.needs_normal_update());

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_obj_rejects_dangling_face_index() {
    let dir = std::env::temp_dir();
    let path = dir.join("weft_io_dangling_test.obj");
    std::fs::write(&path, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n").unwrap();

    let result = load_obj(&path);
    assert!(matches!(
        result,
        Err(WeftError::FaceIndexOutOfRange { index: 8, .. })
    ));

    std::fs::remove_file(&path).ok();
}
