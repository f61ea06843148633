//! Minimal Wavefront OBJ reader for cloth grids.
//!
//! Reads `v` records (3 floats) and `f` records (3 one-based vertex
//! indices). Everything else — normals, UVs, materials, polygonal
//! faces — is outside the cloth pipeline and skipped. Malformed records
//! abort the load with an explicit error instead of continuing with
//! partially-populated data.

use std::fs;
use std::path::Path;

use weft_mesh::ClothMesh;
use weft_types::{WeftError, WeftResult};

/// Loads a cloth mesh from an OBJ file.
///
/// # Errors
///
/// - `Io` when the file cannot be read.
/// - `InvalidMesh` / `FaceIndexOutOfRange` for malformed content
///   (propagated from [`parse_obj`] and [`ClothMesh::from_raw`]).
pub fn load_obj(path: impl AsRef<Path>) -> WeftResult<ClothMesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let (positions, faces) = parse_obj(&text)?;
    let mesh = ClothMesh::from_raw(&positions, &faces)?;
    tracing::info!(
        path = %path.display(),
        particles = mesh.particle_count(),
        triangles = mesh.triangle_count(),
        "loaded cloth mesh"
    );
    Ok(mesh)
}

/// Parses OBJ text into flat vertex and face streams.
///
/// Face indices are converted from the format's 1-based convention to
/// the 0-based indices the rest of the engine uses.
pub fn parse_obj(input: &str) -> WeftResult<(Vec<f32>, Vec<u32>)> {
    let mut positions: Vec<f32> = Vec::new();
    let mut faces: Vec<u32> = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                for _ in 0..3 {
                    let token = tokens.next().ok_or_else(|| {
                        WeftError::InvalidMesh(format!(
                            "line {}: vertex record has fewer than 3 coordinates",
                            line_no + 1
                        ))
                    })?;
                    let value: f32 = token.parse().map_err(|_| {
                        WeftError::InvalidMesh(format!(
                            "line {}: unparseable vertex coordinate {token:?}",
                            line_no + 1
                        ))
                    })?;
                    positions.push(value);
                }
            }
            Some("f") => {
                for _ in 0..3 {
                    let token = tokens.next().ok_or_else(|| {
                        WeftError::InvalidMesh(format!(
                            "line {}: face record has fewer than 3 indices",
                            line_no + 1
                        ))
                    })?;
                    // Accept "i", "i/..", "i//.." forms; only the
                    // position index matters here.
                    let index_token = token.split('/').next().unwrap_or(token);
                    let index: u32 = index_token.parse().map_err(|_| {
                        WeftError::InvalidMesh(format!(
                            "line {}: unparseable face index {token:?}",
                            line_no + 1
                        ))
                    })?;
                    if index == 0 {
                        return Err(WeftError::InvalidMesh(format!(
                            "line {}: face index 0 in a 1-based format",
                            line_no + 1
                        )));
                    }
                    faces.push(index - 1);
                }
            }
            _ => {} // comments, normals, groups, blank lines
        }
    }

    Ok((positions, faces))
}
