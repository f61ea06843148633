//! Procedural mesh generation for tests and headless scenarios.
//!
//! Produces deterministic square cloth grids with correct winding order.

use weft_types::constants::DEFAULT_PARTICLE_MASS;

use crate::mesh::ClothMesh;

/// Generates a flat square cloth grid in the XY plane.
///
/// The grid spans `[-size/2, size/2]` in X and Y, centered at the
/// origin at Z=0. Particles are laid out row-major from the bottom row
/// upward, so the last topological row is the geometric top edge.
///
/// # Arguments
/// - `quads` — Number of quads along each axis (particles per row = quads + 1).
/// - `size` — Total edge length in meters.
///
/// # Example
/// ```
/// use weft_mesh::generators::cloth_grid;
/// let mesh = cloth_grid(2, 1.0);
/// assert_eq!(mesh.particle_count(), 9);  // 3×3 particles
/// assert_eq!(mesh.triangle_count(), 8);  // 2×2 quads × 2 tris each
/// ```
pub fn cloth_grid(quads: usize, size: f32) -> ClothMesh {
    let side = quads + 1;
    let particle_count = side * side;
    let tri_count = quads * quads * 2;

    let mut mesh = ClothMesh {
        pos_x: Vec::with_capacity(particle_count),
        pos_y: Vec::with_capacity(particle_count),
        pos_z: Vec::with_capacity(particle_count),
        normal_x: Vec::with_capacity(particle_count),
        normal_y: Vec::with_capacity(particle_count),
        normal_z: Vec::with_capacity(particle_count),
        indices: Vec::with_capacity(tri_count * 3),
        mass: vec![DEFAULT_PARTICLE_MASS; particle_count],
        normals_dirty: false,
    };

    let half = size / 2.0;

    for j in 0..side {
        for i in 0..side {
            let u = i as f32 / quads as f32;
            let v = j as f32 / quads as f32;

            mesh.pos_x.push(-half + u * size);
            mesh.pos_y.push(-half + v * size); // bottom to top
            mesh.pos_z.push(0.0);

            mesh.normal_x.push(0.0);
            mesh.normal_y.push(0.0);
            mesh.normal_z.push(1.0); // facing +Z
        }
    }

    // Two triangles per quad
    for j in 0..quads {
        for i in 0..quads {
            let bot_left = (j * side + i) as u32;
            let bot_right = bot_left + 1;
            let top_left = bot_left + side as u32;
            let top_right = top_left + 1;

            mesh.indices.push(bot_left);
            mesh.indices.push(bot_right);
            mesh.indices.push(top_left);

            mesh.indices.push(top_left);
            mesh.indices.push(bot_right);
            mesh.indices.push(top_right);
        }
    }

    mesh
}
