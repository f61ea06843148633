//! Vertex normal recomputation from triangle geometry.
//!
//! Normals are a rendering attribute: the solver never reads them, but
//! every position replacement invalidates them. The renderer checks
//! [`ClothMesh::needs_normal_update`](crate::ClothMesh::needs_normal_update)
//! and calls this before drawing.

use crate::mesh::ClothMesh;

/// Recomputes area-weighted vertex normals in place and clears the
/// dirty flag.
///
/// Each triangle's face normal (cross product of two edges, magnitude
/// twice the triangle area) is accumulated at its three vertices, then
/// normalized.
pub fn compute_vertex_normals(mesh: &mut ClothMesh) {
    let n = mesh.particle_count();

    for i in 0..n {
        mesh.normal_x[i] = 0.0;
        mesh.normal_y[i] = 0.0;
        mesh.normal_z[i] = 0.0;
    }

    for t in 0..mesh.triangle_count() {
        let [ia, ib, ic] = mesh.triangle(t);
        let (a, b, c) = (ia as usize, ib as usize, ic as usize);

        let e1x = mesh.pos_x[b] - mesh.pos_x[a];
        let e1y = mesh.pos_y[b] - mesh.pos_y[a];
        let e1z = mesh.pos_z[b] - mesh.pos_z[a];

        let e2x = mesh.pos_x[c] - mesh.pos_x[a];
        let e2y = mesh.pos_y[c] - mesh.pos_y[a];
        let e2z = mesh.pos_z[c] - mesh.pos_z[a];

        let nx = e1y * e2z - e1z * e2y;
        let ny = e1z * e2x - e1x * e2z;
        let nz = e1x * e2y - e1y * e2x;

        mesh.normal_x[a] += nx;
        mesh.normal_y[a] += ny;
        mesh.normal_z[a] += nz;

        mesh.normal_x[b] += nx;
        mesh.normal_y[b] += ny;
        mesh.normal_z[b] += nz;

        mesh.normal_x[c] += nx;
        mesh.normal_y[c] += ny;
        mesh.normal_z[c] += nz;
    }

    for i in 0..n {
        let x = mesh.normal_x[i];
        let y = mesh.normal_y[i];
        let z = mesh.normal_z[i];
        let len = (x * x + y * y + z * z).sqrt();
        if len > 1e-10 {
            let inv = 1.0 / len;
            mesh.normal_x[i] = x * inv;
            mesh.normal_y[i] = y * inv;
            mesh.normal_z[i] = z * inv;
        }
    }

    mesh.clear_normals_dirty();
}
