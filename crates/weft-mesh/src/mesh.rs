//! Core cloth mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! This matches the per-channel vertex buffers the renderer uploads,
//! so publishing a simulation step is three slice copies.

use serde::{Deserialize, Serialize};
use weft_types::constants::DEFAULT_PARTICLE_MASS;
use weft_types::{WeftError, WeftResult};

/// A cloth mesh stored in Structure-of-Arrays layout.
///
/// Particle count is fixed for the lifetime of the mesh: no particle is
/// added or removed after construction. The only mutation entry point
/// is [`ClothMesh::set_positions`], a full position replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClothMesh {
    /// X coordinates of all particles.
    pub pos_x: Vec<f32>,
    /// Y coordinates of all particles.
    pub pos_y: Vec<f32>,
    /// Z coordinates of all particles.
    pub pos_z: Vec<f32>,

    /// X components of vertex normals.
    pub normal_x: Vec<f32>,
    /// Y components of vertex normals.
    pub normal_y: Vec<f32>,
    /// Z components of vertex normals.
    pub normal_z: Vec<f32>,

    /// Triangle indices, stored flat: `[t0v0, t0v1, t0v2, t1v0, ...]`.
    pub indices: Vec<u32>,

    /// Per-particle mass (kg). Immutable after load.
    pub mass: Vec<f32>,

    /// Set when positions changed and normals have not been recomputed.
    pub(crate) normals_dirty: bool,
}

impl ClothMesh {
    /// Returns the number of particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of particle `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position of particle `i` as a `glam::Vec3`.
    #[inline]
    pub fn position_vec3(&self, i: usize) -> glam::Vec3 {
        glam::Vec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns the three particle indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// True when positions changed since the last normal recomputation.
    #[inline]
    pub fn needs_normal_update(&self) -> bool {
        self.normals_dirty
    }

    pub(crate) fn clear_normals_dirty(&mut self) {
        self.normals_dirty = false;
    }

    /// Builds a mesh from a flat vertex stream (3 floats per particle)
    /// and a flat triangle stream (3 zero-based indices per face).
    ///
    /// Every particle is assigned the default mass. Normals are zeroed
    /// and marked dirty; call
    /// [`compute_vertex_normals`](crate::normals::compute_vertex_normals)
    /// before the first draw.
    ///
    /// # Errors
    ///
    /// - `InvalidMesh` when either stream's length is not divisible by 3
    ///   or the mesh is empty.
    /// - `FaceIndexOutOfRange` when a face references a missing particle.
    pub fn from_raw(positions: &[f32], faces: &[u32]) -> WeftResult<Self> {
        if positions.is_empty() {
            return Err(WeftError::InvalidMesh("empty vertex stream".into()));
        }
        if positions.len() % 3 != 0 {
            return Err(WeftError::InvalidMesh(format!(
                "vertex stream length {} is not divisible by 3",
                positions.len()
            )));
        }
        if faces.len() % 3 != 0 {
            return Err(WeftError::InvalidMesh(format!(
                "face stream length {} is not divisible by 3",
                faces.len()
            )));
        }

        let n = positions.len() / 3;

        for (i, &idx) in faces.iter().enumerate() {
            if idx as usize >= n {
                return Err(WeftError::FaceIndexOutOfRange {
                    face: i / 3,
                    index: idx,
                    vertex_count: n,
                });
            }
        }
        for t in 0..faces.len() / 3 {
            let [a, b, c] = [faces[t * 3], faces[t * 3 + 1], faces[t * 3 + 2]];
            if a == b || b == c || a == c {
                return Err(WeftError::InvalidMesh(format!(
                    "triangle {t} has repeated particle indices [{a}, {b}, {c}]"
                )));
            }
        }

        let mut mesh = Self {
            pos_x: Vec::with_capacity(n),
            pos_y: Vec::with_capacity(n),
            pos_z: Vec::with_capacity(n),
            normal_x: vec![0.0; n],
            normal_y: vec![0.0; n],
            normal_z: vec![0.0; n],
            indices: faces.to_vec(),
            mass: vec![DEFAULT_PARTICLE_MASS; n],
            normals_dirty: true,
        };

        for i in 0..n {
            mesh.pos_x.push(positions[i * 3]);
            mesh.pos_y.push(positions[i * 3 + 1]);
            mesh.pos_z.push(positions[i * 3 + 2]);
        }

        Ok(mesh)
    }

    /// Replaces all particle positions and marks normals dirty.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when any replacement slice length does not
    /// match the particle count — the particle set is fixed at load.
    pub fn set_positions(&mut self, x: &[f32], y: &[f32], z: &[f32]) -> WeftResult<()> {
        let n = self.particle_count();
        if x.len() != n || y.len() != n || z.len() != n {
            return Err(WeftError::InvariantViolation(format!(
                "position replacement of lengths ({}, {}, {}) for a mesh with {} particles",
                x.len(),
                y.len(),
                z.len(),
                n
            )));
        }
        self.pos_x.copy_from_slice(x);
        self.pos_y.copy_from_slice(y);
        self.pos_z.copy_from_slice(z);
        self.normals_dirty = true;
        Ok(())
    }
}
