//! Simulation state — SoA buffers for all per-particle data.
//!
//! This is the primary mutable data structure during simulation. The
//! engine reads and writes these buffers each substep; the mesh is only
//! touched when a completed step is published.

use weft_mesh::ClothMesh;
use weft_types::{WeftError, WeftResult};

/// SoA simulation state buffers.
///
/// All arrays have length `particle_count`. Pinned particles carry
/// `inv_mass = 0.0`, which excludes them from integration, redirects
/// constraint corrections entirely to their mobile partners, and keeps
/// their velocity at zero.
pub struct SimulationState {
    /// Number of particles.
    pub particle_count: usize,

    // ─── Position (current) ───
    pub pos_x: Vec<f32>,
    pub pos_y: Vec<f32>,
    pub pos_z: Vec<f32>,

    // ─── Velocity ───
    pub vel_x: Vec<f32>,
    pub vel_y: Vec<f32>,
    pub vel_z: Vec<f32>,

    // ─── Pre-integration position (for velocity reconciliation) ───
    pub old_x: Vec<f32>,
    pub old_y: Vec<f32>,
    pub old_z: Vec<f32>,

    // ─── Per-particle mass ───
    pub mass: Vec<f32>,
    pub inv_mass: Vec<f32>,
}

impl SimulationState {
    /// Initializes state from a mesh and per-particle pin flags.
    ///
    /// Positions are copied from the mesh; velocities start at zero.
    /// Pinned particles get `inv_mass = 0.0`.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when `pinned.len()` does not match the
    /// mesh's particle count.
    pub fn from_mesh(mesh: &ClothMesh, pinned: &[bool]) -> WeftResult<Self> {
        let n = mesh.particle_count();
        if pinned.len() != n {
            return Err(WeftError::InvariantViolation(format!(
                "pinned array length ({}) != particle count ({})",
                pinned.len(),
                n
            )));
        }

        let mass = mesh.mass.clone();
        let mut inv_mass: Vec<f32> = mass.iter().map(|&m| 1.0 / m).collect();
        for i in 0..n {
            if pinned[i] {
                inv_mass[i] = 0.0;
            }
        }

        Ok(Self {
            particle_count: n,
            pos_x: mesh.pos_x.clone(),
            pos_y: mesh.pos_y.clone(),
            pos_z: mesh.pos_z.clone(),
            vel_x: vec![0.0; n],
            vel_y: vec![0.0; n],
            vel_z: vec![0.0; n],
            old_x: mesh.pos_x.clone(),
            old_y: mesh.pos_y.clone(),
            old_z: mesh.pos_z.clone(),
            mass,
            inv_mass,
        })
    }

    /// True when particle `i` is pinned.
    #[inline]
    pub fn is_pinned(&self, i: usize) -> bool {
        self.inv_mass[i] == 0.0
    }

    /// Semi-implicit integration for one substep of length `h`.
    ///
    /// For every unpinned particle: damp velocity (`v *= 1 - damping`),
    /// accumulate gravity (`v += g * h`), cache the pre-integration
    /// position, advance (`x += v * h`). Pinned particles are skipped
    /// entirely and stay where the previous substep left them.
    pub fn integrate(&mut self, h: f32, gravity: [f32; 3], damping: f32) {
        let factor = 1.0 - damping;
        for i in 0..self.particle_count {
            if self.inv_mass[i] == 0.0 {
                continue;
            }

            self.vel_x[i] = self.vel_x[i] * factor + gravity[0] * h;
            self.vel_y[i] = self.vel_y[i] * factor + gravity[1] * h;
            self.vel_z[i] = self.vel_z[i] * factor + gravity[2] * h;

            self.old_x[i] = self.pos_x[i];
            self.old_y[i] = self.pos_y[i];
            self.old_z[i] = self.pos_z[i];

            self.pos_x[i] += self.vel_x[i] * h;
            self.pos_y[i] += self.vel_y[i] * h;
            self.pos_z[i] += self.vel_z[i] * h;
        }
    }

    /// Derives velocities from the substep's position change:
    /// `v = (x - x_old) / h`.
    ///
    /// Run after all positional corrections so the constraint solve is
    /// reflected in the next substep's dynamics. Pinned particles keep
    /// their zero velocity.
    pub fn reconcile_velocities(&mut self, h: f32) {
        let inv_h = 1.0 / h;
        for i in 0..self.particle_count {
            if self.inv_mass[i] == 0.0 {
                continue;
            }
            self.vel_x[i] = (self.pos_x[i] - self.old_x[i]) * inv_h;
            self.vel_y[i] = (self.pos_y[i] - self.old_y[i]) * inv_h;
            self.vel_z[i] = (self.pos_z[i] - self.old_z[i]) * inv_h;
        }
    }

    /// Largest velocity magnitude across all particles.
    pub fn max_speed(&self) -> f32 {
        let mut max_sq = 0.0f32;
        for i in 0..self.particle_count {
            let sq = self.vel_x[i] * self.vel_x[i]
                + self.vel_y[i] * self.vel_y[i]
                + self.vel_z[i] * self.vel_z[i];
            max_sq = max_sq.max(sq);
        }
        max_sq.sqrt()
    }
}
