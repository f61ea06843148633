//! The XPBD physics engine.
//!
//! One `update(dt)` call advances a visible frame: the frame delta is
//! split into a fixed number of substeps, and each substep integrates,
//! rebuilds the spatial hash, projects the distance constraints once,
//! resolves self-collisions, and reconciles velocities from the
//! position change.

use weft_contact::{resolve_self_collisions, SpatialHashGrid};
use weft_mesh::{ClothMesh, SpringSet};
use weft_solver::distance::project_springs;
use weft_solver::mounting::pinned_flags;
use weft_solver::{SimulationState, SolverConfig};
use weft_types::constants::HASH_TABLE_SCALE;
use weft_types::WeftResult;

/// Aggregated counters from one `update()` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepStats {
    /// Substeps actually run (0 for a zero-delta call).
    pub substeps: u32,
    /// Spring corrections applied across all substeps.
    pub spring_corrections: u32,
    /// Self-collision corrections applied across all substeps.
    pub collision_corrections: u32,
    /// Springs skipped as degenerate (near-zero length).
    pub degenerate_springs: u32,
    /// Coincident particle pairs separated along the fallback axis.
    pub coincident_pairs: u32,
}

/// The cloth physics engine.
///
/// Owns a private [`SimulationState`] and the immutable spring set.
/// The mesh is only borrowed — at construction to read the rest pose,
/// and in [`PhysicsEngine::apply_to_mesh`] to publish a completed
/// frame. The engine never reads the mesh mid-step, so a renderer
/// holding the mesh sees either the previous frame or the new one,
/// never a half-projected state.
pub struct PhysicsEngine {
    state: SimulationState,
    springs: SpringSet,
    config: SolverConfig,
    /// Spatial hash cell edge length (the spring rest spacing).
    spacing: f32,
    /// Self-collision radius, `spacing * config.radius_scale`.
    radius: f32,
    bucket_count: usize,
    frame: u64,
}

impl PhysicsEngine {
    /// Builds an engine for a cloth mesh in its rest pose.
    ///
    /// Extracts the spring set, evaluates the mount policy into pin
    /// flags, and derives the collision radius and hash table size.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` from [`SolverConfig::validate`].
    /// - `NonSquareGrid` from spring extraction or the mount policy.
    pub fn new(mesh: &ClothMesh, config: SolverConfig) -> WeftResult<Self> {
        config.validate()?;

        let springs = SpringSet::extract(mesh)?;
        let pinned = pinned_flags(config.mount, mesh.particle_count())?;
        let state = SimulationState::from_mesh(mesh, &pinned)?;

        let spacing = springs.rest_spacing();
        let radius = spacing * config.radius_scale;
        let bucket_count = HASH_TABLE_SCALE * state.particle_count;

        tracing::info!(
            particles = state.particle_count,
            springs = springs.len(),
            mount = config.mount.name(),
            substeps = config.substeps,
            radius,
            "physics engine ready"
        );

        Ok(Self {
            state,
            springs,
            config,
            spacing,
            radius,
            bucket_count,
            frame: 0,
        })
    }

    /// Advances the simulation by one frame of `dt` seconds.
    ///
    /// A non-positive `dt` is a no-op that returns zeroed stats — the
    /// first frame of a wall-clock-driven loop lands here (see
    /// [`FrameClock`](crate::FrameClock)).
    ///
    /// # Errors
    ///
    /// Propagates spatial hash construction failures; cannot occur for
    /// a config that passed validation.
    pub fn update(&mut self, dt: f32) -> WeftResult<StepStats> {
        let mut stats = StepStats::default();
        if dt <= 0.0 {
            return Ok(stats);
        }

        let h = dt / self.config.substeps as f32;

        for _ in 0..self.config.substeps {
            self.state
                .integrate(h, self.config.gravity, self.config.damping);

            let grid = SpatialHashGrid::build(&self.state, self.spacing, self.bucket_count)?;

            let spring_pass = project_springs(&mut self.state, &self.springs);
            let collision_pass =
                resolve_self_collisions(&mut self.state, &grid, self.radius)?;

            self.state.reconcile_velocities(h);

            stats.substeps += 1;
            stats.spring_corrections += spring_pass.corrections;
            stats.degenerate_springs += spring_pass.skipped_degenerate;
            stats.collision_corrections += collision_pass.corrections;
            stats.coincident_pairs += collision_pass.coincident;
        }

        self.frame += 1;
        tracing::debug!(
            frame = self.frame,
            dt,
            substeps = stats.substeps,
            spring_corrections = stats.spring_corrections,
            collision_corrections = stats.collision_corrections,
            max_speed = self.state.max_speed(),
            "frame simulated"
        );

        Ok(stats)
    }

    /// Current particle positions as `(x, y, z)` channel slices.
    #[inline]
    pub fn positions(&self) -> (&[f32], &[f32], &[f32]) {
        (&self.state.pos_x, &self.state.pos_y, &self.state.pos_z)
    }

    /// Read access to the full simulation state.
    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The spring set the engine solves against.
    #[inline]
    pub fn springs(&self) -> &SpringSet {
        &self.springs
    }

    /// Number of simulated particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.state.particle_count
    }

    /// Self-collision radius in meters.
    #[inline]
    pub fn collision_radius(&self) -> f32 {
        self.radius
    }

    /// Publishes the current positions into the mesh.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when the mesh's particle count differs from
    /// the engine's — the two must describe the same cloth.
    pub fn apply_to_mesh(&self, mesh: &mut ClothMesh) -> WeftResult<()> {
        mesh.set_positions(&self.state.pos_x, &self.state.pos_y, &self.state.pos_z)
    }
}
