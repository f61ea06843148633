//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Default per-particle mass (kg). Cloth particles are light.
pub const DEFAULT_PARTICLE_MASS: f32 = 0.01;

/// Default number of XPBD substeps per frame.
pub const DEFAULT_SUBSTEPS: u32 = 20;

/// Default velocity damping (applied as `v *= 1.0 - damping` each substep).
pub const DEFAULT_DAMPING: f32 = 0.01;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Collision radius as a fraction of the spring rest distance.
///
/// Must stay at or below 0.5 so that two rest-adjacent particles do not
/// overlap in the rest pose.
pub const DEFAULT_RADIUS_SCALE: f32 = 1.0 / 3.0;

/// Hash table size as a multiple of the particle count.
pub const HASH_TABLE_SCALE: usize = 2;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Length below which a constraint direction is considered degenerate.
pub const DEGENERATE_LENGTH: f32 = 1.0e-10;
