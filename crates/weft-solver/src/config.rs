//! Solver configuration.
//!
//! Parameters that control the XPBD step: gravity, substep count,
//! damping, mounting, and the self-collision radius. Set via in-memory
//! construction only; there is no file- or environment-based layer.

use serde::{Deserialize, Serialize};
use weft_types::constants::{
    DEFAULT_DAMPING, DEFAULT_RADIUS_SCALE, DEFAULT_SUBSTEPS, GRAVITY,
};
use weft_types::{WeftError, WeftResult};

use crate::mounting::MountPolicy;

/// Configuration for the XPBD solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Gravity vector [gx, gy, gz] in m/s².
    pub gravity: [f32; 3],

    /// Number of substeps per frame. Convergence comes from
    /// accumulating single constraint passes across substeps, so this
    /// is the main stiffness/quality knob.
    pub substeps: u32,

    /// Velocity damping rate per substep (applied as `v *= 1 - damping`).
    pub damping: f32,

    /// Which particles are anchored.
    pub mount: MountPolicy,

    /// Self-collision radius as a fraction of the spring rest distance.
    /// Must stay at or below 0.5 so rest-adjacent particles do not
    /// overlap in the rest pose.
    pub radius_scale: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -GRAVITY, 0.0],
            substeps: DEFAULT_SUBSTEPS,
            damping: DEFAULT_DAMPING,
            mount: MountPolicy::TopRow,
            radius_scale: DEFAULT_RADIUS_SCALE,
        }
    }
}

impl SolverConfig {
    /// A higher-quality preset: more substeps, lighter damping.
    pub fn high_quality() -> Self {
        Self {
            substeps: 50,
            damping: 0.005,
            ..Default::default()
        }
    }

    /// Checks that all parameters are physically reasonable.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the offending parameter.
    pub fn validate(&self) -> WeftResult<()> {
        if self.substeps == 0 {
            return Err(WeftError::InvalidConfig(
                "substep count must be >= 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(WeftError::InvalidConfig(format!(
                "damping {} is outside [0, 1)",
                self.damping
            )));
        }
        if self.radius_scale <= 0.0 || self.radius_scale > 0.5 {
            return Err(WeftError::InvalidConfig(format!(
                "radius scale {} is outside (0, 0.5]; rest-adjacent particles would overlap",
                self.radius_scale
            )));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(WeftError::InvalidConfig(
                "gravity components must be finite".into(),
            ));
        }
        Ok(())
    }
}
