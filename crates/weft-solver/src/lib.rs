//! # weft-solver
//!
//! Simulation state and the position-based pieces of the XPBD step:
//! semi-implicit integration, distance-constraint projection, velocity
//! reconciliation, and the mounting (pin) policies.
//!
//! ## Key Types
//!
//! - [`SimulationState`] — SoA buffers for positions, velocities, masses
//! - [`MountPolicy`] — closed enum of pin policies, dispatched through
//!   the pure predicate [`mounting::is_pinned`]
//! - [`SolverConfig`] — gravity, substeps, damping, collision radius
//!
//! The per-frame substep loop that ties these together with the spatial
//! hash lives in `weft-engine`.

pub mod config;
pub mod distance;
pub mod mounting;
pub mod state;

pub use config::SolverConfig;
pub use mounting::MountPolicy;
pub use state::SimulationState;
