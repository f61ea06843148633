//! # weft-contact
//!
//! Self-collision detection and response for the Weft engine.
//!
//! Split into two pieces:
//! 1. **Broad phase** — [`SpatialHashGrid`], a flat counting-sort
//!    bucket structure rebuilt from scratch every substep
//! 2. **Response** — [`self_collision::resolve_self_collisions`],
//!    mass-weighted push-apart of particle pairs closer than twice the
//!    collision radius
//!
//! Candidate gathering is bounded to the 27 cells surrounding each
//! particle, replacing the all-pairs O(N²) scan with an O(27·k) one.

pub mod self_collision;
pub mod spatial_hash;

pub use self_collision::{resolve_self_collisions, CollisionPassStats};
pub use spatial_hash::SpatialHashGrid;
