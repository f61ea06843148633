//! Mounting (pin) policies.
//!
//! A pinned particle is exempt from integration and from
//! constraint-driven displacement, anchoring part of the cloth. The
//! policy is a closed enum — there is no invalid mounting state — and
//! pinning is decided by pure index arithmetic against the mesh's
//! square-grid dimensions.

use serde::{Deserialize, Serialize};
use weft_mesh::grid_side;
use weft_types::WeftResult;

/// Which particles are anchored in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountPolicy {
    /// The last particle index is fixed (one grid corner).
    Corner,
    /// Every particle in the last topological row is fixed (the top
    /// edge for row-major bottom-up grids).
    TopRow,
    /// The single central particle is fixed.
    Middle,
    /// No particle is fixed; the cloth is in free fall.
    Unconstrained,
}

impl MountPolicy {
    /// Human-readable policy name.
    pub fn name(&self) -> &'static str {
        match self {
            MountPolicy::Corner => "corner",
            MountPolicy::TopRow => "top_row",
            MountPolicy::Middle => "middle",
            MountPolicy::Unconstrained => "unconstrained",
        }
    }
}

/// Pure pin predicate: is particle `index` pinned under `policy` on a
/// square grid with `side` particles per row?
pub fn is_pinned(policy: MountPolicy, side: usize, index: usize) -> bool {
    let n = side * side;
    match policy {
        MountPolicy::Corner => index == n - 1,
        MountPolicy::TopRow => index >= n - side,
        MountPolicy::Middle => index == (side / 2) * side + side / 2,
        MountPolicy::Unconstrained => false,
    }
}

/// Evaluates the pin predicate for every particle.
///
/// `Unconstrained` places no demands on the topology; every other
/// policy requires a square grid.
///
/// # Errors
///
/// `NonSquareGrid` when a grid-based policy is applied to a particle
/// count that is not a perfect square.
pub fn pinned_flags(policy: MountPolicy, particle_count: usize) -> WeftResult<Vec<bool>> {
    if policy == MountPolicy::Unconstrained {
        return Ok(vec![false; particle_count]);
    }
    let side = grid_side(particle_count)?;
    Ok((0..particle_count)
        .map(|i| is_pinned(policy, side, i))
        .collect())
}
