//! Self-collision resolution.
//!
//! For each particle, candidates are gathered from the 27 cells
//! surrounding it and distance-checked against twice the collision
//! radius. Overlapping pairs are pushed apart along their separating
//! direction, the correction split by inverse-mass weighting. The pass
//! is purely local and non-iterative; refinement happens across the
//! substeps of a frame.

use weft_solver::SimulationState;
use weft_types::constants::DEGENERATE_LENGTH;
use weft_types::WeftResult;

use crate::spatial_hash::SpatialHashGrid;

/// Counters from one self-collision pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionPassStats {
    /// Candidate pairs that were actually distance-checked.
    pub pairs_tested: u32,
    /// Pairs that received a separating correction.
    pub corrections: u32,
    /// Fully overlapping pairs separated along the fallback axis.
    pub coincident: u32,
}

/// Pushes apart every particle pair closer than `2 * radius`.
///
/// Each pair is seen from both sides of the per-particle scan; the
/// first visit restores the full separation, so the second fails the
/// distance test and is a no-op. A pinned particle does not move — its
/// mobile partner absorbs the whole correction — and a pair of pinned
/// particles is left alone. Fully coincident particles have no
/// separating direction and are pushed apart along +X so overlapping
/// spawn states cannot persist.
///
/// # Errors
///
/// Propagates `InvariantViolation` from bucket queries; cannot occur
/// for cells produced by `grid.neighbor_cells`.
pub fn resolve_self_collisions(
    state: &mut SimulationState,
    grid: &SpatialHashGrid,
    radius: f32,
) -> WeftResult<CollisionPassStats> {
    let mut stats = CollisionPassStats::default();
    let min_dist = 2.0 * radius;

    for i in 0..state.particle_count {
        let cells =
            grid.neighbor_cells([state.pos_x[i], state.pos_y[i], state.pos_z[i]]);

        for &cell in &cells {
            let (start, end) = grid.particle_range_in_cell(cell)?;
            for k in start..end {
                let j = grid.particles()[k] as usize;
                if j == i {
                    continue;
                }

                let w_i = state.inv_mass[i];
                let w_j = state.inv_mass[j];
                let w_sum = w_i + w_j;
                if w_sum == 0.0 {
                    continue; // both pinned
                }

                let dx = state.pos_x[i] - state.pos_x[j];
                let dy = state.pos_y[i] - state.pos_y[j];
                let dz = state.pos_z[i] - state.pos_z[j];
                let dist = (dx * dx + dy * dy + dz * dz).sqrt();

                stats.pairs_tested += 1;
                if dist >= min_dist {
                    continue;
                }

                let (nx, ny, nz, overlap) = if dist < DEGENERATE_LENGTH {
                    stats.coincident += 1;
                    (1.0, 0.0, 0.0, min_dist)
                } else {
                    (dx / dist, dy / dist, dz / dist, min_dist - dist)
                };

                let ratio_i = w_i / w_sum;
                let ratio_j = w_j / w_sum;

                state.pos_x[i] += nx * overlap * ratio_i;
                state.pos_y[i] += ny * overlap * ratio_i;
                state.pos_z[i] += nz * overlap * ratio_i;

                state.pos_x[j] -= nx * overlap * ratio_j;
                state.pos_y[j] -= ny * overlap * ratio_j;
                state.pos_z[j] -= nz * overlap * ratio_j;

                stats.corrections += 1;
            }
        }
    }

    Ok(stats)
}
