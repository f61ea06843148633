//! Spatial hash grid over particle positions.
//!
//! An ephemeral bucket structure rebuilt once per substep: positions
//! move under integration and constraint projection every substep, so
//! any stale index risks missing nearby particles, and a linear rebuild
//! is cheaper than maintaining a mutable index under updates.
//!
//! Storage is two flat arrays — a cumulative-count table and a particle
//! index permutation — produced by a counting sort. No per-bucket
//! allocation, no auxiliary memory.

use weft_solver::SimulationState;
use weft_types::{WeftError, WeftResult};

// Large odd primes decorrelating the three cell axes.
const HASH_P1: i32 = 92_837_111;
const HASH_P2: i32 = 689_287_499;
const HASH_P3: i32 = 283_923_481;

/// Flat counting-sort spatial hash.
///
/// After construction, `particles[table[h] .. table[h + 1]]` lists the
/// indices of all particles hashing to bucket `h`: each particle index
/// appears in exactly one bucket range, ranges are contiguous, and
/// their union covers the whole particle set.
pub struct SpatialHashGrid {
    spacing: f32,
    bucket_count: usize,
    /// Cumulative counts, length `bucket_count + 1`.
    table: Vec<u32>,
    /// Particle indices, bucket-sorted; a permutation of `0..n`.
    particles: Vec<u32>,
}

impl SpatialHashGrid {
    /// Builds the hash over the state's current positions.
    ///
    /// Three passes: count occupancy per bucket, prefix-sum the counts
    /// into start offsets, then scatter each particle index into its
    /// bucket by decrementing the bucket's running counter.
    ///
    /// `spacing` is the physical cell edge length, typically the spring
    /// rest distance, so a 3×3×3 cell block around a particle covers
    /// every possible contact partner.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when `spacing` is not a positive finite length
    /// or `bucket_count` is zero.
    pub fn build(
        state: &SimulationState,
        spacing: f32,
        bucket_count: usize,
    ) -> WeftResult<Self> {
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(WeftError::InvalidConfig(format!(
                "hash cell spacing must be a positive length, got {spacing}"
            )));
        }
        if bucket_count == 0 {
            return Err(WeftError::InvalidConfig(
                "hash table needs at least one bucket".into(),
            ));
        }

        let n = state.particle_count;
        let mut grid = Self {
            spacing,
            bucket_count,
            table: vec![0; bucket_count + 1],
            particles: vec![0; n],
        };

        // Pass 1: occupancy per bucket.
        for i in 0..n {
            let h = grid.hash_position(state.pos_x[i], state.pos_y[i], state.pos_z[i]);
            grid.table[h] += 1;
        }

        // Pass 2: running sum turns counts into end offsets.
        let mut sum = 0;
        for entry in grid.table.iter_mut() {
            sum += *entry;
            *entry = sum;
        }

        // Pass 3: scatter. Decrementing each bucket's counter walks it
        // back to the bucket's start offset.
        for i in 0..n {
            let h = grid.hash_position(state.pos_x[i], state.pos_y[i], state.pos_z[i]);
            grid.table[h] -= 1;
            let slot = grid.table[h] as usize;
            grid.particles[slot] = i as u32;
        }

        Ok(grid)
    }

    /// Number of buckets in the table.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// The bucket-sorted particle index array.
    #[inline]
    pub fn particles(&self) -> &[u32] {
        &self.particles
    }

    #[inline]
    fn cell_coord(&self, x: f32, y: f32, z: f32) -> (i32, i32, i32) {
        (
            (x / self.spacing).floor() as i32,
            (y / self.spacing).floor() as i32,
            (z / self.spacing).floor() as i32,
        )
    }

    /// XOR-multiply hash of an integer cell coordinate, folded into
    /// `[0, bucket_count)`. Distant cells may collide; the caller
    /// distance-checks every candidate anyway, so collisions cost
    /// speed, never correctness.
    #[inline]
    fn hash_cell(&self, cx: i32, cy: i32, cz: i32) -> usize {
        let v = cx.wrapping_mul(HASH_P1)
            ^ cy.wrapping_mul(HASH_P2)
            ^ cz.wrapping_mul(HASH_P3);
        v.unsigned_abs() as usize % self.bucket_count
    }

    #[inline]
    fn hash_position(&self, x: f32, y: f32, z: f32) -> usize {
        let (cx, cy, cz) = self.cell_coord(x, y, z);
        self.hash_cell(cx, cy, cz)
    }

    /// Returns the 27 bucket ids of the 3×3×3 cell block around
    /// `position`, the center cell included.
    ///
    /// Duplicate bucket ids are permitted; the caller excludes self and
    /// double counting by direct index comparison, not by deduplication
    /// here.
    pub fn neighbor_cells(&self, position: [f32; 3]) -> [usize; 27] {
        let (cx, cy, cz) = self.cell_coord(position[0], position[1], position[2]);
        let mut cells = [0usize; 27];
        let mut k = 0;
        for x in (cx - 1)..=(cx + 1) {
            for y in (cy - 1)..=(cy + 1) {
                for z in (cz - 1)..=(cz + 1) {
                    cells[k] = self.hash_cell(x, y, z);
                    k += 1;
                }
            }
        }
        cells
    }

    /// Returns the half-open `[start, end)` range into
    /// [`SpatialHashGrid::particles`] for `bucket`.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` when `bucket >= bucket_count` — bucket ids
    /// only come from this grid's own hash, so an out-of-range id is a
    /// programming error.
    pub fn particle_range_in_cell(&self, bucket: usize) -> WeftResult<(usize, usize)> {
        if bucket >= self.bucket_count {
            return Err(WeftError::InvariantViolation(format!(
                "bucket {bucket} queried on a table of {} buckets",
                self.bucket_count
            )));
        }
        Ok((self.table[bucket] as usize, self.table[bucket + 1] as usize))
    }

    /// Returns the particle indices in `bucket` directly.
    ///
    /// # Errors
    ///
    /// Same contract as [`SpatialHashGrid::particle_range_in_cell`].
    pub fn particles_in_cell(&self, bucket: usize) -> WeftResult<&[u32]> {
        let (start, end) = self.particle_range_in_cell(bucket)?;
        Ok(&self.particles[start..end])
    }
}
