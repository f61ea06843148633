//! Spring (distance constraint) extraction from mesh topology.
//!
//! Builds the unique undirected edge set from the triangle edges,
//! keeps only grid-adjacent pairs, and records each pair's rest length.
//! Done once at load time; the spring set never changes afterwards.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use weft_types::{WeftError, WeftResult};

use crate::mesh::ClothMesh;

/// Recovers the side length of a square grid from its particle count.
///
/// The grid-adjacency filter and the mounting heuristics both assume a
/// row-major square grid; this is the single place that assumption is
/// checked.
///
/// # Errors
///
/// `NonSquareGrid` when `particle_count` is not a perfect square (or zero).
pub fn grid_side(particle_count: usize) -> WeftResult<usize> {
    let side = (particle_count as f64).sqrt().round() as usize;
    if side == 0 || side * side != particle_count {
        return Err(WeftError::NonSquareGrid {
            vertex_count: particle_count,
        });
    }
    Ok(side)
}

/// The immutable set of springs for one cloth mesh.
///
/// Each spring is an unordered pair of particle indices with a
/// precomputed rest length. Pairs are stored canonicalized
/// (`v1 < v2`) and sorted, so constraint iteration order is
/// deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringSet {
    springs: Vec<[u32; 2]>,
    rest_lengths: Vec<f32>,
    rest_spacing: f32,
}

impl SpringSet {
    /// Extracts springs from a mesh in its rest pose.
    ///
    /// Triangle edges are deduplicated via canonicalized `(min, max)`
    /// keys, then filtered to grid-adjacent pairs: an index distance of
    /// 1 (same row) or of the per-row particle count (same column).
    /// Diagonal edges introduced by triangulation are dropped. The rest
    /// length of each surviving spring is the current inter-particle
    /// distance.
    ///
    /// # Errors
    ///
    /// - `NonSquareGrid` when the mesh is not a square grid.
    /// - `InvalidMesh` when no grid-adjacent edge survives the filter.
    pub fn extract(mesh: &ClothMesh) -> WeftResult<Self> {
        let side = grid_side(mesh.particle_count())? as u32;

        let mut edges: BTreeSet<(u32, u32)> = BTreeSet::new();
        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edges.insert(key);
            }
        }

        let mut springs = Vec::new();
        let mut rest_lengths = Vec::new();
        for (v1, v2) in edges {
            let gap = v2 - v1;
            if gap != 1 && gap != side {
                continue;
            }
            let rest = mesh
                .position_vec3(v1 as usize)
                .distance(mesh.position_vec3(v2 as usize));
            springs.push([v1, v2]);
            rest_lengths.push(rest);
        }

        if springs.is_empty() {
            return Err(WeftError::InvalidMesh(
                "no grid-adjacent edges found in triangle set".into(),
            ));
        }

        let rest_spacing = rest_lengths.iter().sum::<f32>() / rest_lengths.len() as f32;

        Ok(Self {
            springs,
            rest_lengths,
            rest_spacing,
        })
    }

    /// Builds a spring set from explicit index pairs and rest lengths.
    ///
    /// Bypasses the grid-adjacency extraction; callers provide whatever
    /// constraint topology they need (single-spring fixtures, imported
    /// constraint sets).
    ///
    /// # Errors
    ///
    /// `InvalidMesh` when the arrays differ in length, the set is
    /// empty, or a pair joins a particle to itself.
    pub fn from_pairs(springs: Vec<[u32; 2]>, rest_lengths: Vec<f32>) -> WeftResult<Self> {
        if springs.len() != rest_lengths.len() {
            return Err(WeftError::InvalidMesh(format!(
                "{} springs but {} rest lengths",
                springs.len(),
                rest_lengths.len()
            )));
        }
        if springs.is_empty() {
            return Err(WeftError::InvalidMesh("empty spring set".into()));
        }
        for (s, &[v1, v2]) in springs.iter().enumerate() {
            if v1 == v2 {
                return Err(WeftError::InvalidMesh(format!(
                    "spring {s} joins particle {v1} to itself"
                )));
            }
        }
        let rest_spacing = rest_lengths.iter().sum::<f32>() / rest_lengths.len() as f32;
        Ok(Self {
            springs,
            rest_lengths,
            rest_spacing,
        })
    }

    /// Returns the number of springs.
    #[inline]
    pub fn len(&self) -> usize {
        self.springs.len()
    }

    /// True when the set holds no springs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.springs.is_empty()
    }

    /// Returns the particle index pair of spring `s`.
    #[inline]
    pub fn spring(&self, s: usize) -> [u32; 2] {
        self.springs[s]
    }

    /// Returns the rest length of spring `s`.
    #[inline]
    pub fn rest_length(&self, s: usize) -> f32 {
        self.rest_lengths[s]
    }

    /// All spring index pairs, in iteration order.
    #[inline]
    pub fn springs(&self) -> &[[u32; 2]] {
        &self.springs
    }

    /// All rest lengths, parallel to [`SpringSet::springs`].
    #[inline]
    pub fn rest_lengths(&self) -> &[f32] {
        &self.rest_lengths
    }

    /// Mean rest length across all springs.
    ///
    /// The spatial hash cell spacing and the collision radius are
    /// derived from this.
    #[inline]
    pub fn rest_spacing(&self) -> f32 {
        self.rest_spacing
    }
}
