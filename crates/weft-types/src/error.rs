//! Error types for the Weft engine.
//!
//! All crates return `WeftResult<T>` from fallible operations.
//! Load-time and configuration errors are recoverable by the caller;
//! `InvariantViolation` indicates internal misuse and is fatal by
//! design, but still an explicit, catchable failure mode.

use thiserror::Error;

/// Unified error type for the Weft engine.
#[derive(Debug, Error)]
pub enum WeftError {
    /// I/O operation failed (unreadable mesh file, missing path).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A face record references a vertex that does not exist.
    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    /// The mesh is not a square grid, which the spring extraction and
    /// mounting heuristics require.
    #[error("Mesh with {vertex_count} vertices is not a square grid")]
    NonSquareGrid { vertex_count: usize },

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A simulation invariant was violated (e.g., a position buffer of
    /// the wrong length, or a bucket query outside the hash table).
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Convenience alias for `Result<T, WeftError>`.
pub type WeftResult<T> = Result<T, WeftError>;
