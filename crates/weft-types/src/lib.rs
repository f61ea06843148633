//! # weft-types
//!
//! Shared types, error types, and physical constants for the Weft
//! cloth simulation engine.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Weft crates share.

pub mod constants;
pub mod error;
pub mod scalar;

pub use error::{WeftError, WeftResult};
pub use scalar::Scalar;
