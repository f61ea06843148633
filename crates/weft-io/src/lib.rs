//! # weft-io
//!
//! Mesh loading at the simulation boundary. The physics core consumes a
//! flat vertex-position stream and a flat triangle-index stream; this
//! crate produces them from Wavefront OBJ files.

pub mod obj;

pub use obj::{load_obj, parse_obj};
