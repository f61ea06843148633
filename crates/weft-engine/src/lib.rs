//! # weft-engine
//!
//! The per-frame XPBD update: substep scheduling, constraint pass
//! ordering, and position publication back to the mesh.
//!
//! ## Key Types
//!
//! - [`PhysicsEngine`] — owns the simulation state and springs; one
//!   `update(dt)` call advances a full frame of substeps
//! - [`FrameClock`] — wall-clock frame deltas for callers driving the
//!   engine in real time
//! - [`SimWorker`] — runs the engine on a dedicated thread behind a
//!   computed-flag handshake, decoupling simulation from the render
//!   loop's cadence

pub mod clock;
pub mod engine;
pub mod worker;

pub use clock::FrameClock;
pub use engine::{PhysicsEngine, StepStats};
pub use worker::SimWorker;
