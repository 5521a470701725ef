//! World Kernel: authoritative scene state and the per-frame simulation step.
//!
//! # Invariants
//! - A tick runs in a fixed order: move, patrol, refresh boxes, obstacles,
//!   item, enemy, camera. Determinism depends on that order.
//! - Boxes are re-centered on their owner before any overlap test.
//! - Collision response is positional only and never writes a NaN.
//! - The renderer receives a draw list; it never sees game logic.

pub mod bounds;
pub mod camera;
pub mod collision;
pub mod config;
pub mod frame;
pub mod motion;
pub mod patrol;
pub mod timing;
pub mod world;

pub use bounds::Aabb2d;
pub use camera::{CameraRig, CameraState, Smoothing};
pub use config::{ConfigError, WorldConfig};
pub use frame::{Frame, RunState, Simulation};
pub use timing::{Clock, FixedStepClock, FrameClock, FrameTimer, SystemClock};
pub use world::{World, WorldEvent};

pub fn crate_info() -> &'static str {
    "rockyard-kernel v0.1.0"
}
