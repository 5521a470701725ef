//! Rendering Adapter: the contract between the simulation and a draw back end.
//!
//! # Invariants
//! - Renderer cannot mutate world truth; it only consumes `Frame`s.
//! - View and projection are set once per frame, before any draw.
//! - Draws arrive in draw-list order: ground, obstacles, item, enemy, player.
//!
//! `DebugTextRenderer` is a text back end for headless runs and tests. A GPU
//! back end implements the same trait without changing consumers.

mod renderer;

pub use renderer::{DebugTextRenderer, Projection, RenderBackend, RenderView, present};

pub fn crate_info() -> &'static str {
    "rockyard-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
