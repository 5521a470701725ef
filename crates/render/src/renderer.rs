use std::fmt::Write as _;

use glam::{Mat4, Vec3};
use rockyard_common::DrawCommand;
use rockyard_kernel::{CameraState, Frame};

/// Perspective parameters that do not change frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 1280.0 / 720.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Camera-derived matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    pub view: Mat4,
    pub projection: Mat4,
}

impl RenderView {
    pub fn from_camera(camera: &CameraState, projection: &Projection) -> Self {
        Self {
            eye: camera.position,
            fov_degrees: camera.fov_degrees,
            view: camera.view_matrix(),
            projection: Mat4::perspective_rh(
                camera.fov_degrees.to_radians(),
                projection.aspect,
                projection.near,
                projection.far,
            ),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// What a draw back end must provide. Implementations never see the world.
pub trait RenderBackend {
    /// Set view and projection for the frame about to be drawn.
    fn set_view(&mut self, view: &RenderView);

    /// Draw one mesh with the given model matrix.
    fn draw(&mut self, command: &DrawCommand, model: &Mat4);
}

/// Hand one frame to a back end: view first, then every draw in order.
pub fn present<B: RenderBackend + ?Sized>(
    frame: &Frame,
    projection: &Projection,
    backend: &mut B,
) {
    let view = RenderView::from_camera(&frame.camera, projection);
    backend.set_view(&view);
    for command in &frame.draws {
        backend.draw(command, &command.transform.to_matrix());
    }
    tracing::trace!(tick = frame.tick, draws = frame.draws.len(), "frame presented");
}

/// Text back end: writes a human-readable line per call.
///
/// Useful for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    out: String,
    frames: u64,
    draws: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text produced since the last `take_output`.
    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.out)
    }

    /// Frames started so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RenderBackend for DebugTextRenderer {
    fn set_view(&mut self, view: &RenderView) {
        self.frames += 1;
        let _ = writeln!(
            self.out,
            "=== Frame {} ===\nCamera: eye=({:.2}, {:.2}, {:.2}) fov={:.0}",
            self.frames, view.eye.x, view.eye.y, view.eye.z, view.fov_degrees
        );
    }

    fn draw(&mut self, command: &DrawCommand, _model: &Mat4) {
        self.draws += 1;
        let t = &command.transform;
        let _ = writeln!(
            self.out,
            "  {:<8} mesh={} pos=({:.2}, {:.2}, {:.2}) yaw={:.1} scale=({:.3}, {:.3}, {:.3})",
            command.kind.label(),
            command.mesh.0,
            t.translation.x,
            t.translation.y,
            t.translation.z,
            t.yaw_degrees,
            t.scale.x,
            t.scale.y,
            t.scale.z
        );
    }
}
