use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Narrowest field of view reachable by zooming, in degrees.
pub const MIN_FOV_DEGREES: f32 = 1.0;
/// Widest field of view, also the starting one.
pub const MAX_FOV_DEGREES: f32 = 45.0;

/// Decay rate that matches a per-frame factor of 0.15 at 60 Hz.
pub const DEFAULT_DECAY_RATE: f32 = 9.751_13;

/// How fast the camera closes the gap to its desired position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Fixed fraction of the gap per tick, regardless of elapsed time.
    PerFrame(f32),
    /// Exponential decay rate per second: `1 - exp(-rate * dt)` per tick.
    DecayRate(f32),
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::DecayRate(DEFAULT_DECAY_RATE)
    }
}

impl Smoothing {
    /// Interpolation factor in `[0, 1]` for a tick of `dt` seconds.
    pub fn factor(self, dt: f32) -> f32 {
        let alpha = match self {
            Self::PerFrame(f) => f,
            Self::DecayRate(rate) => 1.0 - (-rate * dt.max(0.0)).exp(),
        };
        alpha.clamp(0.0, 1.0)
    }

    pub fn is_valid(self) -> bool {
        match self {
            Self::PerFrame(f) => (0.0..=1.0).contains(&f),
            Self::DecayRate(rate) => rate.is_finite() && rate >= 0.0,
        }
    }
}

/// Placement of the follow camera relative to the tracked actor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraRig {
    pub back_distance: f32,
    pub height: f32,
    pub smoothing: Smoothing,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            back_distance: 4.5,
            height: 2.2,
            smoothing: Smoothing::default(),
        }
    }
}

/// Camera position and orthonormal basis. Owned by the world and mutated
/// once per tick by [`update_camera`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub fov_degrees: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 3.0, 6.0), MAX_FOV_DEGREES)
    }
}

impl CameraState {
    /// Camera at `position` looking down -Z.
    pub fn new(position: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            fov_degrees: fov_degrees.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES),
        }
    }

    /// Narrow the field of view by `scroll` degrees, within the zoom range.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll.is_finite() {
            self.fov_degrees = (self.fov_degrees - scroll).clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
        }
    }

    /// Point the camera at `target` and rebuild the basis against world up.
    ///
    /// The basis degenerates when the target is straight above or below; the
    /// previous right vector is kept in that case.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(forward) = (target - self.position).try_normalize() {
            self.forward = forward;
        }
        if let Some(right) = self.forward.cross(Vec3::Y).try_normalize() {
            self.right = right;
        }
        self.up = self.right.cross(self.forward).try_normalize().unwrap_or(Vec3::Y);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
    }
}

/// Unit vector pointing behind an actor with the given facing.
///
/// Facing 0 moves along -Z, so behind is +Z.
pub fn behind(facing_degrees: f32) -> Vec3 {
    let (sin, cos) = facing_degrees.to_radians().sin_cos();
    Vec3::new(-sin, 0.0, cos)
}

/// Where the camera wants to be for a target at `target` facing `facing_degrees`.
pub fn desired_position(target: Vec3, facing_degrees: f32, rig: &CameraRig) -> Vec3 {
    target + behind(facing_degrees) * rig.back_distance + Vec3::Y * rig.height
}

/// Move the camera part of the way toward its desired spot behind the
/// target, then aim it at the target.
///
/// The camera always looks at the target itself, not along the "behind"
/// vector, so the target stays centered while the position lags.
pub fn update_camera(
    camera: &CameraState,
    target: Vec3,
    facing_degrees: f32,
    rig: &CameraRig,
    dt: f32,
) -> CameraState {
    let desired = desired_position(target, facing_degrees, rig);
    let mut next = *camera;
    next.position = camera.position.lerp(desired, rig.smoothing.factor(dt));
    next.look_at(target);
    next
}
