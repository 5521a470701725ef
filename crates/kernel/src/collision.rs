//! Positional collision response on the XZ plane.
//!
//! Two strategies, both purely positional:
//! - static obstacles push the body out along the shallower axis;
//! - the enemy shoves the body radially by a fixed distance.
//!
//! Each function moves the world position and the cached box together.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb2d;

/// Extra separation added to a push-out so the corrected boxes no longer
/// satisfy the inclusive intersection test.
pub const CONTACT_SKIN: f32 = 1e-4;

/// Knockback direction used when both centers coincide.
pub const KNOCKBACK_FALLBACK: Vec2 = Vec2::X;

/// Horizontal axis a correction was applied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

/// Outcome of a push-out against a static box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub axis: Axis,
    /// Penetration depth on `axis` before the correction.
    pub depth: f32,
    /// Offset applied to the body on the XZ plane.
    pub displacement: Vec2,
}

/// Push `body` out of `obstacle` along the axis of least penetration.
///
/// Equal depths resolve along X. A zero center delta on the chosen axis
/// pushes toward the positive side. Returns `None` and leaves everything
/// untouched when the boxes do not actually overlap.
pub fn resolve_static(
    obstacle: &Aabb2d,
    body: &mut Aabb2d,
    position: &mut Vec3,
) -> Option<Resolution> {
    let depth = body.penetration(obstacle);
    if depth.x < 0.0 || depth.y < 0.0 {
        return None;
    }
    let delta = body.center - obstacle.center;
    let (axis, depth, displacement) = if depth.x <= depth.y {
        let push = away(delta.x) * (depth.x + CONTACT_SKIN);
        (Axis::X, depth.x, Vec2::new(push, 0.0))
    } else {
        let push = away(delta.y) * (depth.y + CONTACT_SKIN);
        (Axis::Z, depth.y, Vec2::new(0.0, push))
    };
    shift(body, position, displacement);
    Some(Resolution {
        axis,
        depth,
        displacement,
    })
}

/// Unit vector pointing from `from` toward `to`, or the fallback axis when
/// the points coincide.
pub fn knockback_direction(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(KNOCKBACK_FALLBACK)
}

/// Shove `body` directly away from `source` by `distance`. Returns the
/// direction used.
pub fn apply_knockback(
    source: &Aabb2d,
    body: &mut Aabb2d,
    position: &mut Vec3,
    distance: f32,
) -> Vec2 {
    let direction = knockback_direction(source.center, body.center);
    shift(body, position, direction * distance);
    direction
}

fn away(delta: f32) -> f32 {
    if delta < 0.0 { -1.0 } else { 1.0 }
}

fn shift(body: &mut Aabb2d, position: &mut Vec3, offset: Vec2) {
    position.x += offset.x;
    position.z += offset.y;
    body.sync_to(*position);
}
