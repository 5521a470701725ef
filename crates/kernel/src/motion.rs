use glam::{Vec2, Vec3};
use rockyard_input::InputState;

/// Planar direction from the directional signals, not normalized.
///
/// Forward is -Z and right is +X. Opposite signals cancel.
pub fn move_direction(input: &InputState) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if input.forward {
        dir.y -= 1.0;
    }
    if input.back {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    dir
}

/// Yaw in degrees for a planar direction. Moving forward (-Z) is 0 and
/// moving right (+X) is 90.
pub fn facing_degrees(direction: Vec2) -> f32 {
    direction.x.atan2(-direction.y).to_degrees()
}

/// Advance an actor from its input for one tick.
///
/// Returns the new position and facing. With no net input both are returned
/// unchanged: motion stops instantly. Height is never touched.
pub fn update_movement(
    input: &InputState,
    dt: f32,
    speed: f32,
    position: Vec3,
    facing: f32,
) -> (Vec3, f32) {
    let Some(dir) = move_direction(input).try_normalize() else {
        return (position, facing);
    };
    let step = dir * speed * dt;
    (
        position + Vec3::new(step.x, 0.0, step.y),
        facing_degrees(dir),
    )
}
