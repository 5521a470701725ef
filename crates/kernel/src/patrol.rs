use serde::{Deserialize, Serialize};

/// Travel direction along the patrol axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatrolDirection {
    Positive,
    Negative,
}

impl PatrolDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// Fixed back-and-forth route along world X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolRoute {
    pub center_x: f32,
    pub amplitude: f32,
    /// Units per second.
    pub speed: f32,
}

impl PatrolRoute {
    pub fn advance(&self, x: f32, direction: PatrolDirection, dt: f32) -> (f32, PatrolDirection) {
        update_patrol(x, direction, dt, self.amplitude, self.speed, self.center_x)
    }
}

/// Move along the patrol axis and pick the direction for the next tick.
///
/// Bounds are strict: reaching `center_x + amplitude` exactly does not turn
/// around, passing it does. Both bounds are checked every call and set the
/// direction outright, so an entity that starts outside the range heads back
/// in.
pub fn update_patrol(
    x: f32,
    direction: PatrolDirection,
    dt: f32,
    amplitude: f32,
    speed: f32,
    center_x: f32,
) -> (f32, PatrolDirection) {
    let x = x + direction.sign() * speed * dt;
    let mut direction = direction;
    if x > center_x + amplitude {
        direction = PatrolDirection::Negative;
    }
    if x < center_x - amplitude {
        direction = PatrolDirection::Positive;
    }
    (x, direction)
}
