use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// What a draw command depicts. The renderer picks meshes and materials from
/// this; it never needs to know any game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Ground,
    Obstacle,
    Item,
    Enemy,
    Player,
}

impl EntityKind {
    /// Mesh used to draw this kind. Ground and obstacles share the rock mesh.
    pub fn mesh(self) -> MeshHandle {
        match self {
            Self::Ground | Self::Obstacle => MeshHandle::ROCK,
            Self::Item => MeshHandle::ITEM,
            Self::Enemy => MeshHandle::ENEMY,
            Self::Player => MeshHandle::PLAYER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ground => "ground",
            Self::Obstacle => "obstacle",
            Self::Item => "item",
            Self::Enemy => "enemy",
            Self::Player => "player",
        }
    }
}

/// A handle referencing a mesh owned by the render back end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    pub const ROCK: Self = Self(0);
    pub const ITEM: Self = Self(1);
    pub const ENEMY: Self = Self(2);
    pub const PLAYER: Self = Self(3);
}

/// World-space placement of one drawable: translation, yaw about +Y, scale.
///
/// Scale is per-axis so the ground slab can stretch the rock mesh; every
/// other entity uses a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawTransform {
    pub translation: Vec3,
    /// Yaw in degrees.
    pub yaw_degrees: f32,
    pub scale: Vec3,
}

impl Default for DrawTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            yaw_degrees: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl DrawTransform {
    pub fn new(translation: Vec3, yaw_degrees: f32, scale: f32) -> Self {
        Self {
            translation,
            yaw_degrees,
            scale: Vec3::splat(scale),
        }
    }

    /// Model matrix in translate * rotate * scale order.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_rotation_y(self.yaw_degrees.to_radians()),
            self.translation,
        )
    }
}

/// One entry of the per-frame draw stream handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub kind: EntityKind,
    pub mesh: MeshHandle,
    pub transform: DrawTransform,
}

impl DrawCommand {
    /// Command drawing `kind` with its default mesh.
    pub fn new(kind: EntityKind, transform: DrawTransform) -> Self {
        Self {
            kind,
            mesh: kind.mesh(),
            transform,
        }
    }
}
