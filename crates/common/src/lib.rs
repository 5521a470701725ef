//! Shared value types passed between the simulation kernel and the render adapter.

mod types;

pub use types::{DrawCommand, DrawTransform, EntityKind, MeshHandle};
