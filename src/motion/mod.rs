//! Audio-reactive motion: smoothed energy + tempo → per-object poses.
//!
//! Every animated object lives in one array of [`SceneObject`] records owned by
//! the [`MotionDriver`] and addressed by [`ObjectId`]. Renderers read the
//! array after each frame; nothing here holds references into the renderer.

mod driver;
mod helix;
mod orb;
mod particles;
mod satellites;

// Re-export public types
pub use driver::MotionDriver;
pub use helix::{band_for_position, Helix, HELIX_BAND_TABLE};
pub use orb::{lerp_palette, Orb, OrbState};
pub use particles::ParticleField;
pub use satellites::Satellites;

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

/// Per-object shading inputs
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Scene time (seconds)
    pub time: f32,
    /// Band energy driving this object (0..1)
    pub intensity: f32,
}

/// World-space transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub scale: f32,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            rotation: Quat::IDENTITY,
        }
    }
}

/// What an object is, for renderers that style classes differently
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    HelixNode { strand: u8, index: usize },
    Satellite { index: usize },
}

/// Index into the driver's object array
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

impl ObjectId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One animated object's per-frame state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub kind: ObjectKind,
    pub pose: Pose,
    pub uniforms: ObjectUniforms,
}

impl SceneObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            pose: Pose::default(),
            uniforms: ObjectUniforms::default(),
        }
    }
}

/// Line between the two helix strands
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Connector {
    pub start: Vec3,
    pub end: Vec3,
    pub opacity: f32,
}

/// Formula: base * (1 + energy * gain)
pub fn modulate(base: f32, energy: f32, gain: f32) -> f32 {
    base * (1.0 + energy * gain)
}
