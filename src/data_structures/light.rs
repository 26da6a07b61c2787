//! Light nodes and their packed GPU representation.

use crate::data_structures::transform::Transform;

pub const MAX_LIGHTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform illumination with no position or direction.
    Ambient,
    /// Parallel rays shining from the node's position toward the origin.
    Directional,
    /// Omnidirectional light fading out over `range`.
    Point { range: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Light {
    pub fn ambient(color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
        }
    }

    pub fn directional(color: [f32; 3], intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional,
            color,
            intensity,
        }
    }

    pub fn point(color: [f32; 3], intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point { range },
            color,
            intensity,
        }
    }
}

// Uniform fields are 16-byte aligned, hence the paddings below.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LightRaw {
    position: [f32; 3],
    range: f32,
    color: [f32; 3],
    intensity: f32,
    kind: u32,
    _padding: [u32; 3],
}

const KIND_AMBIENT: u32 = 0;
const KIND_DIRECTIONAL: u32 = 1;
const KIND_POINT: u32 = 2;

/// All scene lights packed into one fixed-size uniform.
///
/// Lights beyond [`MAX_LIGHTS`] are dropped; the haunted-house tableau uses
/// three.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    lights: [LightRaw; MAX_LIGHTS],
    count: u32,
    _padding: [u32; 3],
}

impl LightsUniform {
    pub fn new() -> Self {
        bytemuck::Zeroable::zeroed()
    }

    pub fn set(&mut self, placed: &[(Transform, Light)]) {
        if placed.len() > MAX_LIGHTS {
            log::warn!(
                "scene has {} lights but only {} fit in the uniform; extra lights are dropped",
                placed.len(),
                MAX_LIGHTS
            );
        }
        self.count = placed.len().min(MAX_LIGHTS) as u32;
        for (slot, (world, light)) in self.lights.iter_mut().zip(placed.iter()) {
            let (kind, range) = match light.kind {
                LightKind::Ambient => (KIND_AMBIENT, 0.0),
                LightKind::Directional => (KIND_DIRECTIONAL, 0.0),
                LightKind::Point { range } => (KIND_POINT, range),
            };
            *slot = LightRaw {
                position: world.position.into(),
                range,
                color: light.color,
                intensity: light.intensity,
                kind,
                _padding: [0; 3],
            };
        }
    }
}

impl Default for LightsUniform {
    fn default() -> Self {
        Self::new()
    }
}
