//! Materials: scalar surface parameters plus texture references.
//!
//! Materials are immutable after construction and shared by handle across
//! nodes. Texture fields hold fixed path strings; resolving them to GPU
//! samplers is the external loader's job (see [`crate::resources`]).

/// Convert a packed `0xRRGGBB` color to linear-ish float RGB.
pub fn hex_color(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Surface description for a mesh node.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    /// Scale applied to the displacement map, when one is present.
    pub displacement_scale: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
    /// How often the textures tile across the UV range.
    pub uv_repeat: [f32; 2],
    pub color_map: Option<String>,
    pub alpha_map: Option<String>,
    pub ao_map: Option<String>,
    pub displacement_map: Option<String>,
    pub normal_map: Option<String>,
    pub roughness_map: Option<String>,
    pub metalness_map: Option<String>,
}

impl Material {
    /// An untextured single-color material.
    pub fn solid(name: &str, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
            ..Default::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: [1.0, 1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            displacement_scale: 1.0,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
            uv_repeat: [1.0, 1.0],
            color_map: None,
            alpha_map: None,
            ao_map: None,
            displacement_map: None,
            normal_map: None,
            roughness_map: None,
            metalness_map: None,
        }
    }
}

/// Scalar material parameters as bound to the fragment shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialParams {
    color: [f32; 3],
    roughness: f32,
    uv_repeat: [f32; 2],
    metalness: f32,
    opacity: f32,
}

impl MaterialParams {
    pub fn new(material: &Material) -> Self {
        Self {
            color: material.color,
            roughness: material.roughness,
            uv_repeat: material.uv_repeat,
            metalness: material.metalness,
            opacity: material.opacity,
        }
    }
}
