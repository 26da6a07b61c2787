//! Engine data structures: the scene graph and everything hanging off it.
//!
//! - `scene_graph` is the arena-backed node tree with shared resource tables
//! - `transform` holds local/world transforms and their GPU instance layout
//! - `geometry` builds immutable primitive shapes (cuboid, plane, cone, sphere)
//! - `material` describes surfaces and references textures by path
//! - `light` defines light kinds and the packed lights uniform
//! - `texture` wraps GPU textures and their samplers

pub mod geometry;
pub mod light;
pub mod material;
pub mod scene_graph;
pub mod texture;
pub mod transform;
