//! gloam
//!
//! A small retained-mode scene engine for native and WASM targets. Scenes are
//! trees of transform nodes carrying shared geometry and materials; a damped
//! orbit camera and a continuous render loop turn them into frames on a wgpu
//! surface. Ships two ready-made scenes, the larger one a fifty-grave
//! haunted-house tableau.
//!
//! High-level modules
//! - `app`: winit event loop and window plumbing
//! - `camera`: projection, the orbit rig and viewport state
//! - `context`: central GPU and window context owning device/queue/surface
//! - `data_structures`: scene graph, geometry, materials, lights, transforms
//! - `inspector`: optional debug-UI property bindings
//! - `pipelines`: opaque and transparent render pipelines with their layouts
//! - `render`: frame composition and the render loop
//! - `renderer`: the wgpu rasterizer
//! - `resources`: texture loading from disk or HTTP
//! - `scenes`: the shipped scene builders
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod inspector;
pub mod pipelines;
pub mod render;
pub mod renderer;
pub mod resources;
pub mod scenes;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
