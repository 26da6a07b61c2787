//! Frame composition and the continuous render loop.
//!
//! Once per display refresh the loop advances the damped camera, flattens
//! the scene graph into a [`Frame`] and hands it to a [`Rasterizer`]. The
//! loop is a two-state machine: `Idle` before the first iteration, then
//! `Running` until the window closes. The opt-in frame limit exists for
//! tests and smoke runs.

use cgmath::EuclideanSpace;
use instant::{Duration, Instant};

use crate::{
    camera::ViewportController,
    data_structures::{
        light::Light,
        scene_graph::{GeometryId, MaterialId, NodeId, NodeKind, SceneGraph},
        transform::Transform,
    },
};

/// One mesh node as flattened by traversal: world transform plus resource
/// handles.
#[derive(Debug, Clone)]
pub struct Draw {
    pub node: NodeId,
    pub world: Transform,
    pub geometry: GeometryId,
    pub material: MaterialId,
}

/// A light paired with its world transform.
#[derive(Debug, Clone)]
pub struct PlacedLight {
    pub node: NodeId,
    pub world: Transform,
    pub light: Light,
}

/// Everything the rasterizer needs for one frame, in traversal order.
#[derive(Debug)]
pub struct Frame {
    pub draws: Vec<Draw>,
    pub lights: Vec<PlacedLight>,
    pub view: cgmath::Matrix4<f32>,
    pub proj: cgmath::Matrix4<f32>,
    pub view_position: [f32; 3],
    /// Time since the loop entered `Running`; zero on the first frame.
    pub elapsed: Duration,
}

impl Frame {
    /// Flatten the scene via [`SceneGraph::traverse`] and snapshot the camera.
    pub fn compose(
        scene: &SceneGraph,
        viewport: &mut ViewportController,
        elapsed: Duration,
    ) -> Self {
        let mut draws = Vec::new();
        let mut lights = Vec::new();
        for (id, world) in scene.traverse() {
            match scene.node(id).kind() {
                NodeKind::Mesh { geometry, material } => draws.push(Draw {
                    node: id,
                    world,
                    geometry: *geometry,
                    material: *material,
                }),
                NodeKind::Light(light) => lights.push(PlacedLight {
                    node: id,
                    world,
                    light: *light,
                }),
                NodeKind::Group | NodeKind::Camera => {}
            }
        }
        Self {
            draws,
            lights,
            view: viewport.view_matrix(),
            proj: viewport.projection.matrix(),
            view_position: viewport.view_position().to_vec().into(),
            elapsed,
        }
    }
}

/// The renderable-surface collaborator: something that can resize its output
/// target and turn a frame into pixels.
///
/// The production implementation is [`crate::renderer::Renderer`]; tests
/// substitute a recording stub.
pub trait Rasterizer {
    /// Resize the output target to `width` x `height` logical pixels at the
    /// given (already clamped) pixel ratio.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Rasterize one frame. The scene is passed alongside so implementations
    /// can resolve geometry and material handles.
    fn render(&mut self, scene: &SceneGraph, frame: &Frame) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// What the caller should do after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule the next iteration at the display-refresh cadence.
    Continue,
    /// The frame limit was reached.
    Stop,
}

/// Drives the update-render cycle.
///
/// Iterations never overlap: `advance` is synchronous and the cooperative
/// yield between iterations (requesting the next redraw) belongs to the
/// caller.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    epoch: Option<Instant>,
    last_frame: Option<Instant>,
    frames: u64,
    frame_limit: Option<u64>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            epoch: None,
            last_frame: None,
            frames: 0,
            frame_limit: None,
        }
    }

    /// A loop that reports [`LoopControl::Stop`] after `limit` frames.
    pub fn with_frame_limit(limit: u64) -> Self {
        Self {
            frame_limit: Some(limit),
            ..Self::new()
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one iteration: read the clock, advance the camera, compose and
    /// submit the frame.
    ///
    /// The first call transitions `Idle -> Running` and pins the loop epoch,
    /// so elapsed time starts at zero.
    pub fn advance<R: Rasterizer>(
        &mut self,
        scene: &mut SceneGraph,
        viewport: &mut ViewportController,
        rasterizer: &mut R,
    ) -> anyhow::Result<LoopControl> {
        let now = Instant::now();
        let (elapsed, dt) = match self.state {
            LoopState::Idle => {
                self.state = LoopState::Running;
                self.epoch = Some(now);
                (Duration::from_secs(0), Duration::from_secs(0))
            }
            LoopState::Running => {
                let epoch = self.epoch.expect("running loop always has an epoch");
                let last = self.last_frame.unwrap_or(epoch);
                (now - epoch, now - last)
            }
        };
        self.last_frame = Some(now);

        viewport.update(scene, dt);
        let frame = Frame::compose(scene, viewport, elapsed);
        rasterizer.render(scene, &frame)?;

        self.frames += 1;
        match self.frame_limit {
            Some(limit) if self.frames >= limit => Ok(LoopControl::Stop),
            _ => Ok(LoopControl::Continue),
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
