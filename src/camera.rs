//! Camera projection, the damped orbit rig, and viewport state.
//!
//! The [`ViewportController`] owns everything between user input and the
//! camera node: perspective projection parameters (kept consistent with the
//! output surface size), the orbit controller with exponential damping, and
//! the [`ViewportState`] with its pixel-ratio guard.

use cgmath::{EuclideanSpace, InnerSpace, Rad};
use instant::Duration;

use crate::data_structures::{
    scene_graph::{NodeId, SceneGraph},
    transform::Transform,
};

/// Pixel densities above this are clamped; very-high-density displays would
/// otherwise quadruple the render-target memory for no visible gain.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection parameters for the camera node.
///
/// The matrix is cached and recomputed lazily; `resize` only marks it dirty.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
    matrix: cgmath::Matrix4<f32>,
    dirty: bool,
}

impl Projection {
    pub fn new(width: u32, height: u32, fovy: cgmath::Deg<f32>, znear: f32, zfar: f32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let fovy: Rad<f32> = fovy.into();
        Self {
            aspect,
            fovy,
            znear,
            zfar,
            matrix: OPENGL_TO_WGPU_MATRIX * cgmath::perspective(fovy, aspect, znear, zfar),
            dirty: false,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.dirty = true;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn matrix(&mut self) -> cgmath::Matrix4<f32> {
        if self.dirty {
            self.matrix =
                OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar);
            self.dirty = false;
        }
        self.matrix
    }
}

/// Current output surface size and pixel density.
///
/// Mutated only by the resize handler; read by the projection update and the
/// rasterizer's target sizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pixel_ratio: f32,
}

impl ViewportState {
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio,
        }
    }

    /// The density actually applied to the render target: `min(d, 2.0)`.
    pub fn applied_pixel_ratio(&self) -> f32 {
        self.pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Render-target size in physical pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.applied_pixel_ratio();
        (
            (self.width as f32 * ratio) as u32,
            (self.height as f32 * ratio) as u32,
        )
    }
}

/// Orbit input with exponential damping.
///
/// Mouse input moves the *goal* spherical coordinates; `update` eases the
/// current coordinates toward them with a `1 - exp(-damping * dt)` factor so
/// the camera decelerates smoothly instead of stopping dead.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pub target: cgmath::Point3<f32>,
    yaw: f32,
    pitch: f32,
    distance: f32,
    goal_yaw: f32,
    goal_pitch: f32,
    goal_distance: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitController {
    /// Orbit around `target`, starting with the camera at `eye`.
    pub fn new(eye: cgmath::Point3<f32>, target: cgmath::Point3<f32>) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(0.001);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        Self {
            target,
            yaw,
            pitch,
            distance,
            goal_yaw: yaw,
            goal_pitch: pitch,
            goal_distance: distance,
            damping: 10.0,
            rotate_speed: 0.005,
            zoom_speed: 0.25,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }

    /// Feed a mouse drag delta (pixels) into the orbit goal.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.goal_yaw -= dx as f32 * self.rotate_speed;
        // pitch short of the poles to avoid flipping over the top
        self.goal_pitch = (self.goal_pitch + dy as f32 * self.rotate_speed).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }

    /// Feed a scroll delta into the distance goal.
    pub fn handle_scroll(&mut self, delta: f32) {
        self.goal_distance =
            (self.goal_distance - delta * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    /// Advance the damped motion one step. Call exactly once per frame.
    pub fn update(&mut self, dt: Duration) {
        let factor = 1.0 - (-self.damping * dt.as_secs_f32()).exp();
        self.yaw += (self.goal_yaw - self.yaw) * factor;
        self.pitch += (self.goal_pitch - self.pitch) * factor;
        self.distance += (self.goal_distance - self.distance) * factor;
    }

    /// Current camera position in world space.
    pub fn eye(&self) -> cgmath::Point3<f32> {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target
            + cgmath::Vector3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// Yaw, pitch and distance currently being eased toward.
    pub fn goal(&self) -> (f32, f32, f32) {
        (self.goal_yaw, self.goal_pitch, self.goal_distance)
    }

    /// Current yaw, pitch and distance.
    pub fn current(&self) -> (f32, f32, f32) {
        (self.yaw, self.pitch, self.distance)
    }
}

/// Camera uniform as bound to the vertex and fragment stages.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::from_scale(1.0).into(),
        }
    }

    pub fn update(&mut self, view_position: cgmath::Point3<f32>, view_proj: cgmath::Matrix4<f32>) {
        self.view_position = view_position.to_homogeneous().into();
        self.view_proj = view_proj.into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the camera node's projection and orbit input, and keeps both
/// consistent with the output surface size.
#[derive(Debug)]
pub struct ViewportController {
    camera: NodeId,
    pub projection: Projection,
    pub controller: OrbitController,
    pub state: ViewportState,
}

impl ViewportController {
    /// Projection defaults: 75 degree field of view, near 0.1, far 100.
    pub fn new(
        camera: NodeId,
        eye: cgmath::Point3<f32>,
        target: cgmath::Point3<f32>,
        width: u32,
        height: u32,
        pixel_ratio: f32,
    ) -> Self {
        Self {
            camera,
            projection: Projection::new(width, height, cgmath::Deg(75.0), 0.1, 100.0),
            controller: OrbitController::new(eye, target),
            state: ViewportState::new(width, height, pixel_ratio),
        }
    }

    pub fn camera_node(&self) -> NodeId {
        self.camera
    }

    /// React to a surface-size change.
    ///
    /// Zero-sized updates are ignored (minimized windows report those).
    /// Idempotent: a repeated identical size leaves the state and the camera
    /// aspect ratio untouched.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("ignoring zero-sized resize to {width}x{height}");
            return;
        }
        self.state.width = width;
        self.state.height = height;
        self.projection.resize(width, height);
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.state.pixel_ratio = pixel_ratio;
    }

    /// Advance damped orbit motion and write the camera node's transform.
    /// Must be called exactly once per rendered frame, before submission.
    pub fn update(&mut self, scene: &mut SceneGraph, dt: Duration) {
        self.controller.update(dt);
        let eye = self.controller.eye();
        let forward = (self.controller.target - eye).normalize();
        let node = scene.node_mut(self.camera);
        node.local = Transform {
            position: eye.to_vec(),
            rotation: look_rotation(forward),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        };
    }

    pub fn view_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::look_at_rh(
            self.controller.eye(),
            self.controller.target,
            cgmath::Vector3::unit_y(),
        )
    }

    pub fn view_position(&self) -> cgmath::Point3<f32> {
        self.controller.eye()
    }

    /// Combined projection * view, with the projection lazily recomputed if a
    /// resize marked it dirty.
    pub fn view_proj(&mut self) -> cgmath::Matrix4<f32> {
        self.projection.matrix() * self.view_matrix()
    }
}

/// Rotation taking the default forward axis (-Z) onto `forward`.
fn look_rotation(forward: cgmath::Vector3<f32>) -> cgmath::Quaternion<f32> {
    cgmath::Quaternion::from_arc(
        -cgmath::Vector3::unit_z(),
        forward,
        Some(cgmath::Vector3::unit_y()),
    )
}
