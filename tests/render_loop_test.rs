use cgmath::Point3;
use gloam::{
    camera::ViewportController,
    data_structures::{
        geometry::Geometry,
        light::Light,
        material::Material,
        scene_graph::{NodeKind, SceneGraph},
        transform::Transform,
    },
    render::{LoopControl, LoopState, RenderLoop},
};

use crate::common::test_utils::RecordingRasterizer;

mod common;

fn fixture() -> (SceneGraph, ViewportController) {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
    let material = scene.add_material(Material::solid("box", [0.5, 0.5, 0.5]));
    scene
        .insert(
            root,
            "box",
            NodeKind::Mesh { geometry, material },
            Transform::identity(),
        )
        .unwrap();
    scene
        .insert(
            root,
            "light",
            NodeKind::Light(Light::ambient([1.0, 1.0, 1.0], 0.5)),
            Transform::identity(),
        )
        .unwrap();
    let camera = scene
        .insert(root, "camera", NodeKind::Camera, Transform::at(4.0, 2.0, 5.0))
        .unwrap();
    let viewport = ViewportController::new(
        camera,
        Point3::new(4.0, 2.0, 5.0),
        Point3::new(0.0, 0.0, 0.0),
        800,
        600,
        1.0,
    );
    (scene, viewport)
}

#[test]
fn should_transition_idle_to_running_on_first_advance() {
    let (mut scene, mut viewport) = fixture();
    let mut rasterizer = RecordingRasterizer::new();
    let mut render_loop = RenderLoop::new();

    assert_eq!(render_loop.state(), LoopState::Idle);
    assert_eq!(render_loop.frames(), 0);

    let control = render_loop
        .advance(&mut scene, &mut viewport, &mut rasterizer)
        .unwrap();
    assert_eq!(control, LoopControl::Continue);
    assert_eq!(render_loop.state(), LoopState::Running);
    assert_eq!(render_loop.frames(), 1);
}

#[test]
fn should_report_zero_elapsed_on_first_frame() {
    let (mut scene, mut viewport) = fixture();
    let mut rasterizer = RecordingRasterizer::new();
    let mut render_loop = RenderLoop::new();

    render_loop
        .advance(&mut scene, &mut viewport, &mut rasterizer)
        .unwrap();
    assert_eq!(rasterizer.frames[0].elapsed_secs, 0.0);

    render_loop
        .advance(&mut scene, &mut viewport, &mut rasterizer)
        .unwrap();
    assert!(rasterizer.frames[1].elapsed_secs >= rasterizer.frames[0].elapsed_secs);
}

#[test]
fn should_flatten_meshes_and_lights_into_the_frame() {
    let (mut scene, mut viewport) = fixture();
    let mut rasterizer = RecordingRasterizer::new();
    let mut render_loop = RenderLoop::new();

    render_loop
        .advance(&mut scene, &mut viewport, &mut rasterizer)
        .unwrap();

    let record = &rasterizer.frames[0];
    assert_eq!(record.draws, 1);
    assert_eq!(record.lights, 1);
}

#[test]
fn should_stop_at_the_frame_limit() {
    let (mut scene, mut viewport) = fixture();
    let mut rasterizer = RecordingRasterizer::new();
    let mut render_loop = RenderLoop::with_frame_limit(3);

    for expected in [LoopControl::Continue, LoopControl::Continue, LoopControl::Stop] {
        let control = render_loop
            .advance(&mut scene, &mut viewport, &mut rasterizer)
            .unwrap();
        assert_eq!(control, expected);
    }
    assert_eq!(render_loop.frames(), 3);
    assert_eq!(rasterizer.frames.len(), 3);
}

#[test]
fn should_render_every_iteration_without_skipping() {
    let (mut scene, mut viewport) = fixture();
    let mut rasterizer = RecordingRasterizer::new();
    let mut render_loop = RenderLoop::new();

    for _ in 0..10 {
        render_loop
            .advance(&mut scene, &mut viewport, &mut rasterizer)
            .unwrap();
    }
    assert_eq!(rasterizer.frames.len(), 10);

    // elapsed time is monotonic across iterations
    for pair in rasterizer.frames.windows(2) {
        assert!(pair[1].elapsed_secs >= pair[0].elapsed_secs);
    }
}
