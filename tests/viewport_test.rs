use cgmath::Point3;
use gloam::{
    camera::{MAX_PIXEL_RATIO, OrbitController, ViewportController, ViewportState},
    data_structures::{
        scene_graph::{NodeKind, SceneGraph},
        transform::Transform,
    },
};
use instant::Duration;

fn viewport(width: u32, height: u32, pixel_ratio: f32) -> (SceneGraph, ViewportController) {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let camera = scene
        .insert(root, "camera", NodeKind::Camera, Transform::at(4.0, 2.0, 5.0))
        .unwrap();
    let controller = ViewportController::new(
        camera,
        Point3::new(4.0, 2.0, 5.0),
        Point3::new(0.0, 0.0, 0.0),
        width,
        height,
        pixel_ratio,
    );
    (scene, controller)
}

#[test]
fn should_update_aspect_ratio_on_resize() {
    let (_, mut viewport) = viewport(800, 600, 1.0);
    assert!((viewport.projection.aspect() - 800.0 / 600.0).abs() < 1e-6);

    viewport.on_resize(1600, 1200);
    assert_eq!(viewport.state.width, 1600);
    assert_eq!(viewport.state.height, 1200);
    assert!((viewport.projection.aspect() - 1600.0 / 1200.0).abs() < 1e-6);
}

#[test]
fn should_ignore_zero_sized_resizes() {
    let (_, mut viewport) = viewport(800, 600, 1.0);
    viewport.on_resize(0, 600);
    viewport.on_resize(800, 0);
    assert_eq!(viewport.state.width, 800);
    assert_eq!(viewport.state.height, 600);
}

#[test]
fn should_be_idempotent_for_repeated_resizes() {
    let (_, mut viewport) = viewport(800, 600, 1.0);
    viewport.on_resize(1024, 768);
    let state_after_first = viewport.state;
    let aspect_after_first = viewport.projection.aspect();

    viewport.on_resize(1024, 768);
    assert_eq!(viewport.state, state_after_first);
    assert_eq!(viewport.projection.aspect(), aspect_after_first);
}

#[test]
fn should_clamp_applied_pixel_ratio() {
    let state = ViewportState::new(800, 600, 3.0);
    assert_eq!(state.applied_pixel_ratio(), MAX_PIXEL_RATIO);
    assert_eq!(state.physical_size(), (1600, 1200));

    let state = ViewportState::new(800, 600, 1.5);
    assert_eq!(state.applied_pixel_ratio(), 1.5);
    assert_eq!(state.physical_size(), (1200, 900));
}

#[test]
fn should_ease_orbit_toward_goal() {
    let mut orbit = OrbitController::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    let (start_yaw, start_pitch, _) = orbit.current();

    orbit.handle_mouse(200.0, -100.0);
    let (goal_yaw, goal_pitch, _) = orbit.goal();
    assert_ne!(goal_yaw, start_yaw);
    assert_ne!(goal_pitch, start_pitch);

    // one step moves toward the goal without reaching it
    orbit.update(Duration::from_millis(16));
    let (yaw, pitch, _) = orbit.current();
    assert!((yaw - goal_yaw).abs() < (start_yaw - goal_yaw).abs());
    assert!((pitch - goal_pitch).abs() < (start_pitch - goal_pitch).abs());
    assert!((yaw - goal_yaw).abs() > 1e-6);

    // enough steps converge
    for _ in 0..1000 {
        orbit.update(Duration::from_millis(16));
    }
    let (yaw, pitch, _) = orbit.current();
    assert!((yaw - goal_yaw).abs() < 1e-3);
    assert!((pitch - goal_pitch).abs() < 1e-3);
}

#[test]
fn should_clamp_pitch_short_of_the_poles() {
    let mut orbit = OrbitController::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    orbit.handle_mouse(0.0, 1e6);
    let (_, goal_pitch, _) = orbit.goal();
    assert!(goal_pitch < std::f32::consts::FRAC_PI_2);

    orbit.handle_mouse(0.0, -2e6);
    let (_, goal_pitch, _) = orbit.goal();
    assert!(goal_pitch > -std::f32::consts::FRAC_PI_2);
}

#[test]
fn should_clamp_zoom_distance() {
    let mut orbit = OrbitController::new(Point3::new(0.0, 0.0, 5.0), Point3::new(0.0, 0.0, 0.0));
    orbit.handle_scroll(1e6);
    let (_, _, goal) = orbit.goal();
    assert_eq!(goal, orbit.min_distance);

    orbit.handle_scroll(-1e7);
    let (_, _, goal) = orbit.goal();
    assert_eq!(goal, orbit.max_distance);
}

#[test]
fn should_write_camera_node_transform_on_update() {
    let (mut scene, mut viewport) = viewport(800, 600, 1.0);
    let camera = viewport.camera_node();
    let before = scene.node(camera).local.clone();

    viewport.controller.handle_mouse(300.0, 0.0);
    for _ in 0..100 {
        viewport.update(&mut scene, Duration::from_millis(16));
    }
    let after = scene.node(camera).local.clone();
    assert_ne!(before.position, after.position);

    // the node follows the orbit eye
    let eye = viewport.view_position();
    assert!((after.position.x - eye.x).abs() < 1e-5);
    assert!((after.position.y - eye.y).abs() < 1e-5);
    assert!((after.position.z - eye.z).abs() < 1e-5);
}
