use gloam::{
    data_structures::{
        light::Light,
        scene_graph::{NodeKind, SceneGraph},
        transform::Transform,
    },
    inspector::InspectorPanel,
};

fn scene_with_light() -> (SceneGraph, gloam::data_structures::scene_graph::NodeId) {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let light = scene
        .insert(
            root,
            "ambient",
            NodeKind::Light(Light::ambient([1.0, 1.0, 1.0], 0.5)),
            Transform::identity(),
        )
        .unwrap();
    (scene, light)
}

fn intensity(scene: &SceneGraph, id: gloam::data_structures::scene_graph::NodeId) -> f32 {
    match scene.node(id).kind() {
        NodeKind::Light(light) => light.intensity,
        other => panic!("not a light: {other:?}"),
    }
}

#[test]
fn should_apply_bound_slider_values() {
    let (mut scene, light) = scene_with_light();
    let mut panel = InspectorPanel::new();
    panel.bind_light_intensity("ambient intensity", light);

    assert!(panel.set(&mut scene, "ambient intensity", 0.12));
    assert!((intensity(&scene, light) - 0.12).abs() < 1e-6);
}

#[test]
fn should_clamp_values_to_the_slider_range() {
    let (mut scene, light) = scene_with_light();
    let mut panel = InspectorPanel::new();
    panel.bind_light_intensity("ambient intensity", light);

    panel.set(&mut scene, "ambient intensity", 5.0);
    assert_eq!(intensity(&scene, light), 1.0);

    panel.set(&mut scene, "ambient intensity", -1.0);
    assert_eq!(intensity(&scene, light), 0.0);
}

#[test]
fn should_snap_values_to_the_step() {
    let (mut scene, light) = scene_with_light();
    let mut panel = InspectorPanel::new();
    panel.bind_light_intensity("ambient intensity", light);

    panel.set(&mut scene, "ambient intensity", 0.12345);
    // step is 0.001
    assert!((intensity(&scene, light) - 0.123).abs() < 1e-5);
}

#[test]
fn should_reject_unknown_property_names() {
    let (mut scene, light) = scene_with_light();
    let mut panel = InspectorPanel::new();
    panel.bind_light_intensity("ambient intensity", light);

    assert!(!panel.set(&mut scene, "fog density", 0.5));
    assert_eq!(intensity(&scene, light), 0.5);
}

#[test]
fn should_list_properties_in_registration_order() {
    let (_, light) = scene_with_light();
    let mut panel = InspectorPanel::new();
    panel.bind_light_intensity("ambient intensity", light);
    panel.add_slider("custom", 0.0, 10.0, 0.5, |_, _| {});

    let names: Vec<_> = panel.properties().collect();
    assert_eq!(names, vec!["ambient intensity", "custom"]);
}
