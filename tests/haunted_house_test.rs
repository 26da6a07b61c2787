use gloam::{
    data_structures::{
        light::LightKind,
        scene_graph::{NodeKind, SceneGraph},
    },
    scenes::{self, GRAVE_COUNT, GRAVE_RADIUS_MIN, GRAVE_RADIUS_SPAN},
};

use crate::common::test_utils::seeded_rng;

mod common;

fn grave_nodes(scene: &SceneGraph) -> Vec<gloam::data_structures::scene_graph::NodeId> {
    scene
        .traverse()
        .map(|(id, _)| id)
        .filter(|&id| scene.node(id).name.starts_with("grave-"))
        .collect()
}

#[test]
fn should_scatter_fifty_graves_on_the_annulus() {
    let (scene, _) = scenes::haunted_house_with(&mut seeded_rng(42)).unwrap();
    let graves = grave_nodes(&scene);
    assert_eq!(graves.len(), GRAVE_COUNT);

    for id in graves {
        let world = scene.world_transform(id);
        let radius = (world.position.x.powi(2) + world.position.z.powi(2)).sqrt();
        assert!(
            radius >= GRAVE_RADIUS_MIN - 1e-4,
            "grave {:?} at radius {radius} is inside the house clearing",
            scene.node(id).name
        );
        assert!(
            radius <= GRAVE_RADIUS_MIN + GRAVE_RADIUS_SPAN + 1e-4,
            "grave {:?} at radius {radius} is outside the annulus",
            scene.node(id).name
        );
        // half-buried in the ground
        assert!((world.position.y - 0.3).abs() < 1e-5);
    }
}

#[test]
fn should_place_graves_differently_for_different_seeds() {
    let (scene_a, _) = scenes::haunted_house_with(&mut seeded_rng(1)).unwrap();
    let (scene_b, _) = scenes::haunted_house_with(&mut seeded_rng(2)).unwrap();

    let positions = |scene: &SceneGraph| -> Vec<(f32, f32)> {
        grave_nodes(scene)
            .into_iter()
            .map(|id| {
                let world = scene.world_transform(id);
                (world.position.x, world.position.z)
            })
            .collect()
    };
    assert_ne!(positions(&scene_a), positions(&scene_b));

    // same seed reproduces the layout
    let (scene_c, _) = scenes::haunted_house_with(&mut seeded_rng(1)).unwrap();
    assert_eq!(positions(&scene_a), positions(&scene_c));
}

#[test]
fn should_share_one_geometry_across_all_graves() {
    let (scene, _) = scenes::haunted_house_with(&mut seeded_rng(7)).unwrap();
    let handles: Vec<_> = grave_nodes(&scene)
        .into_iter()
        .map(|id| match scene.node(id).kind() {
            NodeKind::Mesh { geometry, material } => (*geometry, *material),
            other => panic!("grave node is not a mesh: {other:?}"),
        })
        .collect();

    assert!(handles.iter().all(|&h| h == handles[0]));
}

#[test]
fn should_build_the_full_tableau() {
    let (scene, camera) = scenes::haunted_house_with(&mut seeded_rng(3)).unwrap();

    let names: Vec<String> = scene
        .traverse()
        .map(|(id, _)| scene.node(id).name.clone())
        .collect();
    for expected in [
        "floor", "house", "walls", "roof", "door", "bush-0", "bush-3", "graves",
        "ambient-light", "moon-light", "door-light",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing node {expected:?}");
    }

    // camera node exists and is a camera
    assert!(matches!(scene.node(camera).kind(), NodeKind::Camera));
    assert_eq!(scene.node(camera).local.position.x, 4.0);

    // fog and background share the night color
    let fog = scene.fog.expect("tableau has fog");
    assert_eq!(fog.near, 1.0);
    assert_eq!(fog.far, 15.0);
    assert_eq!(fog.color, scene.background);
}

#[test]
fn should_light_the_tableau_with_three_lights() {
    let (scene, _) = scenes::haunted_house_with(&mut seeded_rng(9)).unwrap();

    let lights: Vec<_> = scene
        .traverse()
        .filter_map(|(id, world)| match scene.node(id).kind() {
            NodeKind::Light(light) => Some((world, *light)),
            _ => None,
        })
        .collect();
    assert_eq!(lights.len(), 3);

    let kinds: Vec<_> = lights.iter().map(|(_, light)| light.kind).collect();
    assert!(kinds.contains(&LightKind::Ambient));
    assert!(kinds.contains(&LightKind::Directional));
    let point_range = kinds.iter().find_map(|kind| match kind {
        LightKind::Point { range } => Some(*range),
        _ => None,
    });
    assert_eq!(point_range, Some(7.0));

    // the door light hangs above the door, inside the house group
    let (world, _) = lights
        .iter()
        .find(|(_, light)| matches!(light.kind, LightKind::Point { .. }))
        .unwrap();
    assert_eq!(world.position.y, 2.2);
}

#[test]
fn should_mark_only_the_door_transparent() {
    let (scene, _) = scenes::haunted_house_with(&mut seeded_rng(5)).unwrap();

    let transparent: Vec<_> = scene
        .materials()
        .iter()
        .filter(|m| m.transparent)
        .collect();
    assert_eq!(transparent.len(), 1);
    assert_eq!(transparent[0].name, "door");
    assert_eq!(transparent[0].displacement_scale, 0.1);
}

#[test]
fn should_tile_the_grass_eight_times() {
    let (scene, _) = scenes::haunted_house_with(&mut seeded_rng(5)).unwrap();
    let grass = scene
        .materials()
        .iter()
        .find(|m| m.name == "grass")
        .expect("floor material exists");
    assert_eq!(grass.uv_repeat, [8.0, 8.0]);
}

#[test]
fn should_build_the_starter_scene() {
    let (scene, camera) = scenes::starter().unwrap();
    assert!(matches!(scene.node(camera).kind(), NodeKind::Camera));
    assert!(scene.fog.is_none());

    let mesh_count = scene
        .traverse()
        .filter(|(id, _)| matches!(scene.node(*id).kind(), NodeKind::Mesh { .. }))
        .count();
    assert_eq!(mesh_count, 1);
}
