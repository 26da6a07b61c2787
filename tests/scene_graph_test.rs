use cgmath::{Quaternion, Rad, Rotation3, Vector3};
use gloam::data_structures::{
    geometry::Geometry,
    material::Material,
    scene_graph::{NodeKind, SceneGraph},
    transform::Transform,
};

#[test]
fn should_visit_every_node_once_in_preorder() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let a = scene
        .insert(root, "a", NodeKind::Group, Transform::identity())
        .unwrap();
    let b = scene
        .insert(root, "b", NodeKind::Group, Transform::identity())
        .unwrap();
    let a1 = scene
        .insert(a, "a1", NodeKind::Group, Transform::identity())
        .unwrap();
    let a2 = scene
        .insert(a, "a2", NodeKind::Group, Transform::identity())
        .unwrap();

    let order: Vec<_> = scene.traverse().map(|(id, _)| id).collect();
    assert_eq!(order, vec![root, a, a1, a2, b]);
}

#[test]
fn should_yield_identical_results_on_retraversal() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let parent = scene
        .insert(root, "parent", NodeKind::Group, Transform::at(1.0, 0.0, 0.0))
        .unwrap();
    scene
        .insert(parent, "child", NodeKind::Group, Transform::at(0.0, 2.0, 0.0))
        .unwrap();

    let first: Vec<_> = scene.traverse().collect();
    let second: Vec<_> = scene.traverse().collect();
    assert_eq!(first, second);
}

#[test]
fn should_compose_world_transforms_parent_first() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let group = scene
        .insert(root, "group", NodeKind::Group, Transform::at(1.0, 2.0, 3.0))
        .unwrap();
    let geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
    let material = scene.add_material(Material::solid("box", [1.0, 1.0, 1.0]));
    let mesh = scene
        .insert(
            group,
            "box",
            NodeKind::Mesh { geometry, material },
            Transform::identity(),
        )
        .unwrap();

    // a box at the local origin inherits its group's position
    let world = scene.world_transform(mesh);
    assert_eq!(world.position, Vector3::new(1.0, 2.0, 3.0));

    let traversed = scene
        .traverse()
        .find(|(id, _)| *id == mesh)
        .map(|(_, world)| world)
        .unwrap();
    assert_eq!(traversed.position, Vector3::new(1.0, 2.0, 3.0));
}

#[test]
fn should_scale_and_rotate_child_offsets() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let group = scene
        .insert(
            root,
            "group",
            NodeKind::Group,
            Transform {
                position: Vector3::new(0.0, 0.0, 0.0),
                rotation: Quaternion::from_angle_y(Rad(std::f32::consts::FRAC_PI_2)),
                scale: Vector3::new(2.0, 2.0, 2.0),
            },
        )
        .unwrap();
    let child = scene
        .insert(group, "child", NodeKind::Group, Transform::at(1.0, 0.0, 0.0))
        .unwrap();

    // offset scaled by 2, then rotated a quarter turn: +X lands on -Z
    let world = scene.world_transform(child);
    assert!((world.position.x - 0.0).abs() < 1e-5);
    assert!((world.position.z - -2.0).abs() < 1e-5);
    assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
}

#[test]
fn should_reject_second_parent() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let a = scene
        .insert(root, "a", NodeKind::Group, Transform::identity())
        .unwrap();
    let child = scene
        .insert(a, "child", NodeKind::Group, Transform::identity())
        .unwrap();

    let err = scene.add_child(root, child).unwrap_err();
    assert!(err.to_string().contains("already has parent"));
}

#[test]
fn should_reject_cycles() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let a = scene
        .insert(root, "a", NodeKind::Group, Transform::identity())
        .unwrap();
    let b = scene
        .insert(a, "b", NodeKind::Group, Transform::identity())
        .unwrap();

    let err = scene.add_child(b, a).unwrap_err();
    assert!(err.to_string().contains("cycle") || err.to_string().contains("parent"));

    let err = scene.add_child(a, a).unwrap_err();
    assert!(err.to_string().contains("its own parent"));
}

#[test]
fn should_share_geometry_across_nodes_by_handle() {
    let mut scene = SceneGraph::new();
    let root = scene.root();
    let geometry = scene.add_geometry(Geometry::cuboid(0.6, 0.8, 0.2));
    let material = scene.add_material(Material::solid("grave", [0.7, 0.7, 0.7]));

    for i in 0..3 {
        scene
            .insert(
                root,
                &format!("marker-{i}"),
                NodeKind::Mesh { geometry, material },
                Transform::at(i as f32, 0.0, 0.0),
            )
            .unwrap();
    }

    // one geometry in the arena regardless of how many nodes reference it
    assert_eq!(scene.geometries().len(), 1);
    assert_eq!(scene.materials().len(), 1);
}
