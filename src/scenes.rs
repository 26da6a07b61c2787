//! Scene construction: the static tableaux this engine ships.
//!
//! Scenes are built once and never mutated afterwards (apart from the camera
//! node the viewport writes). `starter` is the minimal first variant: one box
//! and an ambient light. `haunted_house` is the full tableau: textured floor,
//! house group, fifty scattered graves, lights and fog.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use anyhow::Result;
use cgmath::{Rad, Rotation3};

use crate::data_structures::{
    geometry::Geometry,
    light::Light,
    material::{Material, hex_color},
    scene_graph::{Fog, GeometryId, MaterialId, NodeId, NodeKind, SceneGraph},
    transform::Transform,
};

pub const GRAVE_COUNT: usize = 50;
pub const GRAVE_RADIUS_MIN: f32 = 3.0;
pub const GRAVE_RADIUS_SPAN: f32 = 6.2;

/// An unseeded uniform sampler over `[0, 1)`.
///
/// Deliberately non-reproducible: re-running scene construction yields a
/// different graveyard each time. Inject a seeded closure instead where
/// determinism is wanted (tests do).
pub fn unseeded() -> impl FnMut() -> f32 {
    use std::hash::{BuildHasher, Hasher};
    // per-process entropy from the std hasher, portable to wasm
    let mut state = std::collections::hash_map::RandomState::new()
        .build_hasher()
        .finish()
        | 1;
    move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 40) as f32 / (1u32 << 24) as f32
    }
}

/// Scatter grave markers on the annulus around the house.
///
/// Each marker samples `angle = U(0, 2pi)` and
/// `radius = U(3.0, 3.0 + 6.2)`, lands at
/// `(sin(angle) * radius, 0.3, cos(angle) * radius)` and tilts by `U(-2, 2)`
/// radians on two axes. All markers share one geometry and one material.
pub fn scatter_graves(
    scene: &mut SceneGraph,
    parent: NodeId,
    geometry: GeometryId,
    material: MaterialId,
    rng: &mut impl FnMut() -> f32,
) -> Result<Vec<NodeId>> {
    let mut graves = Vec::with_capacity(GRAVE_COUNT);
    for i in 0..GRAVE_COUNT {
        let angle = rng() * TAU;
        let radius = GRAVE_RADIUS_MIN + rng() * GRAVE_RADIUS_SPAN;
        let x = angle.sin() * radius;
        let z = angle.cos() * radius;
        let tilt_y = (rng() - 0.5) * 4.0;
        let tilt_z = (rng() - 0.5) * 4.0;
        let rotation = cgmath::Quaternion::from_angle_y(Rad(tilt_y))
            * cgmath::Quaternion::from_angle_z(Rad(tilt_z));
        let id = scene.insert(
            parent,
            &format!("grave-{i}"),
            NodeKind::Mesh { geometry, material },
            Transform {
                position: cgmath::Vector3::new(x, 0.3, z),
                rotation,
                ..Transform::identity()
            },
        )?;
        graves.push(id);
    }
    Ok(graves)
}

/// The first script variant: a single box, an ambient light and the camera.
///
/// Returns the scene and the camera node for the viewport controller.
pub fn starter() -> Result<(SceneGraph, NodeId)> {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    let box_geometry = scene.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
    let box_material = scene.add_material(Material::solid("box", hex_color(0xa9c388)));
    scene.insert(
        root,
        "box",
        NodeKind::Mesh {
            geometry: box_geometry,
            material: box_material,
        },
        Transform::identity(),
    )?;

    scene.insert(
        root,
        "ambient-light",
        NodeKind::Light(Light::ambient([1.0, 1.0, 1.0], 0.5)),
        Transform::identity(),
    )?;

    let camera = scene.insert(root, "camera", NodeKind::Camera, Transform::at(4.0, 2.0, 5.0))?;

    Ok((scene, camera))
}

/// The haunted-house tableau with the default unseeded grave placement.
pub fn haunted_house() -> Result<(SceneGraph, NodeId)> {
    haunted_house_with(&mut unseeded())
}

/// The haunted-house tableau with an injected placement sampler.
pub fn haunted_house_with(rng: &mut impl FnMut() -> f32) -> Result<(SceneGraph, NodeId)> {
    let mut scene = SceneGraph::new();
    let root = scene.root();

    scene.fog = Some(Fog {
        color: hex_color(0x262837),
        near: 1.0,
        far: 15.0,
    });
    scene.background = hex_color(0x262837);

    // floor
    let floor_geometry = scene.add_geometry(Geometry::plane(20.0, 20.0, 1, 1));
    let floor_material = scene.add_material(Material {
        name: "grass".to_string(),
        uv_repeat: [8.0, 8.0],
        color_map: Some("textures/grass/color.jpg".to_string()),
        ao_map: Some("textures/grass/ambientOcclusion.jpg".to_string()),
        normal_map: Some("textures/grass/normal.jpg".to_string()),
        roughness_map: Some("textures/grass/roughness.jpg".to_string()),
        ..Default::default()
    });
    scene.insert(
        root,
        "floor",
        NodeKind::Mesh {
            geometry: floor_geometry,
            material: floor_material,
        },
        Transform {
            rotation: cgmath::Quaternion::from_angle_x(Rad(-FRAC_PI_2)),
            ..Transform::identity()
        },
    )?;

    // house group
    let house = scene.insert(root, "house", NodeKind::Group, Transform::identity())?;

    let walls_geometry = scene.add_geometry(Geometry::cuboid(4.0, 2.5, 4.0));
    let walls_material = scene.add_material(Material {
        name: "bricks".to_string(),
        color_map: Some("textures/bricks/color.jpg".to_string()),
        ao_map: Some("textures/bricks/ambientOcclusion.jpg".to_string()),
        normal_map: Some("textures/bricks/normal.jpg".to_string()),
        roughness_map: Some("textures/bricks/roughness.jpg".to_string()),
        ..Default::default()
    });
    scene.insert(
        house,
        "walls",
        NodeKind::Mesh {
            geometry: walls_geometry,
            material: walls_material,
        },
        Transform::at(0.0, 1.25, 0.0),
    )?;

    let roof_geometry = scene.add_geometry(Geometry::cone(3.5, 1.0, 4));
    let roof_material = scene.add_material(Material::solid("roof", hex_color(0xb35f45)));
    scene.insert(
        house,
        "roof",
        NodeKind::Mesh {
            geometry: roof_geometry,
            material: roof_material,
        },
        Transform {
            position: cgmath::Vector3::new(0.0, 2.5 + 0.5, 0.0),
            rotation: cgmath::Quaternion::from_angle_y(Rad(FRAC_PI_4)),
            ..Transform::identity()
        },
    )?;

    let door_geometry = scene.add_geometry(Geometry::plane(2.2, 2.2, 100, 100));
    let door_material = scene.add_material(Material {
        name: "door".to_string(),
        transparent: true,
        displacement_scale: 0.1,
        color_map: Some("textures/door/color.jpg".to_string()),
        alpha_map: Some("textures/door/alpha.jpg".to_string()),
        ao_map: Some("textures/door/ambientOcclusion.jpg".to_string()),
        displacement_map: Some("textures/door/height.jpg".to_string()),
        normal_map: Some("textures/door/normal.jpg".to_string()),
        metalness_map: Some("textures/door/metalness.jpg".to_string()),
        roughness_map: Some("textures/door/roughness.jpg".to_string()),
        ..Default::default()
    });
    scene.insert(
        house,
        "door",
        NodeKind::Mesh {
            geometry: door_geometry,
            material: door_material,
        },
        Transform::at(0.0, 1.0, 2.0 + 0.01),
    )?;

    let bush_geometry = scene.add_geometry(Geometry::uv_sphere(1.0, 16, 16));
    let bush_material = scene.add_material(Material::solid("bush", hex_color(0x89c854)));
    let bushes: [(f32, f32, f32, f32); 4] = [
        (0.8, 0.2, 2.2, 0.5),
        (1.4, 0.1, 2.1, 0.25),
        (-0.8, 0.1, 2.2, 0.4),
        (-1.0, 0.05, 2.6, 0.15),
    ];
    for (i, (x, y, z, s)) in bushes.into_iter().enumerate() {
        scene.insert(
            house,
            &format!("bush-{i}"),
            NodeKind::Mesh {
                geometry: bush_geometry,
                material: bush_material,
            },
            Transform {
                position: cgmath::Vector3::new(x, y, z),
                scale: cgmath::Vector3::new(s, s, s),
                ..Transform::identity()
            },
        )?;
    }

    // graveyard
    let graves = scene.insert(root, "graves", NodeKind::Group, Transform::identity())?;
    let grave_geometry = scene.add_geometry(Geometry::cuboid(0.6, 0.8, 0.2));
    let grave_material = scene.add_material(Material::solid("grave", hex_color(0xb2b6b1)));
    scatter_graves(&mut scene, graves, grave_geometry, grave_material, rng)?;

    // lights
    scene.insert(
        root,
        "ambient-light",
        NodeKind::Light(Light::ambient(hex_color(0xb9d5ff), 0.12)),
        Transform::identity(),
    )?;
    scene.insert(
        root,
        "moon-light",
        NodeKind::Light(Light::directional(hex_color(0xb9d5ff), 0.12)),
        Transform::at(4.0, 5.0, -2.0),
    )?;
    scene.insert(
        house,
        "door-light",
        NodeKind::Light(Light::point(hex_color(0xff7d46), 1.0, 7.0)),
        Transform::at(0.0, 2.2, 2.7),
    )?;

    let camera = scene.insert(root, "camera", NodeKind::Camera, Transform::at(4.0, 2.0, 5.0))?;

    Ok((scene, camera))
}
