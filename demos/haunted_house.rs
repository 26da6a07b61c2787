//! The full haunted-house tableau with an orbit camera.
//!
//! Drag with the left mouse button to orbit, scroll to zoom. Set
//! `GLOAM_AMBIENT` to override the ambient light intensity at startup,
//! exercising the same binding a debug UI slider would use.
//!
//! Expects the texture files under `assets/textures/{bricks,door,grass}/`;
//! startup fails with a load error when they are missing.

use gloam::{
    app::{self, AppOptions},
    inspector::InspectorPanel,
    scenes,
};

fn main() -> anyhow::Result<()> {
    let (mut scene, camera) = scenes::haunted_house()?;

    let mut panel = InspectorPanel::new();
    let ambient = scene
        .traverse()
        .map(|(id, _)| id)
        .find(|&id| scene.node(id).name == "ambient-light")
        .expect("tableau always has an ambient light");
    panel.bind_light_intensity("ambient intensity", ambient);

    if let Ok(value) = std::env::var("GLOAM_AMBIENT") {
        match value.parse::<f32>() {
            Ok(value) => {
                panel.set(&mut scene, "ambient intensity", value);
            }
            Err(_) => eprintln!("GLOAM_AMBIENT must be a number, got {value:?}"),
        }
    }

    app::run(
        scene,
        camera,
        AppOptions {
            title: "haunted house".to_string(),
            ..Default::default()
        },
    )
}
