//! Minimal scene: one box, one light, the orbit camera.

use gloam::{
    app::{self, AppOptions},
    scenes,
};

fn main() -> anyhow::Result<()> {
    let (scene, camera) = scenes::starter()?;
    app::run(
        scene,
        camera,
        AppOptions {
            title: "starter".to_string(),
            ..Default::default()
        },
    )
}
