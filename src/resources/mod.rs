//! Asset loading: the texture-source collaborator.
//!
//! Given a fixed path string, yields a GPU texture. Native builds read from
//! the `assets/` directory next to the binary; wasm builds fetch over HTTP.
//! Loading is async so a scene's texture set can be fetched concurrently
//! with `futures::future::join_all`.

use crate::data_structures::texture::Texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> reqwest::Url {
    let window = web_sys::window().unwrap();
    let location = window.location();
    let mut origin = location.origin().unwrap();
    if !origin.ends_with("assets") {
        origin = format!("{}/assets", origin);
    }
    let base = reqwest::Url::parse(&format!("{}/", origin,)).unwrap();
    base.join(file_name).unwrap()
}

pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name);
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new("./").join("assets").join(file_name);
        std::fs::read(path)?
    };

    Ok(data)
}

/// Load an image file and upload it as a GPU texture.
///
/// `is_normal_map` selects linear instead of sRGB storage; `address_mode`
/// configures UV wrapping on the returned sampler.
pub async fn load_texture(
    file_name: &str,
    is_normal_map: bool,
    address_mode: wgpu::AddressMode,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    let data = load_binary(file_name).await?;
    Texture::from_bytes(
        device,
        queue,
        &data,
        file_name,
        None,
        is_normal_map,
        address_mode,
    )
}
