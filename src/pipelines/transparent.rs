use crate::{
    data_structures::{
        geometry::{Vertex, VertexLayout},
        texture::Texture,
        transform::TransformRaw,
    },
    pipelines::{basic::mk_render_pipeline, camera_layout, lights_layout, material_layout},
};

/// Pipeline for alpha-blended meshes.
///
/// Culling is off so thin double-sided geometry (the door plane) stays
/// visible from behind. Depth writes remain on; transparent draws are
/// submitted after the opaque pass in traversal order.
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[
            &material_layout(device),
            &camera_layout(device),
            &lights_layout(device),
        ],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    };
    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        config.format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        None,
        &[Vertex::desc(), TransformRaw::desc()],
        shader,
    )
}
