//! The wgpu-backed rasterizer.
//!
//! Owns the GPU context plus every device-side mirror of scene data: vertex
//! and index buffers per geometry, bind groups per material, and the camera,
//! light and fog uniforms. Scene resources are uploaded once before the loop
//! starts; per-frame work is limited to uniform writes and instance buffers.

use anyhow::{Context as _, Result};
use wgpu::util::DeviceExt;

use crate::{
    camera::CameraUniform,
    context::Context,
    data_structures::{
        light::LightsUniform,
        material::{Material, MaterialParams},
        scene_graph::{GeometryId, MaterialId, SceneGraph},
        texture::Texture,
        transform::TransformRaw,
    },
    pipelines::{
        basic::mk_basic_pipeline, camera_layout, lights_layout, material_layout,
        transparent::mk_transparent_pipeline,
    },
    render::{Frame, Rasterizer},
    resources::load_texture,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FogUniform {
    color: [f32; 3],
    near: f32,
    far: f32,
    enabled: f32,
    _padding: [f32; 2],
}

impl FogUniform {
    fn new(scene: &SceneGraph) -> Self {
        match scene.fog {
            Some(fog) => Self {
                color: fog.color,
                near: fog.near,
                far: fog.far,
                enabled: 1.0,
                _padding: [0.0; 2],
            },
            None => Self {
                color: [0.0; 3],
                near: 0.0,
                far: 1.0,
                enabled: 0.0,
                _padding: [0.0; 2],
            },
        }
    }
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

struct GpuMaterial {
    bind_group: wgpu::BindGroup,
    transparent: bool,
}

pub struct Renderer {
    pub context: Context,
    depth_texture: Texture,
    basic_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    lights_uniform: LightsUniform,
    lights_buffer: wgpu::Buffer,
    fog_buffer: wgpu::Buffer,
    lights_bind_group: wgpu::BindGroup,
    geometries: Vec<GpuGeometry>,
    materials: Vec<GpuMaterial>,
}

impl Renderer {
    pub fn new(context: Context) -> Self {
        let device = &context.device;

        let basic_pipeline = mk_basic_pipeline(device, &context.config);
        let transparent_pipeline = mk_transparent_pipeline(device, &context.config);

        let camera_uniform = CameraUniform::new();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_layout(device),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let lights_uniform = LightsUniform::new();
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[lights_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let fog_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Fog Buffer"),
            contents: bytemuck::cast_slice(&[FogUniform {
                color: [0.0; 3],
                near: 0.0,
                far: 1.0,
                enabled: 0.0,
                _padding: [0.0; 2],
            }]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &lights_layout(device),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: lights_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: fog_buffer.as_entire_binding(),
                },
            ],
            label: Some("lights_bind_group"),
        });

        let depth_texture = Texture::create_depth_texture(
            device,
            [context.config.width, context.config.height],
            "depth_texture",
        );

        Self {
            context,
            depth_texture,
            basic_pipeline,
            transparent_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            lights_uniform,
            lights_buffer,
            fog_buffer,
            lights_bind_group,
            geometries: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Mirror the scene's geometries and materials onto the device.
    ///
    /// Texture files load concurrently; a missing or unreadable file fails the
    /// whole upload. Untextured materials get 1x1 fallbacks.
    pub async fn upload_scene(&mut self, scene: &SceneGraph) -> Result<()> {
        let device = &self.context.device;

        self.geometries = scene
            .geometries()
            .iter()
            .map(|geometry| {
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(&geometry.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Index Buffer"),
                    contents: bytemuck::cast_slice(&geometry.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                GpuGeometry {
                    vertex_buffer,
                    index_buffer,
                    num_indices: geometry.indices.len() as u32,
                }
            })
            .collect();

        let texture_futures: Vec<_> = scene
            .materials()
            .iter()
            .map(|material| self.load_material_textures(material))
            .collect();
        let textures = futures::future::join_all(texture_futures).await;

        self.materials.clear();
        let layout = material_layout(device);
        for (material, textures) in scene.materials().iter().zip(textures) {
            let (color, normal) = textures
                .with_context(|| format!("loading textures for material {:?}", material.name))?;
            let params = MaterialParams::new(material);
            let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Material Params Buffer"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&color.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(
                            color.sampler.as_ref().context("color texture has no sampler")?,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&normal.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(
                            normal.sampler.as_ref().context("normal texture has no sampler")?,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
                label: Some(&format!("material_bind_group_{}", material.name)),
            });
            self.materials.push(GpuMaterial {
                bind_group,
                transparent: material.transparent,
            });
        }
        Ok(())
    }

    async fn load_material_textures(&self, material: &Material) -> Result<(Texture, Texture)> {
        let device = &self.context.device;
        let queue = &self.context.queue;
        let address_mode = wgpu::AddressMode::Repeat;

        let color = match &material.color_map {
            Some(path) => load_texture(path, false, address_mode, device, queue).await?,
            None => Texture::solid(device, queue, [255, 255, 255, 255], true, "solid_white"),
        };
        let normal = match &material.normal_map {
            Some(path) => load_texture(path, true, address_mode, device, queue).await?,
            None => Texture::solid(device, queue, [127, 127, 255, 255], false, "flat_normal"),
        };
        Ok((color, normal))
    }
}

impl Rasterizer for Renderer {
    /// Reconfigure the surface and depth texture for a new output size.
    /// `width` and `height` are logical pixels; the physical target size is
    /// scaled by the (already clamped) pixel ratio.
    fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        let physical_width = (width as f32 * pixel_ratio) as u32;
        let physical_height = (height as f32 * pixel_ratio) as u32;
        if physical_width == 0 || physical_height == 0 {
            return;
        }
        self.context.config.width = physical_width;
        self.context.config.height = physical_height;
        self.context
            .surface
            .configure(&self.context.device, &self.context.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.context.device,
            [physical_width, physical_height],
            "depth_texture",
        );
    }

    fn render(&mut self, scene: &SceneGraph, frame: &Frame) -> Result<()> {
        self.camera_uniform.update(
            cgmath::Point3::from(frame.view_position),
            frame.proj * frame.view,
        );
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let placed: Vec<_> = frame
            .lights
            .iter()
            .map(|placed| (placed.world.clone(), placed.light))
            .collect();
        self.lights_uniform.set(&placed);
        self.context.queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::cast_slice(&[self.lights_uniform]),
        );
        self.context.queue.write_buffer(
            &self.fog_buffer,
            0,
            bytemuck::cast_slice(&[FogUniform::new(scene)]),
        );

        // Batch draws by geometry and material, preserving traversal order
        // within each transparency class.
        let mut opaque: Vec<((GeometryId, MaterialId), Vec<TransformRaw>)> = Vec::new();
        let mut transparent: Vec<((GeometryId, MaterialId), Vec<TransformRaw>)> = Vec::new();
        for draw in &frame.draws {
            let Some(material) = self.materials.get(draw.material.0 as usize) else {
                log::warn!("material {:?} was never uploaded; skipping draw", draw.material);
                continue;
            };
            let batches = if material.transparent {
                &mut transparent
            } else {
                &mut opaque
            };
            let key = (draw.geometry, draw.material);
            match batches.iter_mut().find(|(k, _)| *k == key) {
                Some((_, instances)) => instances.push(draw.world.to_raw()),
                None => batches.push((key, vec![draw.world.to_raw()])),
            }
        }

        // Instance buffers must outlive the render pass below.
        let mk_instances = |batches: &[((GeometryId, MaterialId), Vec<TransformRaw>)]| {
            batches
                .iter()
                .map(|(_, instances)| {
                    self.context
                        .device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Instance Buffer"),
                            contents: bytemuck::cast_slice(instances),
                            usage: wgpu::BufferUsages::VERTEX,
                        })
                })
                .collect::<Vec<_>>()
        };
        let opaque_instances = mk_instances(&opaque);
        let transparent_instances = mk_instances(&transparent);

        let output = self
            .context
            .surface
            .get_current_texture()
            .map_err(anyhow::Error::new)?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let [r, g, b] = scene.background;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(1, &self.camera_bind_group, &[]);
            render_pass.set_bind_group(2, &self.lights_bind_group, &[]);

            render_pass.set_pipeline(&self.basic_pipeline);
            self.draw_batches(&mut render_pass, &opaque, &opaque_instances);

            render_pass.set_pipeline(&self.transparent_pipeline);
            self.draw_batches(&mut render_pass, &transparent, &transparent_instances);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Renderer {
    fn draw_batches(
        &self,
        render_pass: &mut wgpu::RenderPass<'_>,
        batches: &[((GeometryId, MaterialId), Vec<TransformRaw>)],
        instance_buffers: &[wgpu::Buffer],
    ) {
        for (((geometry_id, material_id), instances), instance_buffer) in
            batches.iter().zip(instance_buffers)
        {
            let Some(geometry) = self.geometries.get(geometry_id.0 as usize) else {
                log::warn!("geometry {:?} was never uploaded; skipping draw", geometry_id);
                continue;
            };
            // material presence was checked while batching
            let material = &self.materials[material_id.0 as usize];
            render_pass.set_bind_group(0, &material.bind_group, &[]);
            render_pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, instance_buffer.slice(..));
            render_pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..geometry.num_indices, 0, 0..instances.len() as u32);
        }
    }
}
