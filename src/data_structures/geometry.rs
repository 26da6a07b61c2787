//! Procedural geometry primitives.
//!
//! All builders are pure: identical parameters yield identical vertex and
//! index data. Geometry is immutable after construction and shared by handle
//! across every node with the same shape (all grave markers reference one
//! cuboid instance).

use std::f32::consts::{PI, TAU};

/// Describes the byte layout of a vertex-stage buffer to wgpu.
pub trait VertexLayout {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// One vertex of a geometry: position, texture coordinates, normal, and a
/// tangent basis for normal mapping.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl VertexLayout for Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Immutable vertex/index data for one shape.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// An axis-aligned box centered on the origin, one quad per face.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        // (u axis, v axis, outward normal, face width, face height), with
        // u cross v equal to the normal so winding stays counter-clockwise.
        let faces: [([f32; 3], [f32; 3], [f32; 3], f32, f32); 6] = [
            ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0], depth, height),
            ([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], depth, height),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0], width, depth),
            ([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0], width, depth),
            ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], width, height),
            ([-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0], width, height),
        ];

        for (u, v, normal, fw, fh) in faces {
            let base = vertices.len() as u32;
            let center = [
                normal[0] * width / 2.0,
                normal[1] * height / 2.0,
                normal[2] * depth / 2.0,
            ];
            // top-left, top-right, bottom-right, bottom-left
            let corners = [(-1.0, 1.0, 0.0, 1.0), (1.0, 1.0, 1.0, 1.0), (1.0, -1.0, 1.0, 0.0), (-1.0, -1.0, 0.0, 0.0)];
            for (su, sv, tu, tv) in corners {
                let su = su * fw / 2.0;
                let sv = sv * fh / 2.0;
                vertices.push(Vertex {
                    position: [
                        center[0] + u[0] * su + v[0] * sv,
                        center[1] + u[1] * su + v[1] * sv,
                        center[2] + u[2] * su + v[2] * sv,
                    ],
                    tex_coords: [tu, tv],
                    normal,
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                });
            }
            indices.extend_from_slice(&[base, base + 3, base + 2, base, base + 2, base + 1]);
        }

        Self::finish(vertices, indices)
    }

    /// A subdivided rectangle in the XY plane facing +Z.
    pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> Self {
        let gx = width_segments.max(1);
        let gy = height_segments.max(1);
        let mut vertices = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);
        let mut indices = Vec::with_capacity((gx * gy * 6) as usize);

        for iy in 0..=gy {
            let fy = iy as f32 / gy as f32;
            let y = height / 2.0 - fy * height;
            for ix in 0..=gx {
                let fx = ix as f32 / gx as f32;
                let x = fx * width - width / 2.0;
                vertices.push(Vertex {
                    position: [x, y, 0.0],
                    tex_coords: [fx, 1.0 - fy],
                    normal: [0.0, 0.0, 1.0],
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                });
            }
        }
        for iy in 0..gy {
            for ix in 0..gx {
                let a = ix + (gx + 1) * iy;
                let b = ix + (gx + 1) * (iy + 1);
                let c = ix + 1 + (gx + 1) * (iy + 1);
                let d = ix + 1 + (gx + 1) * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self::finish(vertices, indices)
    }

    /// An upright cone: apex at +height/2, capped base circle at -height/2.
    ///
    /// One apex vertex per segment keeps the slant normals smooth around the
    /// rim without averaging across the tip.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        let seg = radial_segments.max(3);
        let half = height / 2.0;
        let slope = radius / height;
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let slant_normal = |theta: f32| {
            let (s, c) = theta.sin_cos();
            let len = (1.0 + slope * slope).sqrt();
            [s / len, slope / len, c / len]
        };

        // side: base ring (seg + 1 for the uv seam), then one apex per segment
        for i in 0..=seg {
            let u = i as f32 / seg as f32;
            let theta = u * TAU;
            vertices.push(Vertex {
                position: [radius * theta.sin(), -half, radius * theta.cos()],
                tex_coords: [u, 0.0],
                normal: slant_normal(theta),
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
            });
        }
        let apex_base = vertices.len() as u32;
        for i in 0..seg {
            let u = (i as f32 + 0.5) / seg as f32;
            vertices.push(Vertex {
                position: [0.0, half, 0.0],
                tex_coords: [u, 1.0],
                normal: slant_normal(u * TAU),
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
            });
        }
        for i in 0..seg {
            indices.extend_from_slice(&[i, i + 1, apex_base + i]);
        }

        // base cap, wound to face -Y
        let cap_center = vertices.len() as u32;
        vertices.push(Vertex {
            position: [0.0, -half, 0.0],
            tex_coords: [0.5, 0.5],
            normal: [0.0, -1.0, 0.0],
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        });
        let cap_ring = vertices.len() as u32;
        for i in 0..=seg {
            let theta = i as f32 / seg as f32 * TAU;
            let (s, c) = theta.sin_cos();
            vertices.push(Vertex {
                position: [radius * s, -half, radius * c],
                tex_coords: [s * 0.5 + 0.5, c * 0.5 + 0.5],
                normal: [0.0, -1.0, 0.0],
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
            });
        }
        for i in 0..seg {
            indices.extend_from_slice(&[cap_center, cap_ring + i + 1, cap_ring + i]);
        }

        Self::finish(vertices, indices)
    }

    /// A latitude/longitude sphere centered on the origin.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);
        let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
        let mut indices = Vec::new();

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            let phi = v * PI;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let theta = u * TAU;
                let position = [
                    -radius * theta.cos() * phi.sin(),
                    radius * phi.cos(),
                    radius * theta.sin() * phi.sin(),
                ];
                let inv = 1.0 / radius;
                vertices.push(Vertex {
                    position,
                    tex_coords: [u, 1.0 - v],
                    normal: [position[0] * inv, position[1] * inv, position[2] * inv],
                    tangent: [0.0; 3],
                    bitangent: [0.0; 3],
                });
            }
        }
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * (ws + 1) + ix + 1;
                let b = iy * (ws + 1) + ix;
                let c = (iy + 1) * (ws + 1) + ix;
                let d = (iy + 1) * (ws + 1) + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::finish(vertices, indices)
    }

    fn finish(mut vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        compute_tangents(&mut vertices, &indices);
        Self { vertices, indices }
    }
}

/// Derive per-vertex tangents and bitangents from positions and UVs.
///
/// Walks the index buffer in triangles, solves the tangent-space system per
/// face, accumulates onto the corner vertices and averages at the end.
fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks(3) {
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: cgmath::Vector3<f32> = v0.position.into();
        let pos1: cgmath::Vector3<f32> = v1.position.into();
        let pos2: cgmath::Vector3<f32> = v2.position.into();

        let uv0: cgmath::Vector2<f32> = v0.tex_coords.into();
        let uv1: cgmath::Vector2<f32> = v1.tex_coords.into();
        let uv2: cgmath::Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solving delta_pos = delta_uv.x * T + delta_uv.y * B for T and B.
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            // degenerate UV mapping, leave this face out of the basis
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped bitangent for right-handed normal maps in wgpu's
        // texture-coordinate system.
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for &i in c {
            let v = &mut vertices[i as usize];
            v.tangent = (tangent + cgmath::Vector3::from(v.tangent)).into();
            v.bitangent = (bitangent + cgmath::Vector3::from(v.bitangent)).into();
            triangles_included[i as usize] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        let v = &mut vertices[i];
        v.tangent = (cgmath::Vector3::from(v.tangent) * denom).into();
        v.bitangent = (cgmath::Vector3::from(v.bitangent) * denom).into();
    }
}
