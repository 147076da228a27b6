use std::collections::BTreeMap;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use testbed_assets::{AssetStore, Mesh, MeshHandle, Texture, TextureHandle};
use testbed_common::{Light, LightKind, MAX_LIGHTS, TexGen};
use testbed_render::{BlendMode, DrawCall, FrameSubmission};
use wgpu::util::DeviceExt;

use crate::shaders;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuLight {
    position: [f32; 4],
    color: [f32; 4],
    direction: [f32; 4],
    params: [f32; 4],
}

impl GpuLight {
    fn from_slot(slot: Option<&Light>) -> Self {
        let Some(light) = slot else {
            return Self::default();
        };
        let p = light.position;
        let c = light.color;
        let (direction, exponent, kind) = match light.kind {
            LightKind::Point => ([0.0, 0.0, -1.0, -1.0], 0.0, 0.0),
            LightKind::Spot {
                direction,
                exponent,
                cutoff_degrees,
            } => {
                let d = direction.normalize_or_zero();
                let cos_cutoff = cutoff_degrees.clamp(0.0, 180.0).to_radians().cos();
                ([d.x, d.y, d.z, cos_cutoff], exponent, 1.0)
            }
        };
        Self {
            position: [p.x, p.y, p.z, 1.0],
            color: [c.x, c.y, c.z, 1.0],
            direction,
            params: [exponent, light.radius, kind, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct FrameUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    lights: [GpuLight; MAX_LIGHTS],
    fog_color: [f32; 4],
    fog: [f32; 4],
    flags: [f32; 4],
}

impl FrameUniforms {
    pub(crate) fn from_submission(frame: &FrameSubmission) -> Self {
        let fog = &frame.fog;
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        Self {
            projection: frame.projection.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            lights: std::array::from_fn(|i| GpuLight::from_slot(frame.lights[i].as_ref())),
            fog_color: fog.color.to_array(),
            fog: [
                fog.start,
                fog.end,
                fog.density,
                fog.fog_type.shader_index() as f32,
            ],
            flags: [
                flag(fog.enabled),
                flag(frame.texture.enabled()),
                flag(frame.texture.texgen == TexGen::SphereMap),
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub(crate) struct DrawUniforms {
    world: [[f32; 4]; 4],
    tint: [f32; 4],
}

impl DrawUniforms {
    fn from_draw(draw: &DrawCall) -> Self {
        Self {
            world: draw.world.to_cols_array_2d(),
            tint: [draw.alpha, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    texcoord: [f32; 2],
}

/// Interleave a mesh's attribute streams.
pub(crate) fn interleave(mesh: &Mesh) -> Vec<Vertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.texcoords)
        .map(|((p, n), t)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
            texcoord: t.to_array(),
        })
        .collect()
}

pub(crate) fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}

/// Draw order: opaque calls first, then blended calls, each in submission
/// order. Returns indices into `draws`.
pub(crate) fn draw_order(draws: &[DrawCall]) -> Vec<usize> {
    let opaque = draws
        .iter()
        .enumerate()
        .filter(|(_, d)| d.blend == BlendMode::Opaque);
    let blended = draws
        .iter()
        .enumerate()
        .filter(|(_, d)| d.blend == BlendMode::Alpha);
    opaque.chain(blended).map(|(i, _)| i).collect()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// wgpu renderer for frame submissions.
///
/// Meshes and textures are uploaded once from an [`AssetStore`] and owned
/// by the renderer; GPU memory is released when it is dropped.
pub struct WgpuRenderer {
    opaque_pipeline: wgpu::RenderPipeline,
    blend_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_texture: GpuTexture,
    meshes: BTreeMap<MeshHandle, GpuMesh>,
    textures: BTreeMap<TextureHandle, GpuTexture>,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    const INITIAL_DRAW_CAPACITY: usize = 64;

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniforms"),
            contents: bytemuck::bytes_of(&FrameUniforms::from_submission(
                &FrameSubmission::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });

        let draw_stride = align_to(
            std::mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (draw_buffer, draw_bind_group) = Self::create_draw_buffer(
            device,
            &draw_layout,
            draw_stride,
            Self::INITIAL_DRAW_CAPACITY,
        );

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = Texture::from_fn(1, 1, |_, _| [255, 255, 255, 255]);
        let white_texture =
            Self::create_texture(device, queue, &texture_layout, &sampler, "white", &white);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });

        let opaque_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            BlendMode::Opaque,
        );
        let blend_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            BlendMode::Alpha,
        );

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            opaque_pipeline,
            blend_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: Self::INITIAL_DRAW_CAPACITY,
            texture_layout,
            sampler,
            white_texture,
            meshes: BTreeMap::new(),
            textures: BTreeMap::new(),
            depth_texture,
            surface_format,
        }
    }

    /// Upload every mesh and texture in `store`. Assets already uploaded
    /// under the same handle are replaced.
    pub fn upload_assets(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, store: &AssetStore) {
        for (handle, mesh) in store.meshes() {
            let vertices = interleave(mesh);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: store.mesh_name(handle),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: store.mesh_name(handle),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.insert(
                handle,
                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                },
            );
        }

        for (handle, texture) in store.textures() {
            let name = store.texture_name(handle).unwrap_or("texture");
            let gpu = Self::create_texture(
                device,
                queue,
                &self.texture_layout,
                &self.sampler,
                name,
                texture,
            );
            self.textures.insert(handle, gpu);
        }

        tracing::info!(
            meshes = self.meshes.len(),
            textures = self.textures.len(),
            "uploaded assets to GPU"
        );
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Render one frame: opaque draws, then blended draws.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FrameSubmission,
    ) {
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniforms::from_submission(frame)),
        );

        if frame.draws.len() > self.draw_capacity {
            let capacity = frame.draws.len().next_power_of_two();
            let (buffer, bind_group) =
                Self::create_draw_buffer(device, &self.draw_layout, self.draw_stride, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
            tracing::debug!(capacity, "grew draw uniform buffer");
        }

        if !frame.draws.is_empty() {
            let stride = self.draw_stride as usize;
            let mut bytes = vec![0u8; stride * frame.draws.len()];
            for (i, draw) in frame.draws.iter().enumerate() {
                let uniforms = DrawUniforms::from_draw(draw);
                let src = bytemuck::bytes_of(&uniforms);
                bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
            }
            queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }

        let texture_bind_group = frame
            .texture
            .texture
            .and_then(|h| self.textures.get(&h))
            .map(|t| &t.bind_group)
            .unwrap_or(&self.white_texture.bind_group);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let c = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: c.x as f64,
                            g: c.y as f64,
                            b: c.z as f64,
                            a: c.w as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(2, texture_bind_group, &[]);

            let mut current = None;
            for i in draw_order(&frame.draws) {
                let draw = &frame.draws[i];
                let Some(mesh) = self.meshes.get(&draw.mesh) else {
                    tracing::warn!(mesh = draw.mesh.0, "draw references a mesh that was never uploaded");
                    continue;
                };
                if current != Some(draw.blend) {
                    pass.set_pipeline(match draw.blend {
                        BlendMode::Opaque => &self.opaque_pipeline,
                        BlendMode::Alpha => &self.blend_pipeline,
                    });
                    current = Some(draw.blend);
                }
                let offset = (i as u64 * self.draw_stride) as u32;
                pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        blend: BlendMode,
    ) -> wgpu::RenderPipeline {
        let (label, blend_state, depth_write) = match blend {
            BlendMode::Opaque => ("opaque_pipeline", wgpu::BlendState::REPLACE, true),
            BlendMode::Alpha => ("blend_pipeline", wgpu::BlendState::ALPHA_BLENDING, false),
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend_state),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_draw_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        name: &str,
        texture: &Texture,
    ) -> GpuTexture {
        let size = wgpu::Extent3d {
            width: texture.width.max(1),
            height: texture.height.max(1),
            depth_or_array_layers: 1,
        };
        let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size.width),
                rows_per_image: Some(size.height),
            },
            size,
        );
        let view = gpu_texture.create_view(&Default::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(name),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        GpuTexture {
            _texture: gpu_texture,
            bind_group,
        }
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};
    use testbed_render::TextureBinding;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64 * 2 + 64 * 8 + 16 * 3);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 80);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn empty_light_slots_are_disabled() {
        let frame = FrameSubmission::default();
        let u = FrameUniforms::from_submission(&frame);
        assert!(u.lights.iter().all(|l| l.position[3] == 0.0));
    }

    #[test]
    fn spot_light_packs_cosine_cutoff() {
        let light = Light::spot(Vec3::new(0.0, 0.35, -1.0), Vec3::X, 128.0, 60.0);
        let gpu = GpuLight::from_slot(Some(&light));
        assert_eq!(gpu.position, [0.0, 0.35, -1.0, 1.0]);
        assert!((gpu.direction[3] - 0.5).abs() < 1e-6);
        assert_eq!(gpu.direction[2], -1.0);
        assert_eq!(gpu.params, [128.0, 100.0, 1.0, 0.0]);
    }

    #[test]
    fn frame_flags_follow_submission() {
        let mut frame = FrameSubmission {
            texture: TextureBinding {
                unit: 0,
                texture: Some(TextureHandle(1)),
                texgen: TexGen::SphereMap,
            },
            ..FrameSubmission::default()
        };
        frame.fog.enabled = true;
        let u = FrameUniforms::from_submission(&frame);
        assert_eq!(u.flags, [1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn interleave_keeps_attributes_together() {
        let mesh = Mesh {
            positions: vec![Vec3::X, Vec3::Y],
            texcoords: vec![Vec2::new(0.25, 0.5), Vec2::ONE],
            normals: vec![Vec3::Z, Vec3::Z],
            indices: vec![],
        };
        let v = interleave(&mesh);
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].position, [1.0, 0.0, 0.0]);
        assert_eq!(v[0].texcoord, [0.25, 0.5]);
        assert_eq!(v[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn draw_stride_alignment() {
        assert_eq!(align_to(80, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(300, 256), 512);
        assert_eq!(align_to(80, 0), 80);
    }

    #[test]
    fn blended_draws_come_last() {
        let draws = vec![
            DrawCall::blended(MeshHandle(1), Mat4::IDENTITY, 0.5),
            DrawCall::opaque(MeshHandle(2), Mat4::IDENTITY),
            DrawCall::blended(MeshHandle(1), Mat4::IDENTITY, 1.0),
        ];
        assert_eq!(draw_order(&draws), vec![1, 0, 2]);
    }
}
