// src/rendering_lib/renderer.rs

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::shader::MAX_LIGHTS;
use super::texture::{create_depth_view, create_sampler, GpuTexture, DEPTH_FORMAT};
use super::texture_loader::DecodedImage;
use super::vertex::Vertex;

use crate::engine_lib::camera::{Camera, CameraPose};
use crate::engine_lib::scene_types::{GalleryScene, Lighting, Material, MeshData, SlotIndex};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    light_dirs: [[f32; 4]; MAX_LIGHTS],
    light_colors: [[f32; 4]; MAX_LIGHTS],
    params: [f32; 4],
}

impl FrameUniform {
    fn new(camera: &Camera, pose: &CameraPose, lighting: &Lighting) -> Self {
        let mut uniform = Self {
            view_proj: camera.view_projection(pose).to_cols_array_2d(),
            camera_pos: pose.position.extend(1.0).to_array(),
            ambient: [lighting.ambient[0], lighting.ambient[1], lighting.ambient[2], 1.0],
            light_dirs: [[0.0; 4]; MAX_LIGHTS],
            light_colors: [[0.0; 4]; MAX_LIGHTS],
            params: [0.0; 4],
        };
        if lighting.directional.len() > MAX_LIGHTS {
            log::warn!("only the first {} of {} directional lights are used", MAX_LIGHTS, lighting.directional.len());
        }
        let count = lighting.directional.len().min(MAX_LIGHTS);
        for (i, light) in lighting.directional.iter().take(count).enumerate() {
            uniform.light_dirs[i] = light.direction.extend(light.intensity).to_array();
            uniform.light_colors[i] = [light.color[0], light.color[1], light.color[2], 1.0];
        }
        uniform.params[0] = count as f32;
        uniform
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MaterialUniform {
    base_color: [f32; 4],
    emissive: [f32; 4],
    surface: [f32; 4],
}

impl From<&Material> for MaterialUniform {
    fn from(material: &Material) -> Self {
        let [r, g, b] = material.base_color;
        let [er, eg, eb] = material.emissive;
        Self {
            base_color: [r, g, b, 1.0],
            emissive: [er, eg, eb, material.emissive_intensity],
            surface: [material.metalness, material.roughness, 0.0, 0.0],
        }
    }
}

struct DrawItem {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture_slot: Option<SlotIndex>,
}

pub struct Renderer {
    render_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    placeholder: GpuTexture,
    slot_textures: HashMap<SlotIndex, GpuTexture>,
    depth_view: wgpu::TextureView,
    items: Vec<DrawItem>,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        width: u32,
        height: u32,
        scene: &GalleryScene,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Gallery Shader Module"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("frame_bind_group_layout"),
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("material_bind_group_layout"),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Gallery Pipeline Layout"),
                bind_group_layouts: &[&frame_layout, &material_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Gallery Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Wall and image planes are double sided.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let [r, g, b] = scene.background;
        let mut renderer = Self {
            render_pipeline,
            frame_buffer,
            frame_bind_group,
            material_layout,
            sampler: create_sampler(device),
            placeholder: GpuTexture::placeholder(device, queue),
            slot_textures: HashMap::new(),
            depth_view: create_depth_view(device, width, height),
            items: Vec::new(),
            clear_color: wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: 1.0 },
        };

        for static_mesh in &scene.statics {
            renderer.add_mesh(device, static_mesh.name, &static_mesh.mesh, &static_mesh.material);
        }
        for slot in &scene.slots {
            for element in &slot.elements {
                let label = format!("slot {} {:?}", slot.index, element.kind);
                renderer.add_mesh(device, &label, &element.mesh, &element.material);
            }
        }
        log::info!("renderer holds {} draw items", renderer.items.len());
        renderer
    }

    fn material_bind_group(
        &self,
        device: &wgpu::Device,
        material_buffer: &wgpu::Buffer,
        texture_slot: Option<SlotIndex>,
    ) -> wgpu::BindGroup {
        let texture = texture_slot
            .and_then(|slot| self.slot_textures.get(&slot))
            .unwrap_or(&self.placeholder);
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("material_bind_group"),
        })
    }

    fn add_mesh(&mut self, device: &wgpu::Device, label: &str, mesh: &MeshData, material: &Material) {
        if mesh.indices.is_empty() {
            return;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&Vertex::from_mesh(mesh)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&MaterialUniform::from(material)),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = self.material_bind_group(device, &material_buffer, material.texture_slot);
        self.items.push(DrawItem {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            material_buffer,
            bind_group,
            texture_slot: material.texture_slot,
        });
    }

    /// Uploads a resolved artwork and points that slot's image plane at it.
    pub fn set_slot_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        slot: SlotIndex,
        image: &DecodedImage,
    ) {
        let label = format!("Artwork Texture {slot}");
        self.slot_textures.insert(slot, GpuTexture::from_image(device, queue, image, &label));

        let mut rebuilt = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            if item.texture_slot == Some(slot) {
                rebuilt.push((i, self.material_bind_group(device, &item.material_buffer, Some(slot))));
            }
        }
        for (i, bind_group) in rebuilt {
            self.items[i].bind_group = bind_group;
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = create_depth_view(device, width, height);
    }

    pub fn render_scene(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output_view: &wgpu::TextureView,
        camera: &Camera,
        pose: &CameraPose,
        lighting: &Lighting,
    ) {
        let frame_uniform = FrameUniform::new(camera, pose, lighting);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniform));

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Gallery Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output_view,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(self.clear_color), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
        for item in &self.items {
            render_pass.set_bind_group(1, &item.bind_group, &[]);
            render_pass.set_vertex_buffer(0, item.vertex_buffer.slice(..));
            render_pass.set_index_buffer(item.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..item.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn material_uniform_packs_emissive_intensity() {
        let material = Material {
            base_color: [0.5, 0.25, 0.125],
            emissive: [0.1, 0.2, 0.3],
            emissive_intensity: 1.94,
            metalness: 1.0,
            roughness: 0.5,
            texture_slot: None,
        };
        let uniform = MaterialUniform::from(&material);
        assert_eq!(uniform.base_color, [0.5, 0.25, 0.125, 1.0]);
        assert_eq!(uniform.emissive, [0.1, 0.2, 0.3, 1.94]);
        assert_eq!(uniform.surface, [1.0, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn frame_uniform_caps_light_count() {
        use crate::engine_lib::scene_types::DirectionalLight;
        use glam::Vec3;

        let light = DirectionalLight { direction: Vec3::Y, color: [1.0; 3], intensity: 0.6 };
        let lighting = Lighting { ambient: [0.2; 3], directional: vec![light; MAX_LIGHTS + 2] };
        let camera = Camera::new(90.0, 0.1, 100.0);
        let pose = CameraPose::new(Vec3::ZERO, 0.0);
        let uniform = FrameUniform::new(&camera, &pose, &lighting);
        assert_eq!(uniform.params[0], MAX_LIGHTS as f32);
        assert_eq!(uniform.light_dirs[0], [0.0, 1.0, 0.0, 0.6]);
    }
}
