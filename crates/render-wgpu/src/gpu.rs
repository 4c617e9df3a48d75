use crate::camera::FpsCamera;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use gallery_common::Rgb;
use gallery_kernel::TargetPool;
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

const FOG_START: f32 = 0.0;
const FOG_END: f32 = 750.0;
const FLOOR_SIZE: f32 = 2000.0;
const FLOOR_THICKNESS: f32 = 0.1;
const GRID_HALF_LINES: i32 = 100;
const GRID_SPACING: f32 = 10.0;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Instance slots: every target plus the floor slab.
const MAX_INSTANCES: u32 = 1024;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: Rgb) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: linear_rgba(color),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Surfaces are sRGB; shader math runs in linear space.
fn linear_rgba(color: Rgb) -> [f32; 4] {
    let [r, g, b, a] = color.to_rgba_f32();
    [r.powf(2.2), g.powf(2.2), b.powf(2.2), a]
}

/// Face normal plus two in-plane axes ordered so `u x v == normal`.
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

/// Unit cube centered on the origin, counter-clockwise when seen from
/// outside. Scaled per instance.
fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner = (n + u * su + v * sv) * 0.5;
            vertices.push(Vertex {
                position: corner.to_array(),
                normal,
            });
        }
        indices.extend([0, 1, 2, 2, 3, 0].map(|i| base + i));
    }
    (vertices, indices)
}

/// Grid lines lying just above the floor slab, two segments per step.
fn grid_mesh(half_lines: i32, spacing: f32) -> Vec<GridVertex> {
    const LIFT: f32 = 0.01;
    let color = linear_rgba(Rgb(0x6a6a6a));
    let extent = half_lines as f32 * spacing;
    (-half_lines..=half_lines)
        .flat_map(|i| {
            let at = i as f32 * spacing;
            [
                [-extent, LIFT, at],
                [extent, LIFT, at],
                [at, LIFT, -extent],
                [at, LIFT, extent],
            ]
        })
        .map(|position| GridVertex { position, color })
        .collect()
}

/// Instances for one frame: the floor slab first, then every live target.
fn build_instances(targets: &TargetPool, limit: usize) -> Vec<InstanceData> {
    let floor = Mat4::from_scale_rotation_translation(
        Vec3::new(FLOOR_SIZE, FLOOR_THICKNESS, FLOOR_SIZE),
        Quat::IDENTITY,
        Vec3::new(0.0, -FLOOR_THICKNESS * 0.5, 0.0),
    );
    let mut instances = vec![InstanceData::new(floor, Rgb::FLOOR)];
    for target in targets.iter() {
        if instances.len() >= limit {
            tracing::warn!("instance buffer full, {} targets not drawn", targets.len());
            break;
        }
        let model = Mat4::from_scale_rotation_translation(
            target.half_extents * 2.0,
            Quat::IDENTITY,
            target.position,
        );
        instances.push(InstanceData::new(model, target.color));
    }
    instances
}

struct BoxMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct GridLines {
    vertices: wgpu::Buffer,
    vertex_count: u32,
}

fn upload<T: Pod>(
    device: &wgpu::Device,
    label: &str,
    data: &[T],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(data),
        usage,
    })
}

/// What differs between the box and grid pipelines.
struct PipelineDesc<'a> {
    label: &'static str,
    source: String,
    entry: (&'static str, &'static str),
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
}

/// State shared by every pipeline drawn in the main pass.
struct PassTargets<'a> {
    layout: &'a wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
}

impl PassTargets<'_> {
    fn pipeline(&self, device: &wgpu::Device, desc: PipelineDesc<'_>) -> wgpu::RenderPipeline {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(self.layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(desc.entry.0),
                compilation_options: Default::default(),
                buffers: desc.buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(desc.entry.1),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                cull_mode: desc.cull_mode,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        })
    }
}

/// wgpu renderer for the arena.
pub struct WgpuRenderer {
    box_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    box_mesh: BoxMesh,
    grid: GridLines,
    instance_buffer: wgpu::Buffer,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_buffer = upload(
            device,
            "uniform_buffer",
            &[Uniforms::zeroed()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let targets = PassTargets {
            layout: &pipeline_layout,
            color_format: surface_format,
        };
        let box_pipeline = targets.pipeline(
            device,
            PipelineDesc {
                label: "box_pipeline",
                source: shaders::box_shader(),
                entry: ("vs_main", "fs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4, 3 => Float32x4, 4 => Float32x4,
                            5 => Float32x4, 6 => Float32x4
                        ],
                    },
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
            },
        );
        let grid_pipeline = targets.pipeline(
            device,
            PipelineDesc {
                label: "grid_pipeline",
                source: shaders::grid_shader(),
                entry: ("vs_grid", "fs_grid"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
                }],
                topology: wgpu::PrimitiveTopology::LineList,
                cull_mode: None,
            },
        );

        let (box_verts, box_indices) = cube_mesh();
        let grid_verts = grid_mesh(GRID_HALF_LINES, GRID_SPACING);
        let box_mesh = BoxMesh {
            vertices: upload(device, "box_vertices", &box_verts, wgpu::BufferUsages::VERTEX),
            indices: upload(device, "box_indices", &box_indices, wgpu::BufferUsages::INDEX),
            index_count: box_indices.len() as u32,
        };
        let grid = GridLines {
            vertices: upload(device, "grid_vertices", &grid_verts, wgpu::BufferUsages::VERTEX),
            vertex_count: grid_verts.len() as u32,
        };

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance_buffer"),
            size: (MAX_INSTANCES as u64) * std::mem::size_of::<InstanceData>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            box_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            box_mesh,
            grid,
            instance_buffer,
            depth_texture,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    /// Render one frame: sky, floor, grid, targets.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &FpsCamera,
        targets: &TargetPool,
    ) {
        let sky = linear_rgba(Rgb::SKY);
        let eye = camera.position;
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                eye: eye.extend(1.0).to_array(),
                fog_color: sky,
                fog_range: [FOG_START, FOG_END, 0.0, 0.0],
            }),
        );

        let instances = build_instances(targets, MAX_INSTANCES as usize);
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: sky[0] as f64,
                            g: sky[1] as f64,
                            b: sky[2] as f64,
                            a: 1.0,
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

            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            pass.set_pipeline(&self.box_pipeline);
            pass.set_vertex_buffer(0, self.box_mesh.vertices.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.set_index_buffer(self.box_mesh.indices.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..self.box_mesh.index_count, 0, 0..instances.len() as u32);

            pass.set_pipeline(&self.grid_pipeline);
            pass.set_vertex_buffer(0, self.grid.vertices.slice(..));
            pass.draw(0..self.grid.vertex_count, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
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
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_kernel::GameConfig;

    #[test]
    fn uniforms_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn one_instance_per_target_plus_floor() {
        let pool = TargetPool::new(&GameConfig::default(), 11);
        let instances = build_instances(&pool, MAX_INSTANCES as usize);
        assert_eq!(instances.len(), 21);
        // Target boxes are 1 x 2 x 1.
        let model = instances[1].model_1;
        assert_eq!(model[1], 2.0);
    }

    #[test]
    fn instance_limit_is_respected() {
        let pool = TargetPool::new(&GameConfig::default(), 11);
        assert_eq!(build_instances(&pool, 5).len(), 5);
    }

    #[test]
    fn cube_faces_wind_outward() {
        let (verts, indices) = cube_mesh();
        assert_eq!((verts.len(), indices.len()), (24, 36));
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(verts[i as usize].position));
            let n = Vec3::from(verts[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            assert!(a.abs().max_element() <= 0.5);
        }
    }

    #[test]
    fn grid_has_two_lines_per_step() {
        let verts = grid_mesh(2, 1.0);
        assert_eq!(verts.len(), 5 * 4);
    }
}
