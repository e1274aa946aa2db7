use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use headrig_render::{HEAD_ALPHA, SceneBounds};
use headrig_rig::{HeadMesh, Rig};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::shaders;

const HEAD_COLOR: [f32; 3] = [0.85, 0.65, 0.55];
const MARKER_COLOR: [f32; 4] = [0.12, 0.47, 0.71, 1.0];
/// Camera 0 sits at azimuth zero; it is tinted so the ring's start is visible.
const FIRST_MARKER_COLOR: [f32; 4] = [1.0, 0.5, 0.05, 1.0];
const BOX_COLOR: [f32; 4] = [0.55, 0.55, 0.6, 1.0];
const GRID_COLOR: [f32; 4] = [0.3, 0.3, 0.35, 1.0];
const AXIS_COLORS: [[f32; 4]; 3] = [
    [0.9, 0.25, 0.25, 1.0],
    [0.25, 0.8, 0.3, 1.0],
    [0.3, 0.45, 0.95, 1.0],
];
/// Marker diagonal as a fraction of the bounding cube edge.
const MARKER_FRACTION: f32 = 0.03;
const GRID_DIVISIONS: i32 = 10;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    surface_color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct MarkerInstance {
    offset_scale: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct LineVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Flat-shaded octahedron with unit diagonal, one face per octant.
///
/// Faces wind counter-clockwise seen from outside.
fn marker_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let h = 0.5_f32;
    let mut vertices = Vec::with_capacity(24);
    for octant in 0..8u8 {
        let sign = |bit: u8| if octant & (1 << bit) == 0 { 1.0 } else { -1.0 };
        let (sx, sy, sz) = (sign(0), sign(1), sign(2));
        let normal = Vec3::new(sx, sy, sz).normalize().to_array();
        let x = [sx * h, 0.0, 0.0];
        let y = [0.0, sy * h, 0.0];
        let z = [0.0, 0.0, sz * h];
        // Mirroring an odd number of axes flips the winding.
        let corners = if sx * sy * sz > 0.0 { [x, y, z] } else { [x, z, y] };
        vertices.extend(corners.map(|position| Vertex { position, normal }));
    }
    let indices = (0..vertices.len() as u16).collect();
    (vertices, indices)
}

/// Head surface vertices, one per mesh point.
fn head_vertices(mesh: &HeadMesh) -> Vec<Vertex> {
    mesh.points()
        .iter()
        .zip(mesh.normals())
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// One marker per camera, sized relative to the bounding cube.
fn marker_instances(rig: &Rig, bounds: &SceneBounds) -> Vec<MarkerInstance> {
    let size = bounds.edge() * MARKER_FRACTION;
    rig.cameras()
        .iter()
        .map(|cam| MarkerInstance {
            offset_scale: cam.position.extend(size).to_array(),
            color: if cam.index == 0 {
                FIRST_MARKER_COLOR
            } else {
                MARKER_COLOR
            },
        })
        .collect()
}

/// Bounding cube edges, a floor grid on its bottom face and the three axis
/// lines along the cube's minimum edges.
fn line_vertices(bounds: &SceneBounds) -> Vec<LineVertex> {
    let mut verts = Vec::new();
    let mut push = |a: Vec3, b: Vec3, color: [f32; 4]| {
        verts.push(LineVertex {
            position: a.to_array(),
            color,
        });
        verts.push(LineVertex {
            position: b.to_array(),
            color,
        });
    };

    let (lo, hi) = (bounds.min(), bounds.max());
    let step = bounds.edge() / GRID_DIVISIONS as f32;
    for i in 1..GRID_DIVISIONS {
        let offset = i as f32 * step;
        // Lines along X
        push(
            Vec3::new(lo.x, lo.y + offset, lo.z),
            Vec3::new(hi.x, lo.y + offset, lo.z),
            GRID_COLOR,
        );
        // Lines along Y
        push(
            Vec3::new(lo.x + offset, lo.y, lo.z),
            Vec3::new(lo.x + offset, hi.y, lo.z),
            GRID_COLOR,
        );
    }

    let axes = [
        Vec3::new(hi.x, lo.y, lo.z),
        Vec3::new(lo.x, hi.y, lo.z),
        Vec3::new(lo.x, lo.y, hi.z),
    ];
    for (a, b) in bounds.edges() {
        let is_axis = a == lo && axes.contains(&b);
        if !is_axis {
            push(a, b, BOX_COLOR);
        }
    }
    for (end, color) in axes.into_iter().zip(AXIS_COLORS) {
        push(lo, end, color);
    }
    verts
}

struct PipelineSpec<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
    cull_mode: Option<wgpu::Face>,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: spec.shader,
            entry_point: Some(spec.vs_entry),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.shader,
            entry_point: Some(spec.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(spec.blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: spec.topology,
            cull_mode: spec.cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: spec.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

/// wgpu-based rig plot renderer.
pub struct WgpuRenderer {
    surface_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    head_vertex_buffer: wgpu::Buffer,
    head_index_buffer: wgpu::Buffer,
    head_index_count: u32,
    marker_vertex_buffer: wgpu::Buffer,
    marker_index_buffer: wgpu::Buffer,
    marker_index_count: u32,
    marker_buffer: wgpu::Buffer,
    marker_count: u32,
    line_vertex_buffer: wgpu::Buffer,
    line_vertex_count: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    /// Upload the rig's geometry. `bounds` decides marker size and the box.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        rig: &Rig,
        bounds: &SceneBounds,
    ) -> Self {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                surface_color: [HEAD_COLOR[0], HEAD_COLOR[1], HEAD_COLOR[2], HEAD_ALPHA],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

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

        let mesh_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![
                0 => Float32x3,
                1 => Float32x3,
            ],
        };

        // Head surface: translucent, drawn last without depth writes.
        let surface_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("surface_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SURFACE_SHADER.into()),
        });
        let surface_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "surface_pipeline",
                shader: &surface_shader,
                vs_entry: "vs_surface",
                fs_entry: "fs_surface",
                buffers: &[mesh_layout.clone()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::ALPHA_BLENDING,
                depth_write: false,
                cull_mode: None,
            },
        );

        // Camera markers
        let marker_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("marker_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MARKER_SHADER.into()),
        });
        let marker_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "marker_pipeline",
                shader: &marker_shader,
                vs_entry: "vs_marker",
                fs_entry: "fs_marker",
                buffers: &[
                    mesh_layout,
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MarkerInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                        ],
                    },
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
                cull_mode: Some(wgpu::Face::Back),
            },
        );

        // Box, grid and axes
        let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::LINE_SHADER.into()),
        });
        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            surface_format,
            PipelineSpec {
                label: "line_pipeline",
                shader: &line_shader,
                vs_entry: "vs_line",
                fs_entry: "fs_line",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
                topology: wgpu::PrimitiveTopology::LineList,
                blend: wgpu::BlendState::REPLACE,
                depth_write: true,
                cull_mode: None,
            },
        );

        // Head mesh. Buffers never start empty; counts gate the draws.
        let mut head_verts = head_vertices(rig.head());
        let mut head_indices = rig.head().triangle_indices();
        let head_index_count = head_indices.len() as u32;
        if head_verts.is_empty() {
            head_verts.push(Vertex::zeroed());
        }
        if head_indices.is_empty() {
            head_indices.push(0);
        }
        let head_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("head_vertex_buffer"),
            contents: bytemuck::cast_slice(&head_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let head_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("head_index_buffer"),
            contents: bytemuck::cast_slice(&head_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Camera marker mesh
        let (marker_verts, marker_indices) = marker_mesh();
        let marker_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_vertex_buffer"),
            contents: bytemuck::cast_slice(&marker_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let marker_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_index_buffer"),
            contents: bytemuck::cast_slice(&marker_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let marker_index_count = marker_indices.len() as u32;

        let mut markers = marker_instances(rig, bounds);
        let marker_count = markers.len() as u32;
        if markers.is_empty() {
            markers.push(MarkerInstance::zeroed());
        }
        let marker_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_buffer"),
            contents: bytemuck::cast_slice(&markers),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let line_verts = line_vertices(bounds);
        let line_vertex_count = line_verts.len() as u32;
        let line_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line_vertex_buffer"),
            contents: bytemuck::cast_slice(&line_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(
            markers = marker_count,
            head_triangles = head_index_count / 3,
            lines = line_vertex_count / 2,
            "uploaded rig geometry"
        );

        Self {
            surface_pipeline,
            marker_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            head_vertex_buffer,
            head_index_buffer,
            head_index_count,
            marker_vertex_buffer,
            marker_index_buffer,
            marker_index_count,
            marker_buffer,
            marker_count,
            line_vertex_buffer,
            line_vertex_count,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: box and grid, camera markers, then the head.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: camera.view_projection().to_cols_array_2d(),
                surface_color: [HEAD_COLOR[0], HEAD_COLOR[1], HEAD_COLOR[2], HEAD_ALPHA],
            }),
        );

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
                            r: 0.08,
                            g: 0.08,
                            b: 0.1,
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

            pass.set_pipeline(&self.line_pipeline);
            pass.set_vertex_buffer(0, self.line_vertex_buffer.slice(..));
            pass.draw(0..self.line_vertex_count, 0..1);

            if self.marker_count > 0 {
                pass.set_pipeline(&self.marker_pipeline);
                pass.set_vertex_buffer(0, self.marker_vertex_buffer.slice(..));
                pass.set_vertex_buffer(1, self.marker_buffer.slice(..));
                pass.set_index_buffer(self.marker_index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..self.marker_index_count, 0, 0..self.marker_count);
            }

            if self.head_index_count > 0 {
                pass.set_pipeline(&self.surface_pipeline);
                pass.set_vertex_buffer(0, self.head_vertex_buffer.slice(..));
                pass.set_index_buffer(self.head_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..self.head_index_count, 0, 0..1);
            }
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
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
