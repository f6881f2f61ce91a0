use std::collections::{HashMap, HashSet};

use wgpu::util::DeviceExt;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration,
    Texture, TextureView,
};

use super::{draw_list, lights_uniform, Pass, Rasterizer};
use crate::camera::OrbitCamera;
use crate::core::{GpuContext, Viewport};
use crate::error::{Result, SceneError};
use crate::frame::FrameInfo;
use crate::scene::{Geometry, GeometryId, NodeKind, NodeTag, SceneGraph};
use crate::types::{CameraUniform, LightsUniform, ModelUniform, PointInstance, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const QUAD_VERTICES: u32 = 6;

/// GPU copy of one geometry from the scene arena
enum GpuGeometry {
    Mesh {
        vertices: Buffer,
        indices: Buffer,
        index_count: u32,
        /// Unique edges, only built when a wireframe node uses this geometry
        edges: Option<(Buffer, u32)>,
    },
    Points {
        instances: Buffer,
        count: u32,
    },
}

impl GpuGeometry {
    fn destroy(&self) {
        match self {
            GpuGeometry::Mesh {
                vertices,
                indices,
                edges,
                ..
            } => {
                vertices.destroy();
                indices.destroy();
                if let Some((edges, _)) = edges {
                    edges.destroy();
                }
            }
            GpuGeometry::Points { instances, .. } => instances.destroy(),
        }
    }
}

/// Per-node model uniform, rewritten every frame
struct NodeBinding {
    buffer: Buffer,
    bind_group: BindGroup,
}

struct Pipelines {
    lit: RenderPipeline,
    translucent: RenderPipeline,
    lines: RenderPipeline,
    points: RenderPipeline,
}

impl Pipelines {
    fn get(&self, pass: Pass) -> &RenderPipeline {
        match pass {
            Pass::Opaque => &self.lit,
            Pass::Translucent => &self.translucent,
            Pass::Lines => &self.lines,
            Pass::Points => &self.points,
        }
    }
}

/// Rasterizer drawing into a window surface with wgpu
pub struct WgpuRasterizer {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    depth_texture: Texture,
    depth_view: TextureView,
    camera_buffer: Buffer,
    lights_buffer: Buffer,
    frame_bind_group: BindGroup,
    model_layout: BindGroupLayout,
    pipelines: Pipelines,
    geometries: HashMap<GeometryId, GpuGeometry>,
    nodes: HashMap<NodeTag, NodeBinding>,
    clear_color: wgpu::Color,
    released: bool,
}

impl WgpuRasterizer {
    /// Configure the surface for `viewport` and build the pipelines; buffers come later in `upload`
    pub fn new(
        gpu: GpuContext,
        surface: Surface<'static>,
        viewport: Viewport,
        clear_color: [f64; 4],
    ) -> Result<Self> {
        viewport.validate()?;
        let (width, height) = viewport.framebuffer_size();

        let surface_config = Self::create_surface_config(&gpu, &surface, width, height, clear_color[3])?;
        surface.configure(gpu.device(), &surface_config);

        let device = gpu.device();
        let (depth_texture, depth_view) = Self::create_depth_texture(device, width, height);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let lights_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Lights Buffer"),
            size: std::mem::size_of::<LightsUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });

        let pipelines =
            Self::create_pipelines(device, &frame_layout, &model_layout, surface_config.format);

        log::info!(
            "Rasterizer ready: {}x{} {:?} (alpha {:?})",
            width,
            height,
            surface_config.format,
            surface_config.alpha_mode
        );

        Ok(Self {
            gpu,
            surface,
            surface_config,
            depth_texture,
            depth_view,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            model_layout,
            pipelines,
            geometries: HashMap::new(),
            nodes: HashMap::new(),
            clear_color: wgpu::Color {
                r: clear_color[0],
                g: clear_color[1],
                b: clear_color[2],
                a: clear_color[3],
            },
            released: false,
        })
    }

    /// Current framebuffer size in physical pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn create_surface_config(
        gpu: &GpuContext,
        surface: &Surface,
        width: u32,
        height: u32,
        clear_alpha: f64,
    ) -> Result<SurfaceConfiguration> {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| SceneError::ContextUnavailable("surface reports no formats".into()))?;

        let alpha_mode = if clear_alpha < 1.0 {
            [
                wgpu::CompositeAlphaMode::PreMultiplied,
                wgpu::CompositeAlphaMode::PostMultiplied,
            ]
            .into_iter()
            .find(|mode| caps.alpha_modes.contains(mode))
        } else {
            None
        }
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    fn create_pipelines(
        device: &Device,
        frame_layout: &BindGroupLayout,
        model_layout: &BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> Pipelines {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[frame_layout, model_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str,
                     vs: &str,
                     fs: &str,
                     buffer: wgpu::VertexBufferLayout<'static>,
                     topology: wgpu::PrimitiveTopology,
                     cull_mode: Option<wgpu::Face>,
                     blend: wgpu::BlendState,
                     depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers: &[buffer],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        Pipelines {
            lit: build(
                "Lit Mesh Pipeline",
                "vs_mesh",
                "fs_lit",
                Vertex::layout(),
                wgpu::PrimitiveTopology::TriangleList,
                Some(wgpu::Face::Back),
                wgpu::BlendState::REPLACE,
                true,
            ),
            translucent: build(
                "Translucent Pipeline",
                "vs_mesh",
                "fs_unlit",
                Vertex::layout(),
                wgpu::PrimitiveTopology::TriangleList,
                Some(wgpu::Face::Back),
                wgpu::BlendState::ALPHA_BLENDING,
                false,
            ),
            lines: build(
                "Wireframe Pipeline",
                "vs_mesh",
                "fs_unlit",
                Vertex::layout(),
                wgpu::PrimitiveTopology::LineList,
                None,
                wgpu::BlendState::ALPHA_BLENDING,
                false,
            ),
            points: build(
                "Points Pipeline",
                "vs_points",
                "fs_points",
                PointInstance::layout(),
                wgpu::PrimitiveTopology::TriangleList,
                None,
                wgpu::BlendState::ALPHA_BLENDING,
                false,
            ),
        }
    }

    /// Run `allocate` inside error scopes so out-of-memory surfaces as an error
    fn scoped<T>(device: &Device, what: &'static str, allocate: impl FnOnce() -> T) -> Result<T> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let value = allocate();
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        let validation = pollster::block_on(device.pop_error_scope());

        match out_of_memory.or(validation) {
            Some(err) => Err(SceneError::Allocation {
                what,
                reason: err.to_string(),
            }),
            None => Ok(value),
        }
    }

    fn upload_geometry(device: &Device, geometry: &Geometry, with_edges: bool) -> Result<GpuGeometry> {
        match geometry {
            Geometry::Mesh(mesh) => Self::scoped(device, "geometry buffer", || {
                let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Vertices"),
                    contents: bytemuck::cast_slice(&mesh.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Indices"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let edges = with_edges.then(|| {
                    let edges = mesh.edges();
                    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Wireframe Edges"),
                        contents: bytemuck::cast_slice(&edges),
                        usage: wgpu::BufferUsages::INDEX,
                    });
                    (buffer, (edges.len() * 2) as u32)
                });
                GpuGeometry::Mesh {
                    vertices,
                    indices,
                    index_count: mesh.indices.len() as u32,
                    edges,
                }
            }),
            Geometry::Points(cloud) => Self::scoped(device, "particle buffer", || {
                let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Point Instances"),
                    contents: bytemuck::cast_slice(&cloud.instances()),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                GpuGeometry::Points {
                    instances,
                    count: cloud.len() as u32,
                }
            }),
        }
    }

    fn write_frame_uniforms(&self, scene: &SceneGraph, camera: &OrbitCamera, frame: &FrameInfo) {
        let (width, height) = self.dimensions();
        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(width, height, frame.time)]),
        );
        for item in draw_list(scene) {
            if let Some(binding) = self.nodes.get(&item.tag) {
                queue.write_buffer(&binding.buffer, 0, bytemuck::cast_slice(&[item.uniform]));
            }
        }
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl Rasterizer for WgpuRasterizer {
    fn upload(&mut self, scene: &SceneGraph) -> Result<()> {
        let device = self.gpu.device();

        let mut wireframed = HashSet::new();
        scene.visit(|node, _| {
            if let NodeKind::Wireframe { geometry, .. } = &node.kind {
                wireframed.insert(*geometry);
            }
        });

        let mut bytes = 0u64;
        for (id, geometry) in scene.geometries() {
            let gpu_geometry = Self::upload_geometry(device, geometry, wireframed.contains(&id))?;
            bytes += match &gpu_geometry {
                GpuGeometry::Mesh {
                    vertices,
                    indices,
                    edges,
                    ..
                } => vertices.size() + indices.size() + edges.as_ref().map_or(0, |(b, _)| b.size()),
                GpuGeometry::Points { instances, .. } => instances.size(),
            };
            self.geometries.insert(id, gpu_geometry);
        }

        for item in draw_list(scene) {
            let binding = Self::scoped(device, "model uniform", || {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Model Uniform"),
                    contents: bytemuck::cast_slice(&[item.uniform]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Model Bind Group"),
                    layout: &self.model_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                });
                NodeBinding { buffer, bind_group }
            })?;
            self.nodes.insert(item.tag, binding);
        }

        self.gpu.queue().write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::cast_slice(&[lights_uniform(&scene.lights())]),
        );

        log::debug!(
            "Uploaded {} geometries ({} bytes), {} draw nodes",
            self.geometries.len(),
            bytes,
            self.nodes.len()
        );
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() || self.released {
            return;
        }
        let (width, height) = viewport.framebuffer_size();
        if (width, height) == self.dimensions() {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);

        self.depth_texture.destroy();
        let (depth_texture, depth_view) = Self::create_depth_texture(self.gpu.device(), width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;

        log::debug!("Surface resized to {}x{}", width, height);
    }

    fn draw(&mut self, scene: &SceneGraph, camera: &OrbitCamera, frame: &FrameInfo) -> Result<()> {
        if self.released {
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated at frame {}, reconfiguring", frame.number);
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout at frame {}, skipping", frame.number);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.write_frame_uniforms(scene, camera, frame);

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            for item in draw_list(scene) {
                let (Some(binding), Some(geometry)) =
                    (self.nodes.get(&item.tag), self.geometries.get(&item.geometry))
                else {
                    continue;
                };

                render_pass.set_pipeline(self.pipelines.get(item.pass));
                render_pass.set_bind_group(1, &binding.bind_group, &[]);

                match (item.pass, geometry) {
                    (
                        Pass::Lines,
                        GpuGeometry::Mesh {
                            vertices,
                            edges: Some((edges, count)),
                            ..
                        },
                    ) => {
                        render_pass.set_vertex_buffer(0, vertices.slice(..));
                        render_pass.set_index_buffer(edges.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..*count, 0, 0..1);
                    }
                    (
                        Pass::Opaque | Pass::Translucent,
                        GpuGeometry::Mesh {
                            vertices,
                            indices,
                            index_count,
                            ..
                        },
                    ) => {
                        render_pass.set_vertex_buffer(0, vertices.slice(..));
                        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                    (Pass::Points, GpuGeometry::Points { instances, count }) => {
                        render_pass.set_vertex_buffer(0, instances.slice(..));
                        render_pass.draw(0..QUAD_VERTICES, 0..*count);
                    }
                    (pass, _) => {
                        log::warn!("{:?} cannot draw {:?} in {:?} pass", item.tag, item.geometry, pass);
                    }
                }
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for geometry in self.geometries.values() {
            geometry.destroy();
        }
        for binding in self.nodes.values() {
            binding.buffer.destroy();
        }
        let (geometries, nodes) = (self.geometries.len(), self.nodes.len());
        self.geometries.clear();
        self.nodes.clear();

        self.camera_buffer.destroy();
        self.lights_buffer.destroy();
        self.depth_texture.destroy();

        log::info!("Released {} geometry buffers and {} node uniforms", geometries, nodes);
    }
}

impl Drop for WgpuRasterizer {
    fn drop(&mut self) {
        self.release();
    }
}
