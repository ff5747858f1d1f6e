//! Mesh rendering for the showcase viewer
//!
//! One pipeline, one bind group: camera, lighting and a small equirect
//! environment texture. Model buffers are uploaded once and kept until the
//! model is released.

use crate::GpuContext;
use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Point3};
use vitrine_core::{Error, ModelNode, Result, TriangleMesh};

/// Upper bound on directional lights in the lighting uniform
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// nalgebra projections map depth to [-1, 1]; wgpu wants [0, 1]
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Vertex data for mesh rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Linear RGB
    pub color: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, normal, color }
    }

    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Camera uniform data for mesh rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
}

/// One directional light as laid out in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirectionalLightRaw {
    /// Unit vector pointing towards the light
    pub direction: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub _padding: f32,
}

/// Lighting parameters as laid out in the shader
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub lights: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    pub light_count: u32,
    pub environment_intensity: f32,
    pub exposure: f32,
    pub _padding: f32,
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            lights: [DirectionalLightRaw::default(); MAX_DIRECTIONAL_LIGHTS],
            light_count: 0,
            environment_intensity: 1.0,
            exposure: 1.0,
            _padding: 0.0,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct StudioRenderConfig {
    /// Linear RGB clear colour
    pub background_color: [f64; 3],
    pub enable_multisampling: bool,
    pub enable_backface_culling: bool,
}

impl Default for StudioRenderConfig {
    fn default() -> Self {
        Self {
            background_color: [0.016, 0.016, 0.016],
            enable_multisampling: true,
            enable_backface_culling: false,
        }
    }
}

/// CPU-side mesh ready for upload
#[derive(Debug, Clone, Default)]
pub struct GpuMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Convert a core mesh to GPU vertex and index data
pub fn mesh_to_gpu_mesh(mesh: &TriangleMesh) -> GpuMesh {
    let fallback_normals;
    let normals = match &mesh.normals {
        Some(n) if n.len() == mesh.vertices.len() => n,
        _ => {
            fallback_normals = mesh.calculate_vertex_normals();
            &fallback_normals
        }
    };

    let vertices = mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let n = normals[i];
            let color = mesh
                .colors
                .as_ref()
                .and_then(|c| c.get(i))
                .map(|c| c.to_linear())
                .unwrap_or([0.8, 0.8, 0.8]);
            MeshVertex::new([v.x, v.y, v.z], [n.x, n.y, n.z], color)
        })
        .collect();

    let indices = mesh
        .faces
        .iter()
        .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
        .collect();

    GpuMesh { vertices, indices }
}

/// Mesh renderer bound to one presentable surface
pub struct StudioRenderer<'window> {
    pub gpu: GpuContext,
    surface: wgpu::Surface<'window>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    environment_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
    model_buffers: Vec<MeshBuffers>,
    config: StudioRenderConfig,
}

impl<'window> StudioRenderer<'window> {
    /// Create a renderer presenting to `target`, sized `width` x `height`
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'window>>,
        width: u32,
        height: u32,
        config: StudioRenderConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Setup(format!("surface size {}x{} is empty", width, height)));
        }

        let instance = GpuContext::create_instance();
        let surface = instance
            .create_surface(target)
            .map_err(|e| Error::Gpu(format!("Failed to create surface: {}", e)))?;
        let gpu = GpuContext::for_surface(instance, &surface).await?;

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| Error::Gpu("surface reports no formats".to_string()))?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);

        let sample_count = if config.enable_multisampling { 4 } else { 1 };

        let camera_uniform = CameraUniform {
            view_proj: Matrix4::identity().into(),
            model: Matrix4::identity().into(),
            view_pos: [0.0, 0.0, 0.0, 1.0],
        };
        let camera_buffer = gpu.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let lighting_buffer = gpu.create_buffer_init(
            "Lighting Buffer",
            &[LightingUniform::default()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let bind_group_layout = gpu.create_bind_group_layout(
            "studio_bind_group_layout",
            &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
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
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        );

        // Neutral grey until a real environment is supplied
        let environment_view = Self::create_environment_view(&gpu, 1, 1, &[[0.5, 0.5, 0.5, 1.0]]);
        let bind_group = Self::create_bind_group(&gpu, &bind_group_layout, &camera_buffer, &lighting_buffer, &environment_view);

        let shader = gpu.create_shader_module("Studio Mesh Shader", include_str!("shaders/studio.wgsl"));
        let pipeline = Self::create_render_pipeline(&gpu.device, &bind_group_layout, &shader, format, sample_count, &config);

        let depth_view = Self::create_depth_view(&gpu.device, width, height, sample_count);
        let msaa_view = config
            .enable_multisampling
            .then(|| Self::create_msaa_view(&gpu.device, width, height, format));

        log::debug!("studio renderer ready: {}x{} {:?} msaa={}", width, height, format, sample_count);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            pipeline,
            bind_group_layout,
            bind_group,
            camera_uniform,
            camera_buffer,
            lighting_buffer,
            environment_view,
            depth_view,
            msaa_view,
            model_buffers: Vec::new(),
            config,
        })
    }

    fn sample_count(&self) -> u32 {
        if self.config.enable_multisampling { 4 } else { 1 }
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        bind_group_layout: &wgpu::BindGroupLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        config: &StudioRenderConfig,
    ) -> wgpu::RenderPipeline {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Studio Pipeline Layout"),
            bind_group_layouts: &[bind_group_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Studio Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[MeshVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: config.enable_backface_culling.then_some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
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
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    fn create_bind_group(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        camera_buffer: &wgpu::Buffer,
        lighting_buffer: &wgpu::Buffer,
        environment_view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        gpu.create_bind_group(
            "studio_bind_group",
            layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(environment_view),
                },
            ],
        )
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_msaa_view(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("MSAA Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 4,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_environment_view(gpu: &GpuContext, width: u32, height: u32, texels: &[[f32; 4]]) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        gpu.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(texels),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * std::mem::size_of::<[f32; 4]>() as u32),
                rows_per_image: Some(height),
            },
            size,
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Current surface size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Replace the environment texture (equirectangular, linear RGBA)
    pub fn set_environment(&mut self, width: u32, height: u32, texels: &[[f32; 4]]) -> Result<()> {
        if width == 0 || height == 0 || texels.len() != (width * height) as usize {
            return Err(Error::InvalidData(format!(
                "environment of {}x{} needs {} texels, got {}",
                width,
                height,
                width * height,
                texels.len()
            )));
        }
        self.environment_view = Self::create_environment_view(&self.gpu, width, height, texels);
        self.bind_group = Self::create_bind_group(
            &self.gpu,
            &self.bind_group_layout,
            &self.camera_buffer,
            &self.lighting_buffer,
            &self.environment_view,
        );
        Ok(())
    }

    /// Update lighting parameters
    pub fn set_lighting(&mut self, lighting: &LightingUniform) {
        self.gpu
            .queue
            .write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(lighting));
    }

    /// Update camera matrices and position
    pub fn update_camera(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, eye: Point3<f32>) {
        self.camera_uniform.view_proj = (opengl_to_wgpu() * projection * view).into();
        self.camera_uniform.view_pos = [eye.x, eye.y, eye.z, 1.0];
        self.write_camera();
    }

    /// Set the model matrix applied to every uploaded mesh
    pub fn set_model_matrix(&mut self, model: Matrix4<f32>) {
        self.camera_uniform.model = model.into();
        self.write_camera();
    }

    fn write_camera(&self) {
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&self.camera_uniform));
    }

    /// Upload a model's meshes, replacing whatever was uploaded before
    pub fn upload_model(&mut self, model: &ModelNode) {
        self.release_model();
        for mesh in &model.meshes {
            let gpu_mesh = mesh_to_gpu_mesh(mesh);
            if gpu_mesh.indices.is_empty() {
                continue;
            }
            self.model_buffers.push(MeshBuffers {
                vertex_buffer: self.gpu.create_buffer_init("Mesh Vertex Buffer", &gpu_mesh.vertices, wgpu::BufferUsages::VERTEX),
                index_buffer: self.gpu.create_buffer_init("Mesh Index Buffer", &gpu_mesh.indices, wgpu::BufferUsages::INDEX),
                index_count: gpu_mesh.indices.len() as u32,
            });
        }
        self.set_model_matrix(model.transform.to_transform().matrix);
        log::debug!("uploaded {} mesh buffers for {}", self.model_buffers.len(), model.name);
    }

    /// Free the model's GPU buffers
    pub fn release_model(&mut self) {
        for buffers in self.model_buffers.drain(..) {
            buffers.vertex_buffer.destroy();
            buffers.index_buffer.destroy();
        }
    }

    /// Whether model buffers are resident
    pub fn has_model(&self) -> bool {
        !self.model_buffers.is_empty()
    }

    /// Resize renderer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.gpu.device, &self.surface_config);
        self.depth_view = Self::create_depth_view(&self.gpu.device, width, height, self.sample_count());
        if self.config.enable_multisampling {
            self.msaa_view = Some(Self::create_msaa_view(&self.gpu.device, width, height, self.surface_config.format));
        }
    }

    /// Draw one frame and present it
    pub fn render(&mut self) -> Result<()> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Reconfigure and skip this frame
                self.surface.configure(&self.gpu.device, &self.surface_config);
                return Ok(());
            }
            Err(e) => return Err(Error::Gpu(format!("Failed to get surface texture: {:?}", e))),
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Studio Render Encoder"),
        });

        let (color_attachment, resolve_target) = match &self.msaa_view {
            Some(msaa_view) => (msaa_view, Some(&view)),
            None => (&view, None),
        };
        let [r, g, b] = self.config.background_color;

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Studio Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_attachment,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a: 1.0 }),
                        store: wgpu::StoreOp::Store,
                    },
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

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            for buffers in &self.model_buffers {
                render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..buffers.index_count, 0, 0..1);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Drop for StudioRenderer<'_> {
    fn drop(&mut self) {
        self.release_model();
    }
}
