use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::{util::DeviceExt, BindGroup, Buffer, CompareFunction, RenderPipeline};

use super::render::{Renderer, DEPTH_FORMAT};
use super::view_data::{Vertex, ViewData};
use crate::camera::Camera;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

struct ViewBuffer {
    camera_bind_group: BindGroup,
    globals_buffer: Buffer,
}

/// Pipeline and per-frame uniforms of one render target.
#[derive(Default)]
pub(crate) struct ViewCore {
    view_buffer: Option<ViewBuffer>,
    pipeline: Option<RenderPipeline>,
}

impl ViewCore {
    fn init(&mut self, render: &Renderer) {
        let camera_bind_group_layout =
            render
                .device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("camera_bind_group_layout"),
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

        let globals_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("globals_buffer"),
                contents: bytemuck::cast_slice(&[0.0f32; 64]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let camera_bind_group = render.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: None,
        });

        let shader = render
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
            });

        let render_pipeline_layout =
            render
                .device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("render_pipeline_layout"),
                    bind_group_layouts: &[&camera_bind_group_layout],
                    push_constant_ranges: &[],
                });

        let pipeline = render
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("render_pipeline"),
                layout: Some(&render_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: render.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    // glTF assets are not guaranteed to be closed or consistently wound.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            });

        self.view_buffer = Some(ViewBuffer {
            camera_bind_group,
            globals_buffer,
        });
        self.pipeline = Some(pipeline);
    }

    /// Builds the pipeline on first use and uploads this frame's matrices.
    pub(crate) fn prepare(&mut self, render: &Renderer, camera: &Camera, model: Matrix4<f32>) {
        if self.view_buffer.is_none() || self.pipeline.is_none() {
            self.init(render);
        }
        let Some(view_buffer) = self.view_buffer.as_ref() else {
            return;
        };

        let mut normal = model.invert().unwrap_or(Matrix4::identity());
        normal.transpose_self();
        let globals = Globals {
            view: camera.view_matrix().into(),
            proj: camera.projection_matrix().into(),
            model: model.into(),
            normal: normal.into(),
        };
        render
            .queue
            .write_buffer(&view_buffer.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    pub(crate) fn render<'b, 'a: 'b>(&'a self, render_pass: &'b mut wgpu::RenderPass<'a>, data: Option<&'a ViewData>) {
        let (Some(view_buffer), Some(pipeline), Some(data)) = (self.view_buffer.as_ref(), self.pipeline.as_ref(), data) else {
            return;
        };
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &view_buffer.camera_bind_group, &[]);
        data.render(render_pass);
    }
}
