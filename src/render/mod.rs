use anyhow::Result;
use cgmath::{Matrix4, SquareMatrix};

use crate::surface::FrameInput;

pub mod render;
mod view_core;
mod view_data;

use render::Renderer;
use view_core::ViewCore;
use view_data::ViewData;

/// Draws frames of the current model into one canvas.
///
/// Geometry is uploaded once per model; a new revision in the frame input
/// means the model was replaced and the buffers are rebuilt.
pub struct SceneRenderer {
    pub render: Renderer,
    view_core: ViewCore,
    data: Option<ViewData>,
    revision: Option<u64>,
}

impl SceneRenderer {
    pub fn new(render: Renderer) -> Self {
        Self {
            render,
            view_core: ViewCore::default(),
            data: None,
            revision: None,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.render.resize(width, height);
    }

    pub fn render(&mut self, frame: &FrameInput<'_>) -> Result<()> {
        if self.revision != Some(frame.revision) {
            self.data = frame.model.map(ViewData::from_model);
            self.revision = Some(frame.revision);
        }
        if let Some(data) = self.data.as_mut() {
            data.sync(&self.render);
        }
        let model = frame
            .model
            .map(|model| model.transform())
            .unwrap_or(Matrix4::identity());
        self.view_core.prepare(&self.render, frame.camera, model);

        let texture = match self.render.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.render.reconfigure();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .render
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.render.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_viewport(
                0.0,
                0.0,
                self.render.w() as f32,
                self.render.h() as f32,
                0.0,
                1.0,
            );
            self.view_core.render(&mut render_pass, self.data.as_ref());
        }
        self.render.queue.submit(std::iter::once(encoder.finish()));
        texture.present();
        Ok(())
    }
}
