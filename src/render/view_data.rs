use super::render::Renderer;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix, Transform, Vector3};
use wgpu::{util::DeviceExt, Buffer, RenderPass};

use crate::scene::Model;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub point: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyFlags: u32 {
        const DIRTY_NONE = 0b00000000;
        const DIRTY_VERTEX = 0b00000001;
        const DIRTY_FACE = 0b00000010;
        const DIRTY_ALL = Self::DIRTY_VERTEX.bits() | Self::DIRTY_FACE.bits();
    }
}

struct MeshBuffers {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
}

/// One model's geometry flattened into a single vertex/index list, node
/// transforms baked in. The model transform is applied on the GPU.
pub(crate) struct ViewData {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Vec<u32>,
    pub(crate) dirty: DirtyFlags,
    buffers: Option<MeshBuffers>,
}

impl ViewData {
    pub(crate) fn from_model(model: &Model) -> Self {
        let mut vertices = Vec::new();
        let mut triangles = Vec::new();
        model.for_each_mesh(|mesh, local| {
            let normal_mat = normal_matrix(local);
            let base = vertices.len() as u32;
            for (i, p) in mesh.positions.iter().enumerate() {
                let point = local.transform_point(Point3::new(p[0], p[1], p[2]));
                let n = mesh.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
                let normal = normal_mat * Vector3::from(n);
                let normal = if normal.magnitude2() > 0.0 {
                    normal.normalize()
                } else {
                    Vector3::unit_y()
                };
                vertices.push(Vertex {
                    point: point.into(),
                    normal: normal.into(),
                    color: mesh.colors.get(i).copied().unwrap_or(crate::scene::Mesh::DEFAULT_COLOR),
                });
            }
            triangles.extend(mesh.indices.iter().map(|idx| idx + base));
        });

        Self {
            vertices,
            triangles,
            dirty: DirtyFlags::DIRTY_ALL,
            buffers: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// (Re)creates the GPU buffers while any geometry is dirty.
    pub(crate) fn sync(&mut self, render: &Renderer) {
        if self.dirty.is_empty() {
            return;
        }
        self.dirty = DirtyFlags::DIRTY_NONE;
        if self.is_empty() {
            self.buffers = None;
            return;
        }
        let vertex_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("vertex_buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = render
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("index_buffer"),
                contents: bytemuck::cast_slice(&self.triangles),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
        });
    }

    pub(crate) fn render<'b, 'a: 'b>(&'a self, render_pass: &'b mut RenderPass<'a>) {
        let Some(buffers) = self.buffers.as_ref() else {
            return;
        };
        render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        render_pass.set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.triangles.len() as u32, 0, 0..1);
    }
}

/// Inverse transpose of the upper 3x3, falling back to the plain rotation
/// part for singular transforms.
fn normal_matrix(m: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate());
    upper.invert().map(|inv| inv.transpose()).unwrap_or(upper)
}
