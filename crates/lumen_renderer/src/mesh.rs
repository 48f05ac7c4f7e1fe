use std::mem;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use log::{debug, warn};
use lumen_assets::Vertex;
use lumen_core::try_inverse;
use lumen_scene::{RenderableMesh, UnresolvedTransform};
use wgpu::util::DeviceExt;

use crate::context::GpuContext;

/// Attribute locations the shaders bind to.
pub const ATTR_LOC_POSITION: u32 = 0;
pub const ATTR_LOC_NORMAL: u32 = 1;
pub const ATTR_LOC_TEXCOORD_0: u32 = 2;

// #[repr(C)] ensures the compiler doesn't reorder fields.
// Pod (Plain Old Data) and Zeroable allow us to cast this struct to raw bytes safely.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniform {
    // Moves the object from mesh space to its place in the world.
    pub model: [[f32; 4]; 4],
    // Inverse-transpose of the model matrix, for normals.
    pub normal_matrix: [[f32; 4]; 4],
}

impl MeshUniform {
    pub fn from_model(model: Mat4) -> Self {
        // A singular model matrix (e.g. the zeroed fallback) has no inverse.
        let normal_matrix = try_inverse(&model).map_or(Mat4::ZERO, |inverse| inverse.transpose());

        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

/// The GPU-Compatible Vertex: 8 tightly packed floats.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3], // X, Y, Z
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GpuVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: ATTR_LOC_POSITION,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: ATTR_LOC_NORMAL,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: (mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
            shader_location: ATTR_LOC_TEXCOORD_0,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&Vertex> for GpuVertex {
    fn from(vertex: &Vertex) -> Self {
        Self {
            position: vertex.position,
            normal: vertex.normal,
            uv: vertex.uv,
        }
    }
}

/// One mesh living in GPU memory, ready for a single indexed draw.
pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform: MeshUniform,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup, // Passed to render_pass.set_bind_group(..)
}

impl GpuMesh {
    /// Uploads vertex, index and model-uniform buffers for `mesh`.
    ///
    /// Returns `None` when the mesh has no resolved transform and `policy` is
    /// [`UnresolvedTransform::Skip`].
    pub fn upload(
        context: &GpuContext,
        mesh: &RenderableMesh,
        policy: UnresolvedTransform,
    ) -> Option<GpuMesh> {
        let Some(model) = mesh.model_matrix(policy) else {
            warn!("Skipping upload of '{}': transform unresolved", mesh.name);
            return None;
        };

        let vertices = gpu_vertices(mesh);
        let device = &context.device;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(mesh.index_buffer()),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = MeshUniform::from_model(model);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            // COPY_DST allows us to update this buffer later
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Bind Group"),
            layout: &context.mesh_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        debug!(
            "Uploaded '{}': {} vertices, {} indices",
            mesh.name,
            vertices.len(),
            mesh.indices.len()
        );

        Some(GpuMesh {
            name: mesh.name.clone(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform,
            uniform_buffer,
            bind_group,
        })
    }
}

/// Uploads every drawable mesh, keeping extraction order.
pub fn upload_meshes(
    context: &GpuContext,
    meshes: &[RenderableMesh],
    policy: UnresolvedTransform,
) -> Vec<GpuMesh> {
    meshes
        .iter()
        .filter_map(|mesh| GpuMesh::upload(context, mesh, policy))
        .collect()
}

pub fn gpu_vertices(mesh: &RenderableMesh) -> Vec<GpuVertex> {
    mesh.vertices.iter().map(GpuVertex::from).collect()
}
