//! GPU upload of extracted meshes: one vertex, index and model-uniform
//! buffer per [`RenderableMesh`](lumen_scene::RenderableMesh).

mod context;
mod error;
pub mod mesh;

pub use context::{GpuContext, mesh_bind_group_layout};
pub use error::RenderError;
pub use mesh::{GpuMesh, GpuVertex, MeshUniform, gpu_vertices, upload_meshes};
