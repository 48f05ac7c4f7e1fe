use glam::Mat4;
use lumen_core::{Transform, try_inverse};
use lumen_scene::{RenderableMesh, UnresolvedTransform};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SceneReport {
    pub source: String,
    pub node_count: usize,
    pub meshes: Vec<MeshReport>,
}

#[derive(Debug, Serialize)]
pub struct MeshReport {
    pub name: String,
    pub vertices: usize,
    pub faces: usize,
    pub resolved: bool,
    /// Matrix that would be uploaded, after the unresolved policy.
    pub model: Option<[f32; 16]>,
    /// Decomposed `model`; absent when it is singular.
    pub transform: Option<Transform>,
}

impl MeshReport {
    pub fn new(mesh: &RenderableMesh, policy: UnresolvedTransform) -> Self {
        let model = mesh.model_matrix(policy);
        Self {
            name: mesh.name.clone(),
            vertices: mesh.vertex_count(),
            faces: mesh.face_count(),
            resolved: mesh.world_transform.is_resolved(),
            model: model.as_ref().map(Mat4::to_cols_array),
            transform: model
                .filter(|m| try_inverse(m).is_some())
                .as_ref()
                .map(Transform::from_matrix),
        }
    }
}

impl SceneReport {
    pub fn new(
        source: impl Into<String>,
        node_count: usize,
        meshes: &[RenderableMesh],
        policy: UnresolvedTransform,
    ) -> Self {
        Self {
            source: source.into(),
            node_count,
            meshes: meshes.iter().map(|m| MeshReport::new(m, policy)).collect(),
        }
    }

    pub fn drawable(&self) -> usize {
        self.meshes.iter().filter(|m| m.model.is_some()).count()
    }
}
