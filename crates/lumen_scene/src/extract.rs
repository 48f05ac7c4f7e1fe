use glam::Mat4;
use log::{debug, info, warn};
use lumen_assets::{Scene, SourceMesh, Vertex, interleave};
use serde::{Deserialize, Serialize};

use crate::resolve::{NodeIndex, ResolverKind, find_node_transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub resolver: ResolverKind,
}

/// Outcome of looking up the node that owns a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldTransform {
    Resolved(Mat4),
    /// No node carries the mesh's name.
    Unresolved,
}

impl WorldTransform {
    pub fn resolved(&self) -> Option<Mat4> {
        match self {
            WorldTransform::Resolved(matrix) => Some(*matrix),
            WorldTransform::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, WorldTransform::Resolved(_))
    }
}

impl From<Option<Mat4>> for WorldTransform {
    fn from(matrix: Option<Mat4>) -> Self {
        matrix.map_or(WorldTransform::Unresolved, WorldTransform::Resolved)
    }
}

/// What a consumer should do with a mesh whose transform did not resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedTransform {
    /// Leave the mesh out.
    #[default]
    Skip,
    /// Use an all-zero matrix, which collapses the mesh to a point.
    Zeroed,
    /// Draw the mesh in its own local space.
    Identity,
}

/// GPU-ready geometry of one source mesh plus where it sits in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableMesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub world_transform: WorldTransform,
}

impl RenderableMesh {
    /// Interleaved `[px,py,pz, nx,ny,nz, u,v]` floats, `vertex_count * 8` long.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        interleave(&self.vertices)
    }

    /// Flattened triangle indices, `face_count * 3` long.
    pub fn index_buffer(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The matrix to upload for this mesh, or `None` if it should not be drawn.
    pub fn model_matrix(&self, policy: UnresolvedTransform) -> Option<Mat4> {
        match (self.world_transform, policy) {
            (WorldTransform::Resolved(matrix), _) => Some(matrix),
            (WorldTransform::Unresolved, UnresolvedTransform::Skip) => None,
            (WorldTransform::Unresolved, UnresolvedTransform::Zeroed) => Some(Mat4::ZERO),
            (WorldTransform::Unresolved, UnresolvedTransform::Identity) => Some(Mat4::IDENTITY),
        }
    }
}

/// Produces one [`RenderableMesh`] per source mesh, in the scene's mesh order.
///
/// Each mesh's transform comes from the first node (depth-first pre-order)
/// whose name equals the mesh name. Meshes without such a node are still
/// returned, tagged [`WorldTransform::Unresolved`].
pub fn extract_meshes(scene: &Scene, settings: &ExtractSettings) -> Vec<RenderableMesh> {
    let index = match settings.resolver {
        ResolverKind::Indexed => Some(NodeIndex::build(scene)),
        ResolverKind::Search => None,
    };
    let resolve = |name: &str| match &index {
        Some(index) => index.world_transform(scene, name),
        None => find_node_transform(scene, name),
    };

    let meshes: Vec<RenderableMesh> = scene
        .meshes()
        .iter()
        .map(|mesh| {
            let extracted = extract_mesh(mesh, resolve(mesh.name()).into());
            debug!(
                "Extracted '{}': {} vertices, {} indices",
                extracted.name,
                extracted.vertex_count(),
                extracted.indices.len()
            );
            if !extracted.world_transform.is_resolved() {
                warn!("No node named '{}', transform unresolved", extracted.name);
            }
            extracted
        })
        .collect();

    let unresolved = meshes
        .iter()
        .filter(|mesh| !mesh.world_transform.is_resolved())
        .count();
    info!(
        "Extracted {} meshes ({} unresolved) using {:?} resolver",
        meshes.len(),
        unresolved,
        settings.resolver
    );

    meshes
}

pub fn extract_meshes_default(scene: &Scene) -> Vec<RenderableMesh> {
    extract_meshes(scene, &ExtractSettings::default())
}

fn extract_mesh(mesh: &SourceMesh, world_transform: WorldTransform) -> RenderableMesh {
    // Interleave vertices (Position + Normal + UV)
    let vertices = mesh
        .positions()
        .iter()
        .zip(mesh.normals())
        .zip(mesh.tex_coords())
        .map(|((&position, &normal), &uv)| Vertex::new(position, normal, uv))
        .collect();

    let indices = mesh.faces().iter().flatten().copied().collect();

    RenderableMesh {
        name: mesh.name().to_owned(),
        vertices,
        indices,
        world_transform,
    }
}
