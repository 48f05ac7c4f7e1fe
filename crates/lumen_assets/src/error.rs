use std::path::PathBuf;

use thiserror::Error;

use crate::scene::NodeId;

/// A scene or mesh that breaks the data model's invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("mesh '{mesh}' has {normals} normals for {positions} positions")]
    NormalCountMismatch {
        mesh: String,
        positions: usize,
        normals: usize,
    },
    #[error("mesh '{mesh}' has {tex_coords} texture coordinates for {positions} positions")]
    TexCoordCountMismatch {
        mesh: String,
        positions: usize,
        tex_coords: usize,
    },
    #[error("mesh '{mesh}' face {face} references vertex {index}, but the mesh has {positions} vertices")]
    IndexOutOfRange {
        mesh: String,
        face: usize,
        index: u32,
        positions: usize,
    },
    #[error("node '{node}' references mesh {mesh}, but the scene has {mesh_count} meshes")]
    MeshOutOfRange {
        node: String,
        mesh: usize,
        mesh_count: usize,
    },
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
}

/// Everything that can go wrong turning a model file into a [`Scene`](crate::scene::Scene).
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("glTF import failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("OBJ import failed: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("unsupported model format '{0}'")]
    UnsupportedFormat(String),
    #[error("mesh '{mesh}' uses unsupported primitive mode {mode:?}")]
    UnsupportedPrimitive { mesh: String, mode: gltf::mesh::Mode },
    #[error("mesh '{mesh}' has a face with {arity} vertices and triangulation is disabled")]
    NonTriangularFace { mesh: String, arity: u32 },
    #[error("mesh '{0}' has no vertex positions")]
    MissingPositions(String),
    #[error("file contains no scene")]
    NoScene,
    #[error(transparent)]
    InvalidScene(#[from] SceneError),
}
