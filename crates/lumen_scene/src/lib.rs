//! Turns an imported [`Scene`](lumen_assets::Scene) into renderable meshes:
//! interleaved vertex data, flat indices and a world transform per mesh.

pub mod extract;
pub mod resolve;

pub use extract::{
    ExtractSettings, RenderableMesh, UnresolvedTransform, WorldTransform, extract_meshes,
    extract_meshes_default,
};
pub use resolve::{NodeIndex, ResolverKind, find_node, find_node_transform, world_transform_of};
