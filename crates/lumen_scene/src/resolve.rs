use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::iter;

use glam::Mat4;
use log::debug;
use lumen_assets::{NodeId, Scene};
use lumen_core::compose_chain;
use serde::{Deserialize, Serialize};

/// How a mesh name is mapped to its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Walk the tree once per mesh.
    Search,
    /// Build a name -> node map once and look every mesh up in it.
    #[default]
    Indexed,
}

/// Finds the first node named `target` in depth-first pre-order and returns
/// its world transform, or `None` if no node has that name.
pub fn find_node_transform(scene: &Scene, target: &str) -> Option<Mat4> {
    find_node(scene, scene.root(), target).map(|id| world_transform_of(scene, id))
}

/// Depth-first search below (and including) `from`. Stops at the first match;
/// later siblings are not visited.
pub fn find_node(scene: &Scene, from: NodeId, target: &str) -> Option<NodeId> {
    scene
        .pre_order_from(from)
        .find(|(_, node)| node.name == target)
        .map(|(id, _)| id)
}

/// The node's local transform post-multiplied by each ancestor's local
/// transform, parent first and root last: `((local * parent) * grandparent) ...`.
pub fn world_transform_of(scene: &Scene, node: NodeId) -> Mat4 {
    let local = &scene.node(node).local_transform;
    let ancestors = scene
        .ancestors(node)
        .map(|(_, ancestor)| &ancestor.local_transform);
    compose_chain(iter::once(local).chain(ancestors))
}

/// Name -> node lookup built in one pass.
///
/// Uses the same pre-order as [`find_node`] and keeps the first node seen for
/// each name, so lookups agree with a fresh search.
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    by_name: HashMap<String, NodeId>,
}

impl NodeIndex {
    pub fn build(scene: &Scene) -> Self {
        let mut by_name = HashMap::with_capacity(scene.nodes().len());
        for (id, node) in scene.pre_order() {
            match by_name.entry(node.name.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
                Entry::Occupied(first) => {
                    debug!(
                        "Node name '{}' is not unique, keeping {:?} over {:?}",
                        node.name,
                        first.get(),
                        id
                    );
                }
            }
        }
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn world_transform(&self, scene: &Scene, name: &str) -> Option<Mat4> {
        self.get(name).map(|id| world_transform_of(scene, id))
    }
}
