use glam::Mat4;

use crate::error::SceneError;

/// Index of a node in its [`Scene`]'s node table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub local_transform: Mat4,
    pub children: Vec<NodeId>,
    /// Navigation only; nodes are owned by the scene's node table.
    pub parent: Option<NodeId>,
    pub meshes: Vec<usize>, // Indices into the scene's mesh list
}

/// Raw per-vertex attributes and triangles of one imported mesh.
///
/// Attribute arrays always have the same length and every face index is in
/// range; [`SourceMesh::new`] is the only way to build one.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMesh {
    name: String,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    faces: Vec<[u32; 3]>,
}

impl SourceMesh {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        tex_coords: Vec<[f32; 2]>,
        faces: Vec<[u32; 3]>,
    ) -> Result<Self, SceneError> {
        let name = name.into();
        if normals.len() != positions.len() {
            return Err(SceneError::NormalCountMismatch {
                mesh: name,
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if tex_coords.len() != positions.len() {
            return Err(SceneError::TexCoordCountMismatch {
                mesh: name,
                positions: positions.len(),
                tex_coords: tex_coords.len(),
            });
        }
        for (face, indices) in faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
                return Err(SceneError::IndexOutOfRange {
                    mesh: name,
                    face,
                    index,
                    positions: positions.len(),
                });
            }
        }

        Ok(Self {
            name,
            positions,
            normals,
            tex_coords,
            faces,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// UV channel 0.
    pub fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// An imported scene: a node tree plus a flat mesh list.
///
/// Read-only once built.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    meshes: Vec<SourceMesh>,
    root: NodeId,
}

impl Scene {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn meshes(&self) -> &[SourceMesh] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Walks from `id`'s parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.node(id).parent,
        }
    }

    /// Depth-first pre-order over the tree, children in declaration order.
    pub fn pre_order(&self) -> PreOrder<'_> {
        self.pre_order_from(self.root)
    }

    /// Depth-first pre-order over the subtree rooted at `id`.
    pub fn pre_order_from(&self, id: NodeId) -> PreOrder<'_> {
        PreOrder {
            scene: self,
            stack: vec![id],
        }
    }
}

pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.scene.node(id);
        self.next = node.parent;
        Some((id, node))
    }
}

pub struct PreOrder<'a> {
    scene: &'a Scene,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.scene.node(id);
        self.stack.extend(node.children.iter().rev());
        Some((id, node))
    }
}

/// Assembles a [`Scene`], keeping parent and child links in sync.
#[derive(Debug)]
pub struct SceneBuilder {
    nodes: Vec<SceneNode>,
    meshes: Vec<SourceMesh>,
}

impl SceneBuilder {
    pub fn new(root_name: impl Into<String>, root_transform: Mat4) -> Self {
        Self {
            nodes: vec![SceneNode {
                name: root_name.into(),
                local_transform: root_transform,
                children: Vec::new(),
                parent: None,
                meshes: Vec::new(),
            }],
            meshes: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_node(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local_transform: Mat4,
    ) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownNode(parent));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.into(),
            local_transform,
            children: Vec::new(),
            parent: Some(parent),
            meshes: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn add_mesh(&mut self, mesh: SourceMesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Records that `node` references mesh `mesh`. The mesh may be added later;
    /// the reference is checked in [`SceneBuilder::build`].
    pub fn attach_mesh(&mut self, node: NodeId, mesh: usize) -> Result<(), SceneError> {
        let node = self
            .nodes
            .get_mut(node.0)
            .ok_or(SceneError::UnknownNode(node))?;
        node.meshes.push(mesh);
        Ok(())
    }

    pub fn build(self) -> Result<Scene, SceneError> {
        let mesh_count = self.meshes.len();
        for node in &self.nodes {
            if let Some(&mesh) = node.meshes.iter().find(|&&m| m >= mesh_count) {
                return Err(SceneError::MeshOutOfRange {
                    node: node.name.clone(),
                    mesh,
                    mesh_count,
                });
            }
        }

        Ok(Scene {
            nodes: self.nodes,
            meshes: self.meshes,
            root: NodeId(0),
        })
    }
}
