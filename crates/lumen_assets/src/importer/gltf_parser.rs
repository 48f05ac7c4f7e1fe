use std::path::Path;

use glam::Mat4;
use gltf::mesh::Mode;
use log::{debug, warn};

use crate::{
    error::{ImportError, SceneError},
    importer::{ImportSettings, ROOT_NODE_NAME},
    scene::{NodeId, Scene, SceneBuilder, SourceMesh},
};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

pub fn parse_gltf(path: &Path, settings: &ImportSettings) -> Result<Scene, ImportError> {
    // Report an absent file like the OBJ path does; buffer errors stay glTF errors.
    std::fs::metadata(path).map_err(|source| ImportError::Io {
        path: path.to_owned(),
        source,
    })?;

    // A. Load Document & Buffers
    let (document, buffers, _images) = gltf::import(path)?;
    build_scene(&document, &buffers, settings)
}

/// Converts an already imported glTF document into a [`Scene`].
///
/// Every mesh primitive becomes its own [`SourceMesh`] named after the glTF
/// mesh; the default scene's root nodes hang below a synthetic
/// [`ROOT_NODE_NAME`] node.
pub fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    settings: &ImportSettings,
) -> Result<Scene, ImportError> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ImportError::NoScene)?;

    let mut builder = SceneBuilder::new(ROOT_NODE_NAME, Mat4::IDENTITY);

    // --- STEP 1: MESHES ---
    // Maps glTF mesh index -> our mesh indices (one per primitive)
    let mut mesh_map = Vec::with_capacity(document.meshes().len());
    for mesh in document.meshes() {
        let name = mesh
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Mesh.{:03}", mesh.index()));

        let mut slots = Vec::new();
        for primitive in mesh.primitives() {
            let source = read_primitive(&name, &primitive, buffers, settings)?;
            debug!(
                "glTF mesh '{}' primitive {}: {} vertices, {} faces",
                name,
                primitive.index(),
                source.vertex_count(),
                source.face_count()
            );
            slots.push(builder.add_mesh(source));
        }
        mesh_map.push(slots);
    }

    // --- STEP 2: NODES (The Hierarchy) ---
    let root = builder.root();
    for node in gltf_scene.nodes() {
        add_node(&mut builder, root, node, &mesh_map)?;
    }

    Ok(builder.build()?)
}

fn add_node(
    builder: &mut SceneBuilder,
    parent: NodeId,
    node: gltf::Node,
    mesh_map: &[Vec<usize>],
) -> Result<(), SceneError> {
    let name = node
        .name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Node.{:03}", node.index()));
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let id = builder.add_node(parent, name, local_transform)?;

    if let Some(mesh) = node.mesh() {
        for &slot in &mesh_map[mesh.index()] {
            builder.attach_mesh(id, slot)?;
        }
    }
    for child in node.children() {
        add_node(builder, id, child, mesh_map)?;
    }
    Ok(())
}

fn read_primitive(
    name: &str,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    settings: &ImportSettings,
) -> Result<SourceMesh, ImportError> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    // Extract Positions
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(|iter| iter.collect())
        .ok_or_else(|| ImportError::MissingPositions(name.to_owned()))?;
    let vertex_count = positions.len();

    // Extract Normals (or generate default up-vector)
    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(iter) => iter.collect(),
        None => {
            warn!("glTF mesh '{name}' has no normals, using {DEFAULT_NORMAL:?}");
            vec![DEFAULT_NORMAL; vertex_count]
        }
    };

    // Extract UVs (or 0.0)
    let tex_coords: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
        Some(read) => read
            .into_f32()
            .map(|uv| settings.apply_uv_flip(uv))
            .collect(),
        None => {
            warn!("glTF mesh '{name}' has no TEXCOORD_0, using {DEFAULT_UV:?}");
            vec![DEFAULT_UV; vertex_count]
        }
    };

    // Extract Indices (non-indexed primitives draw vertices in order)
    let indices: Vec<u32> = reader
        .read_indices()
        .map(|read| read.into_u32().collect())
        .unwrap_or_else(|| (0..vertex_count as u32).collect());

    let mode = primitive.mode();
    let faces = match mode {
        Mode::Triangles => triangles(&indices),
        Mode::TriangleStrip if settings.triangulate => triangle_strip(&indices),
        Mode::TriangleFan if settings.triangulate => triangle_fan(&indices),
        _ => {
            return Err(ImportError::UnsupportedPrimitive {
                mesh: name.to_owned(),
                mode,
            });
        }
    };

    Ok(SourceMesh::new(name, positions, normals, tex_coords, faces)?)
}

fn triangles(indices: &[u32]) -> Vec<[u32; 3]> {
    let chunks = indices.chunks_exact(3);
    if !chunks.remainder().is_empty() {
        warn!("Dropping {} trailing indices", chunks.remainder().len());
    }
    chunks.map(|c| [c[0], c[1], c[2]]).collect()
}

// glTF spec section 3.7.2.1: strip triangle i is {v_i, v_i+(1+i%2), v_i+(2-i%2)}
fn triangle_strip(indices: &[u32]) -> Vec<[u32; 3]> {
    (0..indices.len().saturating_sub(2))
        .map(|i| {
            if i % 2 == 0 {
                [indices[i], indices[i + 1], indices[i + 2]]
            } else {
                [indices[i], indices[i + 2], indices[i + 1]]
            }
        })
        .collect()
}

// Fan triangle i is {v_i+1, v_i+2, v_0}
fn triangle_fan(indices: &[u32]) -> Vec<[u32; 3]> {
    (0..indices.len().saturating_sub(2))
        .map(|i| [indices[i + 1], indices[i + 2], indices[0]])
        .collect()
}
