use std::io::BufRead;
use std::path::Path;

use glam::Mat4;
use log::{debug, warn};

use crate::{
    error::ImportError,
    importer::{ImportSettings, ROOT_NODE_NAME},
    scene::{Scene, SceneBuilder, SourceMesh},
};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

pub fn parse_obj(path: &Path, settings: &ImportSettings) -> Result<Scene, ImportError> {
    let source = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_owned(),
        source,
    })?;
    let root_name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(ROOT_NODE_NAME);

    parse_obj_buf(&mut source.as_slice(), root_name, settings)
}

/// Builds a flat scene from OBJ text: a root node named `root_name` with one
/// identity-transform child per OBJ object, each owning the mesh of the same
/// name.
pub fn parse_obj_buf<B: BufRead>(
    reader: &mut B,
    root_name: &str,
    settings: &ImportSettings,
) -> Result<Scene, ImportError> {
    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: settings.triangulate,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    // Materials are not imported.
    let (models, _) = tobj::load_obj_buf(reader, &options, |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    let mut builder = SceneBuilder::new(root_name, Mat4::IDENTITY);
    let root = builder.root();

    for model in models {
        let name = model.name;
        let mesh = model.mesh;

        if let Some(&arity) = mesh.face_arities.iter().find(|&&arity| arity != 3) {
            return Err(ImportError::NonTriangularFace { mesh: name, arity });
        }

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        if positions.is_empty() {
            return Err(ImportError::MissingPositions(name));
        }

        let normals: Vec<[f32; 3]> = if mesh.normals.is_empty() {
            warn!("OBJ object '{name}' has no normals, using {DEFAULT_NORMAL:?}");
            vec![DEFAULT_NORMAL; positions.len()]
        } else {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        };

        let tex_coords: Vec<[f32; 2]> = if mesh.texcoords.is_empty() {
            warn!("OBJ object '{name}' has no texture coordinates, using {DEFAULT_UV:?}");
            vec![DEFAULT_UV; positions.len()]
        } else {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| settings.apply_uv_flip([t[0], t[1]]))
                .collect()
        };

        let faces: Vec<[u32; 3]> = mesh
            .indices
            .chunks_exact(3)
            .map(|f| [f[0], f[1], f[2]])
            .collect();

        debug!(
            "OBJ object '{}': {} vertices, {} faces",
            name,
            positions.len(),
            faces.len()
        );

        let mesh_index = builder.add_mesh(SourceMesh::new(
            name.clone(),
            positions,
            normals,
            tex_coords,
            faces,
        )?);
        let node = builder.add_node(root, name, Mat4::IDENTITY)?;
        builder.attach_mesh(node, mesh_index)?;
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
o Floor
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vn 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
o Marker
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 0 1
f 5/5/2 6/6/2 7/7/2
";

    fn parse(settings: &ImportSettings) -> Result<Scene, ImportError> {
        parse_obj_buf(&mut TWO_OBJECTS.as_bytes(), "level", settings)
    }

    #[test]
    fn each_object_gets_a_node_and_a_mesh() {
        let scene = parse(&ImportSettings::default()).unwrap();

        let root = scene.node(scene.root());
        assert_eq!(root.name, "level");
        assert_eq!(root.children.len(), 2);

        let names: Vec<_> = scene.meshes().iter().map(SourceMesh::name).collect();
        assert_eq!(names, ["Floor", "Marker"]);

        for (i, &child) in root.children.iter().enumerate() {
            let node = scene.node(child);
            assert_eq!(node.name, scene.meshes()[i].name());
            assert_eq!(node.meshes, vec![i]);
            assert_eq!(node.local_transform, Mat4::IDENTITY);
        }
    }

    #[test]
    fn quads_are_triangulated() {
        let scene = parse(&ImportSettings::default()).unwrap();
        let floor = &scene.meshes()[0];

        assert_eq!(floor.vertex_count(), 4);
        assert_eq!(floor.face_count(), 2);
        assert!(floor.normals().iter().all(|&n| n == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn quads_without_triangulation_are_rejected() {
        let err = parse(&ImportSettings {
            triangulate: false,
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, ImportError::NonTriangularFace { arity: 4, .. }));
    }

    #[test]
    fn uvs_are_flipped_by_default() {
        let scene = parse(&ImportSettings::default()).unwrap();
        let marker = &scene.meshes()[1];
        assert_eq!(marker.tex_coords()[2], [0.0, 0.0]);

        let scene = parse(&ImportSettings {
            flip_uvs: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(scene.meshes()[1].tex_coords()[2], [0.0, 1.0]);
    }

    #[test]
    fn missing_attributes_get_defaults() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let scene = parse_obj_buf(&mut source.as_bytes(), "bare", &ImportSettings::default()).unwrap();
        let mesh = &scene.meshes()[0];

        assert_eq!(mesh.normals(), &[DEFAULT_NORMAL; 3]);
        assert_eq!(mesh.tex_coords(), &[DEFAULT_UV; 3]);
    }
}
