use std::ffi::OsStr;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::{error::ImportError, scene::Scene};

pub mod gltf_parser;
pub mod obj_parser;

/// Name of the synthetic node that parents everything an importer produces
/// when the file format has no single root of its own.
pub const ROOT_NODE_NAME: &str = "RootNode";

/// Post-processing applied while importing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Split strips, fans and polygons into triangles.
    pub triangulate: bool,
    /// Map `v` to `1 - v` so textures come out upright in OpenGL-style samplers.
    pub flip_uvs: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_uvs: true,
        }
    }
}

impl ImportSettings {
    pub(crate) fn apply_uv_flip(&self, uv: [f32; 2]) -> [f32; 2] {
        if self.flip_uvs { [uv[0], 1.0 - uv[1]] } else { uv }
    }
}

/// Parses a model file into a [`Scene`]. The format is picked from the file
/// extension.
pub fn load_scene(path: impl AsRef<Path>, settings: &ImportSettings) -> Result<Scene, ImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    info!("Loading scene: {}", path.display());
    let scene = match extension.as_str() {
        "gltf" | "glb" => gltf_parser::parse_gltf(path, settings)?,
        "obj" => obj_parser::parse_obj(path, settings)?,
        _ => return Err(ImportError::UnsupportedFormat(extension)),
    };
    info!(
        "Loaded {}: {} nodes, {} meshes",
        path.display(),
        scene.nodes().len(),
        scene.mesh_count()
    );

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_scene("model.fbx", &ImportSettings::default()).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ext) if ext == "fbx"));
    }

    #[test]
    fn missing_obj_file_is_an_io_error() {
        let path = std::env::temp_dir().join("lumen-does-not-exist.obj");
        let err = load_scene(&path, &ImportSettings::default()).unwrap_err();
        assert!(matches!(err, ImportError::Io { path: reported, .. } if reported == path));
    }

    #[test]
    fn missing_gltf_file_is_the_same_io_error() {
        for name in ["lumen-does-not-exist.gltf", "lumen-does-not-exist.glb"] {
            let path = std::env::temp_dir().join(name);
            let err = load_scene(&path, &ImportSettings::default()).unwrap_err();
            assert!(
                matches!(&err, ImportError::Io { path: reported, .. } if *reported == path),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn obj_file_round_trip_through_disk() {
        let path = std::env::temp_dir().join(format!("lumen-quad-{}.obj", std::process::id()));
        std::fs::write(
            &path,
            "o Quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let scene = load_scene(&path, &ImportSettings::default());
        std::fs::remove_file(&path).ok();
        let scene = scene.unwrap();

        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.meshes()[0].face_count(), 2);
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let settings: ImportSettings = serde_json::from_str(r#"{ "flip_uvs": false }"#).unwrap();
        assert_eq!(
            settings,
            ImportSettings {
                triangulate: true,
                flip_uvs: false
            }
        );
    }

    #[test]
    fn uv_flip_mirrors_v_only() {
        let flip = ImportSettings::default();
        assert_eq!(flip.apply_uv_flip([0.25, 0.75]), [0.25, 0.25]);

        let keep = ImportSettings {
            flip_uvs: false,
            ..Default::default()
        };
        assert_eq!(keep.apply_uv_flip([0.25, 0.75]), [0.25, 0.75]);
    }
}
