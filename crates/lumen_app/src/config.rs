use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lumen_assets::ImportSettings;
use lumen_scene::{ExtractSettings, UnresolvedTransform};
use serde::{Deserialize, Serialize};

/// Everything `lumen` can be told through a JSON config file. Missing
/// fields keep their defaults; command-line flags are applied on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub import: ImportSettings,
    pub extract: ExtractSettings,
    /// What to do with meshes whose transform could not be resolved.
    pub unresolved: UnresolvedTransform,
    /// Push the extracted meshes into GPU buffers on a headless device.
    pub upload: bool,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_scene::ResolverKind;

    #[test]
    fn empty_object_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.import.flip_uvs);
        assert_eq!(config.extract.resolver, ResolverKind::Indexed);
        assert_eq!(config.unresolved, UnresolvedTransform::Skip);
        assert!(!config.upload);
    }

    #[test]
    fn nested_fields_override_individually() {
        let config = AppConfig::from_json(
            r#"{
                "import": { "flip_uvs": false },
                "extract": { "resolver": "search" },
                "unresolved": "identity",
                "upload": true
            }"#,
        )
        .unwrap();

        assert!(!config.import.flip_uvs);
        assert!(config.import.triangulate);
        assert_eq!(config.extract.resolver, ResolverKind::Search);
        assert_eq!(config.unresolved, UnresolvedTransform::Identity);
        assert!(config.upload);
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(AppConfig::from_json(r#"{ "unresolved": "explode" }"#).is_err());
    }

    #[test]
    fn missing_file_mentions_path() {
        let err = AppConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
