//! `lumen`: import a model, extract its meshes and report what would be drawn.
//!
//! ```text
//! lumen assets/cube.glb --resolver search --unresolved identity --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use lumen_assets::load_scene;
use lumen_renderer::{GpuContext, upload_meshes};
use lumen_scene::{ResolverKind, UnresolvedTransform, extract_meshes};

mod config;
mod report;

use config::AppConfig;
use report::SceneReport;

#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Inspect the renderable meshes of a glTF or OBJ model")]
struct Cli {
    /// Model file (.gltf, .glb or .obj)
    model: PathBuf,

    /// JSON config file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How mesh names are matched to nodes
    #[arg(long, value_enum)]
    resolver: Option<ResolverArg>,

    /// What to do with meshes that have no matching node
    #[arg(long, value_enum)]
    unresolved: Option<UnresolvedArg>,

    /// Keep texture coordinates as stored in the file
    #[arg(long)]
    no_flip_uvs: bool,

    /// Reject strips, fans and polygons instead of triangulating them
    #[arg(long)]
    no_triangulate: bool,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Upload the meshes to a headless GPU device
    #[arg(long)]
    upload: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ResolverArg {
    Search,
    Indexed,
}

impl From<ResolverArg> for ResolverKind {
    fn from(arg: ResolverArg) -> Self {
        match arg {
            ResolverArg::Search => ResolverKind::Search,
            ResolverArg::Indexed => ResolverKind::Indexed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnresolvedArg {
    Skip,
    Zeroed,
    Identity,
}

impl From<UnresolvedArg> for UnresolvedTransform {
    fn from(arg: UnresolvedArg) -> Self {
        match arg {
            UnresolvedArg::Skip => UnresolvedTransform::Skip,
            UnresolvedArg::Zeroed => UnresolvedTransform::Zeroed,
            UnresolvedArg::Identity => UnresolvedTransform::Identity,
        }
    }
}

impl Cli {
    fn resolve_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut AppConfig) {
        if let Some(resolver) = self.resolver {
            config.extract.resolver = resolver.into();
        }
        if let Some(unresolved) = self.unresolved {
            config.unresolved = unresolved.into();
        }
        if self.no_flip_uvs {
            config.import.flip_uvs = false;
        }
        if self.no_triangulate {
            config.import.triangulate = false;
        }
        config.upload |= self.upload;
    }
}

fn main() -> Result<()> {
    // RUST_LOG still wins; default to info so the summary is visible.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let scene = load_scene(&cli.model, &config.import)
        .with_context(|| format!("importing {}", cli.model.display()))?;
    let meshes = extract_meshes(&scene, &config.extract);

    let report = SceneReport::new(
        cli.model.display().to_string(),
        scene.nodes().len(),
        &meshes,
        config.unresolved,
    );

    for mesh in &report.meshes {
        match &mesh.transform {
            Some(t) => info!(
                "{}: {} vertices, {} faces, translation {:?}, scale {:?}",
                mesh.name, mesh.vertices, mesh.faces, t.translation, t.scale
            ),
            None if mesh.model.is_some() => info!(
                "{}: {} vertices, {} faces, singular model matrix",
                mesh.name, mesh.vertices, mesh.faces
            ),
            None => warn!(
                "{}: {} vertices, {} faces, not drawn",
                mesh.name, mesh.vertices, mesh.faces
            ),
        }
    }
    info!(
        "{} of {} meshes drawable ({:?} policy)",
        report.drawable(),
        report.meshes.len(),
        config.unresolved
    );

    if config.upload {
        let context = GpuContext::headless().context("opening a headless GPU device")?;
        let uploaded = upload_meshes(&context, &meshes, config.unresolved);
        info!(
            "Uploaded {} meshes to {}",
            uploaded.len(),
            context.adapter_info.name
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
