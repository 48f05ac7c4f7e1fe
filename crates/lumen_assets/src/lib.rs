pub mod assets;
pub mod error;
pub mod importer;
pub mod scene;

pub use assets::{Vertex, interleave};
pub use error::{ImportError, SceneError};
pub use importer::{ImportSettings, load_scene};
pub use scene::{NodeId, Scene, SceneBuilder, SceneNode, SourceMesh};
