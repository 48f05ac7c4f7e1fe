pub use glam;

pub mod transform;

pub use transform::{Transform, compose_chain, try_inverse};
