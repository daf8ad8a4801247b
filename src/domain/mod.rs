//! Domain layer: classification forest and label selection
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
mod encoder;
pub mod entities;
pub mod error;
pub mod forest;
pub mod seed;
pub mod selection;

pub use builder::ForestBuilder;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use forest::{Forest, ForestNode, NodeData, NodeId, PATH_SEPARATOR};
pub use seed::{resolve_tags, TagResolution};
pub use selection::SelectionManager;
