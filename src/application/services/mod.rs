//! Application services
//!
//! Concrete services that orchestrate domain logic. Services depend on I/O
//! boundary traits (FileSystem) but are themselves concrete structs.

mod labels;

pub use labels::{AppliedSelection, ForestFormat, LabelService, SelectionRequest};
