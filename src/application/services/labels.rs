//! Label service
//!
//! Loads classification forests and stored tag lists, and drives a selection
//! manager from a request of stored tags plus toggles.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{resolve_tags, EncodingPolicy, Forest, ForestBuilder, SelectionManager, TreeNode};
use crate::infrastructure::traits::FileSystem;

/// On-disk representation of a forest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForestFormat {
    /// Top-level array of nodes, or an object with a `nodes` array
    Json,
    /// `[[nodes]]` tables with nested `[[nodes.children]]`
    Toml,
}

impl ForestFormat {
    /// Pick the format by file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ForestFormat::Toml,
            _ => ForestFormat::Json,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ForestDocument {
    #[serde(default)]
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonForest {
    Nodes(Vec<TreeNode>),
    Document(ForestDocument),
}

/// Stored tags to seed from, then node references to toggle in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    pub tags: Vec<String>,
    /// Labels or `/`-separated name paths
    pub toggles: Vec<String>,
}

/// Outcome of applying a [`SelectionRequest`].
#[derive(Debug)]
pub struct AppliedSelection<'f> {
    pub manager: SelectionManager<'f>,
    /// Stored tags that matched nothing in the forest
    pub unknown_tags: Vec<String>,
}

/// Service for loading forests and tag lists.
pub struct LabelService {
    fs: Arc<dyn FileSystem>,
}

impl LabelService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Parse the nested node description from a forest file.
    pub fn read_nodes(&self, path: &Path) -> ApplicationResult<Vec<TreeNode>> {
        let content = self.fs.read_to_string(path).with_path_context("read forest", path)?;
        let format = ForestFormat::from_path(path);
        debug!("read_nodes: path={}, format={:?}", path.display(), format);

        let invalid = |message: String| ApplicationError::InvalidFile {
            path: path.to_path_buf(),
            message,
        };
        match format {
            ForestFormat::Json => match serde_json::from_str(&content) {
                Ok(JsonForest::Nodes(nodes)) => Ok(nodes),
                Ok(JsonForest::Document(doc)) => Ok(doc.nodes),
                Err(e) => Err(invalid(e.to_string())),
            },
            ForestFormat::Toml => toml::from_str::<ForestDocument>(&content)
                .map(|doc| doc.nodes)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    /// Load and validate a forest file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self, path: &Path) -> ApplicationResult<Forest> {
        let nodes = self.read_nodes(path)?;
        let forest = ForestBuilder::new().build(&nodes)?;
        Ok(forest)
    }

    /// Read a stored tag list (JSON array of strings).
    pub fn read_tags(&self, path: &Path) -> ApplicationResult<Vec<String>> {
        let content = self.fs.read_to_string(path).with_path_context("read tags", path)?;
        serde_json::from_str(&content).map_err(|e| ApplicationError::InvalidFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Persist a tag list as a JSON array.
    pub fn write_tags(&self, path: &Path, tags: &[String]) -> ApplicationResult<()> {
        let mut content =
            serde_json::to_string_pretty(tags).map_err(|e| ApplicationError::OperationFailed {
                context: "serialize tags".to_string(),
                source: Box::new(e),
            })?;
        content.push('\n');

        self.fs.ensure_parent(path).with_path_context("create parent of", path)?;
        self.fs.write(path, &content).with_path_context("write tags", path)?;
        debug!("write_tags: {} tags to {}", tags.len(), path.display());
        Ok(())
    }

    /// Seed a manager from stored tags, then apply toggles in order.
    pub fn apply<'f>(
        &self,
        forest: &'f Forest,
        policy: EncodingPolicy,
        request: &SelectionRequest,
    ) -> ApplicationResult<AppliedSelection<'f>> {
        let resolution = resolve_tags(forest, policy, &request.tags);
        let mut manager = SelectionManager::from_resolution(policy, forest, &resolution);

        for reference in &request.toggles {
            let id = forest.resolve_reference(reference)?;
            manager.handle_selection_toggle(id);
        }

        Ok(AppliedSelection {
            manager,
            unknown_tags: resolution.unknown,
        })
    }
}
