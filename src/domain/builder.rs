//! Forest builder: turns nested tree descriptions into an arena-backed forest.

use tracing::debug;

use crate::domain::entities::TreeNode;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::{Forest, NodeData, NodeId, PATH_SEPARATOR};

/// Constructs a [`Forest`] from externally supplied root nodes.
///
/// Assigns every node a stable [`NodeId`] and enforces the label invariants:
/// each leaf carries a non-empty label, and every `label` names exactly one
/// node and is never also used as an extra label. Stored tags therefore map
/// back to a single node.
#[derive(Debug, Default)]
pub struct ForestBuilder {
    forest: Forest,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest from ordered root nodes. Child order is preserved.
    pub fn build(mut self, roots: &[TreeNode]) -> DomainResult<Forest> {
        let mut stack: Vec<(&TreeNode, Option<NodeId>)> =
            roots.iter().rev().map(|node| (node, None)).collect();

        while let Some((node, parent)) = stack.pop() {
            let id = self.forest.insert_node(
                NodeData {
                    name: node.name.clone(),
                    label: node.label.clone(),
                    extra_label: node.extra_label.clone(),
                },
                parent,
            );

            if node.is_leaf() {
                self.register_leaf(node, id)?;
            }

            // Reverse push keeps siblings in document order
            for child in node.children.iter().rev() {
                stack.push((child, Some(id)));
            }
        }

        self.check_unambiguous_labels()?;

        debug!(
            "built forest: {} roots, {} nodes, depth {}",
            self.forest.roots().len(),
            self.forest.len(),
            self.forest.depth()
        );
        Ok(self.forest)
    }

    fn register_leaf(&mut self, node: &TreeNode, id: NodeId) -> DomainResult<()> {
        let label = node
            .label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .ok_or_else(|| DomainError::UnlabeledLeaf {
                path: self
                    .forest
                    .path(id)
                    .join(&PATH_SEPARATOR.to_string()),
            })?;

        if self.forest.register_leaf(label, id).is_some() {
            return Err(DomainError::DuplicateLeafLabel {
                label: label.to_string(),
            });
        }
        Ok(())
    }

    fn check_unambiguous_labels(&self) -> DomainResult<()> {
        for (_, node) in self.forest.iter() {
            let Some(label) = node.data.label.as_deref() else {
                continue;
            };
            if self.forest.find_by_label(label).len() > 1 || self.forest.is_extra_label(label) {
                return Err(DomainError::AmbiguousLabel {
                    label: label.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Forest {
    /// Convenience for `ForestBuilder::new().build(roots)`.
    pub fn from_nodes(roots: &[TreeNode]) -> DomainResult<Self> {
        ForestBuilder::new().build(roots)
    }
}
