//! Selection manager: tri-state selection over a classification forest.
//!
//! The only stored state is the set of selected leaves. Whether an internal
//! node is selected is always derived from its leaves.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::domain::encoder;
use crate::domain::entities::{Domain, EncodingPolicy, SelectionState};
use crate::domain::forest::{Forest, NodeId};
use crate::domain::seed::{resolve_tags, TagResolution};

/// Selection state machine over a borrowed, read-only [`Forest`].
///
/// Node ids passed to the query and toggle operations must come from the
/// same forest. Ids that do not resolve are treated as selecting nothing.
#[derive(Debug, Clone)]
pub struct SelectionManager<'f> {
    policy: EncodingPolicy,
    forest: &'f Forest,
    selected: HashSet<NodeId>,
}

impl<'f> SelectionManager<'f> {
    /// Create a manager for `domain`, seeded with `initial` nodes.
    ///
    /// A leaf in `initial` selects itself, an internal node selects every
    /// leaf below it.
    pub fn new(domain: Domain, forest: &'f Forest, initial: &[NodeId]) -> Self {
        Self::with_policy(domain.policy(), forest, initial)
    }

    pub fn with_policy(policy: EncodingPolicy, forest: &'f Forest, initial: &[NodeId]) -> Self {
        let selected: HashSet<NodeId> = initial
            .iter()
            .flat_map(|&id| forest.leaves_under(id))
            .collect();
        debug!(
            "selection manager: policy={}, initial nodes={}, selected leaves={}",
            policy,
            initial.len(),
            selected.len()
        );
        Self {
            policy,
            forest,
            selected,
        }
    }

    /// Create a manager seeded from a previously persisted tag list.
    ///
    /// Unknown tags are logged and skipped.
    pub fn from_tags<S: AsRef<str>>(policy: EncodingPolicy, forest: &'f Forest, tags: &[S]) -> Self {
        Self::from_resolution(policy, forest, &resolve_tags(forest, policy, tags))
    }

    /// Create a manager from tags already matched against `forest`.
    pub fn from_resolution(policy: EncodingPolicy, forest: &'f Forest, resolution: &TagResolution) -> Self {
        for tag in &resolution.unknown {
            warn!("ignoring unknown tag: {}", tag);
        }
        Self::with_policy(policy, forest, &resolution.nodes)
    }

    pub fn policy(&self) -> EncodingPolicy {
        self.policy
    }

    pub fn forest(&self) -> &'f Forest {
        self.forest
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected leaves in document order.
    pub fn selected_leaves(&self) -> Vec<NodeId> {
        self.forest
            .iter()
            .map(|(id, _)| id)
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// True iff every leaf reachable from `id` is selected.
    pub fn is_group_fully_selected(&self, id: NodeId) -> bool {
        match self.forest.get_node(id) {
            None => false,
            Some(node) if node.is_leaf() => self.selected.contains(&id),
            Some(node) => node
                .children
                .iter()
                .all(|&child| self.is_group_fully_selected(child)),
        }
    }

    /// True iff at least one leaf reachable from `id` is selected.
    pub fn has_selected_leaf(&self, id: NodeId) -> bool {
        match self.forest.get_node(id) {
            None => false,
            Some(node) if node.is_leaf() => self.selected.contains(&id),
            Some(node) => node
                .children
                .iter()
                .any(|&child| self.has_selected_leaf(child)),
        }
    }

    pub fn selection_state(&self, id: NodeId) -> SelectionState {
        if self.is_group_fully_selected(id) {
            SelectionState::Full
        } else if self.has_selected_leaf(id) {
            SelectionState::Partial
        } else {
            SelectionState::Unselected
        }
    }

    /// Flip the aggregate selection of the subtree rooted at `id`.
    ///
    /// A fully selected subtree is deselected entirely; an unselected or
    /// partially selected subtree becomes fully selected.
    pub fn handle_selection_toggle(&mut self, id: NodeId) {
        if !self.forest.contains(id) {
            warn!("toggle ignored: node {:?} is not part of this forest", id);
            return;
        }

        let was_fully_selected = self.is_group_fully_selected(id);
        let leaves = self.forest.leaves_under(id);
        trace!(
            "toggle {:?}: fully_selected={}, leaves={}",
            id,
            was_fully_selected,
            leaves.len()
        );

        if was_fully_selected {
            for leaf in &leaves {
                self.selected.remove(leaf);
            }
        } else {
            self.selected.extend(leaves);
        }
        debug!("selected leaves after toggle: {}", self.selected.len());
    }

    /// Tags representing the current selection, de-duplicated.
    ///
    /// Order follows the forest walk but is not part of the contract.
    pub fn get_selected(&self) -> Vec<String> {
        match self.policy {
            EncodingPolicy::Compress => encoder::compress(self),
            EncodingPolicy::Expand => encoder::expand(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TreeNode;

    fn forest() -> Forest {
        Forest::from_nodes(&[TreeNode::group(
            "Root",
            vec![TreeNode::leaf("A", "a"), TreeNode::leaf("B", "b")],
        )
        .with_label("root")])
        .unwrap()
    }

    #[test]
    fn given_partial_selection_when_querying_state_then_reports_partial() {
        let forest = forest();
        let root = forest.roots()[0];
        let a = forest.find_leaf("a").unwrap();
        let mut manager = SelectionManager::new(Domain::Location, &forest, &[]);

        assert_eq!(manager.selection_state(root), SelectionState::Unselected);
        manager.handle_selection_toggle(a);
        assert_eq!(manager.selection_state(root), SelectionState::Partial);
        assert_eq!(manager.selection_state(a), SelectionState::Full);
        manager.handle_selection_toggle(root);
        assert_eq!(manager.selection_state(root), SelectionState::Full);
        assert_eq!(manager.selected_leaves().len(), 2);
    }

    #[test]
    fn given_foreign_node_id_when_toggling_then_selection_is_unchanged() {
        let forest = forest();
        let other = forest_with_more_nodes();
        let foreign = other.find_leaf("z").unwrap();
        let mut manager = SelectionManager::new(Domain::Location, &forest, &[]);

        manager.handle_selection_toggle(foreign);

        assert!(manager.is_empty());
        assert!(!manager.is_group_fully_selected(foreign));
    }

    #[test]
    fn given_stored_tags_when_seeding_from_resolution_then_matches_from_tags() {
        let forest = forest();
        let resolution = resolve_tags(&forest, EncodingPolicy::Compress, &["b", "gone"]);

        let manager = SelectionManager::from_resolution(EncodingPolicy::Compress, &forest, &resolution);

        assert_eq!(resolution.unknown, vec!["gone".to_string()]);
        assert_eq!(manager.selected_leaves(), vec![forest.find_leaf("b").unwrap()]);
        assert_eq!(
            manager.selected_leaves(),
            SelectionManager::from_tags(EncodingPolicy::Compress, &forest, &["b", "gone"]).selected_leaves()
        );
    }

    fn forest_with_more_nodes() -> Forest {
        Forest::from_nodes(&[
            TreeNode::leaf("X", "x"),
            TreeNode::leaf("Y", "y"),
            TreeNode::leaf("Z", "z"),
            TreeNode::leaf("W", "w"),
        ])
        .unwrap()
    }
}
