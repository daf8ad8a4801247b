use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Separator between display names in a node reference path.
pub const PATH_SEPARATOR: char = '/';

static NEXT_FOREST_ID: AtomicU32 = AtomicU32::new(0);

/// Stable identity of a forest node, assigned when the forest is built.
///
/// Labels are output data only; two nodes are the same node iff their ids
/// are equal. Ids carry the identity of their forest, so an id from another
/// forest never resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    forest: u32,
    index: Index,
}

/// Data payload of a forest node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Display name
    pub name: String,
    /// Tag emitted for this node
    pub label: Option<String>,
    /// Coarser tag emitted when any descendant is selected
    pub extra_label: Option<String>,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({})", self.name, label),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Node in the arena-based forest.
#[derive(Debug)]
pub struct ForestNode {
    pub data: NodeData,
    /// Parent node, None for roots
    pub parent: Option<NodeId>,
    /// Ordered child nodes
    pub children: Vec<NodeId>,
}

impl ForestNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based classification forest.
///
/// Built once by [`ForestBuilder`](crate::domain::ForestBuilder) and read-only
/// afterwards. Node lookups by id are O(1).
#[derive(Debug)]
pub struct Forest {
    id: u32,
    arena: Arena<ForestNode>,
    roots: Vec<NodeId>,
    leaves_by_label: HashMap<String, NodeId>,
    nodes_by_label: HashMap<String, Vec<NodeId>>,
    extra_labels: HashSet<String>,
}

impl Default for Forest {
    fn default() -> Self {
        Self::new()
    }
}

impl Forest {
    pub fn new() -> Self {
        Self {
            id: NEXT_FOREST_ID.fetch_add(1, Ordering::Relaxed),
            arena: Arena::new(),
            roots: Vec::new(),
            leaves_by_label: HashMap::new(),
            nodes_by_label: HashMap::new(),
            extra_labels: HashSet::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_node(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let label = data.label.clone();
        if let Some(extra) = &data.extra_label {
            self.extra_labels.insert(extra.clone());
        }

        let node = ForestNode {
            data,
            parent,
            children: Vec::new(),
        };
        let id = NodeId {
            forest: self.id,
            index: self.arena.insert(node),
        };

        if let Some(label) = label {
            self.nodes_by_label.entry(label).or_default().push(id);
        }

        match parent {
            Some(parent_id) => {
                if let Some(parent) = self.arena.get_mut(parent_id.index) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }

        id
    }

    /// Record `id` as the leaf owning `label`. Returns the previous owner, if any.
    pub(crate) fn register_leaf(&mut self, label: &str, id: NodeId) -> Option<NodeId> {
        self.leaves_by_label.insert(label.to_string(), id)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&ForestNode> {
        if id.forest != self.id {
            return None;
        }
        self.arena.get(id.index)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// True iff `id` resolves to a node without children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(ForestNode::is_leaf)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        match self.get_node(id) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Every leaf of the subtree rooted at `id`, in document order.
    ///
    /// A leaf yields itself; an unknown id yields nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: NodeId, leaves: &mut Vec<NodeId>) {
        if let Some(node) = self.get_node(id) {
            if node.is_leaf() {
                leaves.push(id);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }

    /// Labels of all leaves in the forest, in document order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .filter_map(|(_, node)| node.data.label.as_deref())
            .collect()
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get_node(id).and_then(|node| node.parent);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.get_node(parent).and_then(|node| node.parent);
        }
        chain
    }

    /// Display names from the root down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .filter_map(|ancestor| self.get_node(ancestor))
            .map(|node| node.data.name.as_str())
            .collect();
        names.reverse();
        if let Some(node) = self.get_node(id) {
            names.push(node.data.name.as_str());
        }
        names
    }

    /// Walk display names from the roots downwards.
    pub fn find_by_path(&self, names: &[&str]) -> Option<NodeId> {
        let (first, rest) = names.split_first()?;
        let mut current = self.find_named(&self.roots, first)?;
        for name in rest {
            let node = self.get_node(current)?;
            current = self.find_named(&node.children, name)?;
        }
        Some(current)
    }

    fn find_named(&self, candidates: &[NodeId], name: &str) -> Option<NodeId> {
        candidates.iter().copied().find(|&id| {
            self.get_node(id)
                .is_some_and(|node| node.data.name == name)
        })
    }

    pub fn find_leaf(&self, label: &str) -> Option<NodeId> {
        self.leaves_by_label.get(label).copied()
    }

    /// All nodes carrying `label`, leaves and internal nodes alike.
    pub fn find_by_label(&self, label: &str) -> &[NodeId] {
        self.nodes_by_label
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_extra_label(&self, tag: &str) -> bool {
        self.extra_labels.contains(tag)
    }

    /// Resolve a user-supplied node reference.
    ///
    /// A reference is matched as a label first. Otherwise a reference
    /// containing `/` is a path of display names, and any other reference is
    /// a root name.
    pub fn resolve_reference(&self, reference: &str) -> DomainResult<NodeId> {
        let reference = reference.trim();
        let found = match self.find_by_label(reference).first() {
            Some(&id) => Some(id),
            None if reference.contains(PATH_SEPARATOR) => {
                let names: Vec<&str> = reference
                    .split(PATH_SEPARATOR)
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect();
                self.find_by_path(&names)
            }
            None => self.find_by_path(&[reference]),
        };
        found.ok_or_else(|| DomainError::NodeNotFound(reference.to_string()))
    }
}

/// Pre-order iterator over all trees of a forest, roots in order.
pub struct ForestIterator<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots().iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (NodeId, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(name: &str, label: Option<&str>) -> NodeData {
        NodeData {
            name: name.to_string(),
            label: label.map(str::to_string),
            extra_label: None,
        }
    }

    fn sample() -> (Forest, NodeId, NodeId, NodeId) {
        let mut forest = Forest::new();
        let root = forest.insert_node(data("Root", Some("root")), None);
        let group = forest.insert_node(data("Group", None), Some(root));
        let leaf = forest.insert_node(data("Leaf", Some("leaf")), Some(group));
        forest.register_leaf("leaf", leaf);
        (forest, root, group, leaf)
    }

    #[test]
    fn given_nested_nodes_when_walking_then_reports_paths_and_ancestors() {
        let (forest, root, group, leaf) = sample();

        assert_eq!(forest.path(leaf), vec!["Root", "Group", "Leaf"]);
        assert_eq!(forest.ancestors(leaf), vec![group, root]);
        assert_eq!(forest.find_by_path(&["Root", "Group", "Leaf"]), Some(leaf));
        assert_eq!(forest.find_by_path(&["Root", "Missing"]), None);
        assert_eq!(forest.depth(), 3);
    }

    #[test]
    fn given_internal_node_when_collecting_leaves_then_returns_subtree_leaves() {
        let (forest, root, _, leaf) = sample();

        assert_eq!(forest.leaves_under(root), vec![leaf]);
        assert_eq!(forest.leaves_under(leaf), vec![leaf]);
        assert!(forest.is_leaf(leaf));
        assert!(!forest.is_leaf(root));
    }

    #[test]
    fn given_references_when_resolving_then_accepts_labels_and_paths() {
        let (forest, root, group, leaf) = sample();

        assert_eq!(forest.resolve_reference("leaf"), Ok(leaf));
        assert_eq!(forest.resolve_reference("Root/Group"), Ok(group));
        assert_eq!(forest.resolve_reference("Root"), Ok(root));
        assert_eq!(
            forest.resolve_reference("nope"),
            Err(DomainError::NodeNotFound("nope".to_string()))
        );
    }

    #[test]
    fn given_label_containing_separator_when_resolving_then_matches_label_first() {
        let (mut forest, root, _, _) = sample();
        let dated = forest.insert_node(data("Q1/Q2", Some("2024/q1")), Some(root));
        forest.register_leaf("2024/q1", dated);

        assert_eq!(forest.resolve_reference("2024/q1"), Ok(dated));
        assert_eq!(
            forest.resolve_reference("2024/q2"),
            Err(DomainError::NodeNotFound("2024/q2".to_string()))
        );
    }

    #[test]
    fn given_forest_when_iterating_then_visits_in_preorder() {
        let (forest, root, group, leaf) = sample();

        let order: Vec<NodeId> = forest.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![root, group, leaf]);
        assert_eq!(forest.leaf_labels(), vec!["leaf"]);
    }
}
