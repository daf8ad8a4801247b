//! Reconstructing a selection from persisted tags.

use crate::domain::entities::EncodingPolicy;
use crate::domain::forest::{Forest, NodeId};

/// Nodes matched by a stored tag list, plus the tags nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagResolution {
    pub nodes: Vec<NodeId>,
    pub unknown: Vec<String>,
}

/// Match stored tags back against `forest`, inverting the encoding policy.
///
/// - Compress: a tag naming any node's label selects that node's subtree.
/// - Expand: internal labels are derived from their leaves, so only leaf
///   labels select anything.
///
/// Extra labels and, under expand, internal labels are derived tags and are
/// skipped without being reported as unknown.
pub fn resolve_tags<S: AsRef<str>>(forest: &Forest, policy: EncodingPolicy, tags: &[S]) -> TagResolution {
    let mut resolution = TagResolution::default();

    for tag in tags.iter().map(AsRef::as_ref) {
        let matched: Vec<NodeId> = match policy {
            EncodingPolicy::Compress => forest.find_by_label(tag).to_vec(),
            EncodingPolicy::Expand => forest.find_leaf(tag).into_iter().collect(),
        };

        if !matched.is_empty() {
            resolution.nodes.extend(matched);
        } else if !forest.is_extra_label(tag) && forest.find_by_label(tag).is_empty() {
            resolution.unknown.push(tag.to_string());
        }
    }

    resolution
}
