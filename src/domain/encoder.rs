//! Tag encoding policies.
//!
//! Both policies walk the forest top-down against the manager's selection
//! and return de-duplicated tags in first-seen order.

use itertools::Itertools;
use tracing::trace;

use crate::domain::forest::NodeId;
use crate::domain::selection::SelectionManager;

/// Coarsest-grain encoding.
///
/// A fully selected node with a label stands for its whole subtree. Below
/// partial coverage the walk continues, and a node's extra label is reported
/// once if anything beneath it is selected.
pub(crate) fn compress(manager: &SelectionManager<'_>) -> Vec<String> {
    let mut tags = Vec::new();
    for &root in manager.forest().roots() {
        compress_node(manager, root, &mut tags);
    }
    finish(tags)
}

fn compress_node<'f>(manager: &SelectionManager<'f>, id: NodeId, tags: &mut Vec<&'f str>) {
    let Some(node) = manager.forest().get_node(id) else {
        return;
    };
    if !manager.has_selected_leaf(id) {
        return;
    }

    if manager.is_group_fully_selected(id) {
        if let Some(label) = node.data.label.as_deref() {
            trace!("compress: {} covers its subtree", label);
            tags.push(label);
            return;
        }
    }

    if let Some(extra) = node.data.extra_label.as_deref() {
        tags.push(extra);
    }
    for &child in &node.children {
        compress_node(manager, child, tags);
    }
}

/// Full-path encoding.
///
/// Every node on the path from a root to a selected leaf reports its label;
/// no subtree is ever collapsed. Extra labels are never reported.
pub(crate) fn expand(manager: &SelectionManager<'_>) -> Vec<String> {
    let mut tags = Vec::new();
    for &root in manager.forest().roots() {
        expand_node(manager, root, &mut tags);
    }
    finish(tags)
}

fn expand_node<'f>(manager: &SelectionManager<'f>, id: NodeId, tags: &mut Vec<&'f str>) {
    let Some(node) = manager.forest().get_node(id) else {
        return;
    };
    if !manager.has_selected_leaf(id) {
        return;
    }

    tags.extend(node.data.label.as_deref());
    for &child in &node.children {
        expand_node(manager, child, tags);
    }
}

fn finish(tags: Vec<&str>) -> Vec<String> {
    tags.into_iter().unique().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::{Domain, TreeNode};
    use crate::domain::forest::Forest;
    use crate::domain::selection::SelectionManager;

    fn forest() -> Forest {
        Forest::from_nodes(&[TreeNode::group(
            "Catalunya",
            vec![
                TreeNode::group("Girona", vec![TreeNode::leaf("Olot", "olot")])
                    .with_label("girona")
                    .with_extra_label("catalunya"),
                TreeNode::group(
                    "Barcelona",
                    vec![TreeNode::leaf("Sabadell", "sabadell"), TreeNode::leaf("Terrassa", "terrassa")],
                )
                .with_extra_label("catalunya"),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn given_shared_extra_label_when_compressing_then_reports_it_once() {
        let forest = forest();
        let olot = forest.find_leaf("olot").unwrap();
        let sabadell = forest.find_leaf("sabadell").unwrap();
        let mut manager = SelectionManager::new(Domain::Location, &forest, &[]);

        manager.handle_selection_toggle(olot);
        manager.handle_selection_toggle(sabadell);

        // Girona is fully selected and labelled: its label subsumes the extra label
        assert_eq!(manager.get_selected(), vec!["girona", "catalunya", "sabadell"]);
    }

    #[test]
    fn given_fully_selected_unlabelled_group_when_compressing_then_descends() {
        let forest = forest();
        let barcelona = forest.resolve_reference("Catalunya/Barcelona").unwrap();
        let manager = SelectionManager::new(Domain::Location, &forest, &[barcelona]);

        assert_eq!(manager.get_selected(), vec!["catalunya", "sabadell", "terrassa"]);
    }

    #[test]
    fn given_empty_selection_when_encoding_then_returns_no_tags() {
        let forest = forest();

        assert!(SelectionManager::new(Domain::Location, &forest, &[]).get_selected().is_empty());
        assert!(SelectionManager::new(Domain::Education, &forest, &[]).get_selected().is_empty());
    }
}
