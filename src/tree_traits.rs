/*
Rendering lives outside the domain module so the domain does not depend on termtree.
The trait carries the rendering onto the selection manager.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, SelectionManager};

pub trait TreeRender {
    /// One checkbox tree per forest root.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl TreeRender for SelectionManager<'_> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        fn build_tree(manager: &SelectionManager<'_>, id: NodeId) -> Tree<String> {
            let forest = manager.forest();
            let Some(node) = forest.get_node(id) else {
                return Tree::new(String::new());
            };
            let line = format!("{} {}", manager.selection_state(id).marker(), node.data);
            let leaves: Vec<_> = node
                .children
                .iter()
                .map(|&child| build_tree(manager, child))
                .collect();
            Tree::new(line).with_leaves(leaves)
        }

        self.forest()
            .roots()
            .iter()
            .map(|&root| build_tree(self, root))
            .collect()
    }
}
