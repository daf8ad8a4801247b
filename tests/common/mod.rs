//! Shared forest fixtures for integration tests.
#![allow(dead_code)]

use labeltree::domain::{Forest, NodeId, TreeNode};

/// Province → region → town. Provinces carry `label` and `extraLabel`,
/// regions carry neither, towns carry `label`.
pub fn location_nodes() -> Vec<TreeNode> {
    vec![
        TreeNode::group(
            "Barcelona",
            vec![
                TreeNode::group(
                    "Vallès Occidental",
                    vec![
                        TreeNode::leaf("Sabadell", "sabadell"),
                        TreeNode::leaf("Terrassa", "terrassa"),
                    ],
                ),
                TreeNode::group("Maresme", vec![TreeNode::leaf("Mataró", "mataro")]),
            ],
        )
        .with_label("barcelona")
        .with_extra_label("catalunya"),
        TreeNode::group(
            "Girona",
            vec![
                TreeNode::group(
                    "Gironès",
                    vec![
                        TreeNode::leaf("Salt", "salt"),
                        TreeNode::leaf("Sarrià de Ter", "sarria-de-ter"),
                    ],
                ),
                TreeNode::group("Baix Empordà", vec![TreeNode::leaf("Palamós", "palamos")]),
            ],
        )
        .with_label("girona")
        .with_extra_label("catalunya"),
    ]
}

/// Category → subcategory → item, every level labelled, no extra labels.
pub fn education_nodes() -> Vec<TreeNode> {
    vec![
        TreeNode::group(
            "Science",
            vec![
                TreeNode::group(
                    "Physics",
                    vec![
                        TreeNode::leaf("Mechanics", "mechanics"),
                        TreeNode::leaf("Optics", "optics"),
                    ],
                )
                .with_label("physics"),
                TreeNode::group("Chemistry", vec![TreeNode::leaf("Organic", "organic")])
                    .with_label("chemistry"),
            ],
        )
        .with_label("science"),
        TreeNode::group(
            "Arts",
            vec![TreeNode::group("Music", vec![TreeNode::leaf("Piano", "piano")]).with_label("music")],
        )
        .with_label("arts"),
    ]
}

pub fn location_forest() -> Forest {
    Forest::from_nodes(&location_nodes()).expect("location forest")
}

pub fn education_forest() -> Forest {
    Forest::from_nodes(&education_nodes()).expect("education forest")
}

/// Resolve a `/`-separated name path, panicking with the path on failure.
pub fn node(forest: &Forest, path: &str) -> NodeId {
    forest
        .resolve_reference(path)
        .unwrap_or_else(|e| panic!("{path}: {e}"))
}

pub fn sorted(mut tags: Vec<String>) -> Vec<String> {
    tags.sort();
    tags
}
