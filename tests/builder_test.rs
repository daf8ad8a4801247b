//! Tests for ForestBuilder

mod common;

use rstest::rstest;

use common::{location_nodes, node};
use labeltree::domain::{DomainError, EncodingPolicy, Forest, ForestBuilder, SelectionManager, TreeNode};

#[test]
fn given_nested_nodes_when_building_then_creates_forest() {
    // Arrange
    let nodes = location_nodes();

    // Act
    let forest = ForestBuilder::new().build(&nodes).unwrap();

    // Assert
    assert_eq!(forest.roots().len(), 2);
    assert_eq!(forest.len(), 12);
    assert_eq!(forest.depth(), 3);
}

#[test]
fn given_nested_nodes_when_building_then_preserves_document_order() {
    // Arrange
    let nodes = location_nodes();

    // Act
    let forest = ForestBuilder::new().build(&nodes).unwrap();

    // Assert
    assert_eq!(
        forest.leaf_labels(),
        vec!["sabadell", "terrassa", "mataro", "salt", "sarria-de-ter", "palamos"]
    );
    let names: Vec<&str> = forest.iter().map(|(_, n)| n.data.name.as_str()).take(4).collect();
    assert_eq!(names, vec!["Barcelona", "Vallès Occidental", "Sabadell", "Terrassa"]);
}

#[test]
fn given_built_forest_when_navigating_then_parent_links_are_consistent() {
    // Arrange
    let forest = Forest::from_nodes(&location_nodes()).unwrap();
    let town = node(&forest, "Girona/Baix Empordà/Palamós");

    // Act
    let path = forest.path(town);
    let ancestors = forest.ancestors(town);

    // Assert
    assert_eq!(path, vec!["Girona", "Baix Empordà", "Palamós"]);
    assert_eq!(ancestors.len(), 2);
    assert_eq!(ancestors[1], forest.roots()[1]);
    assert_eq!(forest.find_leaf("palamos"), Some(town));
}

#[test]
fn given_empty_input_when_building_then_creates_empty_forest() {
    // Act
    let forest = ForestBuilder::new().build(&[]).unwrap();

    // Assert
    assert!(forest.is_empty());
    assert_eq!(forest.depth(), 0);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("   "))]
fn given_leaf_without_label_when_building_then_errors_with_path(#[case] label: Option<&str>) {
    // Arrange
    let mut leaf = TreeNode::group("Ripoll", vec![]);
    leaf.label = label.map(str::to_string);
    let nodes = vec![TreeNode::group("Girona", vec![TreeNode::group("Ripollès", vec![leaf])])];

    // Act
    let result = ForestBuilder::new().build(&nodes);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::UnlabeledLeaf {
            path: "Girona/Ripollès/Ripoll".to_string()
        }
    );
}

#[test]
fn given_duplicate_leaf_labels_across_roots_when_building_then_errors() {
    // Arrange
    let nodes = vec![
        TreeNode::group("Barcelona", vec![TreeNode::leaf("Sant Cugat", "sant-cugat")]),
        TreeNode::group("Lleida", vec![TreeNode::leaf("Sant Cugat", "sant-cugat")]),
    ];

    // Act
    let result = ForestBuilder::new().build(&nodes);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicateLeafLabel {
            label: "sant-cugat".to_string()
        }
    );
}

#[rstest]
#[case::group_shares_leaf_label(
    vec![TreeNode::group(
        "Gent",
        vec![TreeNode::leaf("Gent", "gent"), TreeNode::leaf("Ledeberg", "ledeberg")],
    )
    .with_label("gent")],
    "gent"
)]
#[case::two_groups_share_label(
    vec![
        TreeNode::group("Oost", vec![TreeNode::leaf("Gent", "gent")]).with_label("vlaanderen"),
        TreeNode::group("West", vec![TreeNode::leaf("Brugge", "brugge")]).with_label("vlaanderen"),
    ],
    "vlaanderen"
)]
#[case::label_reused_as_extra_label(
    vec![
        TreeNode::group("Oost", vec![TreeNode::leaf("Gent", "gent")]).with_extra_label("vlaanderen"),
        TreeNode::group("Vlaanderen", vec![TreeNode::leaf("Brugge", "brugge")]).with_label("vlaanderen"),
    ],
    "vlaanderen"
)]
fn given_label_naming_several_nodes_when_building_then_errors(
    #[case] nodes: Vec<TreeNode>,
    #[case] label: &str,
) {
    // Act
    let result = ForestBuilder::new().build(&nodes);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::AmbiguousLabel {
            label: label.to_string()
        }
    );
}

#[test]
fn given_group_over_leaves_when_reseeding_compressed_tags_then_selection_is_stable() {
    // Arrange
    let nodes = vec![TreeNode::group(
        "Gent",
        vec![TreeNode::leaf("Gent", "gent"), TreeNode::leaf("Ledeberg", "ledeberg")],
    )
    .with_label("gent-area")];
    let forest = Forest::from_nodes(&nodes).unwrap();
    let leaf = forest.find_leaf("gent").unwrap();
    let original = SelectionManager::with_policy(EncodingPolicy::Compress, &forest, &[leaf]);

    // Act
    let stored = original.get_selected();
    let restored = SelectionManager::from_tags(EncodingPolicy::Compress, &forest, stored.as_slice());

    // Assert
    assert_eq!(stored, vec!["gent"]);
    assert_eq!(restored.selected_leaves(), vec![leaf]);
    assert_eq!(restored.get_selected(), stored);
}

#[test]
fn given_unknown_reference_when_resolving_then_node_not_found() {
    // Arrange
    let forest = Forest::from_nodes(&location_nodes()).unwrap();

    // Act
    let result = forest.resolve_reference("Barcelona/Osona");

    // Assert
    assert_eq!(result, Err(DomainError::NodeNotFound("Barcelona/Osona".to_string())));
}
