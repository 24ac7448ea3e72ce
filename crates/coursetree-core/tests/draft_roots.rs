//! Draft subtree root scenarios taken from course export.
//!
//! ```text
//! SOME_TREES
//!
//!     sequential_1 (not draft)          great_grandparent_vertical (not draft)
//!          |                                        |
//!      vertical_1                           grandparent_vertical
//!       /     \                                     |
//!   child_1  child_2                            vertical_2
//!                                                /      \
//!                                            child_3   child_4
//! ```

use std::collections::BTreeSet;

use coursetree_core::graph::drafts::{draft_subtree_roots, resolve_roots};
use coursetree_core::model::{Category, ContentNode};

fn node(id: &str, parent: &str, parent_category: &str) -> ContentNode {
    ContentNode::new(id, parent).with_parent_category(parent_category)
}

fn only_roots() -> Vec<ContentNode> {
    vec![
        node("url1", "vertical", "vertical"),
        node("url2", "sequential", "sequential"),
    ]
}

fn some_trees() -> Vec<ContentNode> {
    vec![
        node("child_1", "vertical_1", "vertical"),
        node("child_2", "vertical_1", "vertical"),
        node("vertical_1", "sequential_1", "sequential"),
        node("child_3", "vertical_2", "vertical"),
        node("child_4", "vertical_2", "vertical"),
        node("vertical_2", "grandparent_vertical", "vertical"),
        node("grandparent_vertical", "great_grandparent_vertical", "vertical"),
    ]
}

fn root_ids(roots: &[&ContentNode]) -> Vec<String> {
    roots.iter().map(|n| n.id.clone()).collect()
}

fn assert_roots(nodes: &[ContentNode], promote: bool, expected: &[&str]) {
    let ids = root_ids(&resolve_roots(nodes, promote));
    let distinct: BTreeSet<&String> = ids.iter().collect();
    assert_eq!(distinct.len(), ids.len(), "roots must be distinct: {ids:?}");

    let expected: BTreeSet<String> = expected.iter().map(|s| (*s).to_string()).collect();
    assert_eq!(ids.into_iter().collect::<BTreeSet<_>>(), expected);
}

#[test]
fn only_roots_without_promotion() {
    assert_roots(&only_roots(), false, &["url1", "url2"]);
}

#[test]
fn only_roots_with_promotion() {
    assert_roots(&only_roots(), true, &["url1", "url2"]);
}

#[test]
fn some_trees_without_promotion() {
    assert_roots(&some_trees(), false, &["vertical_1", "grandparent_vertical"]);
}

#[test]
fn some_trees_with_promotion() {
    assert_roots(&some_trees(), true, &["vertical_1", "grandparent_vertical"]);
}

#[test]
fn sequential_parent_in_collection_is_cut() {
    let nodes = vec![
        node("url_grandparent", "chapter_1", "chapter"),
        ContentNode::new("url_parent_1", "url_grandparent").with_parent_category(Category::Sequential),
        node("url_child", "url_parent_1", "vertical"),
    ];

    assert_roots(&nodes, false, &["url_grandparent"]);
    assert_roots(&nodes, true, &["url_grandparent", "url_parent_1"]);
    assert_eq!(
        root_ids(&draft_subtree_roots(&nodes)),
        vec!["url_grandparent", "url_parent_1"]
    );
}

#[test]
fn own_category_does_not_promote() {
    // Ids carry no meaning; only the recorded parent category does.
    let nodes = vec![
        node("sequential_9", "chapter", "chapter"),
        node("vertical_9", "sequential_9", "vertical"),
    ];
    assert_roots(&nodes, true, &["sequential_9"]);
}

#[test]
fn roots_keep_input_order() {
    let nodes = some_trees();
    assert_eq!(
        root_ids(&resolve_roots(&nodes, false)),
        vec!["vertical_1", "grandparent_vertical"]
    );
}

#[test]
fn nodes_parse_from_export_json() {
    let json = r#"[
        {"id": "vertical_1", "parent_id": "sequential_1", "parent_category": "sequential"},
        {"id": "child_1", "parent_id": "vertical_1", "category": "vertical"},
        {"id": "stray"}
    ]"#;
    let nodes: Vec<ContentNode> = serde_json::from_str(json).expect("valid node list");
    assert_roots(&nodes, true, &["vertical_1", "stray"]);
}
