//! Integration tests for transcoding LightGBM text dumps.
//!
//! Fixtures are stored in `tests/test-cases/lightgbm/`.

use approx::assert_relative_eq;
use rstest::rstest;

use hydrogen_tools::io::native::{self, INTERNAL_NODE_SIZE, LEAF_NODE_SIZE};
use hydrogen_tools::{compat, ModelDump, Node};

const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/test-cases/lightgbm");

fn load_fixture(name: &str) -> ModelDump {
    ModelDump::from_file(format!("{FIXTURE_DIR}/{name}/model.txt")).expect("read fixture")
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn small_tree_structure() {
    let model = load_fixture("small_tree");
    assert_eq!(model.num_trees(), 3);

    let counts: Vec<_> = model.trees.iter().map(|t| t.counts()).collect();
    assert_eq!(counts, vec![(3, 4), (2, 3), (0, 1)]);

    let root = model.trees[0].nodes[0].split();
    assert_eq!(root.feature, Some(2.0));
    assert_relative_eq!(root.threshold.unwrap(), 0.17325);
    assert_eq!(root.left, Some(1.0));
    assert_eq!(root.right, Some(2.0));

    let tiny = model.trees[0].nodes[2].split().threshold.unwrap();
    assert_relative_eq!(tiny, 1.0000000180025095e-35, max_relative = 1e-12);

    assert_eq!(model.trees[2].nodes, vec![Node::leaf(0.42)]);
}

#[test]
fn footer_and_header_are_ignored() {
    let model = load_fixture("small_tree");
    let declared: Vec<_> = model.trees.iter().map(|t| t.declared_index).collect();
    assert_eq!(declared, vec![0, 1, 2]);
    // feature_importances/parameters follow the last tree and add nothing.
    assert_eq!(model.trees[2].num_nodes(), 1);
}

#[test]
fn edge_cases_structure() {
    let model = load_fixture("edge_cases");
    let declared: Vec<_> = model.trees.iter().map(|t| t.declared_index).collect();
    assert_eq!(declared, vec![5, 2, 0]);

    let counts: Vec<_> = model.trees.iter().map(|t| t.counts()).collect();
    assert_eq!(counts, vec![(3, 4), (0, 1), (1, 0)]);
}

// =============================================================================
// Encoding
// =============================================================================

#[rstest]
#[case::small_tree("small_tree", 192)]
#[case::edge_cases("edge_cases", 148)]
fn encoded_size(#[case] name: &str, #[case] expected: usize) {
    let model = load_fixture(name);
    assert_eq!(native::encoded_len(&model), expected);
    assert_eq!(native::encode(&model).len(), expected);
}

#[test]
fn small_tree_decodes_back() {
    let model = load_fixture("small_tree");
    let decoded = native::decode(&native::encode(&model)).unwrap();

    assert_eq!(decoded.num_trees(), 3);
    let tree = &decoded.trees[1];
    assert_eq!(tree.internal.len(), 2);
    assert_eq!(tree.internal[0].feature_index, 1);
    assert_relative_eq!(tree.internal[0].threshold, 0.648);
    assert_eq!(tree.internal[0].left, 1);
    assert_eq!(tree.internal[0].right, -2);
    assert_eq!(tree.internal[1].right, -3);
    assert_eq!(tree.leaves, vec![-3.25, 2.5, 4.75]);
}

#[test]
fn edge_cases_coerce_permissively() {
    let model = load_fixture("edge_cases");
    let decoded = native::decode(&native::encode(&model)).unwrap();

    let first = &decoded.trees[0];
    // split_feature=-1 wraps to u32::MAX.
    assert_eq!(first.internal[0].feature_index, u32::MAX);
    // Later threshold line wins.
    assert_eq!(first.internal[0].threshold, 1.5);
    assert_eq!(first.internal[1].threshold, 2.5);
    assert!(first.internal[2].threshold.is_nan());
    // right_child has a single entry; the rest are missing and encode as 0.
    assert_eq!(first.internal[0].right, -2);
    assert_eq!(first.internal[1].right, 0);
    assert_eq!(first.internal[2].left, 0);
    assert_eq!(first.leaves, vec![1.0, 2.0, 3.0, 4.0]);

    assert_eq!(decoded.trees[1].leaves, vec![9.5]);

    let last = &decoded.trees[2];
    assert_eq!(last.internal.len(), 1);
    assert!(last.leaves.is_empty());
}

#[test]
fn single_split_example_layout() {
    let text = "Tree=0\nsplit_feature=3\nthreshold=0.5\nleft_child=-1\nright_child=1\nleaf_value=1.0 2.0\n";
    let bytes = native::encode(&compat::lightgbm::parse(text));

    assert_eq!(bytes.len(), 4 + 4 + 4 + INTERNAL_NODE_SIZE + 2 * LEAF_NODE_SIZE);
    assert_eq!(bytes.len(), 48);
    assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &1u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &2u32.to_le_bytes());
    assert_eq!(&bytes[12..16], &3u32.to_le_bytes());
    assert_eq!(&bytes[16..24], &0.5f64.to_le_bytes());
    assert_eq!(&bytes[24..28], &(-1i32).to_le_bytes());
    assert_eq!(&bytes[28..32], &1i32.to_le_bytes());
    assert_eq!(&bytes[32..40], &1.0f64.to_le_bytes());
    assert_eq!(&bytes[40..48], &2.0f64.to_le_bytes());
}

#[test]
fn trees_encode_in_appearance_order() {
    let text = "Tree=5\nleaf_value=5.0\nTree=2\nsplit_feature=1\nleaf_value=2.0 3.0\n";
    let decoded = native::decode(&native::encode(&compat::lightgbm::parse(text))).unwrap();

    assert_eq!(decoded.trees[0].leaves, vec![5.0]);
    assert!(decoded.trees[0].internal.is_empty());
    assert_eq!(decoded.trees[1].leaves, vec![2.0, 3.0]);
    assert_eq!(decoded.trees[1].internal.len(), 1);
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \n\n\t\n")]
#[case::header_only("tree\nversion=v4\nnum_class=1\n")]
fn no_trees_encode_to_zero_count(#[case] text: &str) {
    let bytes = native::encode(&compat::lightgbm::parse(text));
    assert_eq!(bytes, vec![0, 0, 0, 0]);
}
