//! LightGBM text model dump parser.
//!
//! Reads the tree section of LightGBM's text format (`Tree=<n>` blocks of
//! `key=value` lines) into a [`ModelDump`]. Parsing is permissive and never
//! fails: unknown keys are ignored, missing arrays are empty, bad numbers
//! become NaN and ragged arrays leave node fields missing.

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::io::ConvertError;
use crate::repr::coerce::{is_space, parse_number_array};
use crate::repr::{InternalNode, ModelDump, Node, TreeDescriptor};

// =============================================================================
// Keys
// =============================================================================

/// Prefix of a tree header line.
pub const TREE_HEADER: &str = "Tree=";

pub const SPLIT_FEATURE: &str = "split_feature";
pub const THRESHOLD: &str = "threshold";
pub const LEFT_CHILD: &str = "left_child";
pub const RIGHT_CHILD: &str = "right_child";
pub const LEAF_VALUE: &str = "leaf_value";

// =============================================================================
// Parsed arrays
// =============================================================================

/// The numeric arrays of one tree block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeArrays {
    /// Feature index per internal node. Its length is the internal node count.
    pub split_feature: Vec<f64>,
    pub threshold: Vec<f64>,
    pub left_child: Vec<f64>,
    pub right_child: Vec<f64>,
    /// Output value per leaf.
    pub leaf_value: Vec<f64>,
}

impl TreeArrays {
    /// Extract the recognised keys from a block's key/value map.
    fn from_block(kv: &HashMap<&str, &str>) -> Self {
        let array = |key: &str| kv.get(key).map(|v| parse_number_array(v)).unwrap_or_default();
        Self {
            split_feature: array(SPLIT_FEATURE),
            threshold: array(THRESHOLD),
            left_child: array(LEFT_CHILD),
            right_child: array(RIGHT_CHILD),
            leaf_value: array(LEAF_VALUE),
        }
    }

    pub fn num_internal(&self) -> usize {
        self.split_feature.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.leaf_value.len()
    }

    /// Flat node list: internal nodes by position, then leaves.
    pub fn to_nodes(&self) -> Vec<Node> {
        let mut nodes = Vec::with_capacity(self.num_internal() + self.num_leaves());

        for (n, &feature) in self.split_feature.iter().enumerate() {
            nodes.push(Node::Internal(InternalNode {
                feature: Some(feature),
                threshold: self.threshold.get(n).copied(),
                left: self.left_child.get(n).copied(),
                right: self.right_child.get(n).copied(),
            }));
        }

        nodes.extend(self.leaf_value.iter().map(|&value| Node::leaf(value)));
        nodes
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a text dump into its trees.
///
/// Lines are trimmed and blank lines ignored. Each `Tree=<digits>` line opens
/// a block that runs until the next line starting with `Tree=`; trees are
/// appended in the order their headers appear. Text outside blocks (model
/// header, footer) is skipped.
pub fn parse(text: &str) -> ModelDump {
    let mut lines = text
        .split('\n')
        .map(|line| line.trim_matches(is_space))
        .filter(|line| !line.is_empty())
        .peekable();

    let mut trees = Vec::new();
    while let Some(line) = lines.next() {
        let Some(declared_index) = parse_tree_header(line) else {
            continue;
        };

        let kv = parse_block(&mut lines);
        let arrays = TreeArrays::from_block(&kv);
        let tree = TreeDescriptor::new(declared_index, arrays.to_nodes());

        debug!(
            position = trees.len(),
            declared_index,
            internal = arrays.num_internal(),
            leaves = arrays.num_leaves(),
            "parsed tree"
        );
        trees.push(tree);
    }

    debug!(num_trees = trees.len(), "parsed model dump");
    ModelDump::new(trees)
}

/// Declared index of a `Tree=<digits>` header, `None` for any other line.
///
/// Anything after the leading digits is ignored. Indices too large for `u64`
/// saturate.
pub fn parse_tree_header(line: &str) -> Option<u64> {
    let rest = line.strip_prefix(TREE_HEADER)?;
    let len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    Some(rest[..len].parse().unwrap_or(u64::MAX))
}

/// Collect `key=value` lines up to the next `Tree=` line.
///
/// Splits on the first `=`; lines without one are skipped and later keys
/// overwrite earlier ones.
fn parse_block<'a, I>(lines: &mut std::iter::Peekable<I>) -> HashMap<&'a str, &'a str>
where
    I: Iterator<Item = &'a str>,
{
    let mut kv = HashMap::new();
    while let Some(line) = lines.next_if(|line| !line.starts_with(TREE_HEADER)) {
        if let Some((key, value)) = line.split_once('=') {
            kv.insert(key, value);
        }
    }
    kv
}

impl ModelDump {
    /// Parse a dump from a string. Same as [`parse`].
    pub fn from_string(content: &str) -> Self {
        parse(content)
    }

    /// Read and parse a dump file.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD rather than rejected; only an
    /// unreadable path is an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(parse(&String::from_utf8_lossy(&bytes)))
    }
}

impl FromStr for ModelDump {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_SPLIT: &str = "\
Tree=0
split_feature=3
threshold=0.5
left_child=-1
right_child=1
leaf_value=1.0 2.0
";

    #[test]
    fn parse_single_split_tree() {
        let model = parse(SINGLE_SPLIT);
        assert_eq!(model.num_trees(), 1);

        let tree = &model.trees[0];
        assert_eq!(tree.declared_index, 0);
        assert_eq!(
            tree.nodes,
            vec![
                Node::internal(3.0, 0.5, -1.0, 1.0),
                Node::leaf(1.0),
                Node::leaf(2.0),
            ]
        );
    }

    #[test]
    fn no_headers_no_trees() {
        assert!(parse("").is_empty());
        assert!(parse("tree\nversion=v4\nnum_class=1\n").is_empty());
        assert!(parse("split_feature=1\nleaf_value=1 2\n").is_empty());
    }

    #[test]
    fn header_requires_digits() {
        assert_eq!(parse_tree_header("Tree=12"), Some(12));
        assert_eq!(parse_tree_header("Tree=7abc"), Some(7));
        assert_eq!(parse_tree_header("Tree=99999999999999999999999"), Some(u64::MAX));
        assert_eq!(parse_tree_header("Tree="), None);
        assert_eq!(parse_tree_header("Tree=x"), None);
        assert_eq!(parse_tree_header("tree=1"), None);
        assert_eq!(parse_tree_header("tree_sizes=100 200"), None);
    }

    #[test]
    fn invalid_header_closes_block_without_opening_one() {
        let text = "Tree=0\nleaf_value=1\nTree=bad\nleaf_value=2 3\nTree=1\nleaf_value=4\n";
        let model = parse(text);
        assert_eq!(model.num_trees(), 2);
        assert_eq!(model.trees[0].nodes, vec![Node::leaf(1.0)]);
        assert_eq!(model.trees[1].nodes, vec![Node::leaf(4.0)]);
    }

    #[test]
    fn blank_lines_and_indentation_ignored() {
        let text = "\n\n  Tree=0  \n\n\tsplit_feature=1\r\n\n threshold=2.5\nleft_child=-1\n\nright_child=-2\nleaf_value=0.1 0.2\n\n";
        let model = parse(text);
        assert_eq!(model.num_trees(), 1);
        assert_eq!(model.trees[0].nodes[0], Node::internal(1.0, 2.5, -1.0, -2.0));
        assert_eq!(model.trees[0].counts(), (1, 2));
    }

    #[test]
    fn later_key_overwrites_earlier() {
        let text = "Tree=0\nthreshold=1.0\nsplit_feature=0 1\nthreshold=2.0 3.0\n";
        let model = parse(text);
        let thresholds: Vec<_> = model.trees[0]
            .nodes
            .iter()
            .map(|n| n.split().threshold)
            .collect();
        assert_eq!(thresholds, vec![Some(2.0), Some(3.0)]);
    }

    #[test]
    fn value_splits_on_first_equals_only() {
        let mut lines = "a=b=c\nno_equals_here\nTree=1".split('\n').peekable();
        let kv = parse_block(&mut lines);
        assert_eq!(kv.get("a"), Some(&"b=c"));
        assert_eq!(kv.len(), 1);
        assert_eq!(lines.next(), Some("Tree=1"));
    }

    #[test]
    fn keys_are_not_trimmed() {
        let model = parse("Tree=0\nsplit_feature =1\nleaf_value=5\n");
        assert_eq!(model.trees[0].nodes, vec![Node::leaf(5.0)]);
    }

    #[test]
    fn ragged_arrays_leave_fields_missing() {
        let text = "Tree=0\nsplit_feature=0 1 2\nthreshold=0.5\nleft_child=1 -1\nleaf_value=1\n";
        let tree = &parse(text).trees[0];
        assert_eq!(tree.counts(), (3, 1));

        let last = tree.nodes[2].split();
        assert_eq!(last.feature, Some(2.0));
        assert_eq!(last.threshold, None);
        assert_eq!(last.left, None);
        assert_eq!(last.right, None);

        let second = tree.nodes[1].split();
        assert_eq!(second.left, Some(-1.0));
    }

    #[test]
    fn bad_tokens_become_nan() {
        let tree = &parse("Tree=0\nleaf_value=1 oops 3\n").trees[0];
        assert_eq!(tree.nodes.len(), 3);
        assert!(tree.nodes[1].leaf_value().is_nan());
    }

    #[test]
    fn single_leaf_tree() {
        let tree = &parse("Tree=0\nnum_leaves=1\nleaf_value=0.42\nshrinkage=1\n").trees[0];
        assert_eq!(tree.counts(), (0, 1));
    }

    #[test]
    fn trees_keep_appearance_order() {
        let model = parse("Tree=5\nleaf_value=5\nTree=2\nleaf_value=2\n");
        let declared: Vec<_> = model.trees.iter().map(|t| t.declared_index).collect();
        assert_eq!(declared, vec![5, 2]);
        assert_eq!(model.trees[0].nodes, vec![Node::leaf(5.0)]);
    }

    #[test]
    fn from_str_matches_parse() {
        let model: ModelDump = SINGLE_SPLIT.parse().unwrap();
        assert_eq!(model, parse(SINGLE_SPLIT));
        assert_eq!(ModelDump::from_string(SINGLE_SPLIT), model);
    }
}
