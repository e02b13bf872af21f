//! Parsed tree ensemble representation.
//!
//! A [`ModelDump`] is the ordered list of trees found in a text dump. Each
//! [`TreeDescriptor`] holds a flat node list: internal nodes first, then
//! leaves. The boundary between the two (the *split point*) is what the
//! binary encoder writes as `internal_count` / `leaf_count`.

// =============================================================================
// Nodes
// =============================================================================

/// A split node.
///
/// Fields hold the raw numbers read from the dump. A field is `None` when the
/// array it comes from was shorter than `split_feature` (ragged input); the
/// encoder coerces missing values the same way it coerces NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InternalNode {
    /// Feature index (`split_feature[n]`).
    pub feature: Option<f64>,
    /// Split threshold (`threshold[n]`).
    pub threshold: Option<f64>,
    /// Left child reference (`left_child[n]`), negative = leaf by convention.
    pub left: Option<f64>,
    /// Right child reference (`right_child[n]`), negative = leaf by convention.
    pub right: Option<f64>,
}

impl InternalNode {
    /// Node with every field present.
    pub fn new(feature: f64, threshold: f64, left: f64, right: f64) -> Self {
        Self {
            feature: Some(feature),
            threshold: Some(threshold),
            left: Some(left),
            right: Some(right),
        }
    }
}

/// A terminal node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafNode {
    /// Output value (`leaf_value[n]`).
    pub value: f64,
}

/// A node in a tree's flat node list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    /// Split node.
    Internal(InternalNode),
    /// Leaf node.
    Leaf(LeafNode),
}

impl Node {
    /// Shorthand for a fully populated internal node.
    pub fn internal(feature: f64, threshold: f64, left: f64, right: f64) -> Self {
        Node::Internal(InternalNode::new(feature, threshold, left, right))
    }

    /// Shorthand for a leaf node.
    pub fn leaf(value: f64) -> Self {
        Node::Leaf(LeafNode { value })
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Value written when this node lands in the leaf segment.
    ///
    /// An internal node has no value and reads as NaN.
    #[inline]
    pub fn leaf_value(&self) -> f64 {
        match self {
            Node::Leaf(leaf) => leaf.value,
            Node::Internal(_) => f64::NAN,
        }
    }

    /// Split fields written when this node lands in the internal segment.
    ///
    /// A leaf has none of them; every field reads as missing.
    #[inline]
    pub fn split(&self) -> InternalNode {
        match self {
            Node::Internal(node) => *node,
            Node::Leaf(_) => InternalNode::default(),
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

/// One `Tree=<idx>` block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeDescriptor {
    /// Index declared in the header. Informational only: trees are encoded
    /// in the order they appear.
    pub declared_index: u64,
    /// Internal nodes followed by leaves.
    pub nodes: Vec<Node>,
}

impl TreeDescriptor {
    /// Create a tree from a node list.
    pub fn new(declared_index: u64, nodes: Vec<Node>) -> Self {
        Self {
            declared_index,
            nodes,
        }
    }

    /// Position of the first leaf node.
    ///
    /// Everything before it is treated as internal and everything from it on
    /// as leaves, whatever the actual variants are. A tree without any leaf
    /// splits at `nodes.len()`.
    pub fn split_point(&self) -> usize {
        self.nodes
            .iter()
            .position(Node::is_leaf)
            .unwrap_or(self.nodes.len())
    }

    /// `(internal_count, leaf_count)` as written by the encoder.
    pub fn counts(&self) -> (usize, usize) {
        let split = self.split_point();
        (split, self.nodes.len() - split)
    }

    /// `(internal, leaves)` node slices, split at [`Self::split_point`].
    pub fn segments(&self) -> (&[Node], &[Node]) {
        self.nodes.split_at(self.split_point())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }
}

// =============================================================================
// Model
// =============================================================================

/// Ordered trees parsed from a text dump.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelDump {
    pub trees: Vec<TreeDescriptor>,
}

impl ModelDump {
    pub fn new(trees: Vec<TreeDescriptor>) -> Self {
        Self { trees }
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    /// Total node count over all trees.
    pub fn num_nodes(&self) -> usize {
        self.trees.iter().map(TreeDescriptor::num_nodes).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
