//! Binary tree ensemble layout.
//!
//! All values are little-endian and packed without padding. There is no magic
//! number, version or checksum; the leading tree count is the only
//! self-describing field.
//!
//! # Format Structure
//!
//! ```text
//! u32  tree_count
//! per tree:
//!   u32  internal_count
//!   u32  leaf_count
//!   per internal node:
//!     u32  feature_index
//!     f64  threshold
//!     i32  left
//!     i32  right
//!   per leaf:
//!     f64  value
//! ```
//!
//! `internal_count` is the tree's [split point](TreeDescriptor::split_point),
//! recomputed from the node list at encode time.
//!
//! # Example
//!
//! ```ignore
//! use hydrogen_tools::io::native;
//!
//! let bytes = native::encode(&dump);
//! let decoded = native::decode(&bytes)?;
//! assert_eq!(decoded.num_trees(), dump.num_trees());
//! ```

use std::io::{Read, Write};

use thiserror::Error;

use crate::repr::coerce::{child_ref, feature_index, float64};
use crate::repr::{ModelDump, TreeDescriptor};

// ============================================================================
// Constants
// ============================================================================

/// Size of a `u32` count field.
pub const COUNT_SIZE: usize = 4;

/// Size of the per-tree `internal_count` + `leaf_count` prefix.
pub const TREE_HEADER_SIZE: usize = 2 * COUNT_SIZE;

/// Size of one internal node record (`u32` + `f64` + `i32` + `i32`).
pub const INTERNAL_NODE_SIZE: usize = 4 + 8 + 4 + 4;

/// Size of one leaf record.
pub const LEAF_NODE_SIZE: usize = 8;

// ============================================================================
// Encoding
// ============================================================================

/// Encoded size of a single tree.
pub fn tree_encoded_len(tree: &TreeDescriptor) -> usize {
    let (internal, leaves) = tree.counts();
    TREE_HEADER_SIZE + internal * INTERNAL_NODE_SIZE + leaves * LEAF_NODE_SIZE
}

/// Exact encoded size of a model.
pub fn encoded_len(model: &ModelDump) -> usize {
    COUNT_SIZE + model.trees.iter().map(tree_encoded_len).sum::<usize>()
}

/// Encode a model into a freshly allocated buffer of exactly
/// [`encoded_len`] bytes.
pub fn encode(model: &ModelDump) -> Vec<u8> {
    let len = encoded_len(model);
    let mut buf = Vec::with_capacity(len);

    put_u32(&mut buf, model.num_trees() as u32);
    for tree in &model.trees {
        encode_tree(&mut buf, tree);
    }

    debug_assert_eq!(buf.len(), len);
    buf
}

/// Encode a model and write it to `writer`.
pub fn write_to<W: Write>(model: &ModelDump, writer: &mut W) -> std::io::Result<()> {
    writer.write_all(&encode(model))
}

fn encode_tree(buf: &mut Vec<u8>, tree: &TreeDescriptor) {
    let (internal, leaves) = tree.segments();
    put_u32(buf, internal.len() as u32);
    put_u32(buf, leaves.len() as u32);

    for node in internal {
        let split = node.split();
        put_u32(buf, feature_index(split.feature));
        put_f64(buf, float64(split.threshold));
        put_i32(buf, child_ref(split.left));
        put_i32(buf, child_ref(split.right));
    }

    for node in leaves {
        put_f64(buf, node.leaf_value());
    }
}

#[inline]
fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[inline]
fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

#[inline]
fn put_f64(buf: &mut Vec<u8>, value: f64) {
    buf.extend_from_slice(&value.to_le_bytes());
}

// ============================================================================
// Decoded Types
// ============================================================================

/// An internal node as stored in the binary layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodedInternal {
    pub feature_index: u32,
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
}

/// A tree as stored in the binary layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedTree {
    pub internal: Vec<EncodedInternal>,
    pub leaves: Vec<f64>,
}

impl EncodedTree {
    pub fn num_nodes(&self) -> usize {
        self.internal.len() + self.leaves.len()
    }
}

/// A model read back from the binary layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedModel {
    pub trees: Vec<EncodedTree>,
}

impl EncodedModel {
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while reading the binary layout.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input ended in the middle of a field.
    #[error("truncated {context}: expected {expected} bytes, got {actual}")]
    Truncated {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Bytes left over after the last tree.
    #[error("{0} trailing bytes after last tree")]
    TrailingBytes(usize),

    /// I/O error during reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Decoding
// ============================================================================

/// Little-endian cursor over a byte slice.
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let end = self.pos + N;
        let bytes: [u8; N] = self
            .buf
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(DecodeError::Truncated {
                context,
                expected: N,
                actual: self.remaining(),
            })?;
        self.pos = end;
        Ok(bytes)
    }

    fn u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        self.take(context).map(u32::from_le_bytes)
    }

    fn i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        self.take(context).map(i32::from_le_bytes)
    }

    fn f64(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        self.take(context).map(f64::from_le_bytes)
    }

    /// Capacity for `count` records of `size` bytes, bounded by what is left.
    fn capacity_for(&self, count: u32, size: usize) -> usize {
        (count as usize).min(self.remaining() / size)
    }
}

/// Decode a buffer produced by [`encode`].
///
/// Only the layout is checked; child references are returned as stored.
pub fn decode(bytes: &[u8]) -> Result<EncodedModel, DecodeError> {
    let mut reader = ByteReader::new(bytes);

    let num_trees = reader.u32("tree count")?;
    let mut trees = Vec::with_capacity(reader.capacity_for(num_trees, TREE_HEADER_SIZE));
    for _ in 0..num_trees {
        trees.push(decode_tree(&mut reader)?);
    }

    match reader.remaining() {
        0 => Ok(EncodedModel { trees }),
        n => Err(DecodeError::TrailingBytes(n)),
    }
}

/// Read everything from `reader` and [`decode`] it.
pub fn read_from<R: Read>(reader: &mut R) -> Result<EncodedModel, DecodeError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode(&bytes)
}

fn decode_tree(reader: &mut ByteReader<'_>) -> Result<EncodedTree, DecodeError> {
    let num_internal = reader.u32("internal count")?;
    let num_leaves = reader.u32("leaf count")?;

    let mut internal = Vec::with_capacity(reader.capacity_for(num_internal, INTERNAL_NODE_SIZE));
    for _ in 0..num_internal {
        internal.push(EncodedInternal {
            feature_index: reader.u32("feature index")?,
            threshold: reader.f64("threshold")?,
            left: reader.i32("left child")?,
            right: reader.i32("right child")?,
        });
    }

    let mut leaves = Vec::with_capacity(reader.capacity_for(num_leaves, LEAF_NODE_SIZE));
    for _ in 0..num_leaves {
        leaves.push(reader.f64("leaf value")?);
    }

    Ok(EncodedTree { internal, leaves })
}

// ============================================================================
// Tests
// ============================================================================
