//! Intermediate representation shared by the text parser and binary codec.

pub mod coerce;
pub mod tree;

pub use tree::{InternalNode, LeafNode, ModelDump, Node, TreeDescriptor};
