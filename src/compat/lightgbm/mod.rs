//! LightGBM text dump support.
//!
//! # Format Overview
//!
//! A LightGBM text model has a header of `key=value` lines, one block per
//! tree, and a footer. Only the tree blocks are read:
//!
//! ```text
//! Tree=0
//! num_leaves=3
//! split_feature=2 0
//! threshold=0.5 1.25
//! left_child=1 -1
//! right_child=-2 -3
//! leaf_value=0.1 -0.2 0.3
//! ```
//!
//! `split_feature`, `threshold`, `left_child` and `right_child` are parallel
//! arrays over internal nodes; `leaf_value` holds one value per leaf. Child
//! references are copied verbatim (LightGBM writes leaf `k` as `-(k + 1)`).
//!
//! # Example
//!
//! ```ignore
//! use hydrogen_tools::compat::lightgbm;
//!
//! let dump = lightgbm::parse(&std::fs::read_to_string("model.txt")?);
//! println!("{} trees", dump.num_trees());
//! ```

mod text;

pub use text::*;
