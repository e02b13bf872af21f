//! hydrogen-tools: LightGBM text dump to binary tree layout.
//!
//! Converts the `Tree=<n>` blocks of a LightGBM text model into a packed,
//! little-endian buffer that inference engines can load without parsing.
//!
//! # Key Types
//!
//! - [`ModelDump`] / [`TreeDescriptor`] / [`Node`] - Parsed trees
//! - [`compat::lightgbm::parse`] - Text dump parser
//! - [`io::native`] - Binary encoder and reader
//! - [`ConvertConfig`] - File conversion settings
//!
//! # Pipeline
//!
//! ```
//! use hydrogen_tools::{compat, io};
//!
//! let dump = compat::lightgbm::parse(
//!     "Tree=0\nsplit_feature=3\nthreshold=0.5\nleft_child=-1\nright_child=-2\nleaf_value=1.0 2.0\n",
//! );
//! let bytes = io::encode(&dump);
//! assert_eq!(bytes.len(), 48);
//! ```
//!
//! Both steps are total: malformed numbers become NaN and ragged arrays give
//! partially populated nodes. Only file I/O ([`io::convert_file`]) can fail.

pub mod compat;
pub mod config;
pub mod io;
pub mod repr;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use compat::lightgbm::parse;
pub use config::{ConvertConfig, Verbosity};
pub use io::{convert_file, decode, encode, ConvertError, ConvertReport, DecodeError};
pub use repr::{InternalNode, LeafNode, ModelDump, Node, TreeDescriptor};
