//! External model format parsers.
//!
//! Each parser reads a format produced by another framework into the
//! crate's [`ModelDump`](crate::repr::ModelDump) representation.

pub mod lightgbm;

pub use lightgbm::parse;
