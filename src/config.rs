//! Conversion configuration with builder pattern.
//!
//! [`ConvertConfig`] names the input dump, the output file and how chatty the
//! conversion is. It uses the `bon` crate for builder generation.
//!
//! # Example
//!
//! ```
//! use hydrogen_tools::config::{ConvertConfig, Verbosity};
//!
//! // All defaults: model.txt -> model.bin
//! let config = ConvertConfig::builder().build();
//! assert_eq!(config.verbosity, Verbosity::Warning);
//!
//! let config = ConvertConfig::builder()
//!     .input("dump/lgbm.txt")
//!     .output("out/lgbm.bin")
//!     .verbosity(Verbosity::Info)
//!     .build();
//! ```
//!
//! The input is read in full before the output is written, so both may name
//! the same file.

use std::path::PathBuf;

use bon::Builder;
use tracing::level_filters::LevelFilter;

/// Default dump path.
pub const DEFAULT_INPUT: &str = "model.txt";

/// Default binary output path.
pub const DEFAULT_OUTPUT: &str = "model.bin";

// =============================================================================
// Verbosity
// =============================================================================

/// How much the conversion logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Errors and warnings only.
    #[default]
    Warning,
    /// Progress and important information.
    Info,
    /// Per-tree details.
    Debug,
}

impl Verbosity {
    /// Step `count` levels up from the default, saturating at `Debug`.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Verbosity::Warning,
            1 => Verbosity::Info,
            _ => Verbosity::Debug,
        }
    }

    /// Matching `tracing` filter.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Silent => LevelFilter::OFF,
            Verbosity::Warning => LevelFilter::WARN,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Debug => LevelFilter::DEBUG,
        }
    }
}

// =============================================================================
// ConvertConfig
// =============================================================================

/// Settings for one dump-to-binary conversion.
#[derive(Debug, Clone, Builder)]
#[builder(derive(Clone, Debug))]
pub struct ConvertConfig {
    /// Text dump to read. Default: `model.txt`.
    #[builder(into, default = PathBuf::from(DEFAULT_INPUT))]
    pub input: PathBuf,

    /// Binary file to write. Default: `model.bin`.
    #[builder(into, default = PathBuf::from(DEFAULT_OUTPUT))]
    pub output: PathBuf,

    /// Verbosity level. Default: `Warning`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

// =============================================================================
// Tests
// =============================================================================
