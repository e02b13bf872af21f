//! File-level conversion from a text dump to the binary layout.
//!
//! ```ignore
//! use hydrogen_tools::config::ConvertConfig;
//! use hydrogen_tools::io::convert_file;
//!
//! let config = ConvertConfig::builder()
//!     .input("model.txt")
//!     .output("model.bin")
//!     .build();
//! let report = convert_file(&config)?;
//! println!("Wrote {} ({} bytes)", report.output.display(), report.num_bytes);
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::ConvertConfig;
use crate::io::native;
use crate::repr::ModelDump;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from reading the dump or writing the binary file.
///
/// Parsing and encoding themselves cannot fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The input dump could not be read.
    #[error("cannot read \"{}\": {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("cannot write \"{}\": {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Path the failing operation was working on.
    pub fn path(&self) -> &Path {
        match self {
            ConvertError::Read { path, .. } | ConvertError::Write { path, .. } => path,
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Outcome of a successful [`convert_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    /// File that was written.
    pub output: PathBuf,
    /// Trees in the written model.
    pub num_trees: usize,
    /// Bytes written.
    pub num_bytes: usize,
}

impl ModelDump {
    /// Encode and write to `path`, returning the number of bytes written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize, ConvertError> {
        let path = path.as_ref();
        let bytes = native::encode(self);
        std::fs::write(path, &bytes).map_err(|source| ConvertError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(bytes.len())
    }
}

/// Read `config.input`, transcode it and write `config.output`.
///
/// Nothing is written if the input cannot be read.
pub fn convert_file(config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    let model = ModelDump::from_file(&config.input)?;
    info!(
        input = %config.input.display(),
        num_trees = model.num_trees(),
        num_nodes = model.num_nodes(),
        "parsed dump"
    );

    let num_bytes = model.save(&config.output)?;
    info!(output = %config.output.display(), num_bytes, "wrote binary model");

    Ok(ConvertReport {
        output: config.output.clone(),
        num_trees: model.num_trees(),
        num_bytes,
    })
}

// ============================================================================
// Tests
// ============================================================================
