//! JSON export of a finished heightfield for downstream tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arena_terrain::Heightfield;

/// Errors that can occur while writing a heightfield.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The output file could not be created or written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The heightfield could not be encoded.
    #[error("failed to encode heightfield: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Write `heights` to `path` as `{"width", "height", "values"}` JSON.
///
/// Sentinel cells are written as-is (`-1.0`).
pub fn write_json(heights: &Heightfield, path: &Path) -> Result<(), ExportError> {
    let io_error = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, heights)?;
    writer.flush().map_err(io_error)?;
    Ok(())
}
