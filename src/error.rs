// src/error.rs

//! Error taxonomy shared by every component of the library.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, extracting, or rendering bitmap fonts.
#[derive(Error, Debug)]
pub enum FontError {
    /// A file could not be read or written.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font descriptor (or its image) is malformed or violates the schema.
    #[error("Malformed font descriptor: {0}")]
    Format(String),

    /// A grid cell was addressed beyond the current resolution.
    #[error("Cell ({row}, {col}) is out of range for a {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The font cannot be used as configured (e.g. no fallback glyph exists).
    #[error("Font configuration error: {0}")]
    Config(String),

    /// The requested grid resolution produces empty or zero-area cells.
    #[error("Invalid grid resolution {rows}x{cols} for a {width}x{height} image")]
    InvalidResolution {
        rows: usize,
        cols: usize,
        width: u32,
        height: u32,
    },
}

impl FontError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FontError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Library-wide result alias.
pub type Result<T> = std::result::Result<T, FontError>;
