//! Content-loader boundary: how raw text reaches the tokenizer.
//!
//! The tokenizer never opens files itself; a [`ContentLoader`] hands it
//! text, whether from disk or from an editor buffer already in memory.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Failure to obtain content during tokenizer initialization.
///
/// A failed init leaves the tokenizer not-ready: `is_ready()` returns
/// `false` and all token operations are no-ops returning empty results.
#[derive(Debug, Error)]
pub enum InitError {
    /// The loader could not read the underlying source.
    #[error("failed to load source content: {0}")]
    Io(#[from] io::Error),
    /// The loader produced no content at all.
    #[error("no content available for {0}")]
    Empty(String),
}

/// Supplies raw source text to the tokenizer.
pub trait ContentLoader {
    /// Load the full text content for `path`.
    fn load(&self, path: &Path) -> Result<String, InitError>;
}

/// Loader reading files from disk.
///
/// Non-UTF-8 bytes are decoded lossily: legacy-encoded source files
/// still tokenize, with replacement characters flowing through lexemes
/// as ordinary identifier bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

impl ContentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<String, InitError> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
