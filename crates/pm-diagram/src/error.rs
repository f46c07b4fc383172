//! Error types for the pm-diagram crate.

use camino::Utf8PathBuf;

/// Errors that can occur while splicing a diagram into a document.
///
/// All of them are fatal for the splice step only; the standalone diagram
/// artifact is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// The document to update does not exist.
    #[error("documentation file not found: {0}")]
    MissingDocument(Utf8PathBuf),

    /// The document exists but could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// The document path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The marker pattern could not be compiled.
    #[error("invalid marker pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl SpliceError {
    /// Creates a new [`SpliceError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
