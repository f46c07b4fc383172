//! Scan failures, split into per-file problems and run-ending ones.

use camino::Utf8PathBuf;
use pm_core::ConfigError;
use pm_py_parser::ParseError;

/// A failure while discovering or analysing model sources.
///
/// A file that cannot be read or parsed only costs that file's models; the
/// scanner records it and moves on. Every other variant stops the run.
///
/// ```
/// use pm_scanner::ScanError;
/// use std::io;
///
/// let err = ScanError::read("pkg/user.py", io::Error::from(io::ErrorKind::InvalidData));
/// assert!(err.is_recoverable());
/// assert_eq!(err.path().map(|p| p.as_str()), Some("pkg/user.py"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The directory walk itself failed.
    #[error("cannot traverse source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// A discovered file is unreadable or not UTF-8.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that was skipped.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A discovered file is not valid Python.
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// File that was skipped.
        path: Utf8PathBuf,
        /// Where the syntax broke.
        #[source]
        source: ParseError,
    },

    /// The scan configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The Python grammar or class query failed to load.
    #[error("failed to initialise parser: {0}")]
    ParserInit(#[source] ParseError),

    /// The walker yielded a path that is not UTF-8.
    #[error("non UTF-8 path under source root: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),
}

impl ScanError {
    /// Builds a [`ScanError::Read`].
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Builds a [`ScanError::Parse`].
    #[inline]
    pub fn parse(path: impl Into<Utf8PathBuf>, source: ParseError) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Whether the scan can skip the offending file and continue.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Whether the scan has to stop.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// The skipped file, for per-file failures.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => Some(path),
            Self::Walk(_) | Self::Config(_) | Self::ParserInit(_) | Self::NonUtf8Path(_) => None,
        }
    }
}
