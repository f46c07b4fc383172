//! Configuration errors shared by every crate in the workspace.

use camino::Utf8PathBuf;

/// Why a [`Config`](crate::Config) could not be loaded or used.
///
/// # Examples
///
/// ```
/// use pm_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("src/data_archive"));
/// assert_eq!(error.to_string(), "source directory does not exist: src/data_archive");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The source path exists but is not usable as a package root.
    #[error("cannot use '{path}' as source directory: {reason}")]
    InvalidPath {
        /// Offending path.
        path: Utf8PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// The source directory is absent.
    #[error("source directory does not exist: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// An option holds a value no stage can work with.
    #[error("option '{option}' {reason}")]
    InvalidOption {
        /// Dotted option name, e.g. `readme.end_marker`.
        option: String,
        /// Rule the value broke.
        reason: String,
    },

    /// The config file could not be read.
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not JSON of the expected shape.
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidOption`].
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}
