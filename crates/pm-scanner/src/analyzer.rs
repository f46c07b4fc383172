//! Per-file model extraction.
//!
//! [`FileAnalyzer`] reads one file at a time and hands its text to a reused
//! [`PyParser`]. Every outcome is returned to the caller as a
//! [`FileOutcome`]; nothing here decides whether a failure is fatal.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use pm_core::ModelCatalog;
use pm_py_parser::{ModelMatcher, PyParser};
use tracing::debug;

use crate::error::ScanError;

/// Result of analysing one file: its models, or why it contributed none.
pub type FileOutcome = Result<ModelCatalog, ScanError>;

/// Sequential file analyzer.
///
/// Holds one parser for the whole run. Files are processed strictly one
/// after another.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8PathBuf;
/// use pm_scanner::FileAnalyzer;
///
/// let mut analyzer = FileAnalyzer::new()?;
/// let paths = vec![Utf8PathBuf::from("src/data_archive/models.py")];
///
/// for (path, outcome) in analyzer.analyze_files(&paths) {
///     match outcome {
///         Ok(models) => println!("{path}: {} models", models.len()),
///         Err(e) => eprintln!("{path}: {e}"),
///     }
/// }
/// # Ok::<(), pm_py_parser::ParseError>(())
/// ```
#[derive(Debug)]
pub struct FileAnalyzer {
    parser: PyParser,
}

impl FileAnalyzer {
    /// Creates an analyzer with the default sentinels.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`](pm_py_parser::ParseError::LanguageInit)
    /// if the Python grammar cannot be loaded.
    pub fn new() -> Result<Self, pm_py_parser::ParseError> {
        Self::with_matcher(ModelMatcher::default())
    }

    /// Creates an analyzer that matches on custom sentinels.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn with_matcher(matcher: ModelMatcher) -> Result<Self, pm_py_parser::ParseError> {
        Ok(Self {
            parser: PyParser::with_matcher(matcher)?,
        })
    }

    /// Analyzes each path in order.
    pub fn analyze_files(&mut self, paths: &[Utf8PathBuf]) -> Vec<(Utf8PathBuf, FileOutcome)> {
        paths
            .iter()
            .map(|path| (path.clone(), self.analyze_file(path)))
            .collect()
    }

    /// Reads and parses a single file.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Read`] if the file cannot be read as UTF-8 text
    /// - [`ScanError::Parse`] if the file is not valid Python
    pub fn analyze_file(&mut self, path: &Utf8Path) -> FileOutcome {
        let source = fs::read_to_string(path).map_err(|e| ScanError::read(path, e))?;
        let models = self
            .parser
            .parse(&source)
            .map_err(|e| ScanError::parse(path, e))?;

        debug!(
            path = %path,
            models = models.len(),
            fields = models.field_count(),
            "Analyzed file"
        );

        Ok(models)
    }
}
