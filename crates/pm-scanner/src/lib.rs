//! Filesystem scanner that accumulates Pydantic models into a catalog.
//!
//! This crate discovers Python files under the model source directory,
//! parses them one at a time with `pm-py-parser`, and merges the per-file
//! results into a single [`ModelCatalog`].
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`FileWalker`]: Directory traversal with the `ignore` crate
//! - [`FileAnalyzer`]: Sequential reading and parsing
//! - [`ScanStats`]: Counters for the run summary
//!
//! # Example
//!
//! ```no_run
//! use pm_core::ScanConfig;
//! use pm_scanner::Scanner;
//!
//! let scanner = Scanner::new(ScanConfig::default())?;
//! let result = scanner.scan()?;
//!
//! println!("{}", result.stats);
//! for (path, error) in &result.errors {
//!     eprintln!("skipped {path}: {error}");
//! }
//! # Ok::<(), pm_scanner::ScanError>(())
//! ```
//!
//! # Failure Handling
//!
//! A file that cannot be read or parsed contributes no models; its error is
//! logged, collected in [`ScanResult::errors`], and the scan continues. A
//! missing source directory is fatal before any file is touched.
//!
//! # Name Collisions
//!
//! Files are merged in walk order. A model name seen again in a later file
//! replaces the earlier record and keeps the earlier position. Collisions are
//! counted in [`ScanStats::shadowed`] and logged at debug level only.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod analyzer;
mod error;
mod stats;
mod walker;

pub use analyzer::{FileAnalyzer, FileOutcome};
pub use error::ScanError;
pub use stats::ScanStats;
pub use walker::{FileWalker, SKIP_DIRECTORIES};

use camino::{Utf8Path, Utf8PathBuf};
use pm_core::{ModelCatalog, ScanConfig};
use pm_py_parser::ModelMatcher;
use tracing::{debug, info, warn};

/// Result of a scan operation.
#[derive(Debug)]
pub struct ScanResult {
    /// Every model found, merged in file order.
    pub catalog: ModelCatalog,
    /// Statistics for the run.
    pub stats: ScanStats,
    /// Non-fatal errors encountered during scanning.
    pub errors: Vec<(Utf8PathBuf, ScanError)>,
}

/// The main scanner for model sources.
///
/// # Examples
///
/// ```no_run
/// use pm_core::{ExtractConfig, ScanConfig};
/// use pm_py_parser::ModelMatcher;
/// use pm_scanner::Scanner;
///
/// let matcher = ModelMatcher::from_extract_config(&ExtractConfig::default());
/// let scanner = Scanner::with_matcher(ScanConfig::default(), matcher)?;
/// let result = scanner.scan()?;
/// assert!(result.stats.files >= result.stats.parsed);
/// # Ok::<(), pm_scanner::ScanError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Scanner configuration.
    config: ScanConfig,
    /// Sentinel names handed to each parser.
    matcher: ModelMatcher,
}

impl Scanner {
    /// Creates a new scanner with the default sentinels.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the source directory doesn't exist or
    /// isn't a directory.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        Self::with_matcher(config, ModelMatcher::default())
    }

    /// Creates a new scanner with custom sentinels.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the source directory doesn't exist or
    /// isn't a directory.
    pub fn with_matcher(config: ScanConfig, matcher: ModelMatcher) -> Result<Self, ScanError> {
        config.validate_source_dir()?;

        info!(
            root = %config.source_dir,
            base_class = matcher.base_class(),
            "Creating scanner"
        );

        Ok(Self { config, matcher })
    }

    /// Returns the directory being scanned.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.config.source_dir
    }

    /// Scans the source directory and builds the model catalog.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`ScanError`] if the directory cannot be walked or the
    /// parser cannot be initialised. Per-file failures are not errors here;
    /// they are reported in [`ScanResult::errors`].
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let walker = FileWalker::from_config(&self.config)?;
        let paths = walker.collect_paths()?;
        info!(count = paths.len(), "Discovered Python files");

        let mut analyzer =
            FileAnalyzer::with_matcher(self.matcher.clone()).map_err(ScanError::ParserInit)?;

        let mut catalog = ModelCatalog::new();
        let mut stats = ScanStats::new();
        let mut errors = Vec::new();

        for (path, outcome) in analyzer.analyze_files(&paths) {
            match outcome {
                Ok(models) => {
                    stats.record_parsed(models.len(), models.field_count());
                    let report = catalog.merge(models);
                    for name in &report.replaced {
                        debug!(path = %path, model = %name, "Model name shadows an earlier model");
                    }
                    stats.record_shadowed(report.replaced.len());
                }
                Err(error) => {
                    warn!(path = %path, error = %error, "Skipping file");
                    stats.record_failed();
                    errors.push((path, error));
                }
            }
        }

        info!(
            files = stats.files,
            failed = stats.failed,
            models = catalog.len(),
            "Scan complete"
        );

        Ok(ScanResult {
            catalog,
            stats,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup(files: &[(&str, &str)]) -> (tempfile::TempDir, ScanConfig) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8").to_owned();
        for (relative, contents) in files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create dirs");
            }
            fs::write(path, contents).expect("write file");
        }
        let config = ScanConfig {
            source_dir: root,
            ..ScanConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn test_scan_order_and_line_item() {
        let (_dir, config) = setup(&[
            ("order.py", "class Order(BaseModel):\n    items: List[LineItem]\n"),
            ("line_item.py", "class LineItem(BaseModel):\n    sku: str\n"),
        ]);

        let result = Scanner::new(config).expect("scanner").scan().expect("scan");
        // `line_item.py` sorts before `order.py`.
        assert_eq!(result.catalog.names().collect::<Vec<_>>(), ["LineItem", "Order"]);
        assert_eq!(result.stats.files, 2);
        assert_eq!(result.stats.parsed, 2);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_scan_continues_after_parse_failure() {
        let (_dir, config) = setup(&[
            ("a.py", "class A(BaseModel):\n    x: int\n"),
            ("b.py", "class B(BaseModel:\n    y: int\n"),
            ("c.py", "class C(BaseModel):\n    z: int\n"),
        ]);

        let result = Scanner::new(config).expect("scanner").scan().expect("scan");
        assert_eq!(result.catalog.names().collect::<Vec<_>>(), ["A", "C"]);
        assert_eq!(result.stats.failed, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].0.as_str().ends_with("b.py"));
        assert!(result.errors[0].1.is_recoverable());
    }

    #[test]
    fn test_scan_last_writer_wins_across_files() {
        let (_dir, config) = setup(&[
            ("a.py", "class User(BaseModel):\n    old: int\n\nclass Tag(BaseModel):\n    label: str\n"),
            ("b.py", "class User(BaseModel):\n    new: str\n"),
        ]);

        let result = Scanner::new(config).expect("scanner").scan().expect("scan");
        assert_eq!(result.catalog.names().collect::<Vec<_>>(), ["User", "Tag"]);
        let user = result.catalog.get("User").expect("User");
        assert!(user.fields.contains_key("new"));
        assert!(!user.fields.contains_key("old"));
        assert_eq!(result.stats.models, 3);
        assert_eq!(result.stats.shadowed, 1);
    }

    #[test]
    fn test_scan_nested_packages() {
        let (_dir, config) = setup(&[
            ("pkg/__init__.py", ""),
            ("pkg/sub/models.py", "class Deep(BaseModel):\n    x: int\n"),
            ("pkg/__pycache__/models.py", "class Cached(BaseModel):\n    x: int\n"),
        ]);

        let result = Scanner::new(config).expect("scanner").scan().expect("scan");
        assert_eq!(result.catalog.names().collect::<Vec<_>>(), ["Deep"]);
        assert_eq!(result.stats.files, 2);
    }

    #[test]
    fn test_scanner_missing_root() {
        let (dir, mut config) = setup(&[]);
        config.source_dir = Utf8Path::from_path(dir.path())
            .expect("utf8")
            .join("data_archive");

        let err = Scanner::new(config).expect_err("missing root");
        assert!(err.is_fatal());
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_scanner_custom_matcher() {
        let (_dir, config) = setup(&[(
            "models.py",
            "class Row(Schema):\n    id: int\n\nclass Skipped(BaseModel):\n    id: int\n",
        )]);

        let scanner =
            Scanner::with_matcher(config, ModelMatcher::new("Schema", "Field")).expect("scanner");
        let result = scanner.scan().expect("scan");
        assert_eq!(result.catalog.names().collect::<Vec<_>>(), ["Row"]);
    }
}
