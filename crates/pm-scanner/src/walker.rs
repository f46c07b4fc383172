//! Discovery of `*.py` sources under the model package root.
//!
//! Virtualenvs, bytecode caches and build output are pruned by directory
//! name before they are descended into. Siblings come back in file-name
//! order so two runs over the same tree analyse files in the same sequence.
//!
//! ```no_run
//! use camino::Utf8Path;
//! use pm_scanner::FileWalker;
//!
//! let sources = FileWalker::new(Utf8Path::new("src/data_archive"))?.collect_paths()?;
//! assert!(sources.iter().all(|p| p.extension() == Some("py")));
//! # Ok::<(), pm_scanner::ScanError>(())
//! ```

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use pm_core::ScanConfig;

use crate::error::ScanError;

/// Directory names that never contain hand-written models.
pub const SKIP_DIRECTORIES: &[&str] = &[
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".git",
    "node_modules",
    "build",
    "dist",
];

const PYTHON_EXTENSIONS: &[&str] = &["py"];

/// Finds the Python files a scan should analyse.
#[derive(Debug)]
pub struct FileWalker {
    root: Utf8PathBuf,
    /// Pruned in addition to [`SKIP_DIRECTORIES`].
    skip_dirs: Vec<String>,
    follow_links: bool,
    respect_gitignore: bool,
}

impl FileWalker {
    /// Walks `root` with the default skip list and no ignore files.
    ///
    /// # Errors
    ///
    /// [`ScanError::Config`] when `root` is missing or is a file.
    pub fn new(root: &Utf8Path) -> Result<Self, ScanError> {
        let config = ScanConfig {
            source_dir: root.to_owned(),
            ..ScanConfig::default()
        };
        Self::from_config(&config)
    }

    /// Builds a walker from the `scan` config section.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        config.validate_source_dir()?;
        Ok(Self {
            root: config.source_dir.clone(),
            skip_dirs: config.skip_dirs.clone(),
            follow_links: config.follow_links,
            respect_gitignore: config.respect_gitignore,
        })
    }

    /// Prunes more directories, matched by name at any depth.
    #[must_use]
    pub fn with_skip_dirs(mut self, dirs: &[&str]) -> Self {
        self.skip_dirs.extend(dirs.iter().map(ToString::to_string));
        self
    }

    /// Follows symlinks when `true`.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Configures whether `.gitignore` files and hidden entries are honoured.
    ///
    /// Off by default, which matches a plain recursive `**/*.py` glob.
    #[must_use]
    pub const fn with_respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Lists every Python file below the root, depth first.
    ///
    /// # Errors
    ///
    /// [`ScanError::Walk`] on traversal failure, [`ScanError::NonUtf8Path`]
    /// if a Python file's path cannot be represented as UTF-8.
    pub fn collect_paths(&self) -> Result<Vec<Utf8PathBuf>, ScanError> {
        let mut sources = Vec::new();
        for entry in self.build_walker() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let source = Utf8PathBuf::from_path_buf(entry.into_path())
                .map_err(ScanError::NonUtf8Path)?;
            if is_python_file(&source) {
                sources.push(source);
            }
        }
        Ok(sources)
    }

    fn build_walker(&self) -> ignore::Walk {
        let skip: Arc<[String]> = SKIP_DIRECTORIES
            .iter()
            .map(ToString::to_string)
            .chain(self.skip_dirs.iter().cloned())
            .collect();

        WalkBuilder::new(&self.root)
            .standard_filters(self.respect_gitignore)
            .follow_links(self.follow_links)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                // The root itself is never pruned, whatever its name.
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                !skip.iter().any(|dir| *dir == name)
            })
            .build()
    }

    /// The package root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn is_python_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| PYTHON_EXTENSIONS.contains(&ext))
}
