//! Scan statistics.
//!
//! [`ScanStats`] is filled in while the scanner walks the file list and is
//! returned as part of [`ScanResult`](crate::ScanResult). The scan is
//! single-threaded, so plain counters are enough.
//!
//! # Examples
//!
//! ```
//! use pm_scanner::ScanStats;
//!
//! let mut stats = ScanStats::new();
//! stats.record_parsed(2, 7);
//! stats.record_failed();
//!
//! assert_eq!(stats.files, 2);
//! assert_eq!(stats.models, 2);
//! assert!(stats.has_failures());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Counters describing one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of Python files discovered and processed.
    pub files: usize,
    /// Number of files parsed successfully.
    pub parsed: usize,
    /// Number of files that failed to read or parse.
    pub failed: usize,
    /// Number of models extracted, before name collisions are resolved.
    pub models: usize,
    /// Number of fields extracted, before name collisions are resolved.
    pub fields: usize,
    /// Number of models replaced by a later model of the same name.
    pub shadowed: usize,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successfully parsed file.
    #[inline]
    pub fn record_parsed(&mut self, models: usize, fields: usize) {
        self.files += 1;
        self.parsed += 1;
        self.models += models;
        self.fields += fields;
    }

    /// Records a file that contributed no models because of an error.
    #[inline]
    pub fn record_failed(&mut self) {
        self.files += 1;
        self.failed += 1;
    }

    /// Records models that replaced earlier models of the same name.
    #[inline]
    pub fn record_shadowed(&mut self, count: usize) {
        self.shadowed += count;
    }

    /// Returns `true` if at least one file failed.
    #[inline]
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ({} parsed, {} failed), {} models, {} fields",
            self.files, self.parsed, self.failed, self.models, self.fields
        )?;
        if self.shadowed > 0 {
            write!(f, ", {} shadowed", self.shadowed)?;
        }
        Ok(())
    }
}
