//! Positions of model declarations and syntax errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a node starts in a Python file.
///
/// `line` counts from 1, `column` counts bytes from 0 within the line, and
/// `byte_offset` is measured from the start of the file. Tree-sitter rows are
/// 0-based, so callers add one when converting.
///
/// # Examples
///
/// ```
/// use pm_core::SourceLocation;
///
/// let loc = SourceLocation::new(12, 0, 341);
/// assert_eq!(loc.to_string(), "12:0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-based line of the node's first byte.
    pub line: u32,

    /// 0-based byte column within that line.
    pub column: u32,

    /// Byte offset of the node from the start of the file.
    pub byte_offset: u32,
}

impl SourceLocation {
    /// Creates a location from already-converted coordinates.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_file_start() {
        let start = SourceLocation::default();
        assert_eq!(start.byte_offset, 0);
        assert_eq!(start.to_string(), "0:0");
    }

    #[test]
    fn test_display_is_line_and_column() {
        assert_eq!(SourceLocation::new(3, 14, 40).to_string(), "3:14");
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(SourceLocation::new(2, 4, 17)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"line": 2, "column": 4, "byte_offset": 17})
        );
    }
}
