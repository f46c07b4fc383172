//! Error types for the pm-py-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while parsing Python source and extracting models.

use pm_core::SourceLocation;

/// Errors that can occur during Python parsing.
///
/// # Examples
///
/// ```
/// use pm_py_parser::ParseError;
///
/// fn handle_error(err: ParseError) {
///     match err {
///         ParseError::LanguageInit => eprintln!("Failed to set Python language"),
///         ParseError::QueryCompile { offset, .. } => {
///             eprintln!("Query compilation failed at offset {offset}");
///         }
///         ParseError::MissingCapture(name) => eprintln!("Query lacks @{name}"),
///         ParseError::Parse => eprintln!("Failed to parse source code"),
///         ParseError::Syntax { location } => eprintln!("Invalid syntax at {location}"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the Python language on the parser.
    #[error("failed to set Python language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The underlying query error.
        kind: tree_sitter::QueryError,
    },

    /// A compiled query does not define a capture the extractor relies on.
    #[error("query is missing capture @{0}")]
    MissingCapture(&'static str),

    /// The parser produced no tree.
    ///
    /// This typically indicates the parser ran out of memory or was cancelled.
    #[error("failed to parse source code")]
    Parse,

    /// The source is not valid Python.
    #[error("invalid syntax at line {}, column {}", location.line, location.column)]
    Syntax {
        /// Position of the first error or missing node.
        location: SourceLocation,
    },
}
