//! Pre-compiled tree-sitter queries for Python class discovery.
//!
//! This module provides the [`CLASS_QUERY`] constant containing the S-expression
//! pattern for class definitions with an explicit base list, and
//! [`get_class_query`] for lazily compiling and caching it.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query matching every class definition that lists base classes.
///
/// Classes without a parenthesised base list can never be models, so they are
/// excluded by the pattern itself. Decorated and nested classes match too.
///
/// # Capture Names
///
/// - `class.name` - The class name identifier
/// - `class.bases` - The `argument_list` holding base classes and keywords
/// - `class.body` - The class body `block`
/// - `class.definition` - The whole `class_definition` node
pub const CLASS_QUERY: &str = r"
(class_definition
  name: (identifier) @class.name
  superclasses: (argument_list) @class.bases
  body: (block) @class.body) @class.definition
";

/// The compiled [`CLASS_QUERY`] with its capture indices resolved.
#[derive(Debug)]
pub struct ClassQuery {
    /// The compiled query.
    pub query: Query,
    /// Capture index for `class.name`.
    pub name: u32,
    /// Capture index for `class.bases`.
    pub bases: u32,
    /// Capture index for `class.body`.
    pub body: u32,
    /// Capture index for `class.definition`.
    pub definition: u32,
}

/// Global cache for the compiled class query.
static COMPILED_CLASS_QUERY: OnceLock<ClassQuery> = OnceLock::new();

/// Returns the compiled class query for Python.
///
/// The query is compiled once and cached for all subsequent calls.
/// This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile, or
/// [`ParseError::MissingCapture`] if a capture name cannot be resolved.
pub fn get_class_query() -> Result<&'static ClassQuery, ParseError> {
    if let Some(query) = COMPILED_CLASS_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_python::LANGUAGE.into();
    let query = compile_class_query(&language)?;

    Ok(COMPILED_CLASS_QUERY.get_or_init(|| query))
}

/// Compiles [`CLASS_QUERY`] and resolves its capture indices.
fn compile_class_query(language: &Language) -> Result<ClassQuery, ParseError> {
    let query = Query::new(language, CLASS_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })?;

    let index = |name: &'static str| {
        query
            .capture_index_for_name(name)
            .ok_or(ParseError::MissingCapture(name))
    };

    Ok(ClassQuery {
        name: index("class.name")?,
        bases: index("class.bases")?,
        body: index("class.body")?,
        definition: index("class.definition")?,
        query,
    })
}
