//! Python parser management using tree-sitter.
//!
//! This module provides the [`PyParser`] struct for parsing Python files
//! and extracting model information.
//!
//! The grammar still accepts Python 2 `print` and `exec` statements. Python 3
//! refuses them, so a file containing one is reported as a syntax error.

use pm_core::ModelCatalog;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::ParseError;
use crate::extract::{extract_models, location_of};
use crate::matcher::ModelMatcher;
use crate::queries::get_class_query;

/// Node kinds the grammar accepts that are not Python 3.
const LEGACY_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// Python parser for extracting models from source files.
///
/// Wraps a tree-sitter parser configured for Python. The parser can be
/// reused for multiple files to avoid repeated initialization.
///
/// # Examples
///
/// ```
/// use pm_py_parser::PyParser;
///
/// let mut parser = PyParser::new()?;
/// let source = r#"
/// class Order(BaseModel):
///     items: List[LineItem]
/// "#;
///
/// let models = parser.parse(source)?;
/// let order = models.get("Order").expect("model found");
/// assert_eq!(order.fields["items"].type_expression, "List[LineItem]");
/// # Ok::<(), pm_py_parser::ParseError>(())
/// ```
pub struct PyParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The Python language for the parser.
    language: Language,
    /// Sentinel names used during extraction.
    matcher: ModelMatcher,
}

impl PyParser {
    /// Creates a new Python parser with the default sentinels.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Python language
    /// cannot be set on the parser.
    pub fn new() -> Result<Self, ParseError> {
        Self::with_matcher(ModelMatcher::default())
    }

    /// Creates a new Python parser that matches on custom sentinels.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Python language
    /// cannot be set on the parser.
    ///
    /// # Examples
    ///
    /// ```
    /// use pm_py_parser::{ModelMatcher, PyParser};
    ///
    /// let mut parser = PyParser::with_matcher(ModelMatcher::new("Schema", "Attr"))?;
    /// let models = parser.parse("class Row(Schema):\n    id: int\n")?;
    /// assert!(models.contains("Row"));
    /// # Ok::<(), pm_py_parser::ParseError>(())
    /// ```
    pub fn with_matcher(matcher: ModelMatcher) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_python::LANGUAGE.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self {
            parser,
            language,
            matcher,
        })
    }

    /// Parses Python source code and extracts its models.
    ///
    /// Source that is not valid Python yields an error rather than a partial
    /// result; callers treat that as a file with no models.
    ///
    /// # Errors
    ///
    /// - Returns [`ParseError::Syntax`] if the source contains a syntax error
    /// - Returns [`ParseError::Parse`] if parsing fails
    /// - Returns [`ParseError::QueryCompile`] if the class query fails to compile
    pub fn parse(&mut self, source: &str) -> Result<ModelCatalog, ParseError> {
        let tree = self.parse_tree(source)?;

        let root = tree.root_node();
        if root.has_error() {
            let node = first_error(root).unwrap_or(root);
            return Err(ParseError::Syntax {
                location: location_of(node),
            });
        }
        if let Some(node) = first_legacy_statement(root) {
            return Err(ParseError::Syntax {
                location: location_of(node),
            });
        }

        let query = get_class_query()?;
        Ok(extract_models(&tree, source, query, &self.matcher))
    }

    /// Parses source into a raw syntax tree without extracting anything.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] if the parser produces no tree.
    pub fn parse_tree(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser.parse(source, None).ok_or(ParseError::Parse)
    }

    /// Returns the tree-sitter language used by this parser.
    #[inline]
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Returns the sentinel names this parser matches on.
    #[inline]
    pub fn matcher(&self) -> &ModelMatcher {
        &self.matcher
    }
}

/// Finds the first `ERROR` or `MISSING` node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// Finds the first Python 2 only statement in document order.
fn first_legacy_statement(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if LEGACY_STATEMENTS.contains(&node.kind()) {
            return Some(node);
        }
        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return None;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

impl std::fmt::Debug for PyParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PyParser")
            .field("language", &"Python")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}
