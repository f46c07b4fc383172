//! Lowering of type annotations into [`TypeExpr`] and rendering them as text.
//!
//! Tree-sitter offers two encodings for generic types. `List[str]` in an
//! annotation is usually a `generic_type`, while `typing.List[str]` stays a
//! `subscript`. Both lower to [`TypeExpr::Subscript`], so they render the
//! same way.
//!
//! # Examples
//!
//! ```
//! use pm_py_parser::TypeExpr;
//!
//! let expr = TypeExpr::Subscript {
//!     value: Box::new(TypeExpr::name("Dict")),
//!     index: Box::new(TypeExpr::Tuple(vec![TypeExpr::name("str"), TypeExpr::name("int")])),
//! };
//! assert_eq!(expr.render(), "Dict[str, int]");
//! assert_eq!(TypeExpr::Other.render(), "Any");
//! ```

use std::fmt;

use pm_core::types::model::ANY_TYPE;
use tree_sitter::Node;

use crate::literal::{constant_text, node_text};

/// The closed set of annotation shapes the renderer distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare name such as `str`.
    Name(String),

    /// A dotted access such as `datetime.date`.
    Attribute {
        /// The expression before the dot.
        value: Box<TypeExpr>,
        /// The attribute name after the dot.
        attr: String,
    },

    /// A generic application such as `List[int]`.
    Subscript {
        /// The generic being applied.
        value: Box<TypeExpr>,
        /// The bracketed argument; several arguments form a [`TypeExpr::Tuple`].
        index: Box<TypeExpr>,
    },

    /// Comma-separated elements.
    Tuple(Vec<TypeExpr>),

    /// A bracketed list such as the parameter list of `Callable[[int], str]`.
    List(Vec<TypeExpr>),

    /// A literal constant, already in its `str()` form.
    Constant(String),

    /// Any other shape: unions, calls, f-strings, operators.
    Other,
}

impl TypeExpr {
    /// Shorthand for [`TypeExpr::Name`].
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Lowers an annotation node.
    ///
    /// Total over every node kind; unknown shapes become [`TypeExpr::Other`].
    #[must_use]
    pub fn from_node(node: Node<'_>, source: &[u8]) -> Self {
        match node.kind() {
            "type" | "parenthesized_expression" => {
                first_named_child(node).map_or(Self::Other, |inner| Self::from_node(inner, source))
            }
            "identifier" => Self::Name(node_text(node, source).to_owned()),
            "attribute" => {
                let (Some(object), Some(attr)) = (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("attribute"),
                ) else {
                    return Self::Other;
                };
                Self::Attribute {
                    value: Box::new(Self::from_node(object, source)),
                    attr: node_text(attr, source).to_owned(),
                }
            }
            "member_type" => {
                let mut named = named_children(node).into_iter();
                let (Some(object), Some(attr)) = (named.next(), named.next()) else {
                    return Self::Other;
                };
                Self::Attribute {
                    value: Box::new(Self::from_node(object, source)),
                    attr: node_text(attr, source).to_owned(),
                }
            }
            "subscript" => {
                let Some(value) = node.child_by_field_name("value") else {
                    return Self::Other;
                };
                let mut cursor = node.walk();
                let indices: Vec<Node<'_>> = node
                    .children_by_field_name("subscript", &mut cursor)
                    .collect();
                Self::subscript(Self::from_node(value, source), &indices, source)
            }
            "generic_type" => {
                let named = named_children(node);
                let (Some(value), Some(params)) = (
                    named.iter().find(|n| n.kind() == "identifier"),
                    named.iter().find(|n| n.kind() == "type_parameter"),
                ) else {
                    return Self::Other;
                };
                Self::subscript(
                    Self::from_node(*value, source),
                    &named_children(*params),
                    source,
                )
            }
            "tuple" | "expression_list" => Self::Tuple(Self::lower_all(node, source)),
            "list" => Self::List(Self::lower_all(node, source)),
            _ => constant_text(node, source).map_or(Self::Other, Self::Constant),
        }
    }

    fn subscript(value: Self, indices: &[Node<'_>], source: &[u8]) -> Self {
        let index = match indices {
            [] => return Self::Other,
            [single] => Self::from_node(*single, source),
            many => Self::Tuple(many.iter().map(|n| Self::from_node(*n, source)).collect()),
        };
        Self::Subscript {
            value: Box::new(value),
            index: Box::new(index),
        }
    }

    fn lower_all(node: Node<'_>, source: &[u8]) -> Vec<Self> {
        named_children(node)
            .into_iter()
            .map(|child| Self::from_node(child, source))
            .collect()
    }

    /// Renders the expression as annotation text.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Self::Subscript { value, index } => write!(f, "{value}[{index}]"),
            Self::Tuple(items) => write_joined(f, items),
            Self::List(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Constant(text) => f.write_str(text),
            Self::Other => f.write_str(ANY_TYPE),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Named children with comments filtered out.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Parser, Tree};

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("Python grammar loads");
        parser.parse(source, None).expect("Parse failed")
    }

    /// Renders the annotation of `x: <annotation>`.
    fn render_annotation(annotation: &str) -> String {
        let source = format!("x: {annotation}\n");
        let tree = parse(&source);
        let assignment = tree
            .root_node()
            .named_child(0)
            .and_then(|stmt| stmt.named_child(0))
            .expect("assignment");
        let ty = assignment.child_by_field_name("type").expect("annotation");
        TypeExpr::from_node(ty, source.as_bytes()).render()
    }

    #[test]
    fn test_render_names_and_attributes() {
        assert_eq!(render_annotation("str"), "str");
        assert_eq!(render_annotation("datetime.date"), "datetime.date");
        assert_eq!(render_annotation("a.b.c"), "a.b.c");
    }

    #[test]
    fn test_render_generic_round_trip() {
        assert_eq!(render_annotation("Outer[Inner]"), "Outer[Inner]");
        assert_eq!(render_annotation("List[str]"), "List[str]");
        assert_eq!(
            render_annotation("Optional[Dict[str, List[int]]]"),
            "Optional[Dict[str, List[int]]]"
        );
    }

    #[test]
    fn test_render_dotted_generic() {
        assert_eq!(render_annotation("typing.List[str]"), "typing.List[str]");
        assert_eq!(
            render_annotation("t.Dict[str, models.Tag]"),
            "t.Dict[str, models.Tag]"
        );
    }

    #[test]
    fn test_render_list_and_tuple_arguments() {
        assert_eq!(
            render_annotation("Callable[[int, str], bool]"),
            "Callable[[int, str], bool]"
        );
        assert_eq!(render_annotation("Tuple[(int, str)]"), "Tuple[int, str]");
        assert_eq!(render_annotation("Tuple[()]"), "Tuple[]");
    }

    #[test]
    fn test_render_literal_constants() {
        assert_eq!(render_annotation("Literal['a', \"b\"]"), "Literal[a, b]");
        assert_eq!(render_annotation("Literal[0x10, True, None]"), "Literal[16, True, None]");
        assert_eq!(render_annotation("Tuple[int, ...]"), "Tuple[int, Ellipsis]");
        assert_eq!(render_annotation("'Forward'"), "Forward");
        assert_eq!(render_annotation("Literal[b'x']"), "Literal[b'x']");
    }

    #[test]
    fn test_render_unsupported_as_any() {
        assert_eq!(render_annotation("int | None"), "Any");
        assert_eq!(render_annotation("Optional[int | str]"), "Optional[Any]");
        assert_eq!(render_annotation("conlist(int, min_length=1)"), "Any");
        assert_eq!(render_annotation("Literal[-1]"), "Literal[Any]");
        assert_eq!(render_annotation("f'{x}'"), "Any");
    }

    #[test]
    fn test_parentheses_are_transparent() {
        assert_eq!(render_annotation("(List[int])"), "List[int]");
    }

    #[test]
    fn test_display_matches_render() {
        let expr = TypeExpr::List(vec![TypeExpr::Constant("1".to_owned()), TypeExpr::Other]);
        assert_eq!(expr.to_string(), "[1, Any]");
        assert_eq!(expr.render(), expr.to_string());
    }
}
