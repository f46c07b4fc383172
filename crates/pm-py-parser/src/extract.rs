//! Model extraction from parsed Python syntax trees.
//!
//! This module walks the matches of the class query, keeps the classes whose
//! direct bases name the model sentinel, and reads fields, descriptions, and
//! docstrings from their bodies.

use pm_core::{FieldRecord, ModelCatalog, ModelRecord, SourceLocation};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, QueryCursor, Tree};

use crate::annotation::TypeExpr;
use crate::literal::{node_text, text_value, unparenthesized};
use crate::matcher::ModelMatcher;
use crate::queries::ClassQuery;

/// Extracts every model class from a parsed syntax tree.
///
/// Models are returned in source order of their `class` keyword, so an outer
/// class precedes the classes nested inside it. A later class with the same
/// name replaces the earlier record but keeps its position.
///
/// # Arguments
///
/// * `tree` - The parsed syntax tree
/// * `source` - The original source code (needed to extract text from nodes)
/// * `query` - The pre-compiled class query
/// * `matcher` - The sentinel names
///
/// # Examples
///
/// ```ignore
/// let tree = parser.parse(source, None)?;
/// let models = extract_models(&tree, source, get_class_query()?, &ModelMatcher::default());
/// ```
pub fn extract_models(
    tree: &Tree,
    source: &str,
    query: &ClassQuery,
    matcher: &ModelMatcher,
) -> ModelCatalog {
    let source_bytes = source.as_bytes();
    let root = tree.root_node();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query.query, root, source_bytes);

    let mut classes: Vec<ClassNodes<'_>> = Vec::new();
    while let Some(match_) = matches.next() {
        let mut nodes = ClassNodesBuilder::default();
        for capture in match_.captures {
            match capture.index {
                idx if idx == query.name => nodes.name = Some(capture.node),
                idx if idx == query.bases => nodes.bases = Some(capture.node),
                idx if idx == query.body => nodes.body = Some(capture.node),
                idx if idx == query.definition => nodes.definition = Some(capture.node),
                _ => {}
            }
        }
        if let Some(class) = nodes.build() {
            classes.push(class);
        }
    }

    classes.sort_by_key(|class| class.definition.start_byte());

    classes
        .into_iter()
        .filter(|class| has_model_base(class.bases, source_bytes, matcher))
        .map(|class| build_model(&class, source_bytes, matcher))
        .collect()
}

/// The captured nodes of one class definition.
struct ClassNodes<'tree> {
    name: Node<'tree>,
    bases: Node<'tree>,
    body: Node<'tree>,
    definition: Node<'tree>,
}

#[derive(Default)]
struct ClassNodesBuilder<'tree> {
    name: Option<Node<'tree>>,
    bases: Option<Node<'tree>>,
    body: Option<Node<'tree>>,
    definition: Option<Node<'tree>>,
}

impl<'tree> ClassNodesBuilder<'tree> {
    fn build(self) -> Option<ClassNodes<'tree>> {
        Some(ClassNodes {
            name: self.name?,
            bases: self.bases?,
            body: self.body?,
            definition: self.definition?,
        })
    }
}

/// Returns `true` if any direct base resolves, by its final path component, to the sentinel.
///
/// Keyword arguments such as `metaclass=...` and subscripted bases such as
/// `Generic[T]` are never model bases.
fn has_model_base(bases: Node<'_>, source: &[u8], matcher: &ModelMatcher) -> bool {
    let mut cursor = bases.walk();
    bases.named_children(&mut cursor).any(|base| match base.kind() {
        "identifier" => matcher.is_model_base(node_text(base, source)),
        "attribute" => base
            .child_by_field_name("attribute")
            .is_some_and(|attr| matcher.is_model_base(node_text(attr, source))),
        _ => false,
    })
}

fn build_model(class: &ClassNodes<'_>, source: &[u8], matcher: &ModelMatcher) -> ModelRecord {
    let mut model = ModelRecord::new(node_text(class.name, source))
        .with_location(location_of(class.definition));

    let statements = body_statements(class.body);

    if let Some(docstring) = statements.first().and_then(|stmt| docstring(*stmt, source)) {
        model.docstring = Some(docstring);
    }

    for statement in statements {
        if let Some((name, field)) = field_declaration(statement, source, matcher) {
            model.push_field(name, field);
        }
    }

    model
}

/// Statements of a block in order, comments excluded.
fn body_statements(body: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .filter(|stmt| stmt.kind() != "comment")
        .collect()
}

/// The only expression of an expression statement, if it has exactly one.
fn sole_expression(statement: Node<'_>) -> Option<Node<'_>> {
    if statement.kind() != "expression_statement" {
        return None;
    }
    let mut cursor = statement.walk();
    let mut expressions = statement
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment");
    let first = expressions.next()?;
    expressions.next().is_none().then_some(first)
}

/// Reads the docstring from the first statement of a class body.
fn docstring(first_statement: Node<'_>, source: &[u8]) -> Option<String> {
    let expr = unparenthesized(sole_expression(first_statement)?);
    if !matches!(expr.kind(), "string" | "concatenated_string") {
        return None;
    }
    text_value(expr, source).map(|doc| doc.trim().to_owned())
}

/// Reads `name: annotation` or `name: annotation = value` from a body statement.
fn field_declaration(
    statement: Node<'_>,
    source: &[u8],
    matcher: &ModelMatcher,
) -> Option<(String, FieldRecord)> {
    let assignment = sole_expression(statement).filter(|expr| expr.kind() == "assignment")?;
    let target = assignment
        .child_by_field_name("left")
        .filter(|left| left.kind() == "identifier")?;
    let annotation = assignment.child_by_field_name("type")?;

    let mut field = FieldRecord::new(TypeExpr::from_node(annotation, source).render());
    field.description = assignment
        .child_by_field_name("right")
        .and_then(|value| field_description(value, source, matcher));

    Some((node_text(target, source).to_owned(), field))
}

/// Reads `description="..."` from a call to the field factory.
fn field_description(value: Node<'_>, source: &[u8], matcher: &ModelMatcher) -> Option<String> {
    if value.kind() != "call" {
        return None;
    }
    let callee = value
        .child_by_field_name("function")
        .filter(|callee| callee.kind() == "identifier")?;
    if !matcher.is_field_factory(node_text(callee, source)) {
        return None;
    }

    let arguments = value.child_by_field_name("arguments")?;
    let mut cursor = arguments.walk();
    let description = arguments
        .named_children(&mut cursor)
        .filter(|arg| arg.kind() == "keyword_argument")
        .find(|arg| {
            arg.child_by_field_name("name")
                .is_some_and(|name| node_text(name, source) == "description")
        })?;

    text_value(description.child_by_field_name("value")?, source)
}

/// Converts a node's start position to a [`SourceLocation`].
pub(crate) fn location_of(node: Node<'_>) -> SourceLocation {
    let point = node.start_position();
    SourceLocation::new(
        u32::try_from(point.row + 1).unwrap_or(u32::MAX),
        u32::try_from(point.column).unwrap_or(u32::MAX),
        u32::try_from(node.start_byte()).unwrap_or(u32::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::get_class_query;
    use tree_sitter::Parser;

    fn extract_with(source: &str, matcher: &ModelMatcher) -> ModelCatalog {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("Python grammar loads");
        let tree = parser.parse(source, None).expect("Parse failed");
        let query = get_class_query().expect("Query should compile");
        extract_models(&tree, source, query, matcher)
    }

    fn extract(source: &str) -> ModelCatalog {
        extract_with(source, &ModelMatcher::default())
    }

    fn field_types(model: &ModelRecord) -> Vec<(&str, &str)> {
        model
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.type_expression.as_str()))
            .collect()
    }

    #[test]
    fn test_user_model() {
        let source = r#"
from typing import List
from pydantic import BaseModel


class User(BaseModel):
    name: str
    tags: List[str]
"#;
        let catalog = extract(source);
        assert_eq!(catalog.len(), 1);

        let user = catalog.get("User").expect("User extracted");
        assert_eq!(field_types(user), [("name", "str"), ("tags", "List[str]")]);
        assert!(user.docstring.is_none());
        assert_eq!(user.location.line, 6);
        assert_eq!(user.location.column, 0);
    }

    #[test]
    fn test_non_model_classes_ignored() {
        let source = r"
class Plain:
    name: str

class Other(object):
    name: str

class Settings(BaseSettings):
    name: str
";
        assert!(extract(source).is_empty());
    }

    #[test]
    fn test_indirect_inheritance_not_detected() {
        let source = r"
class Base(BaseModel):
    id: int

class Child(Base):
    name: str
";
        let catalog = extract(source);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Base"]);
    }

    #[test]
    fn test_dotted_and_multiple_bases() {
        let source = r"
class A(pydantic.BaseModel):
    x: int

class B(Mixin, pydantic.main.BaseModel, metaclass=Meta):
    y: int

class C(Generic[T], BaseModel):
    z: T

class D(BaseModel[int]):
    w: int

class E(metaclass=BaseModel):
    v: int
";
        let catalog = extract(source);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["A", "B", "C"]);
    }

    #[test]
    fn test_unannotated_assignments_ignored() {
        let source = r#"
class Config(BaseModel):
    LIMIT = 10
    _cache = {}
    name: str = "x"
    self.other: int = 3

    def method(self) -> None:
        local: int = 1
"#;
        let catalog = extract(source);
        let config = catalog.get("Config").expect("Config extracted");
        assert_eq!(field_types(config), [("name", "str")]);
    }

    #[test]
    fn test_field_descriptions() {
        let source = r#"
class Item(BaseModel):
    sku: str = Field(description="Stock keeping unit")
    qty: int = Field(0, description='Quantity', ge=0)
    note: str = Field(default="n/a")
    price: float = Money(description="not the factory")
    code: str = pydantic.Field(description="dotted factory")
    raw: bytes = Field(description=b"bytes")
    fmt: str = Field(description=f"{x}")
    count: int = Field(description=5)
    plain: str = "description"
    long: str = Field(
        description=(
            "part one "
            "part two"
        )
    )
    wrapped: str = Field(description=(("inner")))
    pair: str = Field(description=("a", "b"))
"#;
        let catalog = extract(source);
        let item = catalog.get("Item").expect("Item extracted");
        let descriptions: Vec<_> = item
            .fields
            .iter()
            .map(|(name, field)| (name.as_str(), field.description.as_deref()))
            .collect();
        assert_eq!(
            descriptions,
            [
                ("sku", Some("Stock keeping unit")),
                ("qty", Some("Quantity")),
                ("note", None),
                ("price", None),
                ("code", None),
                ("raw", None),
                ("fmt", None),
                ("count", None),
                ("plain", None),
                ("long", Some("part one part two")),
                ("wrapped", Some("inner")),
                ("pair", None),
            ]
        );
    }

    #[test]
    fn test_custom_sentinels() {
        let source = r#"
class Row(Schema):
    id: int = Attr(description="primary key")

class Ignored(BaseModel):
    id: int
"#;
        let matcher = ModelMatcher::new("Schema", "Attr");
        let catalog = extract_with(source, &matcher);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["Row"]);
        let row = catalog.get("Row").expect("Row extracted");
        assert_eq!(row.fields["id"].description.as_deref(), Some("primary key"));
    }

    #[test]
    fn test_docstrings() {
        let source = r#"
class Documented(BaseModel):
    """
    A documented model.

    Second paragraph.
    """
    x: int

class Commented(BaseModel):
    # leading comment
    "Single quoted."

class Concatenated(BaseModel):
    "First " "second"

class Late(BaseModel):
    x: int
    """Not a docstring."""

class Bytes(BaseModel):
    b"bytes are not docstrings"

class Formatted(BaseModel):
    f"{name} is not a docstring"

class Parenthesized(BaseModel):
    ("Wrapped "
     "docstring.")
    x: int
"#;
        let catalog = extract(source);
        let doc = |name: &str| {
            catalog
                .get(name)
                .and_then(|model| model.docstring.as_deref())
                .map(str::to_owned)
        };
        assert_eq!(
            doc("Documented").as_deref(),
            Some("A documented model.\n\n    Second paragraph.")
        );
        assert_eq!(doc("Commented").as_deref(), Some("Single quoted."));
        assert_eq!(doc("Concatenated").as_deref(), Some("First second"));
        assert_eq!(doc("Late"), None);
        assert_eq!(doc("Bytes"), None);
        assert_eq!(doc("Formatted"), None);
        assert_eq!(doc("Parenthesized").as_deref(), Some("Wrapped docstring."));
    }

    #[test]
    fn test_nested_and_decorated_models_in_source_order() {
        let source = r"
@dataclass_transform()
class Outer(BaseModel):
    a: int

    class Inner(BaseModel):
        b: int

    c: int

def factory():
    class Local(BaseModel):
        d: int
    return Local
";
        let catalog = extract(source);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            ["Outer", "Inner", "Local"]
        );
        let outer = catalog.get("Outer").expect("Outer extracted");
        assert_eq!(field_types(outer), [("a", "int"), ("c", "int")]);
        assert_eq!(field_types(catalog.get("Inner").expect("Inner")), [("b", "int")]);
    }

    #[test]
    fn test_duplicate_class_names_last_wins_first_position() {
        let source = r"
class A(BaseModel):
    old: int

class B(BaseModel):
    b: int

class A(BaseModel):
    new: str
";
        let catalog = extract(source);
        assert_eq!(catalog.names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(field_types(catalog.get("A").expect("A")), [("new", "str")]);
    }

    #[test]
    fn test_redeclared_field_keeps_first_position() {
        let source = r"
class A(BaseModel):
    x: int
    y: int
    x: str
";
        let catalog = extract(source);
        assert_eq!(
            field_types(catalog.get("A").expect("A")),
            [("x", "str"), ("y", "int")]
        );
    }
}
