//! Model and field records produced by the extractor.
//!
//! A [`ModelRecord`] is created fresh for every detected model class and is not
//! mutated once the extractor has finished with that class. Field order is
//! declaration order, which keeps diagram output stable between runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::location::SourceLocation;

/// Type expression used when an annotation has no recognised shape.
pub const ANY_TYPE: &str = "Any";

/// One typed field declared directly in a model body.
///
/// # Examples
///
/// ```
/// use pm_core::FieldRecord;
///
/// let field = FieldRecord::new("List[str]").with_description("Free-form labels");
/// assert_eq!(field.type_expression, "List[str]");
/// assert_eq!(field.description.as_deref(), Some("Free-form labels"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Rendered type annotation, e.g. `Optional[Dict[str, int]]`.
    pub type_expression: String,

    /// Text of the `description` keyword passed to the field factory, if any.
    pub description: Option<String>,
}

impl FieldRecord {
    /// Creates a field record without a description.
    #[must_use]
    pub fn new(type_expression: impl Into<String>) -> Self {
        Self {
            type_expression: type_expression.into(),
            description: None,
        }
    }

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Default for FieldRecord {
    fn default() -> Self {
        Self::new(ANY_TYPE)
    }
}

/// One detected model class.
///
/// # Examples
///
/// ```
/// use pm_core::{FieldRecord, ModelRecord};
///
/// let mut user = ModelRecord::new("User").with_docstring("A registered user.");
/// user.push_field("name", FieldRecord::new("str"));
/// user.push_field("tags", FieldRecord::new("List[str]"));
///
/// let names: Vec<_> = user.fields.keys().map(String::as_str).collect();
/// assert_eq!(names, ["name", "tags"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// Class name; the catalog key.
    pub name: String,

    /// Fields in declaration order.
    pub fields: IndexMap<String, FieldRecord>,

    /// Whitespace-trimmed class docstring.
    pub docstring: Option<String>,

    /// Location of the `class` statement.
    #[serde(default)]
    pub location: SourceLocation,
}

impl ModelRecord {
    /// Creates an empty model record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            docstring: None,
            location: SourceLocation::default(),
        }
    }

    /// Sets the docstring.
    #[must_use]
    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Sets the source location of the class statement.
    #[must_use]
    pub const fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Records a field.
    ///
    /// Re-declaring a name replaces the earlier field but keeps its position,
    /// the same way a later class attribute shadows an earlier one.
    pub fn push_field(&mut self, name: impl Into<String>, field: FieldRecord) {
        self.fields.insert(name.into(), field);
    }

    /// Returns the number of fields.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
