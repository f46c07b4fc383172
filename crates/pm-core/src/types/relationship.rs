//! Containment edges between models.
//!
//! Edges are never stored on a [`ModelRecord`](super::ModelRecord); the
//! renderer derives them from field type expressions each time a diagram is
//! produced.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a containing field holds one or many instances of the target.
///
/// # Examples
///
/// ```
/// use pm_core::Multiplicity;
///
/// assert_eq!(Multiplicity::from_type_expression("List[LineItem]"), Multiplicity::Many);
/// assert_eq!(Multiplicity::from_type_expression("list[LineItem]"), Multiplicity::Many);
/// assert_eq!(Multiplicity::from_type_expression("Optional[Address]"), Multiplicity::One);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// A single contained instance.
    One,
    /// A collection of contained instances.
    Many,
}

impl Multiplicity {
    /// Classifies a rendered type expression.
    ///
    /// The check is two case-sensitive substring tests for `List` and `list`,
    /// so `Sequence[X]` or `LIST[X]` count as [`One`](Self::One).
    #[must_use]
    pub fn from_type_expression(type_expression: &str) -> Self {
        if type_expression.contains("List") || type_expression.contains("list") {
            Self::Many
        } else {
            Self::One
        }
    }

    /// Returns the edge label text.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "contains",
            Self::Many => "contains many",
        }
    }
}

/// A composition edge from the model declaring a field to a model its type mentions.
///
/// The [`Display`](fmt::Display) form is the edge's diagram line without
/// indentation, and it is also the key used for deduplication.
///
/// # Examples
///
/// ```
/// use pm_core::{Multiplicity, RelationshipEdge};
///
/// let edge = RelationshipEdge::new("Order", "LineItem", Multiplicity::Many);
/// assert_eq!(edge.to_string(), "Order *-- LineItem : contains many");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Model declaring the field.
    pub owner: String,

    /// Model referenced by the field type.
    pub target: String,

    /// One or many.
    pub multiplicity: Multiplicity,
}

impl RelationshipEdge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(owner: impl Into<String>, target: impl Into<String>, multiplicity: Multiplicity) -> Self {
        Self {
            owner: owner.into(),
            target: target.into(),
            multiplicity,
        }
    }
}

impl fmt::Display for RelationshipEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} *-- {} : {}",
            self.owner,
            self.target,
            self.multiplicity.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity_case_sensitive() {
        assert_eq!(Multiplicity::from_type_expression("LIST[A]"), Multiplicity::One);
        assert_eq!(Multiplicity::from_type_expression("Sequence[A]"), Multiplicity::One);
        assert_eq!(Multiplicity::from_type_expression("Dict[str, List[A]]"), Multiplicity::Many);
        // Token match, not a type check.
        assert_eq!(Multiplicity::from_type_expression("Checklist"), Multiplicity::Many);
    }

    #[test]
    fn test_edge_display_single() {
        let edge = RelationshipEdge::new("User", "Address", Multiplicity::One);
        assert_eq!(edge.to_string(), "User *-- Address : contains");
    }

    #[test]
    fn test_multiplicity_labels() {
        assert_eq!(Multiplicity::One.label(), "contains");
        assert_eq!(Multiplicity::Many.label(), "contains many");
    }
}
