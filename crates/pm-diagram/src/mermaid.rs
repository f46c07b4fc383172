//! Mermaid `classDiagram` rendering.
//!
//! The diagram has one class block per model in catalog order, followed by
//! the inferred containment edges:
//!
//! ```text
//! classDiagram
//!     class Order {
//!         %% A customer order.
//!         +List[LineItem] items
//!     }
//!     class LineItem {
//!         +str sku
//!     }
//!     Order *-- LineItem : contains many
//! ```

use std::fmt::Write as _;

use pm_core::{
    FxHashSet, ModelCatalog, Multiplicity, RelationMatch, RelationshipEdge, RenderConfig,
    fx_hash_set,
};

/// Options that change the rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// How field types are matched against model names.
    pub relation_match: RelationMatch,
}

impl RenderOptions {
    /// Sets the relationship matching mode.
    #[must_use]
    pub const fn with_relation_match(mut self, relation_match: RelationMatch) -> Self {
        self.relation_match = relation_match;
        self
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            relation_match: config.relation_match,
        }
    }
}

/// Renders a catalog as a Mermaid class diagram.
///
/// The output always starts with `classDiagram\n` and ends with a newline.
/// Given the same catalog it is byte-for-byte identical between runs.
///
/// # Examples
///
/// ```
/// use pm_core::{FieldRecord, ModelCatalog, ModelRecord};
/// use pm_diagram::{RenderOptions, render_class_diagram};
///
/// let mut order = ModelRecord::new("Order");
/// order.push_field("items", FieldRecord::new("List[LineItem]"));
/// let mut item = ModelRecord::new("LineItem");
/// item.push_field("sku", FieldRecord::new("str"));
/// let catalog: ModelCatalog = [order, item].into_iter().collect();
///
/// let diagram = render_class_diagram(&catalog, &RenderOptions::default());
/// assert!(diagram.starts_with("classDiagram\n"));
/// assert!(diagram.ends_with("    Order *-- LineItem : contains many\n"));
/// ```
#[must_use]
pub fn render_class_diagram(catalog: &ModelCatalog, options: &RenderOptions) -> String {
    let mut out = String::from("classDiagram\n");

    for model in catalog.models() {
        let _ = writeln!(out, "    class {} {{", model.name);

        if let Some(doc) = model.docstring.as_deref().filter(|doc| !doc.is_empty()) {
            let _ = writeln!(out, "        %% {}", doc.replace('\n', "\\n"));
        }

        for (name, field) in &model.fields {
            let _ = writeln!(out, "        +{} {name}", field.type_expression);
        }

        out.push_str("    }\n");
    }

    for edge in infer_relationships(catalog, options.relation_match) {
        let _ = writeln!(out, "    {edge}");
    }

    out
}

/// Derives containment edges from field type expressions.
///
/// For each field of each model, every *other* model whose name occurs in
/// the field's type expression becomes a target. Edges are deduplicated on
/// their rendered line and returned in first-seen order: owner order, then
/// field order, then target catalog order.
///
/// # Examples
///
/// ```
/// use pm_core::{FieldRecord, ModelCatalog, ModelRecord, RelationMatch};
/// use pm_diagram::infer_relationships;
///
/// let mut cart = ModelRecord::new("Cart");
/// cart.push_field("lines", FieldRecord::new("List[LineItem]"));
/// let catalog: ModelCatalog = [cart, ModelRecord::new("Item"), ModelRecord::new("LineItem")]
///     .into_iter()
///     .collect();
///
/// // Substring matching also finds `Item` inside `LineItem`.
/// let loose = infer_relationships(&catalog, RelationMatch::Substring);
/// assert_eq!(loose.len(), 2);
///
/// let strict = infer_relationships(&catalog, RelationMatch::Identifier);
/// assert_eq!(strict.len(), 1);
/// assert_eq!(strict[0].target, "LineItem");
/// ```
#[must_use]
pub fn infer_relationships(catalog: &ModelCatalog, mode: RelationMatch) -> Vec<RelationshipEdge> {
    let mut seen: FxHashSet<String> = fx_hash_set();
    let mut edges = Vec::new();

    for owner in catalog.models() {
        for field in owner.fields.values() {
            let type_expression = field.type_expression.as_str();
            let multiplicity = Multiplicity::from_type_expression(type_expression);

            for target in catalog.names() {
                if target == owner.name || !references(type_expression, target, mode) {
                    continue;
                }
                let edge = RelationshipEdge::new(owner.name.as_str(), target, multiplicity);
                if seen.insert(edge.to_string()) {
                    edges.push(edge);
                }
            }
        }
    }

    edges
}

/// Returns `true` if `type_expression` mentions `name` under `mode`.
fn references(type_expression: &str, name: &str, mode: RelationMatch) -> bool {
    if name.is_empty() {
        return false;
    }
    if mode != RelationMatch::Identifier {
        return type_expression.contains(name);
    }
    type_expression.match_indices(name).any(|(start, _)| {
        let before = type_expression[..start].chars().next_back();
        let after = type_expression[start + name.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
