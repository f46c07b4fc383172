//! The run-scoped model catalog.
//!
//! [`ModelCatalog`] maps model names to [`ModelRecord`]s. The extractor builds
//! one catalog per file; the scanner threads a single accumulator catalog
//! through the run and [`merge`](ModelCatalog::merge)s each file into it.
//!
//! # Collision Semantics
//!
//! Names are unique per catalog. When a later file declares a model with a
//! name already present, the later record replaces the earlier one while the
//! name keeps its original position. This is last-writer-wins with
//! first-seen ordering, and it happens without any diagnostics beyond the
//! [`MergeReport`].
//!
//! ```
//! use pm_core::{FieldRecord, ModelCatalog, ModelRecord};
//!
//! let mut catalog = ModelCatalog::new();
//! catalog.insert(ModelRecord::new("Order"));
//! catalog.insert(ModelRecord::new("LineItem"));
//!
//! let mut later = ModelCatalog::new();
//! let mut order = ModelRecord::new("Order");
//! order.push_field("id", FieldRecord::new("int"));
//! later.insert(order);
//!
//! let report = catalog.merge(later);
//! assert_eq!(report.replaced, ["Order"]);
//!
//! let names: Vec<_> = catalog.names().collect();
//! assert_eq!(names, ["Order", "LineItem"]);
//! assert_eq!(catalog.get("Order").map(|m| m.field_count()), Some(1));
//! ```

use indexmap::IndexMap;
use indexmap::map::{Iter, Values};
use serde::{Deserialize, Serialize};

use super::model::ModelRecord;

/// Insertion-ordered mapping from model name to [`ModelRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    models: IndexMap<String, ModelRecord>,
}

/// Outcome of merging one catalog into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Names that were not present before the merge.
    pub added: usize,

    /// Names whose earlier record was replaced.
    pub replaced: Vec<String>,
}

impl ModelCatalog {
    /// Creates an empty catalog.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its own name, returning the record it replaced.
    pub fn insert(&mut self, model: ModelRecord) -> Option<ModelRecord> {
        self.models.insert(model.name.clone(), model)
    }

    /// Merges `other` into `self` with last-writer-wins semantics.
    pub fn merge(&mut self, other: Self) -> MergeReport {
        let mut report = MergeReport::default();
        for (name, model) in other.models {
            if self.models.insert(name.clone(), model).is_some() {
                report.replaced.push(name);
            } else {
                report.added += 1;
            }
        }
        report
    }

    /// Returns the record for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ModelRecord> {
        self.models.get(name)
    }

    /// Returns `true` if a model named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Returns the number of models.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the catalog holds no models.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates model names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    /// Iterates models in catalog order.
    pub fn models(&self) -> Values<'_, String, ModelRecord> {
        self.models.values()
    }

    /// Iterates `(name, model)` pairs in catalog order.
    pub fn iter(&self) -> Iter<'_, String, ModelRecord> {
        self.models.iter()
    }

    /// Total number of fields across all models.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.models.values().map(ModelRecord::field_count).sum()
    }
}

impl<'a> IntoIterator for &'a ModelCatalog {
    type Item = (&'a String, &'a ModelRecord);
    type IntoIter = Iter<'a, String, ModelRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ModelRecord> for ModelCatalog {
    fn from_iter<I: IntoIterator<Item = ModelRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for model in iter {
            catalog.insert(model);
        }
        catalog
    }
}
