//! Domain types for pydantic-mermaid.
//!
//! # Module Organization
//!
//! - [`catalog`] - The run-scoped model catalog and merge reporting
//! - [`location`] - Source code locations
//! - [`model`] - Model and field records produced by extraction
//! - [`relationship`] - Containment edges derived at render time
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use pm_core::{FieldRecord, ModelCatalog, ModelRecord, RelationshipEdge};
//! ```

pub mod catalog;
pub mod location;
pub mod model;
pub mod relationship;

pub use catalog::{MergeReport, ModelCatalog};
pub use location::SourceLocation;
pub use model::{FieldRecord, ModelRecord};
pub use relationship::{Multiplicity, RelationshipEdge};
