//! Mermaid class diagram rendering and README splicing for Pydantic models.
//!
//! This crate turns a [`ModelCatalog`](pm_core::ModelCatalog) into Mermaid
//! `classDiagram` text and keeps a copy of that text inside a Markdown
//! document:
//!
//! - [`render_class_diagram`] - One class block per model plus inferred edges
//! - [`infer_relationships`] - Containment edges derived from field types
//! - [`DocumentSplicer`] - Idempotent marker-region replacement
//!
//! # Example
//!
//! ```
//! use pm_core::{FieldRecord, ModelCatalog, ModelRecord};
//! use pm_diagram::{DocumentSplicer, RenderOptions, SpliceOutcome, render_class_diagram};
//!
//! let mut order = ModelRecord::new("Order");
//! order.push_field("items", FieldRecord::new("List[LineItem]"));
//! let mut item = ModelRecord::new("LineItem");
//! item.push_field("sku", FieldRecord::new("str"));
//! let catalog: ModelCatalog = [order, item].into_iter().collect();
//!
//! let diagram = render_class_diagram(&catalog, &RenderOptions::default());
//! let readme = DocumentSplicer::default().splice("# Shop\n", &diagram)?;
//!
//! assert_eq!(readme.outcome, SpliceOutcome::Appended);
//! assert!(readme.text.contains("```mermaid\nclassDiagram\n"));
//! # Ok::<(), pm_diagram::SpliceError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod mermaid;
pub mod splice;

pub use error::SpliceError;
pub use mermaid::{RenderOptions, infer_relationships, render_class_diagram};
pub use splice::{DocumentSplicer, SpliceOutcome, Spliced, update_document};
