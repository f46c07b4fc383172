//! Core types, configuration, and errors for pydantic-mermaid.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types ([`ModelRecord`], [`FieldRecord`], [`ModelCatalog`], [`RelationshipEdge`])
//! - Configuration structures loaded from JSON ([`Config`])
//! - Error types for configuration handling ([`ConfigError`])
//! - An `FxHashSet` alias (faster than std for short strings)
//!
//! # Example
//!
//! ```
//! use pm_core::{FieldRecord, ModelCatalog, ModelRecord};
//!
//! let mut order = ModelRecord::new("Order");
//! order.push_field("items", FieldRecord::new("List[LineItem]"));
//!
//! let mut catalog = ModelCatalog::new();
//! catalog.insert(order);
//! assert_eq!(catalog.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{Config, ExtractConfig, ReadmeConfig, RelationMatch, RenderConfig, ScanConfig};
pub use error::ConfigError;
pub use hash::{FxHashSet, fx_hash_set};
pub use types::{
    FieldRecord, MergeReport, ModelCatalog, ModelRecord, Multiplicity, RelationshipEdge,
    SourceLocation,
};
