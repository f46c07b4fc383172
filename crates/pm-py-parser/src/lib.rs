//! Python parser using tree-sitter for Pydantic model extraction.
//!
//! This crate reads Python source without importing or executing it and
//! reports every class that directly extends the model base class:
//!
//! - Class detection through a pre-compiled tree-sitter query
//! - Typed fields declared in the class body, in declaration order
//! - Field descriptions passed to the field factory as `description="..."`
//! - Class docstrings
//!
//! # Overview
//!
//! The main entry point is [`PyParser`]. Each call to [`PyParser::parse`]
//! returns the models of one file as a [`ModelCatalog`](pm_core::ModelCatalog):
//!
//! ```
//! use pm_py_parser::PyParser;
//!
//! let mut parser = PyParser::new()?;
//! let source = r#"
//! from typing import List
//! from pydantic import BaseModel, Field
//!
//! class User(BaseModel):
//!     """A registered user."""
//!
//!     name: str = Field(description="Display name")
//!     tags: List[str]
//! "#;
//!
//! let models = parser.parse(source)?;
//! let user = models.get("User").expect("model found");
//! assert_eq!(user.docstring.as_deref(), Some("A registered user."));
//! assert_eq!(user.fields["name"].description.as_deref(), Some("Display name"));
//! assert_eq!(user.fields["tags"].type_expression, "List[str]");
//! # Ok::<(), pm_py_parser::ParseError>(())
//! ```
//!
//! # Type Rendering
//!
//! | Annotation | Rendered |
//! |------------|----------|
//! | `str` | `str` |
//! | `datetime.date` | `datetime.date` |
//! | `Dict[str, List[Tag]]` | `Dict[str, List[Tag]]` |
//! | `Callable[[int], str]` | `Callable[[int], str]` |
//! | `Literal["a", 0x10]` | `Literal[a, 16]` |
//! | `int \| None` | `Any` |
//!
//! # Failure Handling
//!
//! Source with a syntax error yields [`ParseError::Syntax`] and no models.
//! Everything else is best effort: unknown annotation shapes render as `Any`
//! and unrecognised default values simply have no description.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod annotation;
pub mod error;
pub mod extract;
pub mod literal;
pub mod matcher;
pub mod parser;
pub mod queries;

pub use annotation::TypeExpr;
pub use error::ParseError;
pub use extract::extract_models;
pub use matcher::ModelMatcher;
pub use parser::PyParser;
pub use queries::{CLASS_QUERY, ClassQuery, get_class_query};
