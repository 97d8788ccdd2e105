//! # Dispatch Validator
//!
//! Schema validation for every value that crosses a tool or component
//! boundary. This crate provides:
//!
//! - Primitive checks with exact type matching (no string → number coercion)
//! - Closed enum checks reporting the allowed set
//! - Object checks: required fields, optional fields, unknown fields ignored
//! - Array checks with per-element paths (`metrics[2].status`)
//! - Schema definition checks (duplicate fields, malformed enums)
//!
//! ## Example
//!
//! ```rust
//! use dispatch_core::{ObjectSchemaBuilder, Schema};
//! use dispatch_validator::{SchemaValidator, ValidationError};
//! use serde_json::json;
//!
//! let schema = ObjectSchemaBuilder::new()
//!     .field(
//!         "status",
//!         Schema::enumeration(["normal", "low", "high", "critical"]),
//!     )
//!     .build();
//!
//! let err = SchemaValidator::new()
//!     .validate(&schema, &json!({ "status": "extreme" }))
//!     .unwrap_err();
//!
//! assert!(matches!(err, ValidationError::EnumMismatch { .. }));
//! assert_eq!(err.field(), "status");
//! ```

mod error;
mod path;
mod schema;
mod value;

pub use error::*;
pub use path::*;
pub use schema::*;
pub use value::*;
