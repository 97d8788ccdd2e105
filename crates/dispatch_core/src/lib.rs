//! # Dispatch Core
//!
//! Core schema and declaration types for the Registry Dispatch Engine.
//!
//! This crate provides the building blocks for declaring the tools and UI
//! components an orchestrator may call. Every declaration carries a schema
//! contract that the engine enforces before and after invocation.
//!
//! ## Key Concepts
//!
//! - **Schema**: Recursive structural description (primitives, enums, arrays, objects)
//! - **ContractDeclaration**: Name, kind, schemas and handler binding of a tool or component
//! - **RetryPolicy**: Declared per-tool retry behavior for failing handlers
//! - **DeclarationList**: Ordered list of declarations loaded at start-up
//!
//! ## Example
//!
//! ```rust
//! use dispatch_core::{DeclarationBuilder, ObjectSchemaBuilder, Schema};
//!
//! let recipe_card = DeclarationBuilder::component("RecipeCard")
//!     .description("Displays a detailed recipe")
//!     .props_schema(
//!         ObjectSchemaBuilder::new()
//!             .field("title", Schema::String)
//!             .optional("ingredients", Schema::array(Schema::String))
//!             .build(),
//!     )
//!     .build();
//!
//! assert!(recipe_card.check().is_ok());
//! ```

pub mod builder;
pub mod contract;
pub mod error;
pub mod schema;

pub use builder::*;
pub use contract::*;
pub use error::*;
pub use schema::*;
