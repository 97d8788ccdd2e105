//! # Dispatch Engine
//!
//! Registry-driven dispatch of tool invocations and component selections.
//!
//! - [`ContractRegistry`]: immutable name → contract table, built once from a
//!   declaration list and a [`HandlerCatalog`]
//! - [`ToolInvoker`]: validates arguments, runs the handler under the tool's
//!   failure policy and validates the result
//! - [`ComponentSelector`]: validates props and returns a [`RenderDescriptor`]
//! - [`Dispatcher`]: JSON-facing facade over a swappable [`RegistryHandle`]
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use dispatch_core::{DeclarationBuilder, DeclarationList, ObjectSchemaBuilder, Schema};
//! use dispatch_engine::{
//!     ContractRegistry, Dispatcher, HandlerCatalog, HandlerError, RegistryHandle, ToolHandler,
//! };
//! use dispatch_validator::ValidatedValue;
//! use serde_json::{Value, json};
//!
//! struct Shout;
//!
//! #[async_trait]
//! impl ToolHandler for Shout {
//!     async fn call(&self, args: &ValidatedValue) -> Result<Value, HandlerError> {
//!         let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
//!         Ok(json!({ "text": text.to_uppercase() }))
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let text = ObjectSchemaBuilder::new().field("text", Schema::String).build();
//! let declarations = DeclarationList::new(vec![
//!     DeclarationBuilder::tool("shout", "text.shout")
//!         .input_schema(text.clone())
//!         .output_schema(text)
//!         .build(),
//! ]);
//! let handlers = HandlerCatalog::new().with("text.shout", Shout);
//! let registry = ContractRegistry::from_declarations(&declarations, &handlers).unwrap();
//! let dispatcher = Dispatcher::new(RegistryHandle::new(registry));
//!
//! let result = dispatcher.invoke("shout", &json!({ "text": "hi" })).await;
//! assert_eq!(result.value().unwrap().as_value(), &json!({ "text": "HI" }));
//! assert!(!result.is_degraded());
//! # });
//! ```

mod contract;
mod dispatcher;
mod error;
mod handler;
mod invoker;
pub mod registry;
mod selector;

pub use contract::*;
pub use dispatcher::*;
pub use error::*;
pub use handler::*;
pub use invoker::*;
pub use registry::{ContractRegistry, RegistryBuilder, RegistryHandle};
pub use selector::*;
