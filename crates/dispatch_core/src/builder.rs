//! Builder pattern for creating declarations and schemas.
//!
//! This module provides ergonomic builders for constructing contract
//! declarations and object schemas with a fluent API.

use crate::{ContractDeclaration, ContractKind, FieldSchema, RetryPolicy, Schema};
use serde_json::Value;

/// Builder for creating a `ContractDeclaration`.
///
/// # Example
///
/// ```rust
/// use dispatch_core::{DeclarationBuilder, ObjectSchemaBuilder, Schema};
///
/// let decl = DeclarationBuilder::tool("searchIngredients", "pantry.search")
///     .description("Search pantry ingredients by name")
///     .input_schema(ObjectSchemaBuilder::new().field("query", Schema::String).build())
///     .output_schema(Schema::array(Schema::String))
///     .build();
///
/// assert!(decl.check().is_ok());
/// ```
#[derive(Debug)]
pub struct DeclarationBuilder {
    declaration: ContractDeclaration,
}

impl DeclarationBuilder {
    fn new(name: impl Into<String>, kind: ContractKind) -> Self {
        Self {
            declaration: ContractDeclaration {
                name: name.into(),
                kind,
                description: String::new(),
                input_schema: None,
                output_schema: None,
                props_schema: None,
                handler: None,
                renderer: None,
                fallback: None,
                retry: None,
                timeout_ms: None,
            },
        }
    }

    /// Starts a tool declaration bound to a handler reference.
    ///
    /// # Arguments
    ///
    /// * `name` - Unique contract name
    /// * `handler` - Handler reference resolved at registry load
    pub fn tool(name: impl Into<String>, handler: impl Into<String>) -> Self {
        let mut builder = Self::new(name, ContractKind::Tool);
        builder.declaration.handler = Some(handler.into());
        builder
    }

    /// Starts a component declaration.
    pub fn component(name: impl Into<String>) -> Self {
        Self::new(name, ContractKind::Component)
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.declaration.description = description.into();
        self
    }

    /// Sets the tool input schema.
    pub fn input_schema(mut self, schema: Schema) -> Self {
        self.declaration.input_schema = Some(schema);
        self
    }

    /// Sets the tool output schema.
    pub fn output_schema(mut self, schema: Schema) -> Self {
        self.declaration.output_schema = Some(schema);
        self
    }

    /// Sets the component props schema.
    pub fn props_schema(mut self, schema: Schema) -> Self {
        self.declaration.props_schema = Some(schema);
        self
    }

    /// Sets the renderer reference of a component.
    pub fn renderer(mut self, renderer: impl Into<String>) -> Self {
        self.declaration.renderer = Some(renderer.into());
        self
    }

    /// Sets the fallback value returned when the handler fails.
    pub fn fallback(mut self, fallback: Value) -> Self {
        self.declaration.fallback = Some(fallback);
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.declaration.retry = Some(retry);
        self
    }

    /// Sets the per-attempt timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.declaration.timeout_ms = Some(timeout_ms);
        self
    }

    /// Builds the declaration.
    ///
    /// Kind-specific completeness is checked later by
    /// [`ContractDeclaration::check`] when the registry loads it.
    pub fn build(self) -> ContractDeclaration {
        self.declaration
    }
}

/// Builder for creating a `FieldSchema`.
///
/// # Example
///
/// ```rust
/// use dispatch_core::{FieldBuilder, Schema};
///
/// let field = FieldBuilder::new("cookTime", Schema::Number)
///     .description("Total cooking time in minutes")
///     .optional(true)
///     .build();
/// assert!(field.optional);
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    field: FieldSchema,
}

impl FieldBuilder {
    /// Creates a new required field builder.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            field: FieldSchema::required(name, schema),
        }
    }

    /// Sets whether the field may be absent.
    pub fn optional(mut self, optional: bool) -> Self {
        self.field.optional = optional;
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.field.description = Some(description.into());
        self
    }

    /// Builds the field.
    pub fn build(self) -> FieldSchema {
        self.field
    }
}

/// Builder for object schemas.
#[derive(Debug, Default)]
pub struct ObjectSchemaBuilder {
    fields: Vec<FieldSchema>,
}

impl ObjectSchemaBuilder {
    /// Creates an empty object schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required field.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(FieldSchema::required(name, schema));
        self
    }

    /// Adds an optional field.
    pub fn optional(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.fields.push(FieldSchema::optional(name, schema));
        self
    }

    /// Adds a fully specified field.
    pub fn with(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds the object schema.
    pub fn build(self) -> Schema {
        Schema::Object {
            fields: self.fields,
        }
    }
}
