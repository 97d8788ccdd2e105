//! Registered contracts.
//!
//! A [`Contract`] is a declaration that passed every load-time check: its
//! schemas are well-formed, its handler resolved against the catalog and its
//! fallback (if any) already satisfies the output schema.

use crate::{HandlerCatalog, RegistryError, ToolHandler};
use dispatch_core::{ContractDeclaration, ContractKind, CoreError, RetryPolicy, Schema};
use dispatch_validator::{SchemaValidator, ValidatedValue};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A registered tool or component.
#[derive(Debug, Clone)]
pub struct Contract {
    name: String,
    description: String,
    binding: Binding,
}

/// Kind-specific part of a contract.
#[derive(Debug, Clone)]
pub enum Binding {
    Tool(ToolBinding),
    Component(ComponentBinding),
}

/// Schemas, handler and failure policy of a tool.
#[derive(Clone)]
pub struct ToolBinding {
    pub input_schema: Schema,
    pub output_schema: Schema,
    pub handler_ref: String,
    pub handler: Arc<dyn ToolHandler>,
    pub policy: FailurePolicy,
}

impl fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolBinding")
            .field("input_schema", &self.input_schema)
            .field("output_schema", &self.output_schema)
            .field("handler_ref", &self.handler_ref)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Props schema and renderer reference of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentBinding {
    pub props_schema: Schema,
    pub renderer: String,
}

/// What the invoker does when a tool's handler fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailurePolicy {
    /// Substitute result, pre-validated against the output schema
    pub fallback: Option<ValidatedValue>,
    pub retry: RetryPolicy,
    /// Per-attempt bound
    pub timeout: Option<Duration>,
}

impl Contract {
    /// Turns a declaration into a contract, resolving its handler.
    pub fn from_declaration(
        declaration: &ContractDeclaration,
        handlers: &HandlerCatalog,
    ) -> Result<Self, RegistryError> {
        declaration.check()?;

        let validator = SchemaValidator::new();
        let name = declaration.name.clone();

        let binding = match declaration.kind {
            ContractKind::Tool => {
                let input_schema =
                    checked_schema(declaration, &declaration.input_schema, "inputSchema")?;
                let output_schema =
                    checked_schema(declaration, &declaration.output_schema, "outputSchema")?;

                let handler_ref = declaration
                    .handler
                    .clone()
                    .ok_or_else(|| CoreError::MissingHandler(name.clone()))?;
                let handler =
                    handlers
                        .get(&handler_ref)
                        .ok_or_else(|| RegistryError::UnknownHandler {
                            name: name.clone(),
                            handler: handler_ref.clone(),
                        })?;

                let fallback = declaration
                    .fallback
                    .as_ref()
                    .map(|value| validator.validate(&output_schema, value))
                    .transpose()
                    .map_err(|source| RegistryError::InvalidFallback {
                        name: name.clone(),
                        source,
                    })?;

                Binding::Tool(ToolBinding {
                    input_schema,
                    output_schema,
                    handler_ref,
                    handler,
                    policy: FailurePolicy {
                        fallback,
                        retry: declaration.retry.unwrap_or_default(),
                        timeout: declaration.timeout(),
                    },
                })
            }
            ContractKind::Component => {
                let props_schema =
                    checked_schema(declaration, &declaration.props_schema, "propsSchema")?;
                let renderer = declaration
                    .renderer
                    .clone()
                    .unwrap_or_else(|| name.clone());
                Binding::Component(ComponentBinding {
                    props_schema,
                    renderer,
                })
            }
        };

        Ok(Self {
            name,
            description: declaration.description.clone(),
            binding,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ContractKind {
        match self.binding {
            Binding::Tool(_) => ContractKind::Tool,
            Binding::Component(_) => ContractKind::Component,
        }
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The tool part, if this contract is a tool.
    pub fn as_tool(&self) -> Option<&ToolBinding> {
        match &self.binding {
            Binding::Tool(tool) => Some(tool),
            Binding::Component(_) => None,
        }
    }

    /// The component part, if this contract is a component.
    pub fn as_component(&self) -> Option<&ComponentBinding> {
        match &self.binding {
            Binding::Component(component) => Some(component),
            Binding::Tool(_) => None,
        }
    }
}

fn checked_schema(
    declaration: &ContractDeclaration,
    schema: &Option<Schema>,
    label: &'static str,
) -> Result<Schema, RegistryError> {
    let schema = schema.clone().ok_or_else(|| CoreError::MissingSchema {
        name: declaration.name.clone(),
        kind: declaration.kind,
        schema: label,
    })?;

    let errors = SchemaValidator::new().validate_definition(&schema);
    if !errors.is_empty() {
        return Err(RegistryError::InvalidSchema {
            name: declaration.name.clone(),
            schema: label,
            errors,
        });
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerError;
    use async_trait::async_trait;
    use dispatch_core::{DeclarationBuilder, ObjectSchemaBuilder};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    struct Noop;

    #[async_trait]
    impl ToolHandler for Noop {
        async fn call(&self, _args: &ValidatedValue) -> Result<Value, HandlerError> {
            Ok(json!({}))
        }
    }

    fn catalog() -> HandlerCatalog {
        HandlerCatalog::new().with("noop", Noop)
    }

    fn urgency_schema() -> Schema {
        ObjectSchemaBuilder::new()
            .field("summary", Schema::String)
            .field(
                "urgency",
                Schema::enumeration(["routine", "monitor", "consult_doctor"]),
            )
            .build()
    }

    #[test]
    fn test_tool_from_declaration() {
        let decl = DeclarationBuilder::tool("analyze", "noop")
            .input_schema(Schema::empty_object())
            .output_schema(urgency_schema())
            .fallback(json!({ "summary": "sample", "urgency": "monitor", "extra": 1 }))
            .timeout_ms(50)
            .build();

        let contract = Contract::from_declaration(&decl, &catalog()).unwrap();
        assert_eq!(contract.kind(), ContractKind::Tool);

        let tool = contract.as_tool().unwrap();
        assert_eq!(tool.handler_ref, "noop");
        assert_eq!(tool.policy.timeout, Some(Duration::from_millis(50)));
        assert_eq!(tool.policy.retry, RetryPolicy::none());
        // Fallbacks are stored projected.
        assert_eq!(
            tool.policy.fallback.as_ref().map(ValidatedValue::as_value),
            Some(&json!({ "summary": "sample", "urgency": "monitor" }))
        );
    }

    #[test]
    fn test_unknown_handler() {
        let decl = DeclarationBuilder::tool("analyze", "health.analyze")
            .input_schema(Schema::empty_object())
            .output_schema(urgency_schema())
            .build();

        let err = Contract::from_declaration(&decl, &catalog()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnknownHandler {
                name: "analyze".into(),
                handler: "health.analyze".into(),
            }
        );
    }

    #[test]
    fn test_fallback_must_match_output_schema() {
        let decl = DeclarationBuilder::tool("analyze", "noop")
            .input_schema(Schema::empty_object())
            .output_schema(urgency_schema())
            .fallback(json!({ "summary": "sample", "urgency": "whenever" }))
            .build();

        let err = Contract::from_declaration(&decl, &catalog()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidFallback { ref name, .. } if name == "analyze"));
    }

    #[test]
    fn test_ill_formed_schema_is_rejected() {
        let decl = DeclarationBuilder::component("Picker")
            .props_schema(Schema::object(vec![dispatch_core::FieldSchema::required(
                "mode",
                Schema::enumeration(Vec::<String>::new()),
            )]))
            .build();

        let err = Contract::from_declaration(&decl, &catalog()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidSchema {
                schema: "propsSchema",
                ..
            }
        ));
    }

    #[test]
    fn test_component_renderer_defaults_to_name() {
        let decl = DeclarationBuilder::component("RecipeCard")
            .props_schema(Schema::empty_object())
            .build();

        let contract = Contract::from_declaration(&decl, &catalog()).unwrap();
        assert_eq!(contract.as_component().unwrap().renderer, "RecipeCard");
        assert!(contract.as_tool().is_none());
    }

    #[test]
    fn test_declaration_errors_propagate() {
        let decl = DeclarationBuilder::component("RecipeCard").build();
        let err = Contract::from_declaration(&decl, &catalog()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Declaration(CoreError::MissingSchema { .. })
        ));
    }
}
