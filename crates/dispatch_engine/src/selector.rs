//! The component selector.
//!
//! Selection validates props and describes what to render. It never renders,
//! performs no I/O and has no side effects.

use crate::{ContractRegistry, DispatchError};
use dispatch_validator::{SchemaValidator, ValidatedValue};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// What the presentation layer should render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDescriptor {
    pub name: String,
    pub renderer: String,
    pub props: ValidatedValue,
}

/// Selects components from one registry snapshot.
#[derive(Debug, Clone)]
pub struct ComponentSelector {
    registry: Arc<ContractRegistry>,
    validator: SchemaValidator,
}

impl ComponentSelector {
    pub fn new(registry: Arc<ContractRegistry>) -> Self {
        Self {
            registry,
            validator: SchemaValidator::new(),
        }
    }

    /// Validates props for a component and returns its render descriptor.
    ///
    /// Invalid props are rejected whole; there is no partial rendering.
    pub fn select(&self, name: &str, props: &Value) -> Result<RenderDescriptor, DispatchError> {
        let component = self.registry.component(name)?;

        let props = self
            .validator
            .validate(&component.props_schema, props)
            .map_err(|details| {
                debug!(component = name, error = %details, "Rejected component props");
                DispatchError::InvalidProps {
                    name: name.to_string(),
                    details,
                }
            })?;

        debug!(component = name, renderer = %component.renderer, "Component selected");
        Ok(RenderDescriptor {
            name: name.to_string(),
            renderer: component.renderer.clone(),
            props,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerCatalog;
    use dispatch_core::{
        ContractKind, DeclarationBuilder, DeclarationList, ObjectSchemaBuilder, Schema,
    };
    use dispatch_validator::ValidationError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn selector() -> ComponentSelector {
        let declarations = DeclarationList::new(vec![
            DeclarationBuilder::component("CookingTimerAssistant")
                .renderer("cooking-timer")
                .props_schema(
                    ObjectSchemaBuilder::new()
                        .field("recipeName", Schema::String)
                        .optional(
                            "steps",
                            Schema::array(
                                ObjectSchemaBuilder::new()
                                    .field("step", Schema::Number)
                                    .field("instruction", Schema::String)
                                    .optional("duration", Schema::Number)
                                    .build(),
                            ),
                        )
                        .build(),
                )
                .build(),
            DeclarationBuilder::tool("getPantryIngredients", "pantry.list")
                .input_schema(Schema::empty_object())
                .output_schema(Schema::array(Schema::String))
                .build(),
        ]);

        struct Unused;

        #[async_trait::async_trait]
        impl crate::ToolHandler for Unused {
            async fn call(
                &self,
                _args: &ValidatedValue,
            ) -> Result<Value, crate::HandlerError> {
                Ok(json!([]))
            }
        }

        let catalog = HandlerCatalog::new().with("pantry.list", Unused);
        let registry = ContractRegistry::from_declarations(&declarations, &catalog).unwrap();
        ComponentSelector::new(Arc::new(registry))
    }

    #[test]
    fn test_select_returns_descriptor() {
        let descriptor = selector()
            .select(
                "CookingTimerAssistant",
                &json!({ "recipeName": "Dal", "servings": 4 }),
            )
            .unwrap();

        assert_eq!(descriptor.name, "CookingTimerAssistant");
        assert_eq!(descriptor.renderer, "cooking-timer");
        assert_eq!(
            descriptor.props.as_value(),
            &json!({ "recipeName": "Dal", "steps": [] })
        );
    }

    #[test]
    fn test_select_rejects_invalid_props() {
        let err = selector()
            .select(
                "CookingTimerAssistant",
                &json!({ "recipeName": "Dal", "steps": [{ "step": 1 }] }),
            )
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::InvalidProps {
                name: "CookingTimerAssistant".into(),
                details: ValidationError::missing_field("steps[0].instruction"),
            }
        );
    }

    #[test]
    fn test_select_tool_is_not_found() {
        let err = selector()
            .select("getPantryIngredients", &json!({}))
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::NotFound {
                name: "getPantryIngredients".into(),
                kind: ContractKind::Component,
            }
        );
    }

    #[test]
    fn test_descriptor_serializes_props_inline() {
        let descriptor = selector()
            .select("CookingTimerAssistant", &json!({ "recipeName": "Dal" }))
            .unwrap();

        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            json!({
                "name": "CookingTimerAssistant",
                "renderer": "cooking-timer",
                "props": { "recipeName": "Dal", "steps": [] }
            })
        );
    }
}
