//! JSON boundary consumed by the orchestrator.
//!
//! Every call snapshots the current registry before doing anything else, so a
//! concurrent [`RegistryHandle::replace`] never affects a call in flight.
//! Results serialize to a small envelope:
//!
//! ```json
//! { "ok": true, "value": { ... }, "degraded": false }
//! { "ok": false, "error": { "kind": "not_found", "name": "doesNotExist", "message": "..." } }
//! ```

use crate::{
    ComponentSelector, DispatchError, Invocation, RegistryHandle, RenderDescriptor, ToolInvoker,
};
use dispatch_core::ContractKind;
use dispatch_validator::{ValidatedValue, ValidationError};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Error part of a failed result envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub name: String,
    pub message: String,
    /// Path of the failing value, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&DispatchError> for ErrorBody {
    fn from(err: &DispatchError) -> Self {
        Self {
            kind: err.kind(),
            name: err.name().to_string(),
            message: err.to_string(),
            field: err.validation().map(|v| v.field().to_string()),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    degraded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

/// Outcome of [`Dispatcher::invoke`].
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResult(pub Result<Invocation, DispatchError>);

impl InvocationResult {
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    /// True when the value is fallback data.
    pub fn is_degraded(&self) -> bool {
        matches!(&self.0, Ok(invocation) if invocation.is_degraded())
    }

    pub fn value(&self) -> Option<&ValidatedValue> {
        self.0.as_ref().ok().map(|invocation| &invocation.value)
    }

    pub fn error(&self) -> Option<&DispatchError> {
        self.0.as_ref().err()
    }

    pub fn into_result(self) -> Result<Invocation, DispatchError> {
        self.0
    }
}

impl Serialize for InvocationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match &self.0 {
            Ok(invocation) => Envelope {
                ok: true,
                value: Some(&invocation.value),
                degraded: Some(invocation.is_degraded()),
                error: None,
            },
            Err(err) => Envelope {
                ok: false,
                value: None,
                degraded: None,
                error: Some(ErrorBody::from(err)),
            },
        };
        envelope.serialize(serializer)
    }
}

/// Outcome of [`Dispatcher::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult(pub Result<RenderDescriptor, DispatchError>);

impl SelectionResult {
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    pub fn descriptor(&self) -> Option<&RenderDescriptor> {
        self.0.as_ref().ok()
    }

    pub fn error(&self) -> Option<&DispatchError> {
        self.0.as_ref().err()
    }

    pub fn into_result(self) -> Result<RenderDescriptor, DispatchError> {
        self.0
    }
}

impl Serialize for SelectionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let envelope = match &self.0 {
            Ok(descriptor) => Envelope {
                ok: true,
                value: Some(descriptor),
                degraded: None,
                error: None,
            },
            Err(err) => Envelope {
                ok: false,
                value: None,
                degraded: None,
                error: Some(ErrorBody::from(err)),
            },
        };
        envelope.serialize(serializer)
    }
}

/// Facade over a swappable registry.
///
/// # Example
///
/// ```rust
/// use dispatch_core::{DeclarationBuilder, DeclarationList, ObjectSchemaBuilder, Schema};
/// use dispatch_engine::{ContractRegistry, Dispatcher, HandlerCatalog, RegistryHandle};
/// use serde_json::json;
///
/// let declarations = DeclarationList::new(vec![
///     DeclarationBuilder::component("RecipeCard")
///         .props_schema(
///             ObjectSchemaBuilder::new()
///                 .field("title", Schema::String)
///                 .optional("ingredients", Schema::array(Schema::String))
///                 .build(),
///         )
///         .build(),
/// ]);
/// let registry = ContractRegistry::from_declarations(&declarations, &HandlerCatalog::new()).unwrap();
/// let dispatcher = Dispatcher::new(RegistryHandle::new(registry));
///
/// let result = dispatcher.select("RecipeCard", &json!({ "title": "Pasta" }));
/// assert_eq!(
///     serde_json::to_value(&result).unwrap(),
///     json!({
///         "ok": true,
///         "value": {
///             "name": "RecipeCard",
///             "renderer": "RecipeCard",
///             "props": { "title": "Pasta", "ingredients": [] }
///         }
///     })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    handle: RegistryHandle,
}

impl Dispatcher {
    pub fn new(handle: RegistryHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &RegistryHandle {
        &self.handle
    }

    /// Invokes a tool.
    pub async fn invoke(&self, name: &str, args: &Value) -> InvocationResult {
        self.invoke_with_cancel(name, args, &CancellationToken::new())
            .await
    }

    /// Invokes a tool, abandoning it when `cancel` fires.
    pub async fn invoke_with_cancel(
        &self,
        name: &str,
        args: &Value,
        cancel: &CancellationToken,
    ) -> InvocationResult {
        let invoker = ToolInvoker::new(self.handle.snapshot());
        InvocationResult(invoker.invoke_with_cancel(name, args, cancel).await)
    }

    /// Selects a component.
    pub fn select(&self, name: &str, props: &Value) -> SelectionResult {
        let selector = ComponentSelector::new(self.handle.snapshot());
        SelectionResult(selector.select(name, props))
    }

    /// Invokes a tool with arguments given as JSON text.
    pub async fn invoke_json(&self, name: &str, body: &str) -> InvocationResult {
        let invoker = ToolInvoker::new(self.handle.snapshot());
        let args = match serde_json::from_str::<Value>(body) {
            Ok(args) => args,
            Err(err) => {
                let err = match invoker.registry().tool(name) {
                    Ok(_) => DispatchError::InvalidArguments {
                        name: name.to_string(),
                        details: unparseable(&err),
                    },
                    Err(not_found) => not_found,
                };
                return InvocationResult(Err(err));
            }
        };
        InvocationResult(invoker.invoke(name, &args).await)
    }

    /// Selects a component with props given as JSON text.
    pub fn select_json(&self, name: &str, body: &str) -> SelectionResult {
        let snapshot = self.handle.snapshot();
        let props = match serde_json::from_str::<Value>(body) {
            Ok(props) => props,
            Err(err) => {
                let err = match snapshot.lookup(name, ContractKind::Component) {
                    Ok(_) => DispatchError::InvalidProps {
                        name: name.to_string(),
                        details: unparseable(&err),
                    },
                    Err(not_found) => not_found,
                };
                return SelectionResult(Err(err));
            }
        };
        SelectionResult(ComponentSelector::new(snapshot).select(name, &props))
    }
}

fn unparseable(err: &serde_json::Error) -> ValidationError {
    ValidationError::type_mismatch("$", "JSON value", format!("unparseable text ({err})"))
}
