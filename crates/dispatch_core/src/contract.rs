//! Contract declaration types.
//!
//! A declaration is the static, serializable description of a tool or a UI
//! component: its name, its schemas, and (for tools) the handler it binds to
//! and the policy applied when that handler fails. Declarations are loaded
//! once at start-up and turned into a registry by the engine.

use crate::{CoreError, Result, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Whether a contract describes a callable tool or a renderable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    /// Function that fetches or computes data
    Tool,
    /// Presentational component selected for rendering
    Component,
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Tool => f.write_str("tool"),
            ContractKind::Component => f.write_str("component"),
        }
    }
}

/// Declaration of a single tool or component.
///
/// Field names follow the camelCase convention of the orchestrator's
/// declaration files (`inputSchema`, `propsSchema`, ...).
///
/// # Example
///
/// ```rust
/// use dispatch_core::{ContractDeclaration, ContractKind, Schema};
///
/// let decl = ContractDeclaration {
///     name: "getPantryIngredients".to_string(),
///     kind: ContractKind::Tool,
///     description: "List pantry ingredients".to_string(),
///     input_schema: Some(Schema::empty_object()),
///     output_schema: Some(Schema::array(Schema::String)),
///     props_schema: None,
///     handler: Some("pantry.list".to_string()),
///     renderer: None,
///     fallback: None,
///     retry: None,
///     timeout_ms: None,
/// };
/// assert!(decl.check().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDeclaration {
    /// Unique name across all tools and components
    pub name: String,

    /// Tool or component
    pub kind: ContractKind,

    /// Selection hint for the orchestrator; not enforced at runtime
    #[serde(default)]
    pub description: String,

    /// Schema of tool arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Schema>,

    /// Schema of tool results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Schema>,

    /// Schema of component props
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_schema: Option<Schema>,

    /// Handler reference resolved against a handler catalog (tools only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Renderer reference handed to the presentation layer (components only).
    /// Defaults to the contract name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,

    /// Substitute result returned when the handler fails (tools only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Value>,

    /// Retry policy for handler failures (tools only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,

    /// Per-attempt timeout in milliseconds (tools only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl ContractDeclaration {
    /// Checks that the declaration carries exactly what its kind needs.
    ///
    /// Tools need `inputSchema`, `outputSchema` and `handler`; components
    /// need `propsSchema`. Keys belonging to the other kind are rejected so a
    /// mis-declared contract fails at load time instead of being half-used.
    pub fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::EmptyName);
        }

        match self.kind {
            ContractKind::Tool => {
                self.require(self.input_schema.is_some(), "inputSchema")?;
                self.require(self.output_schema.is_some(), "outputSchema")?;
                if self.handler.is_none() {
                    return Err(CoreError::MissingHandler(self.name.clone()));
                }
                self.reject(self.props_schema.is_some(), "propsSchema")?;
                self.reject(self.renderer.is_some(), "renderer")?;
            }
            ContractKind::Component => {
                self.require(self.props_schema.is_some(), "propsSchema")?;
                self.reject(self.input_schema.is_some(), "inputSchema")?;
                self.reject(self.output_schema.is_some(), "outputSchema")?;
                self.reject(self.handler.is_some(), "handler")?;
                self.reject(self.fallback.is_some(), "fallback")?;
                self.reject(self.retry.is_some(), "retry")?;
                self.reject(self.timeout_ms.is_some(), "timeoutMs")?;
            }
        }

        Ok(())
    }

    /// Per-attempt timeout, if declared.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    fn require(&self, present: bool, schema: &'static str) -> Result<()> {
        if present {
            Ok(())
        } else {
            Err(CoreError::MissingSchema {
                name: self.name.clone(),
                kind: self.kind,
                schema,
            })
        }
    }

    fn reject(&self, present: bool, field: &'static str) -> Result<()> {
        if !present {
            return Ok(());
        }
        let applies_to = match self.kind {
            ContractKind::Tool => ContractKind::Component,
            ContractKind::Component => ContractKind::Tool,
        };
        Err(CoreError::UnexpectedField {
            name: self.name.clone(),
            kind: self.kind,
            field,
            applies_to,
        })
    }
}

/// Retry policy for a tool whose handler may fail transiently.
///
/// Delays grow exponentially from `backoff_ms`: the wait before retry `n`
/// (1-based) is `backoff_ms * 2^(n-1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    #[serde(default)]
    pub max_retries: u32,

    /// Base delay between attempts in milliseconds
    #[serde(default)]
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Policy with no retries.
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a policy with the given retry count and base delay.
    pub fn new(max_retries: u32, backoff_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_ms,
        }
    }

    /// Total number of attempts, including the first one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the given retry (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(1u64 << shift))
    }
}

/// An ordered list of declarations, as stored in a declaration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationList {
    /// Free-form version label of the declaration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Declarations in load order
    #[serde(default)]
    pub contracts: Vec<ContractDeclaration>,
}

impl DeclarationList {
    /// Creates a list from declarations.
    pub fn new(contracts: Vec<ContractDeclaration>) -> Self {
        Self {
            version: None,
            contracts,
        }
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Declarations of the given kind, in order.
    pub fn of_kind(&self, kind: ContractKind) -> impl Iterator<Item = &ContractDeclaration> {
        self.contracts.iter().filter(move |c| c.kind == kind)
    }
}

impl IntoIterator for DeclarationList {
    type Item = ContractDeclaration;
    type IntoIter = std::vec::IntoIter<ContractDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.contracts.into_iter()
    }
}
