//! Error types for registry loading and dispatch.

use crate::HandlerError;
use dispatch_core::{ContractKind, CoreError};
use dispatch_validator::{SchemaDefinitionError, ValidationError};
use thiserror::Error;

/// Errors raised while building a registry. Any of them aborts the load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// A name is already taken, by a tool or a component
    #[error("Duplicate contract name '{name}': already registered as a {existing}")]
    DuplicateName { name: String, existing: ContractKind },

    /// The declaration is incomplete or mixes keys of both kinds
    #[error(transparent)]
    Declaration(#[from] CoreError),

    /// A tool references a handler missing from the catalog
    #[error("tool '{name}' references unknown handler '{handler}'")]
    UnknownHandler { name: String, handler: String },

    /// A schema is ill-formed (duplicate fields, empty or repeated enum values)
    #[error(
        "{schema} of '{name}' is ill-formed: {}",
        .errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    InvalidSchema {
        name: String,
        schema: &'static str,
        errors: Vec<SchemaDefinitionError>,
    },

    /// A declared fallback does not satisfy the tool's output schema
    #[error("fallback of tool '{name}' does not satisfy its output schema: {source}")]
    InvalidFallback {
        name: String,
        source: ValidationError,
    },

    /// The process-wide registry was already installed
    #[error("A global registry is already installed")]
    AlreadyInstalled,
}

/// Typed failure of an `invoke` or `select` call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// No contract of the requested kind has this name
    #[error("No {kind} named '{name}' is registered")]
    NotFound { name: String, kind: ContractKind },

    /// Tool arguments failed the input schema; the handler was not called
    #[error("Invalid arguments for tool '{name}': {details}")]
    InvalidArguments {
        name: String,
        details: ValidationError,
    },

    /// Component props failed the props schema
    #[error("Invalid props for component '{name}': {details}")]
    InvalidProps {
        name: String,
        details: ValidationError,
    },

    /// The handler produced a result that violates the output schema
    #[error("Tool '{name}' returned a result that violates its output schema: {details}")]
    ContractViolation {
        name: String,
        details: ValidationError,
    },

    /// The handler failed and the tool declares no fallback
    #[error("Tool '{name}' failed: {cause}")]
    Upstream { name: String, cause: HandlerError },

    /// The caller abandoned the invocation
    #[error("Invocation of '{name}' was cancelled")]
    Cancelled { name: String },
}

impl DispatchError {
    /// Stable machine-readable tag of the error, used on the JSON boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::InvalidProps { .. } => "invalid_props",
            Self::ContractViolation { .. } => "contract_violation",
            Self::Upstream { .. } => "upstream",
            Self::Cancelled { .. } => "cancelled",
        }
    }

    /// Name of the tool or component the call targeted.
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name, .. }
            | Self::InvalidArguments { name, .. }
            | Self::InvalidProps { name, .. }
            | Self::ContractViolation { name, .. }
            | Self::Upstream { name, .. }
            | Self::Cancelled { name } => name,
        }
    }

    /// The validation failure behind the error, if any.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::InvalidArguments { details, .. }
            | Self::InvalidProps { details, .. }
            | Self::ContractViolation { details, .. } => Some(details),
            _ => None,
        }
    }
}
