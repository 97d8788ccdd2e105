//! Error types for contract declarations.
//!
//! These errors describe declarations that are structurally incomplete for
//! their kind. They are raised while a registry is being loaded, never at
//! invocation time.

use crate::ContractKind;
use thiserror::Error;

/// Result type for declaration operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for declaration checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Declaration has an empty name
    #[error("Contract name cannot be empty")]
    EmptyName,

    /// A schema required by the contract kind is missing
    #[error("{kind} '{name}' is missing its {schema}")]
    MissingSchema {
        /// Contract name
        name: String,
        /// Contract kind
        kind: ContractKind,
        /// Which schema is missing (e.g. "outputSchema")
        schema: &'static str,
    },

    /// A tool declaration has no handler reference
    #[error("tool '{0}' does not reference a handler")]
    MissingHandler(String),

    /// A declaration sets a key that does not apply to its kind
    #[error("{kind} '{name}' declares '{field}', which only applies to {applies_to}s")]
    UnexpectedField {
        /// Contract name
        name: String,
        /// Contract kind
        kind: ContractKind,
        /// Offending key
        field: &'static str,
        /// Kind the key belongs to
        applies_to: ContractKind,
    },
}
