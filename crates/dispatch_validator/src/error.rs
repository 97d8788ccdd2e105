//! Error types for validation operations.

use thiserror::Error;

/// Errors raised when a value does not satisfy its schema.
///
/// Every variant carries the path of the failing leaf, e.g. `metrics[2].status`.
/// The root value itself is reported as `$`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value has the wrong JSON type
    #[error("Type mismatch at '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: String,
        got: String,
    },

    /// Value is not a member of the declared enum
    #[error("Value at '{field}' must be one of [{}], got {got}", .allowed.join(", "))]
    EnumMismatch {
        field: String,
        allowed: Vec<String>,
        got: String,
    },

    /// Required field is absent
    #[error("Required field '{field}' is missing")]
    MissingField { field: String },
}

impl ValidationError {
    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Creates a new enum mismatch error.
    pub fn enum_mismatch(
        field: impl Into<String>,
        allowed: &[String],
        got: impl Into<String>,
    ) -> Self {
        Self::EnumMismatch {
            field: field.into(),
            allowed: allowed.to_vec(),
            got: got.into(),
        }
    }

    /// Creates a new missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Path of the failing value.
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::EnumMismatch { field, .. }
            | Self::MissingField { field } => field,
        }
    }
}

/// Errors in a schema definition itself, detected before registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefinitionError {
    /// An object declares the same field name twice
    #[error("Duplicate field '{field}' in object at '{path}'")]
    DuplicateField { path: String, field: String },

    /// An enum has no allowed values
    #[error("Enum at '{path}' declares no values")]
    EmptyEnum { path: String },

    /// An enum lists the same literal twice
    #[error("Enum at '{path}' declares '{value}' more than once")]
    DuplicateEnumValue { path: String, value: String },
}
