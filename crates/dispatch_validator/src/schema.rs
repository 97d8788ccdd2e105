//! Schema validation logic.
//!
//! This module checks untyped JSON values against declared schemas and
//! produces [`ValidatedValue`]s. Validation is a recursive projection: it
//! stops at the first failing leaf and reports that leaf's path.

use crate::{FieldPath, SchemaDefinitionError, ValidatedValue, ValidationError};
use dispatch_core::Schema;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Validates values against schemas.
///
/// The validator holds no state; a single instance can be shared freely
/// across threads and concurrent invocations.
///
/// # Example
///
/// ```rust
/// use dispatch_core::{ObjectSchemaBuilder, Schema};
/// use dispatch_validator::SchemaValidator;
/// use serde_json::json;
///
/// let schema = ObjectSchemaBuilder::new()
///     .field("title", Schema::String)
///     .optional("ingredients", Schema::array(Schema::String))
///     .build();
///
/// let validated = SchemaValidator::new()
///     .validate(&schema, &json!({ "title": "Pasta" }))
///     .unwrap();
/// assert_eq!(validated.as_value(), &json!({ "title": "Pasta", "ingredients": [] }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Creates a new schema validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a value against a schema.
    ///
    /// Returns the projected value on success, or the first failure found in
    /// depth-first field order.
    pub fn validate(
        &self,
        schema: &Schema,
        value: &Value,
    ) -> Result<ValidatedValue, ValidationError> {
        let mut path = FieldPath::root();
        project(schema, value, &mut path).map(ValidatedValue::new)
    }

    /// Checks a schema definition for duplicate fields and malformed enums.
    ///
    /// Returns a list of definition errors. An empty list indicates success.
    pub fn validate_definition(&self, schema: &Schema) -> Vec<SchemaDefinitionError> {
        let mut errors = Vec::new();
        let mut path = FieldPath::root();
        check_definition(schema, &mut path, &mut errors);
        errors
    }
}

/// Validates a value with a default validator.
pub fn validate(schema: &Schema, value: &Value) -> Result<ValidatedValue, ValidationError> {
    SchemaValidator::new().validate(schema, value)
}

fn project(schema: &Schema, value: &Value, path: &mut FieldPath) -> Result<Value, ValidationError> {
    match schema {
        Schema::String if value.is_string() => Ok(value.clone()),
        Schema::Number if value.is_number() => Ok(value.clone()),
        Schema::Boolean if value.is_boolean() => Ok(value.clone()),
        Schema::String | Schema::Number | Schema::Boolean => Err(
            ValidationError::type_mismatch(path.to_string(), schema.type_name(), json_type(value)),
        ),

        Schema::Enum { values } => match value.as_str() {
            Some(literal) if values.iter().any(|allowed| allowed == literal) => Ok(value.clone()),
            Some(literal) => Err(ValidationError::enum_mismatch(
                path.to_string(),
                values,
                literal,
            )),
            None => Err(ValidationError::enum_mismatch(
                path.to_string(),
                values,
                value.to_string(),
            )),
        },

        Schema::Array { items } => {
            let elements = value.as_array().ok_or_else(|| {
                ValidationError::type_mismatch(path.to_string(), "array", json_type(value))
            })?;

            let mut projected = Vec::with_capacity(elements.len());
            for (index, element) in elements.iter().enumerate() {
                path.push_index(index);
                let item = project(items, element, path)?;
                path.pop();
                projected.push(item);
            }
            Ok(Value::Array(projected))
        }

        Schema::Object { fields } => {
            let object = value.as_object().ok_or_else(|| {
                ValidationError::type_mismatch(path.to_string(), "object", json_type(value))
            })?;

            // Unknown keys are ignored and not carried over.
            let mut projected = Map::new();
            for field in fields {
                path.push_field(&field.name);
                match object.get(&field.name) {
                    Some(field_value) => {
                        let item = project(&field.schema, field_value, path)?;
                        projected.insert(field.name.clone(), item);
                    }
                    None if field.optional => {
                        if matches!(field.schema, Schema::Array { .. }) {
                            projected.insert(field.name.clone(), Value::Array(Vec::new()));
                        }
                    }
                    None => return Err(ValidationError::missing_field(path.to_string())),
                }
                path.pop();
            }
            Ok(Value::Object(projected))
        }
    }
}

fn check_definition(
    schema: &Schema,
    path: &mut FieldPath,
    errors: &mut Vec<SchemaDefinitionError>,
) {
    match schema {
        Schema::String | Schema::Number | Schema::Boolean => {}
        Schema::Enum { values } => {
            if values.is_empty() {
                errors.push(SchemaDefinitionError::EmptyEnum {
                    path: path.to_string(),
                });
            }
            let mut seen = HashSet::new();
            for value in values {
                if !seen.insert(value) {
                    errors.push(SchemaDefinitionError::DuplicateEnumValue {
                        path: path.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }
        Schema::Array { items } => {
            path.push_index(0);
            check_definition(items, path, errors);
            path.pop();
        }
        Schema::Object { fields } => {
            let mut seen = HashSet::new();
            for field in fields {
                if !seen.insert(&field.name) {
                    errors.push(SchemaDefinitionError::DuplicateField {
                        path: path.to_string(),
                        field: field.name.clone(),
                    });
                }
                path.push_field(&field.name);
                check_definition(&field.schema, path, errors);
                path.pop();
            }
        }
    }
}

/// JSON type name of a value, as reported in type mismatch errors.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
