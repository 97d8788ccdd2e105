//! Structural schema types.
//!
//! A [`Schema`] describes the shape a value must have before it may cross a
//! tool or component boundary. Schemas are plain data: they are declared once
//! (in code or in a declaration file) and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recursive structural description of a value.
///
/// Serialized with an internal `type` tag so declaration files read naturally:
///
/// ```yaml
/// type: object
/// fields:
///   - name: status
///     type: enum
///     values: [normal, low, high, critical]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    /// UTF-8 string
    String,

    /// Any JSON number (integer or floating point)
    Number,

    /// `true` or `false`
    Boolean,

    /// Closed set of string literals
    Enum {
        /// Allowed literal values
        values: Vec<String>,
    },

    /// Homogeneous sequence
    Array {
        /// Schema every element must satisfy
        items: Box<Schema>,
    },

    /// Record with named fields
    Object {
        /// Declared fields, in declaration order
        #[serde(default)]
        fields: Vec<FieldSchema>,
    },
}

impl Schema {
    /// Creates an enum schema from a list of literals.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Schema::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an array schema.
    pub fn array(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }

    /// Creates an object schema from its fields.
    pub fn object(fields: Vec<FieldSchema>) -> Self {
        Schema::Object { fields }
    }

    /// Object schema with no fields. Accepts any object.
    pub fn empty_object() -> Self {
        Schema::Object { fields: Vec::new() }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String => "string",
            Schema::Number => "number",
            Schema::Boolean => "boolean",
            Schema::Enum { .. } => "enum",
            Schema::Array { .. } => "array",
            Schema::Object { .. } => "object",
        }
    }

    /// Looks up a field of an object schema by name.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        match self {
            Schema::Object { fields } => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Returns the fields of an object schema, or an empty slice.
    pub fn fields(&self) -> &[FieldSchema] {
        match self {
            Schema::Object { fields } => fields,
            _ => &[],
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Enum { values } => write!(f, "enum[{}]", values.join(", ")),
            Schema::Array { items } => write!(f, "array<{}>", items),
            other => f.write_str(other.type_name()),
        }
    }
}

/// A named field of an object schema.
///
/// The field's own schema is flattened next to `name`, so a field is written
/// as `{ name: title, type: string, optional: true }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Field name
    pub name: String,

    /// Schema of the field value
    #[serde(flatten)]
    pub schema: Schema,

    /// Whether the field may be absent
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    /// Human-readable hint for the orchestrator; never enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldSchema {
    /// Creates a required field.
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            optional: false,
            description: None,
        }
    }

    /// Creates an optional field.
    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            optional: true,
            ..Self::required(name, schema)
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
