//! Values that have passed schema validation.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A value structurally guaranteed to match the schema it was validated
/// against.
///
/// Only [`SchemaValidator`](crate::SchemaValidator) can construct one, so
/// holding a `ValidatedValue` is proof that validation ran. The value is a
/// projection: it carries only the fields the schema declares, and optional
/// arrays that were absent are present as `[]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedValue(Value);

impl ValidatedValue {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrows the underlying JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the wrapper and returns the JSON value.
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Looks up a top-level object field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Deserializes the value into a typed structure.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }
}

impl AsRef<Value> for ValidatedValue {
    fn as_ref(&self) -> &Value {
        &self.0
    }
}

impl From<ValidatedValue> for Value {
    fn from(value: ValidatedValue) -> Self {
        value.0
    }
}
