//! Desired and observed resource records exchanged with the host runtime.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::ValidationError;

/// A resource record: an optional identifier plus a flat attribute map.
///
/// Absent attributes and JSON `null` are both treated as "not set"; the typed
/// accessors return `None` for either, so callers never confuse a missing
/// value with a zero value.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ResourceState {
    /// Provider identifier once the resource exists remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attribute values keyed by schema name.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ResourceState {
    /// Creates a record from an attribute map with no identifier.
    #[must_use]
    pub const fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            id: None,
            attributes,
        }
    }

    /// Returns the record with the given identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Raw attribute value, `None` when absent or null.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|value| !value.is_null())
    }

    /// String attribute.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    /// Integer attribute.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_i64)
    }

    /// Boolean attribute.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    /// List or set of strings; non-string members are skipped.
    #[must_use]
    pub fn strings(&self, name: &str) -> Vec<String> {
        self.value(name)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First item of a nested block, as a record of its own.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<Self> {
        self.value(name)
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .and_then(Value::as_object)
            .map(|fields| Self::from_attributes(fields.clone()))
    }

    /// Required string attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] when the attribute is not set.
    pub fn require_string(&self, name: &str) -> Result<&str, ValidationError> {
        self.string(name).ok_or_else(|| missing(name))
    }

    /// Required integer attribute.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Missing`] when the attribute is not set.
    pub fn require_int(&self, name: &str) -> Result<i64, ValidationError> {
        self.int(name).ok_or_else(|| missing(name))
    }

    /// Sets an attribute.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.attributes.insert(name.to_owned(), value.into());
    }

    /// Sets an attribute only when a value is present, leaving any prior
    /// value untouched otherwise.
    pub fn set_some<T: Into<Value>>(&mut self, name: &str, value: Option<T>) {
        if let Some(inner) = value {
            self.set(name, inner);
        }
    }

    /// Replaces a nested block with a single item, or clears it.
    pub fn set_block(&mut self, name: &str, block: Option<Map<String, Value>>) {
        let items = block.map(Value::Object).into_iter().collect::<Vec<_>>();
        self.set(name, Value::Array(items));
    }
}

fn missing(name: &str) -> ValidationError {
    ValidationError::Missing {
        field: name.to_owned(),
    }
}
