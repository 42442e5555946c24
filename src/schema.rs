//! Declarative attribute schemas for resource types.
//!
//! A schema lists every attribute a resource accepts or reports, with its type,
//! presence rules, defaults and validators. Desired records are checked against
//! it before any remote call is issued.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::{ValidationError, Validator};

/// Attribute value type.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// JSON string.
    String,
    /// JSON integer.
    Int,
    /// JSON boolean.
    Bool,
    /// Ordered list of strings.
    StringList,
    /// Unordered set of strings.
    StringSet,
    /// Nested block, encoded as a list of objects.
    Block {
        /// Maximum number of items, if bounded.
        max_items: Option<usize>,
        /// Attributes of each item.
        attributes: Vec<Attribute>,
    },
}

impl AttributeType {
    /// Nested block holding at most one item.
    #[must_use]
    pub const fn single_block(attributes: Vec<Attribute>) -> Self {
        Self::Block {
            max_items: Some(1),
            attributes,
        }
    }

    const fn expected(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Int => "an integer",
            Self::Bool => "a boolean",
            Self::StringList | Self::StringSet => "a list of strings",
            Self::Block { .. } => "a list of objects",
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    /// Must be set by the caller.
    Required,
    /// May be set by the caller.
    Optional,
    /// Reported by the API only.
    Computed,
    /// May be set by the caller, otherwise reported by the API.
    OptionalComputed,
}

/// A single schema attribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name in the state record.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Presence rule.
    pub presence: Presence,
    /// Changing the value requires replacing the resource.
    pub force_new: bool,
    /// Value used when the caller leaves the attribute unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraint checked on the value (or each list member).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    /// Documentation shown to users.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub description: &'static str,
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeType, presence: Presence) -> Self {
        Self {
            name,
            kind,
            presence,
            force_new: false,
            default: None,
            validator: None,
            description: "",
        }
    }

    /// Attribute the caller must set.
    #[must_use]
    pub const fn required(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Required)
    }

    /// Attribute the caller may set.
    #[must_use]
    pub const fn optional(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Optional)
    }

    /// Attribute reported by the API.
    #[must_use]
    pub const fn computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::Computed)
    }

    /// Attribute the caller may set, otherwise reported by the API.
    #[must_use]
    pub const fn optional_computed(name: &'static str, kind: AttributeType) -> Self {
        Self::new(name, kind, Presence::OptionalComputed)
    }

    /// Marks the attribute as requiring replacement when changed.
    #[must_use]
    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Attaches a validator.
    #[must_use]
    pub const fn validated(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the description.
    #[must_use]
    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn check(&self, path: &str, value: &Value) -> Result<(), ValidationError> {
        let type_error = || ValidationError::Type {
            field: path.to_owned(),
            expected: self.kind.expected().to_owned(),
        };
        match &self.kind {
            AttributeType::String if value.is_string() => self.run_validator(path, value),
            AttributeType::Int if value.as_i64().is_some() => self.run_validator(path, value),
            AttributeType::Bool if value.is_boolean() => Ok(()),
            AttributeType::StringList | AttributeType::StringSet => {
                let items = value.as_array().ok_or_else(type_error)?;
                if !items.iter().all(Value::is_string) {
                    return Err(type_error());
                }
                items
                    .iter()
                    .try_for_each(|item| self.run_validator(path, item))
            }
            AttributeType::Block {
                max_items,
                attributes,
            } => {
                let items = value.as_array().ok_or_else(type_error)?;
                if let Some(max) = *max_items {
                    if items.len() > max {
                        return Err(ValidationError::TooManyItems {
                            field: path.to_owned(),
                            max,
                            count: items.len(),
                        });
                    }
                }
                items.iter().try_for_each(|item| {
                    let fields = item.as_object().ok_or_else(type_error)?;
                    validate_attributes(attributes, fields, &format!("{path}."))
                })
            }
            _ => Err(type_error()),
        }
    }

    fn run_validator(&self, path: &str, value: &Value) -> Result<(), ValidationError> {
        self.validator
            .map_or(Ok(()), |validator| validator.check(path, value))
    }
}

/// Attribute table for one resource type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceSchema {
    /// Resource type name, for example `ovh_iploadbalancing_tcp_farm`.
    pub type_name: &'static str,
    /// Shape of the identifier accepted by import.
    pub import_format: &'static str,
    /// Top-level attributes.
    pub attributes: Vec<Attribute>,
}

impl ResourceSchema {
    /// Creates a schema.
    #[must_use]
    pub const fn new(
        type_name: &'static str,
        import_format: &'static str,
        attributes: Vec<Attribute>,
    ) -> Self {
        Self {
            type_name,
            import_format,
            attributes,
        }
    }

    /// Looks up a top-level attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Checks a desired record against the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found: unknown or computed-only
    /// attributes, missing required attributes, type mismatches, block size
    /// violations and validator failures. Nested paths are dotted.
    pub fn validate(&self, record: &Map<String, Value>) -> Result<(), ValidationError> {
        validate_attributes(&self.attributes, record, "")
    }

    /// Fills in defaults for optional attributes left unset, including inside
    /// nested blocks.
    pub fn apply_defaults(&self, record: &mut Map<String, Value>) {
        apply_defaults(&self.attributes, record);
    }

    /// Names of force-new attributes whose value differs between two records.
    #[must_use]
    pub fn replacement_attributes(
        &self,
        prior: &Map<String, Value>,
        desired: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|attr| attr.force_new && differs(prior, desired, attr))
            .map(|attr| attr.name.to_owned())
            .collect()
    }

    /// Names of caller-settable attributes whose value differs between two
    /// records. Attributes the desired record leaves unset are ignored when
    /// the API may compute them.
    #[must_use]
    pub fn changed_attributes(
        &self,
        prior: &Map<String, Value>,
        desired: &Map<String, Value>,
    ) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|attr| attr.presence != Presence::Computed)
            .filter(|attr| {
                attr.presence != Presence::OptionalComputed || present(desired, attr.name).is_some()
            })
            .filter(|attr| differs(prior, desired, attr))
            .map(|attr| attr.name.to_owned())
            .collect()
    }
}

fn present<'a>(record: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    record.get(name).filter(|value| !value.is_null())
}

/// Empty lists compare equal to an unset attribute.
fn differs(prior: &Map<String, Value>, desired: &Map<String, Value>, attr: &Attribute) -> bool {
    fn set<'a>(record: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
        present(record, name)
            .filter(|value| !matches!(value, Value::Array(items) if items.is_empty()))
    }
    let before = set(prior, attr.name);
    let after = set(desired, attr.name);
    match (&attr.kind, before, after) {
        (AttributeType::StringSet, Some(Value::Array(lhs)), Some(Value::Array(rhs))) => {
            let mut lhs = lhs.iter().filter_map(Value::as_str).collect::<Vec<_>>();
            let mut rhs = rhs.iter().filter_map(Value::as_str).collect::<Vec<_>>();
            lhs.sort_unstable();
            lhs.dedup();
            rhs.sort_unstable();
            rhs.dedup();
            lhs != rhs
        }
        _ => before != after,
    }
}

fn validate_attributes(
    attributes: &[Attribute],
    record: &Map<String, Value>,
    prefix: &str,
) -> Result<(), ValidationError> {
    for (key, value) in record {
        if value.is_null() {
            continue;
        }
        let path = format!("{prefix}{key}");
        match attributes.iter().find(|attr| attr.name == key) {
            None => return Err(ValidationError::Unknown { field: path }),
            Some(attr) if attr.presence == Presence::Computed => {
                return Err(ValidationError::Computed { field: path });
            }
            Some(_) => {}
        }
    }

    for attr in attributes {
        let path = format!("{prefix}{}", attr.name);
        match present(record, attr.name) {
            Some(value) => attr.check(&path, value)?,
            None if attr.presence == Presence::Required => {
                return Err(ValidationError::Missing { field: path });
            }
            None => {}
        }
    }
    Ok(())
}

fn apply_defaults(attributes: &[Attribute], record: &mut Map<String, Value>) {
    for attr in attributes {
        if let Some(default) = &attr.default {
            if present(record, attr.name).is_none() {
                record.insert(attr.name.to_owned(), default.clone());
            }
        }
        if let AttributeType::Block {
            attributes: nested,
            ..
        } = &attr.kind
        {
            if let Some(Value::Array(items)) = record.get_mut(attr.name) {
                for item in items.iter_mut().filter_map(Value::as_object_mut) {
                    apply_defaults(nested, item);
                }
            }
        }
    }
}
