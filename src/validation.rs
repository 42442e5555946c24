//! Field validators applied before any remote call.

use std::net::{IpAddr, Ipv4Addr};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Language codes accepted for installation templates.
pub const LANGUAGE_CODES: [&str; 36] = [
    "ar", "bg", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr", "he", "hr", "hu", "it",
    "ja", "ko", "lt", "lv", "nb", "nl", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv",
    "th", "tr", "tu", "uk", "zh-Hans-CN", "zh-Hans-HK",
];

/// Errors raised while validating a desired-state record.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ValidationError {
    /// A required attribute is absent.
    #[error("`{field}` is required")]
    Missing {
        /// Attribute path.
        field: String,
    },
    /// The attribute is not declared by the schema.
    #[error("`{field}` is not a known attribute")]
    Unknown {
        /// Attribute path.
        field: String,
    },
    /// The attribute is computed by the API and cannot be set.
    #[error("`{field}` is computed and cannot be set")]
    Computed {
        /// Attribute path.
        field: String,
    },
    /// The value has the wrong JSON type.
    #[error("`{field}` must be {expected}")]
    Type {
        /// Attribute path.
        field: String,
        /// Human readable expected type.
        expected: String,
    },
    /// The value is not part of the allowed set.
    #[error("`{field}`: `{value}` is not one of {allowed}")]
    NotInEnum {
        /// Attribute path.
        field: String,
        /// Rejected value.
        value: String,
        /// Comma separated allowed values.
        allowed: String,
    },
    /// The value is not an IPv4 address.
    #[error("`{field}`: `{value}` is not an IPv4 address")]
    Ipv4 {
        /// Attribute path.
        field: String,
        /// Rejected value.
        value: String,
    },
    /// The value is not an IP block in CIDR notation.
    #[error("`{field}`: `{value}` is not a valid IP block")]
    IpBlock {
        /// Attribute path.
        field: String,
        /// Rejected value.
        value: String,
    },
    /// The integer lies outside the accepted range.
    #[error("`{field}`: {value} is not in {min}..{max}")]
    Range {
        /// Attribute path.
        field: String,
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// The value is not a supported language code.
    #[error("`{field}`: `{value}` is not a supported language code")]
    Language {
        /// Attribute path.
        field: String,
        /// Rejected value.
        value: String,
    },
    /// A nested block holds more items than allowed.
    #[error("`{field}` accepts at most {max} item(s), got {count}")]
    TooManyItems {
        /// Attribute path.
        field: String,
        /// Maximum number of items.
        max: usize,
        /// Number of items supplied.
        count: usize,
    },
}

/// Constraint attached to a schema attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "arg")]
pub enum Validator {
    /// String must be one of the listed values.
    OneOf(&'static [&'static str]),
    /// String must parse as an IPv4 address.
    Ipv4,
    /// String must be an IP block (`addr/prefix`).
    IpBlock,
    /// Integer must lie in the inclusive range.
    Range(i64, i64),
    /// String must be a supported language code.
    LanguageCode,
}

impl Validator {
    /// Checks a value, ignoring values of a type the validator does not
    /// apply to (type mismatches are reported by the schema).
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] matching the failed constraint.
    pub fn check(self, field: &str, value: &Value) -> Result<(), ValidationError> {
        match (self, value) {
            (Self::OneOf(allowed), Value::String(text)) => {
                validate_string_enum(field, text, allowed)
            }
            (Self::Ipv4, Value::String(text)) => validate_ipv4(field, text),
            (Self::IpBlock, Value::String(text)) => validate_ip_block(field, text),
            (Self::Range(min, max), Value::Number(number)) => match number.as_i64() {
                Some(int) => validate_range(field, int, min, max),
                None => Ok(()),
            },
            (Self::LanguageCode, Value::String(text)) => validate_language_code(field, text),
            _ => Ok(()),
        }
    }
}

/// Rejects values outside a fixed set.
///
/// # Errors
///
/// Returns [`ValidationError::NotInEnum`] when `value` is not listed.
pub fn validate_string_enum(
    field: &str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::NotInEnum {
        field: field.to_owned(),
        value: value.to_owned(),
        allowed: allowed.join(", "),
    })
}

/// Rejects anything that is not a dotted IPv4 address.
///
/// # Errors
///
/// Returns [`ValidationError::Ipv4`] on parse failure.
pub fn validate_ipv4(field: &str, value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Ipv4Addr>()
        .map(|_| ())
        .map_err(|_| ValidationError::Ipv4 {
            field: field.to_owned(),
            value: value.to_owned(),
        })
}

/// Rejects anything that is not `address/prefix` with a prefix valid for the
/// address family.
///
/// # Errors
///
/// Returns [`ValidationError::IpBlock`] on parse failure.
pub fn validate_ip_block(field: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::IpBlock {
        field: field.to_owned(),
        value: value.to_owned(),
    };
    let (address, prefix) = value.split_once('/').ok_or_else(invalid)?;
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    if prefix.is_empty() || !prefix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid());
    }
    let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
    let max_prefix = match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    if prefix > max_prefix {
        return Err(invalid());
    }
    Ok(())
}

/// Rejects integers outside `min..=max`.
///
/// # Errors
///
/// Returns [`ValidationError::Range`] when out of bounds.
pub fn validate_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ValidationError::Range {
        field: field.to_owned(),
        value,
        min,
        max,
    })
}

/// Rejects language codes the API does not support.
///
/// # Errors
///
/// Returns [`ValidationError::Language`] for unknown codes.
pub fn validate_language_code(field: &str, value: &str) -> Result<(), ValidationError> {
    if LANGUAGE_CODES.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::Language {
        field: field.to_owned(),
        value: value.to_owned(),
    })
}
