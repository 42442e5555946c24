//! Errors surfaced by resource operations.

use thiserror::Error;

use crate::api::{ApiError, Method};
use crate::validation::ValidationError;

/// Errors raised while planning or applying a resource operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ResourceError {
    /// The desired record was rejected before any remote call.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
    /// A remote call failed with anything other than 404.
    #[error("calling {method} {endpoint}: {source}")]
    Api {
        /// Verb of the failed call.
        method: Method,
        /// Path of the failed call.
        endpoint: String,
        /// Error returned by the API client.
        #[source]
        source: ApiError,
    },
    /// The remote object does not exist (HTTP 404).
    #[error("{endpoint} not found")]
    NotFound {
        /// Path that returned 404.
        endpoint: String,
    },
    /// A response could not be decoded into the expected shape.
    #[error("unexpected response from {endpoint}: {message}")]
    Decode {
        /// Path whose response was malformed.
        endpoint: String,
        /// Decoder error message.
        message: String,
    },
    /// An import identifier did not match the expected shape.
    #[error("import id `{id}` is not {expected} formatted")]
    Import {
        /// Identifier passed by the caller.
        id: String,
        /// Expected format.
        expected: String,
    },
    /// The record lacks the identifier or attribute an operation needs.
    #[error("state is missing `{0}`")]
    MissingAttribute(String),
    /// No handler is registered for the resource type.
    #[error("unknown resource type `{0}`")]
    UnknownResourceType(String),
}

impl ResourceError {
    /// Returns `true` when the error signals that the remote object is gone
    /// and local state should be dropped.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
