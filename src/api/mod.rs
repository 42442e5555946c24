//! API client collaborator used by every resource.
//!
//! Resources never talk HTTP directly. They issue calls through the
//! [`ApiClient`] trait with paths relative to a preconfigured base URL and
//! receive decoded JSON bodies, which keeps authentication and transport in a
//! single replaceable place.

mod http;
pub mod path;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use http::{OvhHttpClient, sign_request};

/// HTTP status code reported by the API for a missing object.
pub const STATUS_NOT_FOUND: u16 = 404;

/// HTTP verbs used by the OVH API.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by an [`ApiClient`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport {
        /// Error reported by the HTTP stack.
        message: String,
    },
    /// The response body was not valid JSON.
    #[error("invalid response body: {message}")]
    Decode {
        /// Parser error message.
        message: String,
    },
}

impl ApiError {
    /// Returns `true` when the API reported the object as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Status {
                status: STATUS_NOT_FOUND,
                ..
            }
        )
    }
}

/// Future returned by [`ApiClient`] calls.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Minimal interface implemented by API transports.
///
/// All paths are relative to the client's base URL and must already be
/// escaped (see [`path::EndpointPath`]). Empty response bodies decode as
/// [`Value::Null`].
pub trait ApiClient: Send + Sync {
    /// Issues a request and returns the decoded JSON response.
    fn call<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a Value>,
    ) -> ApiFuture<'a, Value>;

    /// Issues a `GET`.
    fn get<'a>(&'a self, path: &'a str) -> ApiFuture<'a, Value> {
        self.call(Method::Get, path, None)
    }

    /// Issues a `POST` with a JSON body.
    fn post<'a>(&'a self, path: &'a str, body: &'a Value) -> ApiFuture<'a, Value> {
        self.call(Method::Post, path, Some(body))
    }

    /// Issues a `PUT` with a JSON body.
    fn put<'a>(&'a self, path: &'a str, body: &'a Value) -> ApiFuture<'a, Value> {
        self.call(Method::Put, path, Some(body))
    }

    /// Issues a `DELETE`.
    fn delete<'a>(&'a self, path: &'a str) -> ApiFuture<'a, Value> {
        self.call(Method::Delete, path, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404, true)]
    #[case(403, false)]
    #[case(500, false)]
    fn is_not_found_only_matches_404(#[case] status: u16, #[case] expected: bool) {
        let err = ApiError::Status {
            status,
            message: String::from("nope"),
        };
        assert_eq!(err.is_not_found(), expected);
    }

    #[test]
    fn transport_errors_are_not_not_found() {
        let err = ApiError::Transport {
            message: String::from("connection reset"),
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn method_renders_upper_case() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
