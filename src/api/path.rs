//! Endpoint path construction with per-segment escaping.

use std::fmt;

/// Path relative to the API base URL.
///
/// Literal parts are appended verbatim while user-chosen segments are
/// URL-escaped, so names containing `/`, spaces or `%` stay a single segment.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct EndpointPath(String);

impl EndpointPath {
    /// Starts a path from a literal prefix such as `/me/installationTemplate`.
    #[must_use]
    pub fn root(prefix: &str) -> Self {
        Self(prefix.trim_end_matches('/').to_owned())
    }

    /// Appends a literal segment (for example `partitionScheme`).
    #[must_use]
    pub fn literal(mut self, part: &str) -> Self {
        self.0.push('/');
        self.0.push_str(part.trim_matches('/'));
        self
    }

    /// Appends a user-supplied segment, escaping it.
    #[must_use]
    pub fn segment(mut self, value: impl AsRef<str>) -> Self {
        self.0.push('/');
        self.0.push_str(&urlencoding::encode(value.as_ref()));
        self
    }

    /// Borrows the rendered path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EndpointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EndpointPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EndpointPath> for String {
    fn from(value: EndpointPath) -> Self {
        value.0
    }
}
