//! Resource handler abstraction shared by every resource type.

mod mapped;

use std::future::Future;
use std::pin::Pin;

use crate::api::ApiClient;
use crate::error::ResourceError;
use crate::schema::ResourceSchema;
use crate::state::ResourceState;

pub use mapped::{MappedResource, ResourceMapper};

/// Future returned by resource operations.
pub type ResourceFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ResourceError>> + Send + 'a>>;

/// CRUD and import operations for one resource type.
///
/// Handlers validate desired records against their schema before issuing any
/// remote call. Deleting an object the API no longer knows about succeeds.
pub trait ResourceHandler: Send + Sync {
    /// Attribute schema of the resource type.
    fn schema(&self) -> &ResourceSchema;

    /// Creates the remote object and returns the resulting state.
    fn create<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState>;

    /// Refreshes state from the remote object.
    ///
    /// Fails with [`ResourceError::NotFound`] when the object is gone.
    fn read<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ResourceState>;

    /// Applies the desired record to the existing object identified by
    /// `desired.id` and returns the refreshed state.
    fn update<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState>;

    /// Deletes the remote object.
    fn delete<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ()>;

    /// Builds a partial state from an external identifier, to be completed
    /// by [`ResourceHandler::read`].
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Import`] when the identifier is malformed.
    fn import(&self, id: &str) -> Result<ResourceState, ResourceError>;
}

/// Returns the record's identifier.
///
/// # Errors
///
/// Returns [`ResourceError::MissingAttribute`] when the record has no id.
pub fn require_id(state: &ResourceState) -> Result<&str, ResourceError> {
    state
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ResourceError::MissingAttribute(String::from("id")))
}

/// Splits an import identifier into exactly `N` non-empty `/`-separated
/// parts; the last part keeps any remaining separators.
///
/// # Errors
///
/// Returns [`ResourceError::Import`] when the identifier has fewer parts or
/// an empty part.
pub fn split_import_id<'a, const N: usize>(
    id: &'a str,
    expected: &str,
) -> Result<[&'a str; N], ResourceError> {
    let malformed = || ResourceError::Import {
        id: id.to_owned(),
        expected: expected.to_owned(),
    };
    let parts = id.splitn(N, '/').collect::<Vec<_>>();
    if parts.iter().any(|part| part.is_empty()) {
        return Err(malformed());
    }
    <[&str; N]>::try_from(parts).map_err(|_| malformed())
}
