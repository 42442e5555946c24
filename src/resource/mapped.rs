//! Generic CRUD engine driven by a per-resource mapper.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use super::{ResourceFuture, ResourceHandler, require_id};
use crate::api::ApiClient;
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::remote;
use crate::schema::ResourceSchema;
use crate::state::ResourceState;

/// Field mapping and endpoint layout of a plain CRUD resource.
///
/// The engine in [`MappedResource`] handles the call sequencing, error
/// wrapping and 404 semantics; a mapper only converts between state records
/// and the API's JSON objects.
pub trait ResourceMapper: Send + Sync {
    /// Object exchanged with the API, used for both requests and responses.
    type Remote: Serialize + DeserializeOwned + Send + Sync;

    /// Attribute schema.
    fn schema(&self) -> ResourceSchema;

    /// Endpoint objects are created under.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when a path attribute is missing.
    fn collection_path(&self, state: &ResourceState) -> Result<EndpointPath, ResourceError>;

    /// Endpoint of one object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when a path attribute is missing.
    fn item_path(&self, state: &ResourceState, id: &str) -> Result<EndpointPath, ResourceError>;

    /// Request body for creation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when a required attribute is missing.
    fn create_payload(&self, desired: &ResourceState) -> Result<Self::Remote, ResourceError>;

    /// Request body for an update; defaults to the creation body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] when a required attribute is missing.
    fn update_payload(&self, desired: &ResourceState) -> Result<Self::Remote, ResourceError> {
        self.create_payload(desired)
    }

    /// Identifier assigned by the API to a created object.
    fn remote_id(&self, created: &Self::Remote) -> Option<String>;

    /// Writes the remote object's fields into state.
    fn flatten(&self, remote: Self::Remote, state: &mut ResourceState);

    /// Parses an import identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Import`] when the identifier is malformed.
    fn import(&self, id: &str) -> Result<ResourceState, ResourceError>;
}

/// [`ResourceHandler`] implementation for any [`ResourceMapper`].
#[derive(Clone, Debug)]
pub struct MappedResource<M> {
    mapper: M,
    schema: ResourceSchema,
}

impl<M: ResourceMapper> MappedResource<M> {
    /// Wraps a mapper, caching its schema.
    #[must_use]
    pub fn new(mapper: M) -> Self {
        let schema = mapper.schema();
        Self { mapper, schema }
    }
}

impl<M: ResourceMapper> ResourceHandler for MappedResource<M> {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    fn create<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            self.schema.validate(&desired.attributes)?;
            let endpoint = self.mapper.collection_path(&desired)?;
            let payload = self.mapper.create_payload(&desired)?;
            let created: M::Remote = remote::post(client, &endpoint, &payload).await?;
            let id = self
                .mapper
                .remote_id(&created)
                .ok_or_else(|| ResourceError::Decode {
                    endpoint: endpoint.to_string(),
                    message: String::from("response carries no identifier"),
                })?;
            info!(resource = self.schema.type_name, %id, "created");
            let mut state = desired.with_id(id);
            self.mapper.flatten(created, &mut state);
            Ok(state)
        })
    }

    fn read<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            let endpoint = self.mapper.item_path(&current, require_id(&current)?)?;
            let fetched: M::Remote = remote::get(client, &endpoint).await?;
            let mut state = current;
            self.mapper.flatten(fetched, &mut state);
            Ok(state)
        })
    }

    fn update<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            self.schema.validate(&desired.attributes)?;
            let endpoint = self.mapper.item_path(&desired, require_id(&desired)?)?;
            let payload = self.mapper.update_payload(&desired)?;
            remote::put(client, &endpoint, &payload).await?;
            info!(resource = self.schema.type_name, %endpoint, "updated");
            self.read(client, desired).await
        })
    }

    fn delete<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ()> {
        Box::pin(async move {
            let endpoint = self.mapper.item_path(&current, require_id(&current)?)?;
            remote::delete_idempotent(client, &endpoint).await?;
            info!(resource = self.schema.type_name, %endpoint, "deleted");
            Ok(())
        })
    }

    fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        self.mapper.import(id)
    }
}
