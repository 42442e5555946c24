//! Registry dispatching operations to resource handlers by type name.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::api::ApiClient;
use crate::error::ResourceError;
use crate::iploadbalancing::{HttpFarmServerMapper, TcpFarmMapper, TcpFrontendMapper};
use crate::resource::{MappedResource, ResourceHandler};
use crate::schema::{Presence, ResourceSchema};
use crate::state::ResourceState;
use crate::template::{InstallationTemplateResource, PartitionTree, expand_partition_tree};

/// Action needed to move a resource from its prior state to the desired one.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    /// Nothing exists yet.
    Create,
    /// Prior and desired agree.
    NoOp,
    /// In-place update of the listed attributes.
    Update {
        /// Attributes whose value changes.
        changed: Vec<String>,
    },
    /// The listed force-new attributes changed; the resource must be
    /// destroyed and created again.
    Replace {
        /// Force-new attributes whose value changes.
        attributes: Vec<String>,
    },
}

/// All resource types of the provider, bound to one API client.
pub struct Provider {
    client: Arc<dyn ApiClient>,
    handlers: BTreeMap<&'static str, Box<dyn ResourceHandler>>,
}

impl Provider {
    /// Creates a provider with every resource type registered.
    #[must_use]
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        let mut provider = Self {
            client,
            handlers: BTreeMap::new(),
        };
        provider.register(Box::new(InstallationTemplateResource::new()));
        provider.register(Box::new(MappedResource::new(TcpFarmMapper)));
        provider.register(Box::new(MappedResource::new(TcpFrontendMapper)));
        provider.register(Box::new(MappedResource::new(HttpFarmServerMapper)));
        provider
    }

    /// Registers a handler under its schema's type name, replacing any
    /// handler already registered for it.
    pub fn register(&mut self, handler: Box<dyn ResourceHandler>) {
        self.handlers.insert(handler.schema().type_name, handler);
    }

    /// Registered type names, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    fn handler(&self, type_name: &str) -> Result<&dyn ResourceHandler, ResourceError> {
        self.handlers
            .get(type_name)
            .map(AsRef::as_ref)
            .ok_or_else(|| ResourceError::UnknownResourceType(type_name.to_owned()))
    }

    /// Schema of a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownResourceType`] for unregistered types.
    pub fn schema(&self, type_name: &str) -> Result<&ResourceSchema, ResourceError> {
        Ok(self.handler(type_name)?.schema())
    }

    /// Validates `desired`, fills defaults and creates the resource.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] without calling the API when the
    /// record is invalid, otherwise whatever the handler reports.
    pub async fn create(
        &self,
        type_name: &str,
        mut desired: ResourceState,
    ) -> Result<ResourceState, ResourceError> {
        let handler = self.handler(type_name)?;
        handler.schema().apply_defaults(&mut desired.attributes);
        handler.create(self.client.as_ref(), desired).await
    }

    /// Refreshes a resource's state.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] when the remote object is gone.
    pub async fn read(
        &self,
        type_name: &str,
        current: ResourceState,
    ) -> Result<ResourceState, ResourceError> {
        self.handler(type_name)?
            .read(self.client.as_ref(), current)
            .await
    }

    /// Applies `desired` to the resource described by `prior`.
    ///
    /// The identifier comes from `prior`, as do optional-computed attributes
    /// the desired record leaves unset.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingAttribute`] when `prior` has no id and
    /// [`ResourceError::Validation`] when `desired` is invalid.
    pub async fn update(
        &self,
        type_name: &str,
        prior: &ResourceState,
        mut desired: ResourceState,
    ) -> Result<ResourceState, ResourceError> {
        let handler = self.handler(type_name)?;
        let schema = handler.schema();
        schema.apply_defaults(&mut desired.attributes);
        for attr in &schema.attributes {
            if attr.presence != Presence::OptionalComputed || desired.value(attr.name).is_some() {
                continue;
            }
            if let Some(value) = prior.value(attr.name) {
                desired.set(attr.name, value.clone());
            }
        }
        desired.id.clone_from(&prior.id);
        handler.update(self.client.as_ref(), desired).await
    }

    /// Deletes a resource; succeeds when it is already gone.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] for any failure other than 404.
    pub async fn delete(
        &self,
        type_name: &str,
        current: ResourceState,
    ) -> Result<(), ResourceError> {
        self.handler(type_name)?
            .delete(self.client.as_ref(), current)
            .await
    }

    /// Imports an existing object by external id and reads it.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Import`] for malformed ids and
    /// [`ResourceError::NotFound`] when the object does not exist.
    pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceState, ResourceError> {
        let handler = self.handler(type_name)?;
        let partial = handler.import(id)?;
        debug!(type_name, id, "importing");
        handler.read(self.client.as_ref(), partial).await
    }

    /// Decides how to reach `desired` from `prior`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Validation`] when `desired` is invalid.
    pub fn plan(
        &self,
        type_name: &str,
        prior: Option<&ResourceState>,
        desired: &ResourceState,
    ) -> Result<Plan, ResourceError> {
        let schema = self.schema(type_name)?;
        let mut attributes = desired.attributes.clone();
        schema.apply_defaults(&mut attributes);
        schema.validate(&attributes)?;

        let Some(prior) = prior else {
            return Ok(Plan::Create);
        };
        let replaced = schema.replacement_attributes(&prior.attributes, &attributes);
        if !replaced.is_empty() {
            return Ok(Plan::Replace {
                attributes: replaced,
            });
        }
        let changed = schema.changed_attributes(&prior.attributes, &attributes);
        if changed.is_empty() {
            Ok(Plan::NoOp)
        } else {
            Ok(Plan::Update { changed })
        }
    }

    /// Expands the partition schemes of an installation template.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResourceError`] met during the expansion.
    pub async fn partition_tree(&self, template: &str) -> Result<PartitionTree, ResourceError> {
        expand_partition_tree(self.client.as_ref(), template).await
    }
}
