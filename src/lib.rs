//! Declarative OVH resources.
//!
//! The crate maps desired-state records onto the OVH REST API: installation
//! templates (a composite resource assembled from several calls) and IP
//! load-balancer farms, frontends and farm servers (plain CRUD resources
//! driven by a shared mapping engine). Every remote call goes through the
//! [`ApiClient`] trait, so the resources can run against the signed
//! [`OvhHttpClient`] or a scripted double.

pub mod api;
pub mod config;
pub mod document;
pub mod error;
pub mod iploadbalancing;
pub mod provider;
mod remote;
pub mod resource;
pub mod schema;
pub mod state;
pub mod template;
pub mod test_support;
pub mod validation;

pub use api::{ApiClient, ApiError, Method, OvhHttpClient};
pub use config::{ConfigError, OvhConfig};
pub use document::DocumentError;
pub use error::ResourceError;
pub use provider::{Plan, Provider};
pub use resource::{MappedResource, ResourceHandler, ResourceMapper};
pub use schema::{Attribute, AttributeType, Presence, ResourceSchema};
pub use state::ResourceState;
pub use template::{InstallationTemplateResource, PartitionTree};
pub use validation::{ValidationError, Validator};
