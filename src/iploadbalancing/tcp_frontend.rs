//! `ovh_iploadbalancing_tcp_frontend`.

use serde::{Deserialize, Serialize};

use super::{SERVICE_NAME, parse_numeric, service_name_attribute, service_root};
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::resource::{ResourceMapper, split_import_id};
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use crate::state::ResourceState;
use crate::validation::Validator;

const TYPE_NAME: &str = "ovh_iploadbalancing_tcp_frontend";
const IMPORT_FORMAT: &str = "service_name/frontend_id";

/// TCP frontend as exchanged with `/ipLoadbalancing/{service}/tcp/frontend`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpFrontend {
    /// Identifier assigned by the API.
    #[serde(skip_serializing)]
    pub frontend_id: Option<i64>,
    /// Listening port or port range, such as `80` or `8080-8090`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Zone the frontend listens in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Source blocks allowed to connect; everyone when empty.
    #[serde(deserialize_with = "crate::remote::null_as_empty")]
    pub allowed_source: Vec<String>,
    /// Failover IP blocks the frontend listens on.
    #[serde(deserialize_with = "crate::remote::null_as_empty")]
    pub dedicated_ipfo: Vec<String>,
    /// Farm receiving traffic by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_farm_id: Option<i64>,
    /// Certificate served by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_ssl_id: Option<i64>,
    /// Whether the frontend is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Whether SSL is terminated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    /// Human readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Maps [`TcpFrontend`] to state records.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpFrontendMapper;

impl ResourceMapper for TcpFrontendMapper {
    type Remote = TcpFrontend;

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(
            TYPE_NAME,
            IMPORT_FORMAT,
            vec![
                service_name_attribute(),
                Attribute::required("port", AttributeType::String),
                Attribute::required("zone", AttributeType::String),
                Attribute::optional("allowed_source", AttributeType::StringSet)
                    .validated(Validator::IpBlock),
                Attribute::optional("dedicated_ipfo", AttributeType::StringSet)
                    .validated(Validator::IpBlock),
                Attribute::optional_computed("default_farm_id", AttributeType::Int),
                Attribute::optional_computed("default_ssl_id", AttributeType::Int),
                Attribute::optional("disabled", AttributeType::Bool).default_value(false),
                Attribute::optional("ssl", AttributeType::Bool).default_value(false),
                Attribute::optional("display_name", AttributeType::String),
            ],
        )
    }

    fn collection_path(&self, state: &ResourceState) -> Result<EndpointPath, ResourceError> {
        Ok(service_root(state)?.literal("tcp/frontend"))
    }

    fn item_path(&self, state: &ResourceState, id: &str) -> Result<EndpointPath, ResourceError> {
        Ok(self.collection_path(state)?.segment(id))
    }

    fn create_payload(&self, desired: &ResourceState) -> Result<TcpFrontend, ResourceError> {
        Ok(TcpFrontend {
            frontend_id: None,
            port: Some(desired.require_string("port")?.to_owned()),
            zone: Some(desired.require_string("zone")?.to_owned()),
            allowed_source: desired.strings("allowed_source"),
            dedicated_ipfo: desired.strings("dedicated_ipfo"),
            default_farm_id: desired.int("default_farm_id"),
            default_ssl_id: desired.int("default_ssl_id"),
            disabled: desired.bool("disabled"),
            ssl: desired.bool("ssl"),
            display_name: desired.string("display_name").map(str::to_owned),
        })
    }

    fn remote_id(&self, created: &TcpFrontend) -> Option<String> {
        created.frontend_id.map(|id| id.to_string())
    }

    fn flatten(&self, remote: TcpFrontend, state: &mut ResourceState) {
        state.set("display_name", remote.display_name);
        state.set("port", remote.port);
        state.set("zone", remote.zone);
        state.set("allowed_source", remote.allowed_source);
        state.set("dedicated_ipfo", remote.dedicated_ipfo);
        state.set_some("default_farm_id", remote.default_farm_id);
        state.set_some("default_ssl_id", remote.default_ssl_id);
        state.set_some("disabled", remote.disabled);
        state.set_some("ssl", remote.ssl);
    }

    fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        let [service, frontend] = split_import_id::<2>(id, IMPORT_FORMAT)?;
        let frontend_id = parse_numeric(id, frontend, IMPORT_FORMAT)?;
        let mut state = ResourceState::default().with_id(frontend_id.to_string());
        state.set(SERVICE_NAME, service);
        Ok(state)
    }
}
