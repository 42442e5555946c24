//! `ovh_iploadbalancing_http_farm_server`.

use serde::{Deserialize, Serialize};

use super::{SERVICE_NAME, parse_numeric, service_name_attribute, service_root};
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::resource::{ResourceMapper, split_import_id};
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use crate::state::ResourceState;
use crate::validation::Validator;

const TYPE_NAME: &str = "ovh_iploadbalancing_http_farm_server";
const IMPORT_FORMAT: &str = "service_name/farm_id/server_id";
const FARM_ID: &str = "farm_id";

const PROXY_PROTOCOL_VERSIONS: &[&str] = &["v1", "v2", "v2-ssl", "v2-ssl-cn"];
const STATUSES: &[&str] = &["active", "inactive"];

/// Backend server as exchanged with
/// `/ipLoadbalancing/{service}/http/farm/{farm}/server`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpFarmServer {
    /// Identifier assigned by the API.
    #[serde(skip_serializing)]
    pub server_id: Option<i64>,
    /// Human readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// IPv4 address of the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Backend port; the farm port when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    /// PROXY protocol version sent to the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_protocol_version: Option<String>,
    /// Certificate chain used to verify the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    /// Load-balancing weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    /// Whether the farm probe checks this server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<bool>,
    /// Whether traffic to the backend is encrypted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
    /// Whether the server only receives traffic when others are down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    /// `active` or `inactive`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Stickiness cookie value, assigned by the API.
    #[serde(skip_serializing)]
    pub cookie: Option<String>,
}

/// Maps [`HttpFarmServer`] to state records.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpFarmServerMapper;

impl ResourceMapper for HttpFarmServerMapper {
    type Remote = HttpFarmServer;

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(
            TYPE_NAME,
            IMPORT_FORMAT,
            vec![
                service_name_attribute(),
                Attribute::required(FARM_ID, AttributeType::Int).force_new(),
                Attribute::optional("display_name", AttributeType::String),
                Attribute::required("address", AttributeType::String)
                    .force_new()
                    .validated(Validator::Ipv4),
                Attribute::optional("ssl", AttributeType::Bool).default_value(false),
                Attribute::computed("cookie", AttributeType::String),
                Attribute::optional("port", AttributeType::Int),
                Attribute::optional("proxy_protocol_version", AttributeType::String)
                    .validated(Validator::OneOf(PROXY_PROTOCOL_VERSIONS)),
                Attribute::optional("chain", AttributeType::String),
                Attribute::optional("weight", AttributeType::Int).default_value(1),
                Attribute::optional("probe", AttributeType::Bool).default_value(false),
                Attribute::optional("backup", AttributeType::Bool).default_value(false),
                Attribute::required("status", AttributeType::String)
                    .validated(Validator::OneOf(STATUSES)),
            ],
        )
    }

    fn collection_path(&self, state: &ResourceState) -> Result<EndpointPath, ResourceError> {
        let farm_id = state.require_int(FARM_ID)?;
        Ok(service_root(state)?
            .literal("http/farm")
            .segment(farm_id.to_string())
            .literal("server"))
    }

    fn item_path(&self, state: &ResourceState, id: &str) -> Result<EndpointPath, ResourceError> {
        Ok(self.collection_path(state)?.segment(id))
    }

    fn create_payload(&self, desired: &ResourceState) -> Result<HttpFarmServer, ResourceError> {
        Ok(HttpFarmServer {
            server_id: None,
            display_name: desired.string("display_name").map(str::to_owned),
            address: Some(desired.require_string("address")?.to_owned()),
            port: desired.int("port"),
            proxy_protocol_version: desired.string("proxy_protocol_version").map(str::to_owned),
            chain: desired.string("chain").map(str::to_owned),
            weight: desired.int("weight"),
            probe: desired.bool("probe"),
            ssl: desired.bool("ssl"),
            backup: desired.bool("backup"),
            status: Some(desired.require_string("status")?.to_owned()),
            cookie: None,
        })
    }

    fn remote_id(&self, created: &HttpFarmServer) -> Option<String> {
        created.server_id.map(|id| id.to_string())
    }

    fn flatten(&self, remote: HttpFarmServer, state: &mut ResourceState) {
        state.set_some("address", remote.address);
        state.set_some("status", remote.status);
        state.set_some("probe", remote.probe);
        state.set_some("ssl", remote.ssl);
        state.set_some("backup", remote.backup);
        state.set_some("weight", remote.weight);
        state.set_some("display_name", remote.display_name);
        state.set_some("cookie", remote.cookie);
        state.set_some("port", remote.port);
        state.set_some("proxy_protocol_version", remote.proxy_protocol_version);
        state.set_some("chain", remote.chain);
    }

    fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        let [service, farm, server] = split_import_id::<3>(id, IMPORT_FORMAT)?;
        let farm_id = parse_numeric(id, farm, IMPORT_FORMAT)?;
        let mut state = ResourceState::default().with_id(server);
        state.set(SERVICE_NAME, service);
        state.set(FARM_ID, farm_id);
        Ok(state)
    }
}
