//! `ovh_iploadbalancing_tcp_farm`.

use serde::{Deserialize, Serialize};
use serde_json::Map;

use super::{SERVICE_NAME, parse_numeric, service_name_attribute, service_root};
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::resource::{ResourceMapper, split_import_id};
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use crate::state::ResourceState;
use crate::validation::Validator;

const TYPE_NAME: &str = "ovh_iploadbalancing_tcp_farm";
const IMPORT_FORMAT: &str = "service_name/farm_id";

const BALANCE: &[&str] = &["first", "leastconn", "roundrobin", "source"];
const STICKINESS: &[&str] = &["sourceIp"];
const PROBE_TYPES: &[&str] = &["http", "internal", "mysql", "oco", "pgsql", "smtp", "tcp"];
const PROBE_MATCHES: &[&str] = &["contains", "default", "internal", "matches", "status"];
const PROBE_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS", "internal"];

/// Health probe attached to a farm.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendProbe {
    /// Probe kind.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// How the response is matched.
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_kind: Option<String>,
    /// Port probed; the server port when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    /// Seconds between probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    /// Inverts the match result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negate: Option<bool>,
    /// Pattern the response is matched against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Probes over SSL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_ssl: Option<bool>,
    /// URL requested by HTTP probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// HTTP method of HTTP probes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl BackendProbe {
    fn from_state(block: &ResourceState) -> Self {
        Self {
            kind: block.string("type").map(str::to_owned),
            match_kind: block.string("match").map(str::to_owned),
            port: block.int("port"),
            interval: block.int("interval"),
            negate: block.bool("negate"),
            pattern: block.string("pattern").map(str::to_owned),
            force_ssl: block.bool("force_ssl"),
            url: block.string("url").map(str::to_owned),
            method: block.string("method").map(str::to_owned),
        }
    }

    fn to_block(&self) -> ResourceState {
        let mut block = ResourceState::from_attributes(Map::new());
        block.set_some("type", self.kind.clone());
        block.set_some("match", self.match_kind.clone());
        block.set_some("port", self.port);
        block.set_some("interval", self.interval);
        block.set_some("negate", self.negate);
        block.set_some("pattern", self.pattern.clone());
        block.set_some("force_ssl", self.force_ssl);
        block.set_some("url", self.url.clone());
        block.set_some("method", self.method.clone());
        block
    }
}

/// TCP farm as exchanged with `/ipLoadbalancing/{service}/tcp/farm`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TcpFarm {
    /// Identifier assigned by the API.
    #[serde(skip_serializing)]
    pub farm_id: Option<i64>,
    /// Zone the farm runs in; fixed at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Load-balancing algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// Human readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Port of the backend servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    /// Session stickiness method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stickiness: Option<String>,
    /// Private network the farm is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrack_network_id: Option<i64>,
    /// Health probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<BackendProbe>,
}

/// Maps [`TcpFarm`] to state records.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpFarmMapper;

impl TcpFarmMapper {
    fn payload(desired: &ResourceState, zone: Option<String>) -> TcpFarm {
        TcpFarm {
            farm_id: None,
            zone,
            balance: desired.string("balance").map(str::to_owned),
            display_name: desired.string("display_name").map(str::to_owned),
            port: desired.int("port"),
            stickiness: desired.string("stickiness").map(str::to_owned),
            vrack_network_id: desired.int("vrack_network_id"),
            probe: desired.block("probe").as_ref().map(BackendProbe::from_state),
        }
    }
}

fn probe_schema() -> Vec<Attribute> {
    vec![
        Attribute::required("type", AttributeType::String).validated(Validator::OneOf(PROBE_TYPES)),
        Attribute::optional("match", AttributeType::String)
            .validated(Validator::OneOf(PROBE_MATCHES)),
        Attribute::optional("port", AttributeType::Int),
        Attribute::optional("interval", AttributeType::Int)
            .default_value(30)
            .validated(Validator::Range(30, 3600)),
        Attribute::optional("negate", AttributeType::Bool),
        Attribute::optional("pattern", AttributeType::String),
        Attribute::optional("force_ssl", AttributeType::Bool),
        Attribute::optional("url", AttributeType::String),
        Attribute::optional("method", AttributeType::String)
            .validated(Validator::OneOf(PROBE_METHODS)),
    ]
}

impl ResourceMapper for TcpFarmMapper {
    type Remote = TcpFarm;

    fn schema(&self) -> ResourceSchema {
        ResourceSchema::new(
            TYPE_NAME,
            IMPORT_FORMAT,
            vec![
                service_name_attribute(),
                Attribute::optional("balance", AttributeType::String)
                    .validated(Validator::OneOf(BALANCE)),
                Attribute::optional("display_name", AttributeType::String),
                Attribute::optional("port", AttributeType::Int),
                Attribute::optional("stickiness", AttributeType::String)
                    .validated(Validator::OneOf(STICKINESS)),
                Attribute::optional("vrack_network_id", AttributeType::Int),
                Attribute::required("zone", AttributeType::String).force_new(),
                Attribute::optional("probe", AttributeType::single_block(probe_schema())),
            ],
        )
    }

    fn collection_path(&self, state: &ResourceState) -> Result<EndpointPath, ResourceError> {
        Ok(service_root(state)?.literal("tcp/farm"))
    }

    fn item_path(&self, state: &ResourceState, id: &str) -> Result<EndpointPath, ResourceError> {
        Ok(self.collection_path(state)?.segment(id))
    }

    fn create_payload(&self, desired: &ResourceState) -> Result<TcpFarm, ResourceError> {
        let zone = desired.require_string("zone")?.to_owned();
        Ok(Self::payload(desired, Some(zone)))
    }

    fn update_payload(&self, desired: &ResourceState) -> Result<TcpFarm, ResourceError> {
        Ok(Self::payload(desired, None))
    }

    fn remote_id(&self, created: &TcpFarm) -> Option<String> {
        created.farm_id.map(|id| id.to_string())
    }

    fn flatten(&self, remote: TcpFarm, state: &mut ResourceState) {
        state.set("zone", remote.zone);
        state.set("balance", remote.balance);
        state.set("display_name", remote.display_name);
        state.set("port", remote.port);
        state.set("stickiness", remote.stickiness);
        state.set("vrack_network_id", remote.vrack_network_id);
        state.set_block("probe", remote.probe.map(|probe| probe.to_block().attributes));
    }

    fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        let [service, farm] = split_import_id::<2>(id, IMPORT_FORMAT)?;
        let farm_id = parse_numeric(id, farm, IMPORT_FORMAT)?;
        let mut state = ResourceState::default().with_id(farm_id.to_string());
        state.set(SERVICE_NAME, service);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{MappedResource, ResourceHandler};
    use crate::test_support::ScriptedApiClient;
    use crate::validation::ValidationError;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn handler() -> MappedResource<TcpFarmMapper> {
        MappedResource::new(TcpFarmMapper)
    }

    fn desired(value: Value) -> ResourceState {
        let mut state = ResourceState::default();
        if let Value::Object(attributes) = value {
            state.attributes = attributes;
        }
        state
    }

    #[rstest]
    #[tokio::test]
    async fn create_posts_payload_and_flattens_response(handler: MappedResource<TcpFarmMapper>) {
        let client = ScriptedApiClient::new();
        client.push_json(json!({
            "farmId": 42,
            "zone": "gra",
            "balance": "roundrobin",
            "port": 80,
            "probe": {"type": "tcp", "interval": 30}
        }));
        let state = handler
            .create(
                &client,
                desired(json!({
                    "service_name": "loadbalancer-1",
                    "zone": "gra",
                    "balance": "roundrobin",
                    "port": 80,
                    "probe": [{"type": "tcp", "interval": 30}]
                })),
            )
            .await
            .expect("create succeeds");

        assert_eq!(state.id.as_deref(), Some("42"));
        assert_eq!(state.string("balance"), Some("roundrobin"));
        assert_eq!(
            state.block("probe").and_then(|probe| probe.int("interval")),
            Some(30)
        );
        assert_eq!(client.call_lines(), vec!["POST /ipLoadbalancing/loadbalancer-1/tcp/farm"]);
        assert_eq!(
            client.bodies(),
            vec![Some(json!({
                "zone": "gra",
                "balance": "roundrobin",
                "port": 80,
                "probe": {"type": "tcp", "interval": 30}
            }))]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn update_omits_zone_and_reads_back(handler: MappedResource<TcpFarmMapper>) {
        let client = ScriptedApiClient::new();
        client.push_empty();
        client.push_json(json!({"farmId": 42, "zone": "gra", "displayName": "web"}));
        let state = handler
            .update(
                &client,
                desired(json!({"service_name": "lb", "zone": "gra", "display_name": "web"}))
                    .with_id("42"),
            )
            .await
            .expect("update succeeds");

        assert_eq!(state.string("display_name"), Some("web"));
        assert_eq!(
            client.call_lines(),
            vec!["PUT /ipLoadbalancing/lb/tcp/farm/42", "GET /ipLoadbalancing/lb/tcp/farm/42"]
        );
        assert_eq!(client.bodies(), vec![Some(json!({"displayName": "web"})), None]);
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_probe_interval_fails_before_any_call(handler: MappedResource<TcpFarmMapper>) {
        let client = ScriptedApiClient::new();
        let err = handler
            .create(
                &client,
                desired(json!({
                    "service_name": "lb",
                    "zone": "gra",
                    "probe": [{"type": "tcp", "interval": 5}]
                })),
            )
            .await
            .expect_err("interval below range");
        assert!(matches!(
            err,
            ResourceError::Validation(ValidationError::Range { ref field, .. })
                if field == "probe.interval"
        ));
        assert!(client.invocations().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_probe_clears_block(handler: MappedResource<TcpFarmMapper>) {
        let client = ScriptedApiClient::new();
        client.push_json(json!({"farmId": 1, "zone": "gra"}));
        let mut current = desired(json!({"service_name": "lb"})).with_id("1");
        current.set("probe", json!([{"type": "tcp"}]));
        let state = handler.read(&client, current).await.expect("read succeeds");
        assert_eq!(state.attributes.get("probe"), Some(&json!([])));
    }

    #[rstest]
    fn import_parses_service_and_farm(handler: MappedResource<TcpFarmMapper>) {
        let state = handler.import("lb-1/42").expect("valid id");
        assert_eq!(state.id.as_deref(), Some("42"));
        assert_eq!(state.string(SERVICE_NAME), Some("lb-1"));
        assert!(matches!(
            handler.import("lb-1/forty-two"),
            Err(ResourceError::Import { .. })
        ));
    }
}
