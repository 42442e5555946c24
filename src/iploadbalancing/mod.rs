//! IP load-balancer resources: TCP farms, TCP frontends and HTTP farm
//! servers.
//!
//! Each resource is a [`ResourceMapper`](crate::resource::ResourceMapper)
//! plugged into the generic CRUD engine.

mod http_farm_server;
mod tcp_farm;
mod tcp_frontend;

pub use http_farm_server::{HttpFarmServer, HttpFarmServerMapper};
pub use tcp_farm::{BackendProbe, TcpFarm, TcpFarmMapper};
pub use tcp_frontend::{TcpFrontend, TcpFrontendMapper};

use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::schema::{Attribute, AttributeType};
use crate::state::ResourceState;

/// Name of the attribute holding the load-balancer service.
pub const SERVICE_NAME: &str = "service_name";

fn service_name_attribute() -> Attribute {
    Attribute::required(SERVICE_NAME, AttributeType::String)
        .force_new()
        .describe("The internal name of your IP load balancing")
}

/// `/ipLoadbalancing/{service_name}`.
fn service_root(state: &ResourceState) -> Result<EndpointPath, ResourceError> {
    let service = state.require_string(SERVICE_NAME)?;
    Ok(EndpointPath::root("/ipLoadbalancing").segment(service))
}

/// Parses a numeric identifier taken from an import id.
fn parse_numeric(id: &str, part: &str, expected: &str) -> Result<i64, ResourceError> {
    part.parse().map_err(|_| ResourceError::Import {
        id: id.to_owned(),
        expected: expected.to_owned(),
    })
}
