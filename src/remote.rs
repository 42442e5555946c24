//! Remote calls wrapped with endpoint context.
//!
//! Every failure is tagged with the verb and path that produced it. A 404
//! becomes [`ResourceError::NotFound`]; deciding whether that is fatal is left
//! to the caller.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiClient, ApiError, Method};
use crate::api::path::EndpointPath;
use crate::error::ResourceError;

fn wrap(method: Method, endpoint: &EndpointPath, err: ApiError) -> ResourceError {
    if err.is_not_found() {
        return ResourceError::NotFound {
            endpoint: endpoint.to_string(),
        };
    }
    ResourceError::Api {
        method,
        endpoint: endpoint.to_string(),
        source: err,
    }
}

/// Decodes a list field, reading an explicit `null` as an empty list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn decode<T: DeserializeOwned>(endpoint: &EndpointPath, value: Value) -> Result<T, ResourceError> {
    serde_json::from_value(value).map_err(|err| ResourceError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

fn encode<B: Serialize>(endpoint: &EndpointPath, body: &B) -> Result<Value, ResourceError> {
    serde_json::to_value(body).map_err(|err| ResourceError::Decode {
        endpoint: endpoint.to_string(),
        message: err.to_string(),
    })
}

async fn call(
    client: &dyn ApiClient,
    method: Method,
    endpoint: &EndpointPath,
    body: Option<&Value>,
) -> Result<Value, ResourceError> {
    debug!(%method, %endpoint, "remote call");
    client
        .call(method, endpoint.as_str(), body)
        .await
        .map_err(|err| wrap(method, endpoint, err))
}

/// `GET` and decode.
pub(crate) async fn get<T: DeserializeOwned>(
    client: &dyn ApiClient,
    endpoint: &EndpointPath,
) -> Result<T, ResourceError> {
    let value = call(client, Method::Get, endpoint, None).await?;
    decode(endpoint, value)
}

/// `POST` a body and decode the response.
pub(crate) async fn post<B: Serialize + Sync, T: DeserializeOwned>(
    client: &dyn ApiClient,
    endpoint: &EndpointPath,
    body: &B,
) -> Result<T, ResourceError> {
    let payload = encode(endpoint, body)?;
    let value = call(client, Method::Post, endpoint, Some(&payload)).await?;
    decode(endpoint, value)
}

/// `PUT` a body, ignoring the response.
pub(crate) async fn put<B: Serialize + Sync>(
    client: &dyn ApiClient,
    endpoint: &EndpointPath,
    body: &B,
) -> Result<(), ResourceError> {
    let payload = encode(endpoint, body)?;
    call(client, Method::Put, endpoint, Some(&payload)).await?;
    Ok(())
}

/// `DELETE`, surfacing 404 as [`ResourceError::NotFound`].
pub(crate) async fn delete(
    client: &dyn ApiClient,
    endpoint: &EndpointPath,
) -> Result<(), ResourceError> {
    call(client, Method::Delete, endpoint, None).await?;
    Ok(())
}

/// `DELETE`, treating 404 as already deleted.
pub(crate) async fn delete_idempotent(
    client: &dyn ApiClient,
    endpoint: &EndpointPath,
) -> Result<(), ResourceError> {
    match delete(client, endpoint).await {
        Err(ResourceError::NotFound { .. }) => {
            debug!(%endpoint, "already deleted");
            Ok(())
        }
        other => other,
    }
}
