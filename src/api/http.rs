//! `reqwest` transport for the OVH API with application-key signing.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{debug, warn};

use super::{ApiClient, ApiError, ApiFuture, Method};
use crate::config::{ConfigError, OvhConfig};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Computes the `X-Ovh-Signature` header value for a request.
///
/// The signed string is the application secret, consumer key, verb, full URL,
/// body and timestamp joined with `+`, hashed with SHA-1 and prefixed with
/// `$1$`.
#[must_use]
pub fn sign_request(
    application_secret: &str,
    consumer_key: &str,
    method: Method,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let to_sign = format!(
        "{application_secret}+{consumer_key}+{}+{url}+{body}+{timestamp}",
        method.as_str()
    );
    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    format!("$1${}", hex::encode(hasher.finalize()))
}

/// API client talking to a real OVH endpoint.
#[derive(Clone, Debug)]
pub struct OvhHttpClient {
    client: reqwest::Client,
    base_url: String,
    application_key: String,
    application_secret: String,
    consumer_key: String,
}

impl OvhHttpClient {
    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a credential is missing, the endpoint
    /// cannot be resolved or the HTTP client cannot be constructed.
    pub fn new(config: &OvhConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_url = config.api_base_url()?;
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|err| ConfigError::Parse(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            application_key: config.application_key.clone(),
            application_secret: config.application_secret.clone(),
            consumer_key: config.consumer_key.clone(),
        })
    }

    /// Base URL every path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let body_text = match body {
            Some(value) => serde_json::to_string(value).map_err(|err| ApiError::Decode {
                message: err.to_string(),
            })?,
            None => String::new(),
        };
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign_request(
            &self.application_secret,
            &self.consumer_key,
            method,
            &url,
            &body_text,
            timestamp,
        );
        debug!(%method, %url, "OVH API request");

        let mut request = self
            .client
            .request(reqwest_method(method), &url)
            .header("X-Ovh-Application", &self.application_key)
            .header("X-Ovh-Consumer", &self.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);
        if body.is_some() {
            request = request
                .header("Content-Type", "application/json")
                .body(body_text);
        }

        let response = request.send().await.map_err(|err| ApiError::Transport {
            message: err.to_string(),
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|err| ApiError::Transport {
            message: err.to_string(),
        })?;

        if status.is_success() {
            return decode_body(&text);
        }
        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }
}

impl ApiClient for OvhHttpClient {
    fn call<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        body: Option<&'a Value>,
    ) -> ApiFuture<'a, Value> {
        Box::pin(self.send(method, path, body))
    }
}

const fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn decode_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|err| {
        warn!(error = %err, "failed to parse OVH API response");
        ApiError::Decode {
            message: err.to_string(),
        }
    })
}

fn error_message(text: &str) -> String {
    serde_json::from_str::<ErrorBody>(text)
        .map_or_else(|_| text.trim().to_owned(), |parsed| parsed.message)
}
