//! Configuration loading via `ortho-config`.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Known API endpoint aliases and the base URL each resolves to.
pub const ENDPOINTS: [(&str, &str); 7] = [
    ("ovh-eu", "https://eu.api.ovh.com/1.0"),
    ("ovh-ca", "https://ca.api.ovh.com/1.0"),
    ("ovh-us", "https://api.us.ovhcloud.com/1.0"),
    ("kimsufi-eu", "https://eu.api.kimsufi.com/1.0"),
    ("kimsufi-ca", "https://ca.api.kimsufi.com/1.0"),
    ("soyoustart-eu", "https://eu.api.soyoustart.com/1.0"),
    ("soyoustart-ca", "https://ca.api.soyoustart.com/1.0"),
];

/// OVH API credentials derived from environment variables, configuration
/// files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "OVH")]
pub struct OvhConfig {
    /// Endpoint alias (for example `ovh-eu`) or an explicit base URL.
    #[ortho_config(default = "ovh-eu".to_owned())]
    pub endpoint: String,
    /// Application key issued when registering the application.
    pub application_key: String,
    /// Application secret used to sign requests.
    pub application_secret: String,
    /// Consumer key bound to the account's access rules.
    pub consumer_key: String,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl OvhConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to ovh-resources.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("ovh-resources")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Resolves the endpoint alias or URL to the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEndpoint`] when the value is neither a
    /// known alias nor an `http(s)://` URL.
    pub fn api_base_url(&self) -> Result<String, ConfigError> {
        let endpoint = self.endpoint.trim();
        if let Some((_, url)) = ENDPOINTS.iter().find(|(alias, _)| *alias == endpoint) {
            return Ok((*url).to_owned());
        }
        if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            return Ok(endpoint.trim_end_matches('/').to_owned());
        }
        Err(ConfigError::UnknownEndpoint(endpoint.to_owned()))
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.endpoint,
            &FieldMetadata::new("API endpoint", "OVH_ENDPOINT", "endpoint"),
        )?;
        Self::require_field(
            &self.application_key,
            &FieldMetadata::new(
                "OVH application key",
                "OVH_APPLICATION_KEY",
                "application_key",
            ),
        )?;
        Self::require_field(
            &self.application_secret,
            &FieldMetadata::new(
                "OVH application secret",
                "OVH_APPLICATION_SECRET",
                "application_secret",
            ),
        )?;
        Self::require_field(
            &self.consumer_key,
            &FieldMetadata::new("OVH consumer key", "OVH_CONSUMER_KEY", "consumer_key"),
        )?;
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Raised when the endpoint is neither an alias nor a URL.
    #[error("unknown endpoint `{0}`: use an alias such as ovh-eu or an https:// URL")]
    UnknownEndpoint(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> OvhConfig {
        OvhConfig {
            endpoint: String::from("ovh-eu"),
            application_key: String::from("ak"),
            application_secret: String::from("as"),
            consumer_key: String::from("ck"),
        }
    }

    #[rstest]
    #[case("ovh-eu", "https://eu.api.ovh.com/1.0")]
    #[case("ovh-us", "https://api.us.ovhcloud.com/1.0")]
    #[case("soyoustart-ca", "https://ca.api.soyoustart.com/1.0")]
    #[case("http://127.0.0.1:8080/1.0/", "http://127.0.0.1:8080/1.0")]
    fn api_base_url_resolves(config: OvhConfig, #[case] endpoint: &str, #[case] expected: &str) {
        let cfg = OvhConfig {
            endpoint: endpoint.to_owned(),
            ..config
        };
        assert_eq!(cfg.api_base_url().expect("endpoint should resolve"), expected);
    }

    #[rstest]
    fn api_base_url_rejects_unknown_alias(config: OvhConfig) {
        let cfg = OvhConfig {
            endpoint: String::from("ovh-mars"),
            ..config
        };
        assert_eq!(
            cfg.api_base_url(),
            Err(ConfigError::UnknownEndpoint(String::from("ovh-mars")))
        );
    }

    #[rstest]
    fn validate_accepts_complete_config(config: OvhConfig) {
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("OVH_APPLICATION_KEY")]
    #[case("OVH_APPLICATION_SECRET")]
    #[case("OVH_CONSUMER_KEY")]
    fn validate_names_the_missing_variable(config: OvhConfig, #[case] env_var: &str) {
        let cfg = match env_var {
            "OVH_APPLICATION_KEY" => OvhConfig {
                application_key: String::from(" "),
                ..config
            },
            "OVH_APPLICATION_SECRET" => OvhConfig {
                application_secret: String::new(),
                ..config
            },
            _ => OvhConfig {
                consumer_key: String::new(),
                ..config
            },
        };
        let err = cfg.validate().expect_err("blank field should fail");
        assert!(
            matches!(err, ConfigError::MissingField(ref message) if message.contains(env_var)),
            "unexpected error: {err}"
        );
    }
}
