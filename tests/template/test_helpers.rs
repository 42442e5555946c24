//! Shared fixtures for installation template scenarios.

use ovh_resources::test_support::ScriptedApiClient;
use ovh_resources::{ResourceError, ResourceState};
use rstest::fixture;
use serde_json::{Value, json};
use thiserror::Error;

pub const TEMPLATE_TYPE: &str = "ovh_me_installation_template";

#[derive(Clone, Debug)]
pub struct TemplateContext {
    pub client: ScriptedApiClient,
    pub desired: ResourceState,
    pub outcome: Option<TemplateOutcome>,
}

#[derive(Clone, Debug)]
pub enum TemplateOutcome {
    Created(ResourceState),
    Failed(ResourceError),
}

#[derive(Clone, Debug, Error)]
pub enum TemplateTestError {
    #[error("invalid template fixture: {0}")]
    Fixture(String),
}

pub type TemplateContextResult = Result<TemplateContext, TemplateTestError>;

#[fixture]
pub fn template_context_result() -> TemplateContextResult {
    Ok(TemplateContext {
        client: ScriptedApiClient::new(),
        desired: ResourceState::default(),
        outcome: None,
    })
}

#[fixture]
pub fn template_context(template_context_result: TemplateContextResult) -> TemplateContext {
    template_context_result
        .unwrap_or_else(|err| panic!("template fixture should initialise: {err}"))
}

/// Builds a desired record from a JSON object literal.
pub fn record(value: Value) -> Result<ResourceState, TemplateTestError> {
    match value {
        Value::Object(attributes) => Ok(ResourceState::from_attributes(attributes)),
        other => Err(TemplateTestError::Fixture(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Body returned by `GET /me/installationTemplate/{name}`.
pub fn template_body(name: &str, language: &str) -> Value {
    json!({
        "templateName": name,
        "baseTemplateName": "ubuntu2004",
        "defaultLanguage": language,
        "availableLanguages": [language],
        "bitFormat": 64,
        "category": "basic",
        "distribution": "ubuntu",
        "family": "linux",
        "filesystems": ["ext4"],
        "supportsRTM": false,
        "supportsUEFI": "no"
    })
}
