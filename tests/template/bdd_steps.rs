//! BDD step definitions for installation template creation.

use std::sync::Arc;

use ovh_resources::{Provider, ResourceError};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;
use tokio::runtime::Runtime;

use super::test_helpers::{
    TEMPLATE_TYPE, TemplateContext, TemplateOutcome, TemplateTestError, record, template_body,
};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] TemplateTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a desired template \"{name}\" based on \"{base}\" in \"{language}\"")]
fn desired_template(
    mut template_context: TemplateContext,
    name: String,
    base: String,
    language: String,
) -> Result<TemplateContext, StepError> {
    template_context.desired = record(json!({
        "base_template_name": base,
        "default_language": language,
        "template_name": name,
    }))?;
    Ok(template_context)
}

#[given("default partition scheme removal is enabled")]
fn removal_enabled(mut template_context: TemplateContext) -> TemplateContext {
    template_context
        .desired
        .set("remove_default_partition_schemes", true);
    template_context
}

#[given("the API accepts the template")]
fn api_accepts_template(template_context: TemplateContext) -> TemplateContext {
    template_context.client.push_empty();
    template_context.client.push_empty();
    template_context
}

#[given("the template inherits the partition schemes \"{schemes}\"")]
fn inherited_schemes(template_context: TemplateContext, schemes: String) -> TemplateContext {
    let names: Vec<&str> = schemes.split(',').collect();
    template_context.client.push_json(json!(names));
    template_context
}

#[given("every inherited scheme deletion succeeds")]
fn deletions_succeed(template_context: TemplateContext) -> TemplateContext {
    template_context.client.push_empty();
    template_context.client.push_empty();
    template_context
}

#[given("deleting the first inherited scheme fails with status \"{status}\"")]
fn first_deletion_fails(template_context: TemplateContext, status: u16) -> TemplateContext {
    template_context
        .client
        .push_status(status, "This call has not been granted");
    template_context
}

#[given("the first inherited scheme no longer exists")]
fn first_scheme_missing(template_context: TemplateContext) -> TemplateContext {
    template_context.client.push_not_found();
    template_context
}

#[given("the remaining inherited scheme deletion succeeds")]
fn remaining_deletion_succeeds(template_context: TemplateContext) -> TemplateContext {
    template_context.client.push_empty();
    template_context
}

#[given("the API returns the template on read")]
fn api_returns_template(template_context: TemplateContext) -> TemplateContext {
    let name = template_context
        .desired
        .string("template_name")
        .unwrap_or_default()
        .to_owned();
    let language = template_context
        .desired
        .string("default_language")
        .unwrap_or_default()
        .to_owned();
    template_context
        .client
        .push_json(template_body(&name, &language));
    template_context
}

#[when("I create the template")]
fn create_template(template_context: TemplateContext) -> Result<TemplateContext, StepError> {
    let runtime = Runtime::new().map_err(|err| StepError::Assertion(err.to_string()))?;
    let TemplateContext {
        client, desired, ..
    } = template_context;
    let provider = Provider::new(Arc::new(client.clone()));
    let outcome = match runtime.block_on(provider.create(TEMPLATE_TYPE, desired.clone())) {
        Ok(state) => TemplateOutcome::Created(state),
        Err(err) => TemplateOutcome::Failed(err),
    };

    Ok(TemplateContext {
        client,
        desired,
        outcome: Some(outcome),
    })
}

#[then("the template is created with id \"{id}\"")]
fn created_with_id(template_context: &TemplateContext, id: String) -> Result<(), StepError> {
    match &template_context.outcome {
        Some(TemplateOutcome::Created(state)) if state.id.as_deref() == Some(id.as_str()) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected template {id} to be created, got {other:?}"
        ))),
    }
}

#[then("the API calls are \"{calls}\"")]
fn api_calls_are(template_context: &TemplateContext, calls: String) -> Result<(), StepError> {
    let expected: Vec<&str> = calls.split(',').collect();
    let actual = template_context.client.call_lines();
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected calls {expected:?}, got {actual:?}"
        )))
    }
}

#[then("the creation fails calling \"{endpoint}\"")]
fn creation_fails_calling(
    template_context: &TemplateContext,
    endpoint: String,
) -> Result<(), StepError> {
    match &template_context.outcome {
        Some(TemplateOutcome::Failed(ResourceError::Api {
            endpoint: failed, ..
        })) if *failed == endpoint => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a failure calling {endpoint}, got {other:?}"
        ))),
    }
}

#[then("the creation is rejected as invalid")]
fn creation_rejected(template_context: &TemplateContext) -> Result<(), StepError> {
    match &template_context.outcome {
        Some(TemplateOutcome::Failed(ResourceError::Validation(_))) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a validation failure, got {other:?}"
        ))),
    }
}

#[then("\"{count}\" API calls were made")]
fn api_call_count(template_context: &TemplateContext, count: usize) -> Result<(), StepError> {
    let actual = template_context.client.invocations().len();
    if actual == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} API calls, got {actual}"
        )))
    }
}
