//! Steps of the installation template creation flow.
//!
//! Each step is a single awaited call (or a strict sequence of them). A
//! failing step leaves the steps before it applied; nothing is rolled back.

use tracing::info;

use super::types::{CreateTemplateRequest, UpdateTemplateRequest};
use super::{TEMPLATES, TemplateSpec, scheme_names, scheme_path, template_path};
use crate::api::ApiClient;
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::remote;

/// Creates the template from its base.
pub(super) async fn post_template(
    client: &dyn ApiClient,
    spec: &TemplateSpec,
) -> Result<(), ResourceError> {
    let request = CreateTemplateRequest {
        base_template_name: &spec.base_template_name,
        default_language: &spec.default_language,
        name: &spec.template_name,
    };
    let _: serde_json::Value =
        remote::post(client, &EndpointPath::root(TEMPLATES), &request).await?;
    info!(
        template = %spec.template_name,
        base = %spec.base_template_name,
        "created installation template"
    );
    Ok(())
}

/// Applies name, language and customization to the template currently
/// named `current`.
pub(super) async fn customize(
    client: &dyn ApiClient,
    current: &str,
    spec: &TemplateSpec,
) -> Result<(), ResourceError> {
    let request = UpdateTemplateRequest {
        template_name: &spec.template_name,
        default_language: &spec.default_language,
        customization: spec.customization.clone(),
    };
    remote::put(client, &template_path(current), &request).await?;
    info!(template = current, "customized installation template");
    Ok(())
}

/// Deletes every partition scheme the template inherited, one at a time.
///
/// A scheme that is already gone counts as removed. Any other failure stops
/// the loop; schemes deleted before it stay deleted.
pub(super) async fn remove_default_schemes(
    client: &dyn ApiClient,
    template: &str,
) -> Result<(), ResourceError> {
    let schemes = scheme_names(client, template).await?;
    for scheme in &schemes {
        remote::delete_idempotent(client, &scheme_path(template, scheme)).await?;
        info!(template, scheme = %scheme, "removed default partition scheme");
    }
    Ok(())
}
