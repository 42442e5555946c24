//! BDD scenarios for installation template creation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{TemplateContext, template_context};

#[scenario(
    path = "tests/features/installation_template.feature",
    name = "Create a template and remove its default partition schemes"
)]
fn scenario_remove_default_schemes(template_context: TemplateContext) {
    let _ = template_context;
}

#[scenario(
    path = "tests/features/installation_template.feature",
    name = "Abort when a default partition scheme cannot be deleted"
)]
fn scenario_abort_on_scheme_failure(template_context: TemplateContext) {
    let _ = template_context;
}

#[scenario(
    path = "tests/features/installation_template.feature",
    name = "Continue when an inherited scheme is already gone"
)]
fn scenario_scheme_already_gone(template_context: TemplateContext) {
    let _ = template_context;
}

#[scenario(
    path = "tests/features/installation_template.feature",
    name = "Keep inherited schemes when removal is disabled"
)]
fn scenario_keep_inherited_schemes(template_context: TemplateContext) {
    let _ = template_context;
}

#[scenario(
    path = "tests/features/installation_template.feature",
    name = "Reject an unsupported default language before calling the API"
)]
fn scenario_reject_language(template_context: TemplateContext) {
    let _ = template_context;
}
