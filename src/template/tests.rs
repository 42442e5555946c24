//! Unit tests for the installation template resource.

use super::*;
use crate::test_support::ScriptedApiClient;
use crate::validation::ValidationError;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn handler() -> InstallationTemplateResource {
    InstallationTemplateResource::new()
}

fn desired(value: Value) -> ResourceState {
    let mut state = ResourceState::default();
    if let Value::Object(attributes) = value {
        state.attributes = attributes;
    }
    state
}

fn my_tpl(remove: bool) -> ResourceState {
    desired(json!({
        "base_template_name": "ubuntu2004",
        "default_language": "en",
        "template_name": "my-tpl",
        "remove_default_partition_schemes": remove,
        "customization": [{"custom_hostname": "node", "rating": 3}]
    }))
}

fn template_body(name: &str) -> Value {
    json!({
        "templateName": name,
        "defaultLanguage": "en",
        "availableLanguages": ["en", "fr"],
        "bitFormat": 64,
        "category": "basic",
        "customization": {"customHostname": "node", "rating": 3},
        "distribution": "ubuntu",
        "family": "linux",
        "filesystems": ["ext4", "xfs"],
        "supportsRTM": true,
        "supportsUEFI": "yes"
    })
}

#[rstest]
#[tokio::test]
async fn create_removes_schemes_in_order(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_empty();
    client.push_json(json!(["default-1", "default-2"]));
    client.push_empty();
    client.push_empty();
    client.push_json(template_body("my-tpl"));

    let state = handler
        .create(&client, my_tpl(true))
        .await
        .expect("create succeeds");

    assert_eq!(
        client.call_lines(),
        vec![
            "POST /me/installationTemplate",
            "PUT /me/installationTemplate/my-tpl",
            "GET /me/installationTemplate/my-tpl/partitionScheme",
            "DELETE /me/installationTemplate/my-tpl/partitionScheme/default-1",
            "DELETE /me/installationTemplate/my-tpl/partitionScheme/default-2",
            "GET /me/installationTemplate/my-tpl",
        ]
    );
    assert_eq!(
        client.bodies(),
        vec![
            Some(json!({
                "baseTemplateName": "ubuntu2004",
                "defaultLanguage": "en",
                "name": "my-tpl"
            })),
            Some(json!({
                "templateName": "my-tpl",
                "defaultLanguage": "en",
                "customization": {"customHostname": "node", "rating": 3}
            })),
            None,
            None,
            None,
            None,
        ]
    );
    assert_eq!(state.id.as_deref(), Some("my-tpl"));
    assert_eq!(state.string("template_name"), Some("my-tpl"));
    assert_eq!(state.string("base_template_name"), Some("ubuntu2004"));
    assert_eq!(state.bool(REMOVE_DEFAULT_SCHEMES), Some(true));
    assert_eq!(state.int("bit_format"), Some(64));
    assert_eq!(state.string("supports_uefi"), Some("yes"));
    assert_eq!(
        state
            .block("customization")
            .and_then(|block| block.string("custom_hostname").map(str::to_owned)),
        Some(String::from("node"))
    );
}

#[rstest]
#[tokio::test]
async fn create_without_removal_skips_scheme_calls(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_empty();
    client.push_json(template_body("my-tpl"));

    let state = handler
        .create(&client, my_tpl(false))
        .await
        .expect("create succeeds");

    assert_eq!(client.call_lines().len(), 3);
    assert_eq!(state.bool(REMOVE_DEFAULT_SCHEMES), Some(false));
}

#[rstest]
#[tokio::test]
async fn failed_scheme_delete_aborts_remaining_steps(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_empty();
    client.push_json(json!(["default-1", "default-2"]));
    client.push_status(403, "This action is not allowed");
    client.push_empty();

    let err = handler
        .create(&client, my_tpl(true))
        .await
        .expect_err("scheme delete fails");

    assert!(matches!(
        err,
        ResourceError::Api { ref endpoint, .. }
            if endpoint == "/me/installationTemplate/my-tpl/partitionScheme/default-1"
    ));
    assert_eq!(client.call_lines().len(), 4);
    assert_eq!(client.pending(), 1);
}

#[rstest]
#[tokio::test]
async fn scheme_already_gone_does_not_abort_creation(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_empty();
    client.push_json(json!(["default-1", "default-2"]));
    client.push_not_found();
    client.push_empty();
    client.push_json(template_body("my-tpl"));

    let state = handler
        .create(&client, my_tpl(true))
        .await
        .expect("a scheme deleted out of band counts as removed");

    assert_eq!(
        client.call_lines(),
        vec![
            "POST /me/installationTemplate",
            "PUT /me/installationTemplate/my-tpl",
            "GET /me/installationTemplate/my-tpl/partitionScheme",
            "DELETE /me/installationTemplate/my-tpl/partitionScheme/default-1",
            "DELETE /me/installationTemplate/my-tpl/partitionScheme/default-2",
            "GET /me/installationTemplate/my-tpl",
        ]
    );
    assert_eq!(state.id.as_deref(), Some("my-tpl"));
    assert_eq!(client.pending(), 0);
}

#[rstest]
#[tokio::test]
async fn failed_customization_is_not_rolled_back(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_status(400, "Invalid customization");

    let err = handler
        .create(&client, my_tpl(true))
        .await
        .expect_err("customization fails");

    assert!(matches!(err, ResourceError::Api { method: crate::api::Method::Put, .. }));
    assert_eq!(
        client.call_lines(),
        vec!["POST /me/installationTemplate", "PUT /me/installationTemplate/my-tpl"]
    );
}

#[rstest]
#[tokio::test]
async fn unsupported_language_fails_before_any_call(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    let mut record = my_tpl(false);
    record.set("default_language", "xx");

    let err = handler
        .create(&client, record)
        .await
        .expect_err("unknown language");

    assert!(matches!(
        err,
        ResourceError::Validation(ValidationError::Language { .. })
    ));
    assert!(client.invocations().is_empty());
}

#[rstest]
#[tokio::test]
async fn read_missing_template_is_not_found(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_not_found();

    let err = handler
        .read(&client, ResourceState::default().with_id("gone"))
        .await
        .expect_err("template deleted out of band");

    assert!(err.is_not_found());
}

#[rstest]
#[tokio::test]
async fn read_accepts_null_lists(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_json(json!({
        "templateName": "t",
        "defaultLanguage": "en",
        "availableLanguages": null,
        "filesystems": null
    }));

    let state = handler
        .read(&client, ResourceState::default().with_id("t"))
        .await
        .expect("null lists decode as empty");

    assert_eq!(state.value("available_languages"), Some(&json!([])));
    assert_eq!(state.value("filesystems"), Some(&json!([])));
    assert_eq!(state.string("default_language"), Some("en"));
}

#[rstest]
#[tokio::test]
async fn update_renames_and_reads_back_under_new_name(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_json(template_body("renamed"));
    let mut record = my_tpl(false);
    record.set("template_name", "renamed");

    let state = handler
        .update(&client, record.with_id("my-tpl"))
        .await
        .expect("update succeeds");

    assert_eq!(
        client.call_lines(),
        vec![
            "PUT /me/installationTemplate/my-tpl",
            "GET /me/installationTemplate/renamed"
        ]
    );
    assert_eq!(state.id.as_deref(), Some("renamed"));
    assert_eq!(state.string("template_name"), Some("renamed"));
}

#[rstest]
#[tokio::test]
async fn delete_twice_never_fails(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();
    client.push_not_found();
    let current = ResourceState::default().with_id("my-tpl");

    handler
        .delete(&client, current.clone())
        .await
        .expect("first delete");
    handler
        .delete(&client, current)
        .await
        .expect("second delete");

    assert_eq!(client.call_lines().len(), 2);
}

#[rstest]
#[tokio::test]
async fn names_are_escaped_in_paths(handler: InstallationTemplateResource) {
    let client = ScriptedApiClient::new();
    client.push_empty();

    handler
        .delete(&client, ResourceState::default().with_id("my tpl/1"))
        .await
        .expect("delete succeeds");

    assert_eq!(
        client.call_lines(),
        vec!["DELETE /me/installationTemplate/my%20tpl%2F1"]
    );
}

#[rstest]
#[case("ubuntu2004/my-tpl", Some("ubuntu2004"), "my-tpl")]
#[case("my-tpl", None, "my-tpl")]
fn import_accepts_qualified_and_bare_names(
    handler: InstallationTemplateResource,
    #[case] id: &str,
    #[case] base: Option<&str>,
    #[case] name: &str,
) {
    let state = handler.import(id).expect("valid id");
    assert_eq!(state.id.as_deref(), Some(name));
    assert_eq!(state.string("template_name"), Some(name));
    assert_eq!(state.string("base_template_name"), base);
}

#[rstest]
#[case("")]
#[case("ubuntu2004/")]
fn import_rejects_malformed_ids(handler: InstallationTemplateResource, #[case] id: &str) {
    assert!(matches!(handler.import(id), Err(ResourceError::Import { .. })));
}

#[tokio::test]
async fn partition_tree_is_expanded_depth_first() {
    let client = ScriptedApiClient::new();
    client.push_json(json!(["default"]));
    client.push_json(json!({"name": "default", "priority": 1}));
    client.push_json(json!(["/", "swap"]));
    client.push_json(json!({
        "mountpoint": "/",
        "filesystem": "ext4",
        "order": 1,
        "raid": null,
        "size": {"unit": "GB", "value": 0},
        "type": "primary",
        "volumeName": null
    }));
    client.push_json(json!({
        "mountpoint": "swap",
        "filesystem": "swap",
        "order": 2,
        "size": {"unit": "MB", "value": 512},
        "type": "primary"
    }));
    client.push_json(json!(["managerRaid"]));
    client.push_json(json!({
        "name": "managerRaid",
        "disks": ["[c0:d0,c0:d1]"],
        "mode": "raid1",
        "step": 1
    }));

    let tree = expand_partition_tree(&client, "my-tpl")
        .await
        .expect("expansion succeeds");

    assert_eq!(
        client.call_lines(),
        vec![
            "GET /me/installationTemplate/my-tpl/partitionScheme",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default/partition",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default/partition/%2F",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default/partition/swap",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default/hardwareRaid",
            "GET /me/installationTemplate/my-tpl/partitionScheme/default/hardwareRaid/managerRaid",
        ]
    );
    assert_eq!(tree.schemes.len(), 1);
    let scheme = tree.schemes.first().expect("one scheme");
    assert_eq!(scheme.scheme.priority, 1);
    assert_eq!(
        scheme.partitions.get(1).map(|swap| swap.size.value),
        Some(512)
    );
    assert_eq!(
        scheme
            .hardware_raids
            .iter()
            .map(|raid| raid.mode.as_str())
            .collect::<Vec<_>>(),
        vec!["raid1"]
    );
}

#[tokio::test]
async fn partition_tree_accepts_raid_without_disks() {
    let client = ScriptedApiClient::new();
    client.push_json(json!(["default"]));
    client.push_json(json!({"name": "default", "priority": 1}));
    client.push_json(json!([]));
    client.push_json(json!(["managerRaid"]));
    client.push_json(json!({"name": "managerRaid", "disks": null, "mode": "raid0", "step": 1}));

    let tree = expand_partition_tree(&client, "my-tpl")
        .await
        .expect("null disks decode as empty");

    let raids = tree
        .schemes
        .into_iter()
        .flat_map(|scheme| scheme.hardware_raids)
        .collect::<Vec<_>>();
    assert_eq!(
        raids,
        vec![HardwareRaid {
            name: String::from("managerRaid"),
            disks: Vec::new(),
            mode: String::from("raid0"),
            step: 1,
        }]
    );
}

#[tokio::test]
async fn partition_tree_failure_returns_no_partial_tree() {
    let client = ScriptedApiClient::new();
    client.push_json(json!(["first", "second"]));
    client.push_json(json!({"name": "first", "priority": 2}));
    client.push_json(json!([]));
    client.push_json(json!([]));
    client.push_not_found();

    let err = expand_partition_tree(&client, "my-tpl")
        .await
        .expect_err("second scheme vanished");

    assert!(matches!(
        err,
        ResourceError::NotFound { ref endpoint } if endpoint.ends_with("partitionScheme/second")
    ));
}
