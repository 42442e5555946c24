//! `ovh_me_installation_template`: a composite resource built from several
//! calls against `/me/installationTemplate`.
//!
//! Creation posts the template, applies the customization, optionally drops
//! the partition schemes inherited from the base template and finally reads
//! the template back. Partition schemes themselves are never created here;
//! [`expand_partition_tree`] exposes them read-only.

mod create;
mod tree;
mod types;

use tracing::info;

use crate::api::ApiClient;
use crate::api::path::EndpointPath;
use crate::error::ResourceError;
use crate::remote;
use crate::resource::{ResourceFuture, ResourceHandler, require_id, split_import_id};
use crate::schema::{Attribute, AttributeType, ResourceSchema};
use crate::state::ResourceState;
use crate::validation::Validator;

pub use tree::{PartitionTree, SchemeNode, expand_partition_tree};
pub use types::{
    Customization, HardwareRaid, InstallationTemplate, Partition, PartitionScheme, PartitionSize,
};

const TYPE_NAME: &str = "ovh_me_installation_template";
const IMPORT_FORMAT: &str = "base_template_name/template_name";
const TEMPLATES: &str = "/me/installationTemplate";

/// Attribute recording whether inherited partition schemes were removed.
pub const REMOVE_DEFAULT_SCHEMES: &str = "remove_default_partition_schemes";

/// `/me/installationTemplate/{template}`.
fn template_path(template: &str) -> EndpointPath {
    EndpointPath::root(TEMPLATES).segment(template)
}

/// `/me/installationTemplate/{template}/partitionScheme/{scheme}`.
fn scheme_path(template: &str, scheme: &str) -> EndpointPath {
    template_path(template)
        .literal("partitionScheme")
        .segment(scheme)
}

/// Lists the partition scheme names of a template.
async fn scheme_names(
    client: &dyn ApiClient,
    template: &str,
) -> Result<Vec<String>, ResourceError> {
    let endpoint = template_path(template).literal("partitionScheme");
    remote::get(client, &endpoint).await
}

/// Desired template settings extracted from a validated record.
#[derive(Clone, Debug, Eq, PartialEq)]
struct TemplateSpec {
    base_template_name: String,
    default_language: String,
    template_name: String,
    remove_default_schemes: bool,
    customization: Option<Customization>,
}

impl TemplateSpec {
    fn from_state(state: &ResourceState) -> Result<Self, ResourceError> {
        Ok(Self {
            base_template_name: state.require_string("base_template_name")?.to_owned(),
            default_language: state.require_string("default_language")?.to_owned(),
            template_name: state.require_string("template_name")?.to_owned(),
            remove_default_schemes: state.bool(REMOVE_DEFAULT_SCHEMES).unwrap_or(false),
            customization: state
                .block("customization")
                .map(|block| Customization::from_block(&block)),
        })
    }
}

fn customization_schema() -> Vec<Attribute> {
    vec![
        Attribute::optional("change_log", AttributeType::String)
            .describe("Template change log details"),
        Attribute::optional("custom_hostname", AttributeType::String)
            .describe("Set up the server using the provided hostname instead of the default one"),
        Attribute::optional("post_installation_script_link", AttributeType::String)
            .describe("Indicate the URL where your postinstall customisation script is located"),
        Attribute::optional("post_installation_script_return", AttributeType::String)
            .describe("Expected return of the post installation script"),
        Attribute::optional("rating", AttributeType::Int),
        Attribute::optional("ssh_key_name", AttributeType::String)
            .describe("Name of the ssh key that should be installed"),
        Attribute::optional("use_distribution_kernel", AttributeType::Bool)
            .describe("Use the distribution's native kernel instead of the recommended OVH kernel"),
    ]
}

fn computed_schema() -> Vec<Attribute> {
    vec![
        Attribute::computed("available_languages", AttributeType::StringList),
        Attribute::computed("beta", AttributeType::Bool),
        Attribute::computed("bit_format", AttributeType::Int),
        Attribute::computed("category", AttributeType::String),
        Attribute::computed("deprecated", AttributeType::Bool),
        Attribute::computed("description", AttributeType::String),
        Attribute::computed("distribution", AttributeType::String),
        Attribute::computed("family", AttributeType::String),
        Attribute::computed("filesystems", AttributeType::StringList),
        Attribute::computed("hard_raid_configuration", AttributeType::Bool),
        Attribute::computed("last_modification", AttributeType::String),
        Attribute::computed("supports_distribution_kernel", AttributeType::Bool),
        Attribute::computed("supports_gpt_label", AttributeType::Bool),
        Attribute::computed("supports_rtm", AttributeType::Bool),
        Attribute::computed("supports_sql_server", AttributeType::Bool),
        Attribute::computed("supports_uefi", AttributeType::String),
    ]
}

/// Schema of `ovh_me_installation_template`.
#[must_use]
pub fn schema() -> ResourceSchema {
    let mut attributes = vec![
        Attribute::required("base_template_name", AttributeType::String)
            .force_new()
            .describe(
                "OVH template name yours will be based on, choose one among the list given by \
                 compatibleTemplates function",
            ),
        Attribute::required("default_language", AttributeType::String)
            .force_new()
            .validated(Validator::LanguageCode),
        Attribute::required("template_name", AttributeType::String)
            .describe("This template name"),
        Attribute::optional_computed(REMOVE_DEFAULT_SCHEMES, AttributeType::Bool)
            .describe("Remove default partition schemes at creation"),
        Attribute::optional(
            "customization",
            AttributeType::single_block(customization_schema()),
        ),
    ];
    attributes.extend(computed_schema());
    ResourceSchema::new(TYPE_NAME, IMPORT_FORMAT, attributes)
}

/// Handler for `ovh_me_installation_template`.
#[derive(Clone, Debug)]
pub struct InstallationTemplateResource {
    schema: ResourceSchema,
}

impl Default for InstallationTemplateResource {
    fn default() -> Self {
        Self::new()
    }
}

impl InstallationTemplateResource {
    /// Creates the handler.
    #[must_use]
    pub fn new() -> Self {
        Self { schema: schema() }
    }
}

impl ResourceHandler for InstallationTemplateResource {
    fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    fn create<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            self.schema.validate(&desired.attributes)?;
            let spec = TemplateSpec::from_state(&desired)?;
            create::post_template(client, &spec).await?;
            create::customize(client, &spec.template_name, &spec).await?;
            if spec.remove_default_schemes {
                create::remove_default_schemes(client, &spec.template_name).await?;
            }

            let mut state = desired.with_id(spec.template_name.as_str());
            state.set(REMOVE_DEFAULT_SCHEMES, spec.remove_default_schemes);
            self.read(client, state).await
        })
    }

    fn read<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            let endpoint = template_path(require_id(&current)?);
            let template: InstallationTemplate = remote::get(client, &endpoint).await?;
            let mut state = current;
            template.flatten_into(&mut state);
            Ok(state)
        })
    }

    fn update<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        desired: ResourceState,
    ) -> ResourceFuture<'a, ResourceState> {
        Box::pin(async move {
            self.schema.validate(&desired.attributes)?;
            let spec = TemplateSpec::from_state(&desired)?;
            let current = require_id(&desired)?.to_owned();
            create::customize(client, &current, &spec).await?;
            if current != spec.template_name {
                info!(from = %current, to = %spec.template_name, "renamed installation template");
            }
            let state = desired.with_id(spec.template_name.as_str());
            self.read(client, state).await
        })
    }

    fn delete<'a>(
        &'a self,
        client: &'a dyn ApiClient,
        current: ResourceState,
    ) -> ResourceFuture<'a, ()> {
        Box::pin(async move {
            let name = require_id(&current)?;
            remote::delete_idempotent(client, &template_path(name)).await?;
            info!(template = name, "deleted installation template");
            Ok(())
        })
    }

    fn import(&self, id: &str) -> Result<ResourceState, ResourceError> {
        let mut state = ResourceState::default();
        let name = if id.contains('/') {
            let [base, name] = split_import_id::<2>(id, IMPORT_FORMAT)?;
            state.set("base_template_name", base);
            name
        } else if id.is_empty() {
            return Err(ResourceError::Import {
                id: id.to_owned(),
                expected: IMPORT_FORMAT.to_owned(),
            });
        } else {
            id
        };
        state.set("template_name", name);
        Ok(state.with_id(name))
    }
}

#[cfg(test)]
mod tests;
