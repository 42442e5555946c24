//! Wire types for `/me/installationTemplate` and its partition schemes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::ResourceState;

/// Body of `POST /me/installationTemplate`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTemplateRequest<'a> {
    pub(crate) base_template_name: &'a str,
    pub(crate) default_language: &'a str,
    pub(crate) name: &'a str,
}

/// Body of `PUT /me/installationTemplate/{name}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateTemplateRequest<'a> {
    pub(crate) template_name: &'a str,
    pub(crate) default_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) customization: Option<Customization>,
}

/// Operator-supplied customization of a template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customization {
    /// Template change log details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_log: Option<String>,
    /// Hostname set on installed servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_hostname: Option<String>,
    /// Script fetched and run after installation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_installation_script_link: Option<String>,
    /// Text the post-installation script must print on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_installation_script_return: Option<String>,
    /// Template rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    /// SSH key installed on servers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_name: Option<String>,
    /// Installs the distribution kernel instead of the provider one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_distribution_kernel: Option<bool>,
}

impl Customization {
    /// Reads a `customization` block item.
    #[must_use]
    pub fn from_block(block: &ResourceState) -> Self {
        Self {
            change_log: block.string("change_log").map(str::to_owned),
            custom_hostname: block.string("custom_hostname").map(str::to_owned),
            post_installation_script_link: block
                .string("post_installation_script_link")
                .map(str::to_owned),
            post_installation_script_return: block
                .string("post_installation_script_return")
                .map(str::to_owned),
            rating: block.int("rating"),
            ssh_key_name: block.string("ssh_key_name").map(str::to_owned),
            use_distribution_kernel: block.bool("use_distribution_kernel"),
        }
    }

    /// Renders the customization as a block item, omitting unset fields.
    #[must_use]
    pub fn to_block(&self) -> Map<String, Value> {
        let mut block = ResourceState::default();
        block.set_some("change_log", self.change_log.clone());
        block.set_some("custom_hostname", self.custom_hostname.clone());
        block.set_some(
            "post_installation_script_link",
            self.post_installation_script_link.clone(),
        );
        block.set_some(
            "post_installation_script_return",
            self.post_installation_script_return.clone(),
        );
        block.set_some("rating", self.rating);
        block.set_some("ssh_key_name", self.ssh_key_name.clone());
        block.set_some("use_distribution_kernel", self.use_distribution_kernel);
        block.attributes
    }

    fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Template as returned by `GET /me/installationTemplate/{name}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstallationTemplate {
    /// Template name.
    pub template_name: String,
    /// Language used when none is chosen at installation.
    pub default_language: Option<String>,
    /// Languages the template can be installed in.
    #[serde(deserialize_with = "crate::remote::null_as_empty")]
    pub available_languages: Vec<String>,
    /// Whether the template is in beta.
    pub beta: Option<bool>,
    /// Architecture width, 32 or 64.
    pub bit_format: Option<i64>,
    /// Category such as `basic` or `virtualisation`.
    pub category: Option<String>,
    /// Operator customization, when any.
    pub customization: Option<Customization>,
    /// Whether the template is deprecated.
    pub deprecated: Option<bool>,
    /// Free text description.
    pub description: Option<String>,
    /// Distribution name.
    pub distribution: Option<String>,
    /// OS family.
    pub family: Option<String>,
    /// Supported filesystems.
    #[serde(deserialize_with = "crate::remote::null_as_empty")]
    pub filesystems: Vec<String>,
    /// Whether hardware RAID can be configured.
    pub hard_raid_configuration: Option<bool>,
    /// Date of the last modification.
    pub last_modification: Option<String>,
    /// Whether the distribution kernel can be installed.
    pub supports_distribution_kernel: Option<bool>,
    /// Whether GPT labels are supported.
    pub supports_gpt_label: Option<bool>,
    /// Whether real time monitoring is supported.
    #[serde(rename = "supportsRTM")]
    pub supports_rtm: Option<bool>,
    /// Whether SQL Server can be installed.
    pub supports_sql_server: Option<bool>,
    /// UEFI support: `no`, `only` or `yes`.
    #[serde(rename = "supportsUEFI")]
    pub supports_uefi: Option<String>,
}

impl InstallationTemplate {
    /// Writes the template's fields into state, keeping the base template
    /// name and removal flag which the API does not report.
    pub fn flatten_into(self, state: &mut ResourceState) {
        state.set("template_name", self.template_name);
        state.set("default_language", self.default_language);
        state.set_block(
            "customization",
            self.customization
                .filter(|custom| !custom.is_empty())
                .map(|custom| custom.to_block()),
        );
        state.set("available_languages", self.available_languages);
        state.set("beta", self.beta);
        state.set("bit_format", self.bit_format);
        state.set("category", self.category);
        state.set("deprecated", self.deprecated);
        state.set("description", self.description);
        state.set("distribution", self.distribution);
        state.set("family", self.family);
        state.set("filesystems", self.filesystems);
        state.set("hard_raid_configuration", self.hard_raid_configuration);
        state.set("last_modification", self.last_modification);
        state.set(
            "supports_distribution_kernel",
            self.supports_distribution_kernel,
        );
        state.set("supports_gpt_label", self.supports_gpt_label);
        state.set("supports_rtm", self.supports_rtm);
        state.set("supports_sql_server", self.supports_sql_server);
        state.set("supports_uefi", self.supports_uefi);
    }
}

/// Partition scheme of a template.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PartitionScheme {
    /// Scheme name.
    pub name: String,
    /// Higher priority schemes are tried first.
    pub priority: i64,
}

/// Size of a partition.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PartitionSize {
    /// Unit such as `GB` or `MB`.
    pub unit: String,
    /// Amount in `unit`; 0 fills the remaining space.
    pub value: i64,
}

/// Partition of a scheme, keyed by mount point.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Partition {
    /// Mount point, or `swap`.
    pub mountpoint: String,
    /// Filesystem.
    pub filesystem: String,
    /// Creation order within the scheme.
    pub order: i64,
    /// Software RAID level, when any.
    pub raid: Option<String>,
    /// Partition size.
    pub size: PartitionSize,
    /// `primary`, `logical` or `lv`.
    #[serde(rename = "type")]
    pub kind: String,
    /// LVM volume name, when any.
    pub volume_name: Option<String>,
}

/// Hardware RAID configuration of a scheme.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct HardwareRaid {
    /// Configuration name.
    pub name: String,
    /// Disk selectors.
    #[serde(deserialize_with = "crate::remote::null_as_empty")]
    pub disks: Vec<String>,
    /// RAID mode such as `raid1`.
    pub mode: String,
    /// Step number.
    pub step: i64,
}
