//! Read-only expansion of a template's partition schemes.

use serde::Serialize;
use tracing::debug;

use super::types::{HardwareRaid, Partition, PartitionScheme};
use super::{scheme_names, scheme_path};
use crate::api::ApiClient;
use crate::error::ResourceError;
use crate::remote;

/// Every partition scheme of a template with its partitions and hardware
/// RAID configurations.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PartitionTree {
    /// Template the schemes belong to.
    pub template: String,
    /// Schemes in the order the API listed them.
    pub schemes: Vec<SchemeNode>,
}

/// One scheme and its children.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SchemeNode {
    /// Scheme attributes.
    #[serde(flatten)]
    pub scheme: PartitionScheme,
    /// Partitions in the order the API listed their mount points.
    pub partitions: Vec<Partition>,
    /// Hardware RAID configurations in listing order.
    pub hardware_raids: Vec<HardwareRaid>,
}

/// Fetches the full partition tree of `template`.
///
/// Calls are issued one at a time: the scheme list, then for each scheme its
/// details, its mount point list and each partition, then its RAID list and
/// each RAID configuration.
///
/// # Errors
///
/// Returns the first [`ResourceError`] met; no partial tree is returned.
pub async fn expand_partition_tree(
    client: &dyn ApiClient,
    template: &str,
) -> Result<PartitionTree, ResourceError> {
    let mut schemes = Vec::new();
    for name in scheme_names(client, template).await? {
        schemes.push(expand_scheme(client, template, &name).await?);
    }
    debug!(template, schemes = schemes.len(), "expanded partition tree");
    Ok(PartitionTree {
        template: template.to_owned(),
        schemes,
    })
}

async fn expand_scheme(
    client: &dyn ApiClient,
    template: &str,
    name: &str,
) -> Result<SchemeNode, ResourceError> {
    let base = scheme_path(template, name);
    let scheme: PartitionScheme = remote::get(client, &base).await?;

    let partition_root = base.clone().literal("partition");
    let mount_points: Vec<String> = remote::get(client, &partition_root).await?;
    let mut partitions = Vec::with_capacity(mount_points.len());
    for mount_point in &mount_points {
        let partition = remote::get(client, &partition_root.clone().segment(mount_point)).await?;
        partitions.push(partition);
    }

    let raid_root = base.literal("hardwareRaid");
    let raid_names: Vec<String> = remote::get(client, &raid_root).await?;
    let mut hardware_raids = Vec::with_capacity(raid_names.len());
    for raid in &raid_names {
        let config = remote::get(client, &raid_root.clone().segment(raid)).await?;
        hardware_raids.push(config);
    }

    Ok(SchemeNode {
        scheme,
        partitions,
        hardware_raids,
    })
}
