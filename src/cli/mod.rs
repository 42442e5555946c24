//! Command-line interface definitions for the `ovh-resources` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `ovh-resources` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ovh-resources",
    about = "Create, inspect and delete OVH resources from JSON documents",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// List the supported resource types.
    #[command(name = "types", about = "List the supported resource types")]
    Types,
    /// Print the attribute schema of a resource type as JSON.
    #[command(name = "schema", about = "Print the attribute schema of a resource type")]
    Schema(TypeArg),
    /// Create a resource from a configuration document.
    #[command(name = "create", about = "Create a resource from a configuration document")]
    Create(CreateCommand),
    /// Refresh a saved state from the API.
    #[command(name = "read", about = "Refresh a saved state from the API")]
    Read(StateCommand),
    /// Apply a configuration document to an existing resource.
    #[command(name = "update", about = "Apply a configuration document to an existing resource")]
    Update(UpdateCommand),
    /// Delete the resource described by a saved state.
    #[command(name = "delete", about = "Delete the resource described by a saved state")]
    Delete(StateCommand),
    /// Import an existing resource by identifier.
    #[command(name = "import", about = "Import an existing resource by identifier")]
    Import(ImportCommand),
    /// Show how a configuration would be applied, without calling the API.
    #[command(name = "plan", about = "Show how a configuration would be applied")]
    Plan(PlanCommand),
    /// Print the partition schemes of an installation template.
    #[command(
        name = "partition-tree",
        about = "Print the partition schemes of an installation template"
    )]
    PartitionTree(PartitionTreeCommand),
}

/// Resource type argument shared by several subcommands.
#[derive(Debug, Parser)]
pub(crate) struct TypeArg {
    /// Resource type, for example `ovh_iploadbalancing_tcp_farm`.
    #[arg(value_name = "TYPE")]
    pub(crate) resource_type: String,
}

/// Arguments for `ovh-resources create`.
#[derive(Debug, Parser)]
pub(crate) struct CreateCommand {
    #[command(flatten)]
    pub(crate) resource: TypeArg,
    /// JSON object of attribute values.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: String,
}

/// Arguments for subcommands acting on a saved state.
#[derive(Debug, Parser)]
pub(crate) struct StateCommand {
    #[command(flatten)]
    pub(crate) resource: TypeArg,
    /// State document written by a previous command.
    #[arg(long, value_name = "PATH")]
    pub(crate) state: String,
}

/// Arguments for `ovh-resources update`.
#[derive(Debug, Parser)]
pub(crate) struct UpdateCommand {
    #[command(flatten)]
    pub(crate) resource: TypeArg,
    /// State document written by a previous command.
    #[arg(long, value_name = "PATH")]
    pub(crate) state: String,
    /// JSON object of desired attribute values.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: String,
}

/// Arguments for `ovh-resources import`.
#[derive(Debug, Parser)]
pub(crate) struct ImportCommand {
    #[command(flatten)]
    pub(crate) resource: TypeArg,
    /// Identifier in the type's import format, such as `service_name/farm_id`.
    #[arg(value_name = "ID")]
    pub(crate) id: String,
}

/// Arguments for `ovh-resources plan`.
#[derive(Debug, Parser)]
pub(crate) struct PlanCommand {
    #[command(flatten)]
    pub(crate) resource: TypeArg,
    /// State document of the existing resource; omit when none exists.
    #[arg(long, value_name = "PATH")]
    pub(crate) state: Option<String>,
    /// JSON object of desired attribute values.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: String,
}

/// Arguments for `ovh-resources partition-tree`.
#[derive(Debug, Parser)]
pub(crate) struct PartitionTreeCommand {
    /// Installation template name.
    #[arg(value_name = "TEMPLATE")]
    pub(crate) template: String,
}
