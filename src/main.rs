//! Binary entry point for the `ovh-resources` CLI.

use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use ovh_resources::api::ApiFuture;
use ovh_resources::document::{self, DocumentError};
use ovh_resources::{
    ApiClient, ApiError, ConfigError, Method, OvhConfig, OvhHttpClient, Provider, ResourceError,
};

mod cli;

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("failed to write output: {0}")]
    Output(String),
}

/// Client for commands that never reach the API.
struct OfflineClient;

impl ApiClient for OfflineClient {
    fn call<'a>(
        &'a self,
        method: Method,
        path: &'a str,
        _body: Option<&'a Value>,
    ) -> ApiFuture<'a, Value> {
        Box::pin(async move {
            Err(ApiError::Transport {
                message: format!("{method} {path} attempted without API credentials"),
            })
        })
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn offline_provider() -> Provider {
    Provider::new(Arc::new(OfflineClient))
}

fn online_provider() -> Result<Provider, CliError> {
    let config = OvhConfig::load_without_cli_args()?;
    let client = OvhHttpClient::new(&config)?;
    Ok(Provider::new(Arc::new(client)))
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Types => {
            let provider = offline_provider();
            emit(&provider.resource_types().collect::<Vec<_>>())
        }
        Cli::Schema(arg) => emit(offline_provider().schema(&arg.resource_type)?),
        Cli::Plan(command) => {
            let desired = document::load_config(&command.config)?;
            let prior = command
                .state
                .as_deref()
                .map(document::load_state)
                .transpose()?;
            let plan =
                offline_provider().plan(&command.resource.resource_type, prior.as_ref(), &desired)?;
            emit(&plan)
        }
        Cli::Create(command) => {
            let desired = document::load_config(&command.config)?;
            let state = online_provider()?
                .create(&command.resource.resource_type, desired)
                .await?;
            emit(&state)
        }
        Cli::Read(command) => {
            let current = document::load_state(&command.state)?;
            let state = online_provider()?
                .read(&command.resource.resource_type, current)
                .await?;
            emit(&state)
        }
        Cli::Update(command) => {
            let prior = document::load_state(&command.state)?;
            let desired = document::load_config(&command.config)?;
            let state = online_provider()?
                .update(&command.resource.resource_type, &prior, desired)
                .await?;
            emit(&state)
        }
        Cli::Delete(command) => {
            let current = document::load_state(&command.state)?;
            let id = current.id.clone();
            online_provider()?
                .delete(&command.resource.resource_type, current)
                .await?;
            emit(&json!({"id": id, "deleted": true}))
        }
        Cli::Import(command) => {
            let state = online_provider()?
                .import(&command.resource.resource_type, &command.id)
                .await?;
            emit(&state)
        }
        Cli::PartitionTree(command) => {
            let tree = online_provider()?.partition_tree(&command.template).await?;
            emit(&tree)
        }
    }
}

fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered =
        serde_json::to_string_pretty(value).map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(io::stdout(), "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
