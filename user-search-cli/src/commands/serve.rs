use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use user_search::{observability::init_tracing, server::Server};

use super::load_config;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// XML dataset to serve
    #[arg(long, value_name = "FILE")]
    dataset: Option<PathBuf>,

    /// Token clients must send in the AccessToken header
    #[arg(long)]
    token: Option<String>,
}

/// Run the server until SIGINT/SIGTERM
///
/// An unreadable dataset at startup is fatal and ends the process with a
/// non-zero exit status before the port is bound.
pub async fn execute(config_path: Option<&str>, args: ServeArgs) -> Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(port) = args.port {
        config.service.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.search.dataset_path = dataset;
    }
    if let Some(token) = args.token {
        config.search.access_token = token;
    }

    init_tracing(&config)?;

    Server::new(config)
        .serve()
        .await
        .context("Search server failed")?;

    Ok(())
}
