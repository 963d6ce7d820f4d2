use anyhow::{Context, Result};
use clap::Args;
use user_search::client::{SearchClient, SearchRequest};

use super::load_config;

#[derive(Args)]
pub struct FindArgs {
    /// Substring matched against full name and about text
    #[arg(long, short, default_value = "")]
    query: String,

    /// Page size (capped at 25)
    #[arg(long, short, default_value_t = 25, allow_negative_numbers = true)]
    limit: i64,

    /// Number of matches to skip
    #[arg(long, short, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Field to order by: ID, Name or Age
    #[arg(long = "order-field", default_value = "")]
    order_field: String,

    /// Direction: -1 descending, 0 as stored, 1 ascending
    #[arg(long = "order-by", default_value_t = 0, allow_negative_numbers = true)]
    order_by: i64,

    /// Search endpoint URL
    #[arg(long)]
    url: Option<String>,

    /// Value of the AccessToken header
    #[arg(long)]
    token: Option<String>,

    /// Call timeout in milliseconds
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,
}

/// Run one search and print the users as JSON
pub async fn execute(config_path: Option<&str>, args: FindArgs) -> Result<()> {
    let mut config = load_config(config_path)?.client;

    if let Some(url) = args.url {
        config.base_url = url;
    }
    if let Some(token) = args.token {
        config.access_token = token;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    let client = SearchClient::from_config(&config)?;
    let request = SearchRequest {
        limit: args.limit,
        offset: args.offset,
        query: args.query,
        order_field: args.order_field,
        order_by: args.order_by,
    };

    let response = client.find_users(&request).await?;

    let json =
        serde_json::to_string_pretty(&response.users).context("Failed to encode users")?;
    println!("{json}");

    Ok(())
}
