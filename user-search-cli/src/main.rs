use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::{find::FindArgs, serve::ServeArgs};

/// user-search - people search service and client
#[derive(Parser)]
#[command(name = "user-search")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (skips the default search path)
    #[arg(long, short, global = true, env = "USER_SEARCH_CONFIG", value_name = "FILE")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the search server
    Serve(ServeArgs),
    /// Query a running search server
    Find(FindArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(cli.config.as_deref(), args).await,
        Commands::Find(args) => commands::find::execute(cli.config.as_deref(), args).await,
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
