mod cli;

use clap::Parser;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;
use wikidata::{Config, WikidataClient};
use wikidata_mcp::WikidataMcp;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // stdout carries the MCP stream.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config_file {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    let client = WikidataClient::new(config)?;
    let server = WikidataMcp::new(client);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting wikidata-mcp on stdio");
            let running = serve_server(server, stdio()).await?;
            let reason = running.waiting().await?;
            tracing::info!(?reason, "wikidata-mcp stopped");
        }
        Command::Tools => {
            let tools = server.dispatcher().registry().list_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
        Command::Call { tool, args } => {
            let arguments = match args {
                Some(raw) => Some(serde_json::from_str::<Map<String, Value>>(&raw)?),
                None => None,
            };
            let result = server.dispatcher().call_tool(&tool, arguments).await;
            println!("{}", result.text);
            if result.is_error {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
