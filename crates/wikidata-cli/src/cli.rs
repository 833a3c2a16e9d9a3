use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "wikidata-mcp",
    version,
    about = "Wikidata search, entity lookup, and SPARQL as MCP tools"
)]
pub struct Cli {
    /// JSON config file. Without it, settings come from WIKIDATA_* variables
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Log verbosity (RUST_LOG takes precedence when set)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Print the tool catalog as JSON
    Tools,
    /// Run a single tool call and print its text result
    Call {
        /// Tool name, e.g. search_entities
        tool: String,
        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON")]
        args: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
