use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_PLACEHOLDER, ENV_STRINGIFY_CANDIDATES};
use crate::sql::PlaceholderStyle;

#[derive(Parser)]
#[command(name = "jsonb-filter")]
#[command(
    version,
    about = "Compile nested JSON filter rules into parameterized SQL",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Placeholder style (qmark, dollar or format)
    #[arg(long, short = 'p', global = true, env = ENV_PLACEHOLDER, value_parser = parse_placeholder)]
    pub placeholder: Option<PlaceholderStyle>,

    /// Send containment candidates as strings instead of their JSON types
    #[arg(long, global = true, env = ENV_STRINGIFY_CANDIDATES)]
    pub stringify_candidates: Option<bool>,
}

/// Parse placeholder style from CLI/env string
fn parse_placeholder(s: &str) -> Result<PlaceholderStyle, String> {
    match s.to_lowercase().as_str() {
        "qmark" | "?" => Ok(PlaceholderStyle::Qmark),
        "dollar" | "numbered" | "$" => Ok(PlaceholderStyle::Dollar),
        "format" | "%s" => Ok(PlaceholderStyle::Format),
        _ => Err(format!(
            "Invalid placeholder style '{}'. Valid options: qmark, dollar, format",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a filter and print the SQL and parameters as JSON
    Compile {
        /// JSON column expression the filter applies to
        #[arg(long, short = 'f')]
        field: String,

        /// Filter JSON file ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },
    /// Print the rules found in a filter with their paths
    Rules {
        /// Filter JSON file ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub placeholder: Option<PlaceholderStyle>,
    pub stringify_candidates: Option<bool>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        placeholder: cli.placeholder,
        stringify_candidates: cli.stringify_candidates,
    };
    (config, cli.command)
}
