//! Command-line application

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::cli::{self, Commands};
use crate::core::config::CompilerConfig;
use crate::core::constants::{CRATE_TARGET, ENV_LOG, ENV_LOG_FORMAT};
use crate::filters::{CompiledFilter, ExtractedRule, parse_filter};

pub struct CliApp {
    pub config: CompilerConfig,
}

impl CliApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: CompilerConfig::load(&cli_config)?,
        };

        match command {
            Commands::Compile { field, input } => {
                let json = read_input(input.as_deref())?;
                let compiled = app.compile_document(&field, &json)?;
                if compiled.is_empty() {
                    tracing::info!("Filter produced no conditions");
                }
                println!("{}", serde_json::to_string_pretty(&compiled)?);
            }
            Commands::Rules { input } => {
                let json = read_input(input.as_deref())?;
                let rules = app.rules_document(&json)?;
                println!("{}", serde_json::to_string_pretty(&rules)?);
            }
        }
        Ok(())
    }

    /// Parse a filter document and compile it against `field`
    pub fn compile_document(&self, field: &str, json: &str) -> Result<CompiledFilter> {
        let tree = parse_filter(json, &self.config.limits).context("Failed to load filter")?;
        let compiled = tree
            .compile(field, &self.config)
            .with_context(|| format!("Failed to compile filter for field {}", field))?;
        Ok(compiled)
    }

    /// Parse a filter document and return its rules
    pub fn rules_document(&self, json: &str) -> Result<Vec<ExtractedRule>> {
        let tree = parse_filter(json, &self.config.limits).context("Failed to load filter")?;
        Ok(tree.rules().to_vec())
    }

    fn init_logging() {
        let default_filter = format!("warn,{}=info", CRATE_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        let json = std::env::var(ENV_LOG_FORMAT)
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let builder = tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_writer(io::stderr)
            .with_env_filter(filter);

        if json {
            builder.json().init();
        } else {
            builder.compact().init();
        }
    }
}

/// Read filter JSON from a file, or stdin for `None` / `-`
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter file: {}", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read filter from stdin")?;
            Ok(buf)
        }
    }
}
