mod config;
mod error;
mod json;

use std::io::Read;

use clap::Parser;
use shapecopy::{Copier, TracingLogger};

use crate::config::CopyConfig;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "shapecopy", about = "Copy a JSON document into a declared shape")]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(long, default_value = "shapecopy.toml", env = "SHAPECOPY_CONFIG")]
    config: String,

    /// JSON input file, `-` for stdin.
    #[arg(long, default_value = "-", env = "SHAPECOPY_INPUT")]
    input: String,

    /// Pretty-print the result.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!(error = %e, "copy failed");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    tracing::info!(config = %cli.config, "loading configuration");
    let config = CopyConfig::load(&cli.config)?;

    let input = read_input(&cli.input)?;
    let document: serde_json::Value = serde_json::from_str(&input)
        .map_err(|e| CliError::Input(e.to_string()).with_context(&cli.input))?;

    let output = transform(&config, &document)?;
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    };
    rendered.map_err(|e| CliError::Input(e.to_string()))
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::Input(format!("{path}: {e}")))
}

/// Copy `document` into the zero value of the configured target.
fn transform(
    config: &CopyConfig,
    document: &serde_json::Value,
) -> Result<serde_json::Value, CliError> {
    let mut copier = Copier::with_logger(TracingLogger);
    copier.set_converters(config.converters()?);
    tracing::debug!(converters = copier.converters().len(), "converters registered");

    let source = json::infer(document);
    let mut target = config.target.descriptor().zero_value();
    copier.copy_value(&mut target, &source)?;
    Ok(json::render(&target))
}
