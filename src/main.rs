//! arplace - tap-to-place AR demo
//!
//! Headless executable that drives the placement core against a simulated
//! tracking session and prints a JSON summary.

mod config;
mod headless;
mod script;

use anyhow::Result;
use clap::Parser;
use config::{DemoConfig, DEFAULT_CONFIG_PATH};
use script::Script;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless tap-to-place AR demo", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Fail instead of falling back to defaults when the config is invalid
    #[arg(long)]
    strict_config: bool,

    /// JSON scenario script; runs the built-in scenario when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Seed for object colors (overrides script and config)
    #[arg(long)]
    seed: Option<u64>,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting arplace v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = if args.strict_config {
        DemoConfig::load_strict(&args.config)?
    } else {
        DemoConfig::load_from_path(&args.config)
    };

    if let Some(path) = args.write_config {
        config.save_to_path(&path)?;
        info!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let script = match &args.script {
        Some(path) => Script::from_path(path)?,
        None => Script::builtin(),
    };

    let summary = headless::run(&config, &script, args.seed)?;
    let output = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{output}");
    Ok(())
}
