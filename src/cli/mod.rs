//! CLI module for the semantic cache
//!
//! - `serve`: HTTP API with background remote sync (default)
//! - `sync`: one download, merge and upload tick, then exit

pub mod serve;
pub mod sync;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// LLM Semantic Cache - answers similar questions without calling the model again
#[derive(Parser)]
#[command(name = "llm-semantic-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API and background sync
    Serve,

    /// Run a single remote sync tick and exit
    Sync,
}

/// Load `.env`, then layered configuration, falling back to defaults
pub(crate) fn load_config() -> AppConfig {
    dotenvy::dotenv().ok();

    AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    })
}

pub(crate) fn init_logging(config: &AppConfig) {
    logging::init_logging(&logging::LoggingConfig {
        level: config.logging.level.clone(),
        format: config.logging.format.clone(),
    });
}
