//! CLI module for KeyVault
//!
//! Subcommands:
//! - `serve`: run the HTTP API
//! - `list`: print stored keys in masked form
//! - `classify`: show the type and masked form of a value

pub mod keys;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// KeyVault - API key management dashboard service
#[derive(Parser)]
#[command(name = "keyvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// List stored API keys with masked values
    List,

    /// Print the type and masked form of a key value
    Classify(keys::ClassifyArgs),
}

/// Load configuration from `.env`, config files and the environment
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    Ok(config)
}
