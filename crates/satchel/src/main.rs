// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Satchel - inspect and maintain an encrypted local key-value cache.
//!
//! This is the binary entry point for the `satchel` CLI.

mod commands;
mod doctor;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use satchel_config::SatchelConfig;
use satchel_core::SatchelError;

use crate::commands::{App, CacheCommand, KvCommand, SecureCommand, StoreCommand};

/// Satchel - inspect and maintain an encrypted local key-value cache.
#[derive(Parser, Debug)]
#[command(name = "satchel", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Plain key-value store.
    Kv {
        #[command(subcommand)]
        action: KvCommand,
    },
    /// Encrypted key-value store.
    Secure {
        #[command(subcommand)]
        action: SecureCommand,
    },
    /// SDK cache with per-entry encryption.
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
    /// Check configuration, database and keychain health.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => satchel_config::load_and_validate_path(path),
        None => satchel_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            satchel_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Commands::Doctor { plain } => {
            doctor::run_doctor(&config, cli.config.as_deref(), plain).await
        }
        Commands::Kv { action } => run_store(config, StoreCommand::Kv(action)).await,
        Commands::Secure { action } => run_store(config, StoreCommand::Secure(action)).await,
        Commands::Cache { action } => run_store(config, StoreCommand::Cache(action)).await,
    };

    if let Err(e) = result {
        eprintln!("satchel: {e}");
        std::process::exit(1);
    }
}

/// Open the stores, run one command, and close the database even on failure.
async fn run_store(config: SatchelConfig, command: StoreCommand) -> Result<(), SatchelError> {
    let app = App::open(config).await?;
    let result = {
        let mut out = std::io::stdout().lock();
        app.run(command, &mut out).await
    };
    match app.close().await {
        Ok(()) => result,
        Err(e) => result.and(Err(e)),
    }
}

/// Install the tracing subscriber on stderr so command output stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("satchel={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_cache_set_with_encryption() {
        let cli = Cli::try_parse_from([
            "satchel", "--config", "/tmp/s.toml", "cache", "set", "token", "abc", "--encrypted",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/s.toml")));
        match cli.command {
            Commands::Cache {
                action:
                    CacheCommand::Set {
                        key,
                        value,
                        encrypted,
                    },
            } => {
                assert_eq!((key.as_str(), value.as_str(), encrypted), ("token", "abc", true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = satchel_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.vault.secure_category, "GENERAL");
    }
}
