//! Armory Authz - authorization service for the Virtual Armory
//!
//! Loads configuration, prepares the rule store and serves the permissions
//! back-office.

#![allow(missing_docs)]

use anyhow::Context;
use armory_authz::config::Config;
use armory_authz::storage::StorageLayer;
use armory_authz::utils::logging::init_logging;
use armory_authz::{build_info, server};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "armory-authz", version, about = "Virtual Armory authorization service")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "ARMORY_CONFIG", default_value = "config/armory.yaml")]
    config: PathBuf,

    /// Run database migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display with causes, not Debug
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config_missing = !args.config.exists();
    let config = if config_missing {
        Config::from_env().context("invalid configuration")?
    } else {
        Config::from_file(&args.config)
            .await
            .with_context(|| format!("failed to load {}", args.config.display()))?
    };

    init_logging(&config.logging).context("failed to initialize logging")?;
    if config_missing {
        warn!(
            "Configuration file {} not found, using defaults and environment",
            args.config.display()
        );
    }

    let build = build_info();
    info!("armory-authz {} ({})", build.version, build.git_hash);

    if args.migrate_only {
        let storage = StorageLayer::new(config.storage())
            .await
            .context("failed to connect to the database")?;
        storage.migrate().await.context("migration failed")?;
        info!("Migrations applied");
        return Ok(());
    }

    server::run_server(config).await.context("server failed")?;
    Ok(())
}
