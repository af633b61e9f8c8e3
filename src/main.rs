// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the plant register simulator server

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::info;

use modbus_plant_sim::config::Config;
use modbus_plant_sim::daemon::Daemon;
use modbus_plant_sim::registers::RegisterBank;

/// Industrial process register simulator with Modbus/TCP access
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    address: Option<String>,

    /// Override the configured Modbus TCP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable or disable the process simulation
    #[arg(long)]
    simulation: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    let args = Args::parse();
    let mut config = Config::from_file(&args.config)?;
    config.apply_args(args.address, args.port, args.simulation);

    let bank = Arc::new(RegisterBank::new(config.server.tables));

    let mut daemon = Daemon::new();
    daemon.launch(&config, bank).await?;

    info!("Press Ctrl+C to stop the server");
    tokio::signal::ctrl_c().await?;

    daemon.shutdown();
    Ok(())
}
