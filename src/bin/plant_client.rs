use std::io;
use std::net::ToSocketAddrs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use clap::Parser;

use modbus_plant_sim::client::{RegisterClient, Session};
use modbus_plant_sim::config::{ClientConfig, Config};

/// Interactive Modbus client for the plant register simulator
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Path to the YAML configuration file; its `client` section provides
    /// the defaults below
    #[clap(long)]
    config: Option<PathBuf>,

    /// Modbus server address
    #[clap(long)]
    address: Option<String>,

    /// Modbus server port
    #[clap(long)]
    port: Option<u16>,

    /// Initial scan interval between polling reads, in seconds
    #[clap(long)]
    scan_interval: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"),
    );

    // Parse command line arguments, falling back to the configuration file
    let args = Args::parse();
    let defaults = match &args.config {
        Some(path) => Config::from_file(path)?.client,
        None => ClientConfig::default(),
    };
    let address = args.address.unwrap_or(defaults.address);
    let port = args.port.unwrap_or(defaults.port);
    let scan_interval = args.scan_interval.unwrap_or(defaults.scan_interval_secs);
    if !scan_interval.is_finite() || scan_interval < 0.0 {
        bail!("scan interval must be non-negative");
    }

    let socket_addr = (address.as_str(), port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow!("cannot resolve {}:{}", address, port))?;
    println!("Connecting to Modbus server at {socket_addr}");

    let client =
        RegisterClient::connect(socket_addr, Duration::from_secs_f64(scan_interval)).await?;

    let mut session = Session::new(client, io::stdin().lock(), io::stdout());
    session.run().await
}
