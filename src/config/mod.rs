// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the plant simulator
//!
//! This module provides functionality for loading and saving configuration
//! settings. The configuration is backed by a YAML file; every section uses
//! default values when not explicitly specified, allowing for minimal
//! configuration files.
//!
//! ## Configuration Structure
//!
//! - `server`: network binding and register table layout for the Modbus
//!   TCP server
//! - `simulation`: period, nominal value and target cells of the process
//!   simulation
//! - `client`: defaults for the interactive operator client
//!
//! ## Usage
//!
//! ```no_run
//! use modbus_plant_sim::config::Config;
//! use std::path::Path;
//!
//! // Load config from file, creates a default one if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("0.0.0.0".to_string()), // Bind address
//!     Some(502),                   // Port
//!     Some(false),                 // Simulation enabled
//! );
//!
//! println!("Server port: {}", config.server.port);
//! ```

pub mod client;
pub mod server;
pub mod simulation;

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

// Re-export all types for public API
pub use client::ClientConfig;
pub use server::ServerConfig;
pub use simulation::SimulationConfig;

/// Root configuration structure for the plant simulator.
///
/// This structure serves as the main container for all configuration
/// sections. It is deserialized from and serialized to YAML using the serde
/// framework; each section falls back to its default values when absent from
/// the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Settings for the Modbus TCP server component.
    ///
    /// These settings control the network binding and the address layout of
    /// the four register tables. The layout is fixed at construction and is
    /// not mutable at runtime.
    #[serde(default)]
    pub server: ServerConfig,

    /// Settings for the process simulation.
    ///
    /// This section controls the simulated live process: the nominal
    /// register value, the cells it drives and the update period.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Defaults for the interactive operator client.
    #[serde(default)]
    pub client: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// When the file does not exist, a default configuration is written to
    /// the given path and returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        let config: Config = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        Ok(config)
    }

    /// Save the configuration to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only values explicitly provided on the command line override the
    /// configuration file.
    pub fn apply_args(
        &mut self,
        address: Option<String>,
        port: Option<u16>,
        simulation_enabled: Option<bool>,
    ) {
        if let Some(address) = address {
            debug!("Overriding bind address from command line: {}", address);
            self.server.address = address;
        }

        if let Some(port) = port {
            debug!("Overriding port from command line: {}", port);
            self.server.port = port;
        }

        if let Some(enabled) = simulation_enabled {
            debug!(
                "Overriding simulation enabled from command line: {}",
                enabled
            );
            self.simulation.enabled = enabled;
        }
    }
}
