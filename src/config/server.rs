// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus TCP server configuration
//!
//! This module defines the structures for configuring the Modbus TCP server
//! component of the plant simulator.

use serde::{Deserialize, Serialize};

use crate::registers::TableLayout;

/// Configuration for the Modbus TCP server component.
///
/// # Fields
///
/// * `address` - Network address for the server to bind to (default: 127.0.0.1)
/// * `port` - TCP port number for the server (default: 5020)
/// * `tables` - Base addresses and lengths of the four register tables
///
/// # Example
///
/// ```
/// use modbus_plant_sim::config::ServerConfig;
///
/// let server_config = ServerConfig {
///     port: 502,
///     address: "0.0.0.0".to_string(),
///     ..ServerConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The network address the Modbus server will bind to.
    ///
    /// Can be an IPv4/IPv6 address or a hostname. Default is "127.0.0.1".
    /// Use "0.0.0.0" to bind to all IPv4 interfaces.
    pub address: String,

    /// The TCP port the Modbus server will listen on.
    ///
    /// The reference deployment uses 5020 so the server can run without
    /// privileges; 502 is the standard Modbus TCP port.
    pub port: u16,

    /// Address layout of the four register tables.
    ///
    /// Fixed at construction; changing it requires a restart.
    #[serde(default)]
    pub tables: TableLayout,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5020,
            tables: TableLayout::default(),
        }
    }
}
