// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Operator client configuration
//!
//! Defaults used by the interactive client when no command line arguments
//! are given.

use serde::{Deserialize, Serialize};

/// Configuration for the interactive operator client.
///
/// # Fields
///
/// * `address` - Address of the Modbus server to connect to
/// * `port` - TCP port of the Modbus server
/// * `scan_interval_secs` - Initial delay between successive polling reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Address of the Modbus server to connect to.
    pub address: String,

    /// TCP port of the Modbus server.
    pub port: u16,

    /// Initial delay between successive polling reads, in seconds.
    ///
    /// The operator can change it at runtime with the configure action.
    pub scan_interval_secs: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5020,
            scan_interval_secs: 1.0,
        }
    }
}
