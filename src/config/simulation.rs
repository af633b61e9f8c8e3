// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Process simulation configuration
//!
//! This module defines the structures for configuring the simulated live
//! process that continuously mutates a designated holding register and coil.

use serde::{Deserialize, Serialize};

use crate::registers::Word;

/// Configuration for the process simulation task.
///
/// Each tick draws a holding-register value uniformly from
/// `[0.95 × nominal, 1.05 × nominal]` and a coil state uniformly from
/// `{0, 1}`, and writes both to the configured cells.
///
/// # Fields
///
/// * `enabled` - Flag to enable or disable the simulation task
/// * `nominal` - Nominal process value the analog draw is centered on
/// * `register_address` - Holding register receiving the analog value
/// * `coil_address` - Coil receiving the binary state
/// * `warmup_secs` - Delay before the first tick
/// * `period_secs` - Delay between ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Flag to enable or disable the simulation task.
    ///
    /// When disabled the server still runs, but the register tables only
    /// change through client writes.
    pub enabled: bool,

    /// Nominal process value; draws stay within ±5% of it.
    pub nominal: Word,

    /// Holding register address the analog value is written to.
    pub register_address: Word,

    /// Coil address the binary state is written to.
    pub coil_address: Word,

    /// Seconds to wait before the first tick.
    pub warmup_secs: u64,

    /// Seconds between ticks.
    pub period_secs: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            nominal: 400,
            register_address: 1000,
            coil_address: 1000,
            warmup_secs: 2,
            period_secs: 1,
        }
    }
}
