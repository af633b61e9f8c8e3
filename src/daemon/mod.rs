// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Long-running server tasks
//!
//! The daemon owns the two independent schedules of the server process: the
//! Modbus accept loop and the periodic process simulation. Both share the
//! register bank by reference and neither blocks the other.

pub mod launch_daemon;

pub use launch_daemon::Daemon;
