// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Addressable register storage
//!
//! This module provides the register bank shared between the Modbus serving
//! loop and the process simulation. The bank holds the four standard Modbus
//! tables, each an independent fixed-length array with its own base address
//! and its own lock.
//!
//! ## Table Map
//!
//! The reference deployment uses the following layout, configurable at
//! construction only:
//!
//! | Table | Base | Length | Access |
//! |-------------------|------|--------|------------|
//! | Discrete inputs | 0 | 100 | read-only |
//! | Coils | 0 | 100 | read/write |
//! | Input registers | 0 | 100 | read-only |
//! | Holding registers | 1000 | 100 | read/write |
//!
//! All cells are zero-initialized and live in process memory only; nothing
//! is persisted across restarts.

pub mod table;

pub use table::{RegisterBank, TableError, TableKind, TableLayout, TableSpan, Word};
