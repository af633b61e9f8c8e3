// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus TCP serving loop
//!
//! For avoiding confusion with the Modbus master/slave terminology, this
//! module uses the terms "server" and "client" instead. The server is the
//! device that provides data, while the client is the device that requests
//! data.
//!
//! ## Served Function Codes
//!
//! | Code | Operation | Table |
//! |------|------------------------|-------------------|
//! | 0x01 | Read Coils | coils |
//! | 0x02 | Read Discrete Inputs | discrete inputs |
//! | 0x03 | Read Holding Registers | holding registers |
//! | 0x04 | Read Input Registers | input registers |
//! | 0x05 | Write Single Coil | coils |
//! | 0x06 | Write Single Register | holding registers |
//!
//! Any other function code is answered with an `IllegalFunction` exception;
//! out-of-range accesses are answered with `IllegalDataAddress`. A bad
//! request never terminates the serving loop.

pub mod service;

pub use service::{serve, RegisterService};
