// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Request dispatch over a Modbus TCP connection

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use log::debug;
use thiserror::Error;
use tokio::time;
use tokio_modbus::client::Context;
use tokio_modbus::prelude::*;

use crate::registers::Word;

/// Operator-selectable data types, with the numeric codes presented in the
/// menu. Validated at the boundary; an invalid code never reaches the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    HoldingRegister = 1,
    Coil = 2,
    InputRegister = 3,
    DiscreteInput = 4,
}

impl DataType {
    /// Numeric menu code for this data type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only holding registers and coils accept writes.
    pub fn is_writable(self) -> bool {
        matches!(self, DataType::HoldingRegister | DataType::Coil)
    }
}

impl TryFrom<u8> for DataType {
    type Error = ClientError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(DataType::HoldingRegister),
            2 => Ok(DataType::Coil),
            3 => Ok(DataType::InputRegister),
            4 => Ok(DataType::DiscreteInput),
            other => Err(ClientError::InvalidSelector(other)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::HoldingRegister => "holding register",
            DataType::Coil => "coil",
            DataType::InputRegister => "input register",
            DataType::DiscreteInput => "discrete input",
        };
        f.write_str(name)
    }
}

/// Failures reported to the operator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The chosen data type code is not supported for the operation.
    /// Handled locally; no request is sent.
    #[error("invalid data type {0}")]
    InvalidSelector(u8),

    /// The server answered the request with a Modbus exception.
    #[error("server rejected the request: {0}")]
    Exception(ExceptionCode),

    /// Connection-level failure. The current operation is abandoned; the
    /// dispatcher does not reconnect or retry.
    #[error("transport failure: {0}")]
    Transport(#[from] tokio_modbus::Error),

    /// Socket-level failure while connecting or closing.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Dispatcher translating one chosen operation into exactly one outbound
/// request sequence.
///
/// Fully synchronous from the operator's perspective: one operation is
/// outstanding at a time, and a polling read blocks the control loop for
/// its whole duration.
pub struct RegisterClient {
    ctx: Context,
    scan_interval: Duration,
}

impl RegisterClient {
    /// Connect to the server and start with the given scan interval.
    pub async fn connect(addr: SocketAddr, scan_interval: Duration) -> Result<Self, ClientError> {
        debug!("connecting to Modbus server at {addr}");
        let ctx = tcp::connect(addr).await?;
        Ok(Self { ctx, scan_interval })
    }

    /// Current delay between successive polling reads.
    pub fn scan_interval(&self) -> Duration {
        self.scan_interval
    }

    /// Replace the scan interval. Takes effect with the next read
    /// operation; a read already in progress keeps the interval it started
    /// with.
    pub fn configure(&mut self, interval: Duration) {
        debug!("scan interval set to {interval:?}");
        self.scan_interval = interval;
    }

    /// Perform `polls` sequential single-value reads, sleeping the scan
    /// interval after each one. `report` is invoked per poll as values
    /// arrive; the collected values are returned in poll order.
    pub async fn read<F>(
        &mut self,
        data_type: DataType,
        address: Word,
        polls: u32,
        mut report: F,
    ) -> Result<Vec<Word>, ClientError>
    where
        F: FnMut(u32, Word),
    {
        // interval is fixed for the duration of this operation
        let interval = self.scan_interval;
        let mut values = Vec::with_capacity(polls as usize);
        for poll in 0..polls {
            let value = self.read_single(data_type, address).await?;
            report(poll + 1, value);
            values.push(value);
            time::sleep(interval).await;
        }
        Ok(values)
    }

    async fn read_single(&mut self, data_type: DataType, address: Word) -> Result<Word, ClientError> {
        let value = match data_type {
            DataType::HoldingRegister => self
                .ctx
                .read_holding_registers(address, 1)
                .await?
                .map_err(ClientError::Exception)?[0],
            DataType::InputRegister => self
                .ctx
                .read_input_registers(address, 1)
                .await?
                .map_err(ClientError::Exception)?[0],
            DataType::Coil => Word::from(
                self.ctx
                    .read_coils(address, 1)
                    .await?
                    .map_err(ClientError::Exception)?[0],
            ),
            DataType::DiscreteInput => Word::from(
                self.ctx
                    .read_discrete_inputs(address, 1)
                    .await?
                    .map_err(ClientError::Exception)?[0],
            ),
        };
        Ok(value)
    }

    /// Send exactly one write request.
    ///
    /// Only holding registers and coils are writable; any other selector
    /// fails locally and nothing is sent. A coil treats any non-zero value
    /// as ON.
    pub async fn write(
        &mut self,
        data_type: DataType,
        address: Word,
        value: Word,
    ) -> Result<(), ClientError> {
        match data_type {
            DataType::HoldingRegister => self
                .ctx
                .write_single_register(address, value)
                .await?
                .map_err(ClientError::Exception)?,
            DataType::Coil => self
                .ctx
                .write_single_coil(address, value != 0)
                .await?
                .map_err(ClientError::Exception)?,
            other => return Err(ClientError::InvalidSelector(other.code())),
        }
        Ok(())
    }

    /// Orderly transport close for the exit action.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.ctx.disconnect().await?;
        Ok(())
    }
}
