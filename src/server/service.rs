// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Modbus service backed by the shared register bank

use std::{future, net::SocketAddr, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use tokio::net::TcpListener;

use tokio_modbus::{
    prelude::*,
    server::tcp::{accept_tcp_connection, Server},
};

use crate::registers::{RegisterBank, TableError, TableKind, Word};

/// Modbus service answering the requests of one client connection.
///
/// One instance is created per accepted connection; all instances share the
/// same register bank, so the simulation and every connected client observe
/// a single consistent table.
#[derive(Debug, Clone)]
pub struct RegisterService {
    bank: Arc<RegisterBank>,
}

impl RegisterService {
    pub fn new(bank: Arc<RegisterBank>) -> Self {
        Self { bank }
    }

    fn read(&self, kind: TableKind, addr: Word, cnt: u16) -> Result<Vec<Word>, ExceptionCode> {
        self.bank.read(kind, addr, cnt).map_err(reject)
    }

    fn write(&self, kind: TableKind, addr: Word, values: &[Word]) -> Result<(), ExceptionCode> {
        self.bank.write(kind, addr, values).map_err(reject)
    }
}

/// Log a table failure and convert it into the Modbus exception sent back
/// to the remote caller.
fn reject(err: TableError) -> ExceptionCode {
    error!("SERVER: rejecting request: {err}");
    match err {
        TableError::OutOfRange { .. } => ExceptionCode::IllegalDataAddress,
        TableError::ReadOnly(_) => ExceptionCode::IllegalFunction,
    }
}

fn to_bits(words: Vec<Word>) -> Vec<bool> {
    words.into_iter().map(|w| w != 0).collect()
}

impl tokio_modbus::server::Service for RegisterService {
    type Request = Request<'static>;
    type Response = Response;
    type Exception = ExceptionCode;
    type Future = future::Ready<Result<Self::Response, Self::Exception>>;

    fn call(&self, req: Self::Request) -> Self::Future {
        debug!("SERVER: received request: {req:?}");
        let res = match req {
            Request::ReadCoils(addr, cnt) => self
                .read(TableKind::Coil, addr, cnt)
                .map(to_bits)
                .map(Response::ReadCoils),
            Request::ReadDiscreteInputs(addr, cnt) => self
                .read(TableKind::DiscreteInput, addr, cnt)
                .map(to_bits)
                .map(Response::ReadDiscreteInputs),
            Request::ReadHoldingRegisters(addr, cnt) => self
                .read(TableKind::HoldingRegister, addr, cnt)
                .map(Response::ReadHoldingRegisters),
            Request::ReadInputRegisters(addr, cnt) => self
                .read(TableKind::InputRegister, addr, cnt)
                .map(Response::ReadInputRegisters),
            Request::WriteSingleCoil(addr, state) => self
                .write(TableKind::Coil, addr, &[Word::from(state)])
                .map(|_| Response::WriteSingleCoil(addr, state)),
            Request::WriteSingleRegister(addr, value) => self
                .write(
                    TableKind::HoldingRegister,
                    addr,
                    std::slice::from_ref(&value),
                )
                .map(|_| Response::WriteSingleRegister(addr, value)),
            _ => {
                error!("SERVER: Exception::IllegalFunction - Unimplemented function code in request: {req:?}");
                Err(ExceptionCode::IllegalFunction)
            }
        };
        future::ready(res)
    }
}

/// Bind the register bank to an already-bound TCP listener and answer
/// requests until the surrounding task is cancelled.
pub async fn serve(listener: TcpListener, bank: Arc<RegisterBank>) -> Result<()> {
    let server = Server::new(listener);

    let new_service = move |_socket_addr| Ok(Some(RegisterService::new(bank.clone())));

    let on_connected = move |stream, socket_addr: SocketAddr| {
        let new_service = new_service.clone();
        async move {
            info!("Client connected: {socket_addr}");
            accept_tcp_connection(stream, socket_addr, new_service)
        }
    };

    let on_process_error = |err| {
        error!("Server error: {err}");
    };

    server.serve(&on_connected, on_process_error).await?;
    Ok(())
}
