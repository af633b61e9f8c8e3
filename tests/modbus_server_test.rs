// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Tests for the Modbus serving loop
//!
//! These tests validate the server functionality by starting a server
//! instance over the shared register bank and connecting to it via a Modbus
//! client. The four read operations, the two write operations and the error
//! conditions are exercised, as well as concurrent access between clients
//! and the process simulation.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::time;
use tokio_modbus::prelude::*;

use modbus_plant_sim::config::SimulationConfig;
use modbus_plant_sim::registers::RegisterBank;
use modbus_plant_sim::server;
use modbus_plant_sim::simulation::ProcessSimulator;

/// Test utility function to start a server over a fresh bank in the
/// background. Uses port 0 so the OS assigns a free port.
async fn start_test_server(
) -> Result<(SocketAddr, Arc<RegisterBank>), Box<dyn std::error::Error>> {
    let socket_addr = SocketAddr::from_str("127.0.0.1:0").unwrap();
    let listener = TcpListener::bind(socket_addr).await?;
    let socket_addr = listener.local_addr()?;

    let bank = Arc::new(RegisterBank::default());
    let served = bank.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, served).await {
            eprintln!("Server error: {}", e);
        }
    });

    // Give the server a moment to start
    time::sleep(Duration::from_millis(100)).await;

    Ok((socket_addr, bank))
}

#[tokio::test]
async fn test_holding_register_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    ctx.write_single_register(1000, 512).await??;
    let data = ctx.read_holding_registers(1000, 1).await??;
    assert_eq!(data, vec![512]);

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_tables_zero_initialized() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    let coils = ctx.read_coils(0, 1).await??;
    assert_eq!(coils, vec![false]);

    let inputs = ctx.read_discrete_inputs(0, 5).await??;
    assert_eq!(inputs, vec![false; 5]);

    let words = ctx.read_input_registers(0, 5).await??;
    assert_eq!(words, vec![0; 5]);

    let holding = ctx.read_holding_registers(1000, 5).await??;
    assert_eq!(holding, vec![0; 5]);

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_coil_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    ctx.write_single_coil(7, true).await??;
    let data = ctx.read_coils(6, 3).await??;
    assert_eq!(data, vec![false, true, false]);

    ctx.write_single_coil(7, false).await??;
    let data = ctx.read_coils(7, 1).await??;
    assert_eq!(data, vec![false]);

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_last_slot_accepted_next_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    // 1099 is the last valid holding register with base 1000, length 100
    ctx.write_single_register(1099, 1).await??;
    assert_eq!(ctx.read_holding_registers(1099, 1).await??, vec![1]);

    let result = ctx.write_single_register(1100, 1).await?;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.to_string(), "Illegal data address");
    }

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_invalid_register_address() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    // below the holding register base
    let result = ctx.read_holding_registers(999, 1).await?;
    assert!(result.is_err());

    // count running past the end of the table
    let result = ctx.read_input_registers(90, 11).await?;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.to_string(), "Illegal data address");
    }

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_failed_write_leaves_table_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    ctx.write_single_register(1042, 7).await??;
    let result = ctx.write_single_register(1100, 9).await?;
    assert!(result.is_err());

    use modbus_plant_sim::registers::TableKind;
    assert_eq!(
        bank.read(TableKind::HoldingRegister, 1042, 1).unwrap(),
        vec![7]
    );

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_unsupported_function() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, _bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    // bulk register writes are not part of the served function codes
    let result = ctx.write_multiple_registers(1000, &[1, 2, 3]).await?;
    assert!(result.is_err());
    if let Err(error) = result {
        assert_eq!(error.to_string(), "Illegal function");
    }

    ctx.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_multiple_clients() -> Result<(), Box<dyn std::error::Error>> {
    let test_register = 1005;
    let test_value = 888;

    let (socket_addr, _bank) = start_test_server().await?;

    let mut client1 = tcp::connect(socket_addr).await?;
    let mut client2 = tcp::connect(socket_addr).await?;

    client1
        .write_single_register(test_register, test_value)
        .await??;

    time::sleep(Duration::from_millis(100)).await;

    // client 2 sees the update from client 1
    let data = client2.read_holding_registers(test_register, 1).await??;
    assert_eq!(data, vec![test_value]);

    client1.disconnect().await?;
    client2.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn test_simulation_races_with_reads() -> Result<(), Box<dyn std::error::Error>> {
    let (socket_addr, bank) = start_test_server().await?;

    let mut ctx = tcp::connect(socket_addr).await?;

    // drive ticks directly, racing with the client's reads over the wire
    let mut simulator = ProcessSimulator::new(
        bank,
        SimulationConfig::default(),
        StdRng::seed_from_u64(99),
    );
    let ticker = tokio::task::spawn_blocking(move || {
        for _ in 0..500 {
            simulator.tick().unwrap();
        }
    });

    // every observed value was actually written: zero before the first
    // tick, inside the ±5% band afterwards, never a torn intermediate
    for _ in 0..100 {
        let data = ctx.read_holding_registers(1000, 1).await??;
        let value = data[0];
        assert!(
            value == 0 || (380..=420).contains(&value),
            "observed value {value} was never written"
        );

        let coil = ctx.read_coils(1000, 1).await??;
        assert_eq!(coil.len(), 1);
    }

    ticker.await?;
    ctx.disconnect().await?;
    Ok(())
}
