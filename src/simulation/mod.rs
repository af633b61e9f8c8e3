// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Live process simulation
//!
//! A periodic task emulating a live analog input and a live binary state.
//! Each tick draws fresh pseudo-random values and writes them into the
//! designated holding register and coil of the shared bank, racing with the
//! serving loop's reads and writes. There is no state beyond what is
//! visible in the register tables.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use rand::Rng;
use tokio::time;

use crate::config::SimulationConfig;
use crate::registers::{RegisterBank, TableError, TableKind, Word};

/// Periodic mutator driving the designated register and coil.
///
/// The random source is injected so tests can run a seeded generator and
/// assert on the drawn range.
pub struct ProcessSimulator<R: Rng> {
    bank: Arc<RegisterBank>,
    config: SimulationConfig,
    rng: R,
}

impl<R: Rng> ProcessSimulator<R> {
    pub fn new(bank: Arc<RegisterBank>, config: SimulationConfig, rng: R) -> Self {
        Self { bank, config, rng }
    }

    /// One simulation step: draw fresh values and store them in the bank.
    ///
    /// The analog value is uniform in `[0.95 × nominal, 1.05 × nominal]`
    /// (integer-truncated bounds, inclusive), the coil state uniform in
    /// `{0, 1}`. Returns the written (register, coil) pair.
    pub fn tick(&mut self) -> Result<(Word, Word), TableError> {
        let low = (0.95 * f64::from(self.config.nominal)) as Word;
        let high = (1.05 * f64::from(self.config.nominal)) as Word;
        let value = self.rng.random_range(low..=high);
        self.bank
            .write(TableKind::HoldingRegister, self.config.register_address, &[value])?;

        let state = self.rng.random_range(0..=1);
        self.bank
            .write(TableKind::Coil, self.config.coil_address, &[state])?;

        Ok((value, state))
    }

    /// Read both simulated cells back through the same read path clients
    /// use and log a human-readable snapshot.
    fn log_snapshot(&self) {
        let register = self
            .bank
            .read(TableKind::HoldingRegister, self.config.register_address, 1);
        let coil = self.bank.read(TableKind::Coil, self.config.coil_address, 1);
        match (register, coil) {
            (Ok(register), Ok(coil)) => {
                info!("======================");
                info!("Register Table");
                info!(
                    "Holding Register R{}: {:?}",
                    self.config.register_address, register
                );
                info!("Coil R{}: {:?}", self.config.coil_address, coil);
            }
            (register, coil) => {
                error!("snapshot read failed: register={register:?} coil={coil:?}")
            }
        }
    }

    /// Run until the surrounding task is cancelled: warm-up delay, then one
    /// tick per period. A table error is logged and the loop keeps going.
    pub async fn run(mut self) {
        info!(
            "Process simulation starting: nominal {} on holding register {}, coil {}",
            self.config.nominal, self.config.register_address, self.config.coil_address
        );
        time::sleep(Duration::from_secs(self.config.warmup_secs)).await;

        let mut interval = time::interval(Duration::from_secs(self.config.period_secs));
        loop {
            interval.tick().await;
            if let Err(err) = self.tick() {
                error!("simulation tick failed: {err}");
                continue;
            }
            self.log_snapshot();
        }
    }
}
