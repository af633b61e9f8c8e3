// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::Config;
use crate::registers::RegisterBank;
use crate::server;
use crate::simulation::ProcessSimulator;

/// Represents a daemon task that can be started and managed
pub struct Daemon {
    tasks: Vec<JoinHandle<Result<()>>>,
    running: Arc<AtomicBool>,
}

impl Daemon {
    /// Create a new daemon instance
    pub fn new() -> Self {
        Daemon {
            tasks: Vec::new(),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Launch the serving loop and, when enabled, the process simulation.
    ///
    /// Both run as independent tasks for the whole process lifetime; a
    /// failure in one request or one tick never stops either loop.
    pub async fn launch(&mut self, config: &Config, bank: Arc<RegisterBank>) -> Result<()> {
        self.start_modbus_server(config, bank.clone()).await?;

        if config.simulation.enabled {
            self.start_simulation(config, bank)?;
        } else {
            info!("Process simulation disabled");
        }

        self.start_heartbeat()?;

        Ok(())
    }

    /// Bind the listener and start the Modbus accept loop.
    async fn start_modbus_server(&mut self, config: &Config, bank: Arc<RegisterBank>) -> Result<()> {
        info!(
            "Starting Modbus server on {}:{}",
            config.server.address, config.server.port
        );

        let listener =
            TcpListener::bind((config.server.address.as_str(), config.server.port)).await?;

        let task = tokio::spawn(async move { server::serve(listener, bank).await });

        self.tasks.push(task);
        Ok(())
    }

    /// Start the process simulation task.
    fn start_simulation(&mut self, config: &Config, bank: Arc<RegisterBank>) -> Result<()> {
        info!("Starting process simulation task");

        let simulator = ProcessSimulator::new(bank, config.simulation.clone(), StdRng::from_os_rng());
        let task = tokio::spawn(async move {
            simulator.run().await;
            Ok(())
        });

        self.tasks.push(task);
        Ok(())
    }

    /// Start a heartbeat task that logs system status periodically
    fn start_heartbeat(&mut self) -> Result<()> {
        debug!("Starting heartbeat monitor");

        let running = self.running.clone();
        let task = tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                debug!("Daemon heartbeat: running");
                time::sleep(Duration::from_secs(60)).await;
            }
            Ok(())
        });

        self.tasks.push(task);
        Ok(())
    }

    /// Stop all running tasks.
    ///
    /// There is no drain protocol; in-flight simulation writes are cut off
    /// with the tasks.
    pub fn shutdown(&self) {
        info!("Shutting down daemon tasks");
        self.running.store(false, Ordering::SeqCst);
        for task in &self.tasks {
            task.abort();
        }
    }

    /// Wait for all tasks to complete
    pub async fn join(self) -> Result<()> {
        for task in self.tasks {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    log::error!("Task panicked: {}", e);
                }
            }
        }
        Ok(())
    }
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}
