// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Menu-driven operator session
//!
//! An explicit finite-state loop over a connected [`RegisterClient`]:
//! `Idle` prompts for one of the four actions, the chosen action runs to
//! completion and returns to `Idle`, and `Closed` is terminal. Input and
//! output streams are injected so tests can script a whole session.

use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;

use super::dispatcher::{DataType, RegisterClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Reading,
    Writing,
    Configuring,
    Closed,
}

/// Interactive operator loop.
pub struct Session<In, Out> {
    client: RegisterClient,
    input: In,
    output: Out,
    state: SessionState,
}

impl<In: BufRead, Out: Write> Session<In, Out> {
    pub fn new(client: RegisterClient, input: In, output: Out) -> Self {
        Self {
            client,
            input,
            output,
            state: SessionState::Idle,
        }
    }

    /// Drive the state machine until the operator exits. Operation failures
    /// are reported and return the session to the menu; only console I/O
    /// failures end the loop early.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.state {
                SessionState::Idle => {
                    self.state = self.choose()?;
                }
                SessionState::Reading => {
                    self.read_operation().await?;
                    self.state = SessionState::Idle;
                }
                SessionState::Writing => {
                    self.write_operation().await?;
                    self.state = SessionState::Idle;
                }
                SessionState::Configuring => {
                    self.configure_operation()?;
                    self.state = SessionState::Idle;
                }
                SessionState::Closed => {
                    if let Err(err) = self.client.close().await {
                        writeln!(self.output, "Error closing connection: {err}")?;
                    }
                    return Ok(());
                }
            }
        }
    }

    fn choose(&mut self) -> Result<SessionState> {
        let Some(choice) =
            self.prompt("Choose operation: (1- Read | 2- Write | 3- Configure | 4- Exit): ")?
        else {
            // input stream closed, treat as exit
            return Ok(SessionState::Closed);
        };
        Ok(match choice.trim() {
            "1" => SessionState::Reading,
            "2" => SessionState::Writing,
            "3" => SessionState::Configuring,
            "4" => SessionState::Closed,
            _ => {
                writeln!(self.output, "Invalid selection")?;
                SessionState::Idle
            }
        })
    }

    async fn read_operation(&mut self) -> Result<()> {
        let Some(code) = self.prompt_number::<u8>(
            "Select data type to read (1- Holding Register | 2- Coil | 3- Input Register | 4- Discrete Input): ",
        )?
        else {
            return Ok(());
        };
        let data_type = match DataType::try_from(code) {
            Ok(data_type) => data_type,
            Err(err) => {
                // fails locally, no request is sent
                writeln!(self.output, "Error: {err}")?;
                return Ok(());
            }
        };
        let Some(address) = self.prompt_number::<u16>("Enter register table address: ")? else {
            return Ok(());
        };
        let Some(polls) = self.prompt_number::<u32>("Enter the number of reads: ")? else {
            return Ok(());
        };

        let Self { client, output, .. } = self;
        let outcome = client
            .read(data_type, address, polls, |poll, value| {
                let _ = writeln!(output, "Read {poll}: [{value}]");
            })
            .await;
        if let Err(err) = outcome {
            writeln!(self.output, "Error during operation: {err}")?;
        }
        Ok(())
    }

    async fn write_operation(&mut self) -> Result<()> {
        let Some(code) =
            self.prompt_number::<u8>("Select data type to write (1- Holding Register | 2- Coil): ")?
        else {
            return Ok(());
        };
        let data_type = match DataType::try_from(code) {
            Ok(data_type) => data_type,
            Err(err) => {
                writeln!(self.output, "Error: {err}")?;
                return Ok(());
            }
        };
        let Some(address) = self.prompt_number::<u16>("Enter register table address: ")? else {
            return Ok(());
        };
        let Some(value) = self.prompt_number::<u16>("Enter value to write: ")? else {
            return Ok(());
        };

        match self.client.write(data_type, address, value).await {
            Ok(()) => writeln!(self.output, "Write successful")?,
            Err(err) => writeln!(self.output, "Error during operation: {err}")?,
        }
        Ok(())
    }

    fn configure_operation(&mut self) -> Result<()> {
        let Some(interval) = self.prompt_number::<f64>("Enter desired scan interval [s]: ")? else {
            return Ok(());
        };
        if !interval.is_finite() || interval < 0.0 {
            writeln!(self.output, "Error: scan interval must be non-negative")?;
            return Ok(());
        }
        self.client.configure(Duration::from_secs_f64(interval));
        writeln!(self.output, "Scan interval set to {interval}s")?;
        Ok(())
    }

    /// Print a prompt and read one line. Returns `None` when the input
    /// stream is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Prompt for a number; a malformed value is reported and aborts the
    /// current operation back to the menu.
    fn prompt_number<T: FromStr>(&mut self, text: &str) -> Result<Option<T>> {
        let Some(line) = self.prompt(text)? else {
            return Ok(None);
        };
        match line.trim().parse::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                writeln!(self.output, "Invalid number: {}", line.trim())?;
                Ok(None)
            }
        }
    }
}
