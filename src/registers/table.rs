// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the modbus-plant-sim project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Register bank implementation
//!
//! The bank is the only mutable resource shared between the serving loop and
//! the simulation. Each table is guarded by its own mutex, held for the
//! duration of a single read or write call, so a multi-cell write is never
//! observed half-applied and operations on different tables never contend.

use std::fmt;
use std::ops::Range;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Register word width used by all tables (0-65535).
pub type Word = u16;

/// The four Modbus table kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    DiscreteInput,
    Coil,
    InputRegister,
    HoldingRegister,
}

impl TableKind {
    /// Tables that accept writes; discrete inputs and input registers are
    /// read-only from the client's perspective.
    pub fn is_writable(self) -> bool {
        matches!(self, TableKind::Coil | TableKind::HoldingRegister)
    }

    /// Single-bit tables store only 0/1.
    pub fn is_bit(self) -> bool {
        matches!(self, TableKind::DiscreteInput | TableKind::Coil)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::DiscreteInput => "discrete input",
            TableKind::Coil => "coil",
            TableKind::InputRegister => "input register",
            TableKind::HoldingRegister => "holding register",
        };
        f.write_str(name)
    }
}

/// Typed failures returned by [`RegisterBank`].
///
/// The bank never logs or prints; callers decide how these are surfaced.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The address/count pair falls outside the table's configured span.
    #[error("{kind} address {address} with count {count} is out of range")]
    OutOfRange {
        kind: TableKind,
        address: Word,
        count: u16,
    },

    /// Write attempted on a table the client may only read.
    #[error("{0} table is read-only")]
    ReadOnly(TableKind),
}

/// Base address and length of one table, fixed at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableSpan {
    /// First valid address of the table.
    pub base: Word,
    /// Number of addressable cells.
    pub length: u16,
}

/// Address layout of the four tables.
///
/// The default matches the reference deployment: bit tables and input
/// registers at base 0, holding registers at base 1000, 100 cells each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableLayout {
    pub discrete_inputs: TableSpan,
    pub coils: TableSpan,
    pub input_registers: TableSpan,
    pub holding_registers: TableSpan,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            discrete_inputs: TableSpan { base: 0, length: 100 },
            coils: TableSpan { base: 0, length: 100 },
            input_registers: TableSpan { base: 0, length: 100 },
            holding_registers: TableSpan {
                base: 1000,
                length: 100,
            },
        }
    }
}

/// One addressable table: zero-initialized contiguous cells behind a mutex.
#[derive(Debug)]
struct Block {
    base: Word,
    cells: Mutex<Vec<Word>>,
}

impl Block {
    fn new(span: TableSpan) -> Self {
        Self {
            base: span.base,
            cells: Mutex::new(vec![0; span.length as usize]),
        }
    }

    /// Translate an (address, count) pair into a cell index range.
    ///
    /// The address itself must fall inside the table even for a zero count,
    /// and the whole span must fit; out-of-range access is an error, never
    /// clamped.
    fn span(
        &self,
        kind: TableKind,
        address: Word,
        count: u16,
        len: usize,
    ) -> Result<Range<usize>, TableError> {
        let out_of_range = TableError::OutOfRange {
            kind,
            address,
            count,
        };
        let start = (address as usize)
            .checked_sub(self.base as usize)
            .ok_or(out_of_range)?;
        let end = start + count as usize;
        if start >= len || end > len {
            return Err(out_of_range);
        }
        Ok(start..end)
    }

    fn read(&self, kind: TableKind, address: Word, count: u16) -> Result<Vec<Word>, TableError> {
        let cells = self.cells.lock().unwrap();
        let range = self.span(kind, address, count, cells.len())?;
        Ok(cells[range].to_vec())
    }

    fn write(&self, kind: TableKind, address: Word, values: &[Word]) -> Result<(), TableError> {
        let mut cells = self.cells.lock().unwrap();
        // a slice longer than any table can never fit
        let count = u16::try_from(values.len()).map_err(|_| TableError::OutOfRange {
            kind,
            address,
            count: u16::MAX,
        })?;
        let range = self.span(kind, address, count, cells.len())?;
        cells[range].copy_from_slice(values);
        Ok(())
    }
}

/// The four register tables shared between the serving loop and the
/// simulation.
///
/// Created once at server start and mutated in place for the process
/// lifetime; there is no deletion and no resizing.
#[derive(Debug)]
pub struct RegisterBank {
    discrete_inputs: Block,
    coils: Block,
    input_registers: Block,
    holding_registers: Block,
}

impl RegisterBank {
    pub fn new(layout: TableLayout) -> Self {
        Self {
            discrete_inputs: Block::new(layout.discrete_inputs),
            coils: Block::new(layout.coils),
            input_registers: Block::new(layout.input_registers),
            holding_registers: Block::new(layout.holding_registers),
        }
    }

    fn block(&self, kind: TableKind) -> &Block {
        match kind {
            TableKind::DiscreteInput => &self.discrete_inputs,
            TableKind::Coil => &self.coils,
            TableKind::InputRegister => &self.input_registers,
            TableKind::HoldingRegister => &self.holding_registers,
        }
    }

    /// Read exactly `count` values in address order. No side effects.
    pub fn read(&self, kind: TableKind, address: Word, count: u16) -> Result<Vec<Word>, TableError> {
        self.block(kind).read(kind, address, count)
    }

    /// Overwrite `values.len()` consecutive cells starting at `address`.
    ///
    /// Bit tables normalize any non-zero word to 1 (Modbus coil-ON
    /// semantics). An out-of-range write leaves the table untouched.
    pub fn write(&self, kind: TableKind, address: Word, values: &[Word]) -> Result<(), TableError> {
        if !kind.is_writable() {
            return Err(TableError::ReadOnly(kind));
        }
        if kind.is_bit() {
            let bits: Vec<Word> = values.iter().map(|v| Word::from(*v != 0)).collect();
            self.block(kind).write(kind, address, &bits)
        } else {
            self.block(kind).write(kind, address, values)
        }
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new(TableLayout::default())
    }
}
