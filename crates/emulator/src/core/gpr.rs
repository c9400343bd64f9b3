//! RISC-V general-purpose register file.
//!
//! This module implements the 32-entry integer register file. It performs
//! the following:
//! 1. **Storage:** Maintains 32 registers (`x0`-`x31`) of 32 bits each.
//! 2. **Invariant enforcement:** Register `x0` is hardwired to zero; reads
//!    always yield 0 and writes are silently discarded.
//! 3. **Bounds checking:** Any index outside `x0..=x31` is a fault, never
//!    a host panic.
//! 4. **Debugging:** A register-state dump for fatal-error reports.

use crate::common::error::EmulatorError;

/// Number of architectural integer registers.
const REGISTER_COUNT: usize = 32;

/// General-purpose register file.
///
/// Register `x0` is hardwired to zero and cannot be modified.
#[derive(Debug)]
pub struct Gpr {
    regs: [i32; REGISTER_COUNT],
}

impl Gpr {
    /// Creates a register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
        }
    }

    /// Reads a register value.
    ///
    /// Register `x0` always reads as 0 regardless of prior writes.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::RegisterOutOfBounds`] for an index outside
    /// `x0..=x31`.
    pub fn read(&self, idx: usize) -> Result<i32, EmulatorError> {
        match idx {
            0 => Ok(0),
            1..REGISTER_COUNT => Ok(self.regs[idx]),
            _ => Err(EmulatorError::RegisterOutOfBounds(idx)),
        }
    }

    /// Writes a value to a register.
    ///
    /// Writes to `x0` are silently discarded.
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::RegisterOutOfBounds`] for an index outside
    /// `x0..=x31`.
    pub fn write(&mut self, idx: usize, val: i32) -> Result<(), EmulatorError> {
        match idx {
            0 => Ok(()),
            1..REGISTER_COUNT => {
                self.regs[idx] = val;
                Ok(())
            }
            _ => Err(EmulatorError::RegisterOutOfBounds(idx)),
        }
    }

    /// Dumps the contents of all registers to stderr.
    ///
    /// Displays registers in pairs with hexadecimal formatting; used by the
    /// CLI when reporting a fatal fault.
    pub fn dump(&self) {
        for i in (0..REGISTER_COUNT).step_by(2) {
            eprintln!(
                "x{:<2}={:#010x} x{:<2}={:#010x}",
                i,
                self.regs[i],
                i + 1,
                self.regs[i + 1]
            );
        }
    }
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}
