//! Machine state and the capability surface the pipeline depends on.
//!
//! This module defines:
//! 1. **`Machine`:** The narrow trait (registers, PC, memory bytes, the
//!    system-call trap, and the exit latch) that every pipeline stage is
//!    written against, enabling recording test doubles.
//! 2. **`MachineState`:** The one concrete implementation, owning the
//!    register file, program counter, flat memory, console handles, and
//!    the exit latch.
//! 3. **System calls:** Dispatch on `a7` for exit, character output,
//!    character input, and the debug no-op.

use std::io::{Read, Write};

use crate::common::error::EmulatorError;
use crate::config::Config;
use crate::core::gpr::Gpr;
use crate::core::memory::Memory;
use crate::isa::abi;

/// System call number for terminating the guest with `a0` as exit code.
const SYS_EXIT: i32 = 0;
/// System call number for writing the low byte of `a0` to the console.
const SYS_PUTCHAR: i32 = 1;
/// System call number for reading one console byte into `a0`.
const SYS_GETCHAR: i32 = 2;
/// System call number for the debug no-op hook.
const SYS_DEBUG: i32 = 3;

/// Capability surface the pipeline stages operate against.
///
/// The stages never see the machine's concrete layout; they read and write
/// registers, the program counter, and single memory bytes, raise the
/// system-call trap, and poll the exit latch. Tests substitute a recording
/// double for the concrete [`MachineState`].
pub trait Machine {
    /// Reads a register; `x0` always yields 0.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::RegisterOutOfBounds`] for an index outside
    /// `x0..=x31`.
    fn read_register(&self, idx: usize) -> Result<i32, EmulatorError>;

    /// Writes a register; writes to `x0` are discarded.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::RegisterOutOfBounds`] for an index outside
    /// `x0..=x31`.
    fn write_register(&mut self, idx: usize, val: i32) -> Result<(), EmulatorError>;

    /// Returns the current program counter.
    fn read_pc(&self) -> u32;

    /// Sets the program counter.
    fn write_pc(&mut self, pc: u32);

    /// Reads one memory byte.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::MemoryOutOfBounds`] beyond the capacity.
    fn load_byte(&self, addr: u32) -> Result<u8, EmulatorError>;

    /// Writes one memory byte.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::MemoryOutOfBounds`] beyond the capacity.
    fn store_byte(&mut self, addr: u32, val: u8) -> Result<(), EmulatorError>;

    /// Returns the capacity of the address space in bytes.
    fn memory_size(&self) -> u32;

    /// Dispatches the system call selected by `a7`.
    ///
    /// # Errors
    ///
    /// [`EmulatorError::UnsupportedSystemCall`] for an unknown `a7` value;
    /// [`EmulatorError::IoFault`] when console output fails. A failed
    /// console *read* is reported as a warning and leaves `a0` untouched —
    /// the one non-fatal fault in the machine.
    fn system_call(&mut self) -> Result<(), EmulatorError>;

    /// Takes the exit code latched by the exit system call, if any.
    fn take_exit(&mut self) -> Option<i32>;
}

/// Concrete machine state: registers, program counter, memory, console.
///
/// One `MachineState` is created per guest process. The loader populates
/// its memory and entry point once; thereafter it is mutated exclusively
/// by the pipeline stages through a `&mut` borrow.
pub struct MachineState {
    /// General-purpose register file.
    pub regs: Gpr,
    /// Program counter, byte-addressed into memory.
    pub pc: u32,
    /// Flat guest memory.
    pub memory: Memory,
    /// Exit code latched by the exit system call.
    exit_code: Option<i32>,
    stdin: Box<dyn Read>,
    stdout: Box<dyn Write>,
}

impl std::fmt::Debug for MachineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineState")
            .field("pc", &self.pc)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

impl MachineState {
    /// Creates a machine attached to the process's stdin/stdout.
    pub fn new(config: &Config) -> Self {
        Self::with_console(
            config,
            Box::new(std::io::stdin()),
            Box::new(std::io::stdout()),
        )
    }

    /// Creates a machine with injected console handles.
    ///
    /// Tests pass in-memory buffers here to observe the character-output
    /// system call and script the character-input one.
    pub fn with_console(
        config: &Config,
        stdin: Box<dyn Read>,
        stdout: Box<dyn Write>,
    ) -> Self {
        Self {
            regs: Gpr::new(),
            pc: 0,
            memory: Memory::new(config.memory.size),
            exit_code: None,
            stdin,
            stdout,
        }
    }
}

impl Machine for MachineState {
    fn read_register(&self, idx: usize) -> Result<i32, EmulatorError> {
        self.regs.read(idx)
    }

    fn write_register(&mut self, idx: usize, val: i32) -> Result<(), EmulatorError> {
        self.regs.write(idx, val)
    }

    fn read_pc(&self) -> u32 {
        self.pc
    }

    fn write_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    fn load_byte(&self, addr: u32) -> Result<u8, EmulatorError> {
        self.memory.read_u8(addr)
    }

    fn store_byte(&mut self, addr: u32, val: u8) -> Result<(), EmulatorError> {
        self.memory.write_u8(addr, val)
    }

    fn memory_size(&self) -> u32 {
        self.memory.capacity()
    }

    fn system_call(&mut self) -> Result<(), EmulatorError> {
        let call = self.regs.read(abi::REG_A7)?;
        match call {
            SYS_EXIT => {
                let code = self.regs.read(abi::REG_A0)?;
                tracing::debug!("exit system call, code {code}");
                self.exit_code = Some(code);
            }
            SYS_PUTCHAR => {
                let byte = (self.regs.read(abi::REG_A0)? & 0xFF) as u8;
                self.stdout.write_all(&[byte])?;
                self.stdout.flush()?;
            }
            SYS_GETCHAR => {
                let mut buf = [0u8; 1];
                match self.stdin.read_exact(&mut buf) {
                    Ok(()) => self.regs.write(abi::REG_A0, i32::from(buf[0]))?,
                    // Non-fatal: report and continue with a0 untouched.
                    Err(err) => tracing::warn!("console read failed: {err}"),
                }
            }
            SYS_DEBUG => {}
            other => return Err(EmulatorError::UnsupportedSystemCall(other)),
        }
        Ok(())
    }

    fn take_exit(&mut self) -> Option<i32> {
        self.exit_code.take()
    }
}
