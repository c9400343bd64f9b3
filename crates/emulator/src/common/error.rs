//! Emulator fault taxonomy.
//!
//! This module defines the error type shared by the loader and every
//! pipeline stage. It provides:
//! 1. **Load-time faults:** Malformed images and file I/O failures, reported
//!    before any instruction executes.
//! 2. **Execution faults:** Unsupported encodings, out-of-bounds accesses,
//!    and arithmetic faults, all fatal to the run loop.
//! 3. **Integration** with standard Rust error traits via `thiserror`.

use thiserror::Error;

/// Faults raised while loading an image or executing instructions.
///
/// Every variant except the console-read warning path (handled inside the
/// system-call trap, see `MachineState::system_call`) aborts the run loop:
/// there is no retry, skip, or default-result substitution.
#[derive(Debug, Error)]
pub enum EmulatorError {
    /// The executable image is not a loadable little-endian RV32 ELF,
    /// or one of its segments does not fit the address space.
    #[error("malformed image: {0}")]
    MalformedImage(String),

    /// The fetched word has no recognized opcode/funct encoding.
    #[error("unsupported instruction {raw:#010x} at pc={pc:#010x}")]
    UnsupportedInstruction {
        /// Address the word was fetched from.
        pc: u32,
        /// The offending instruction encoding.
        raw: u32,
    },

    /// A register index outside `x0..=x31` reached the register file.
    #[error("register index {0} outside x0..x31")]
    RegisterOutOfBounds(usize),

    /// A fetch, load, or store touched an address beyond the address space.
    #[error("address {addr:#010x} outside the {capacity:#x}-byte address space")]
    MemoryOutOfBounds {
        /// The faulting byte address.
        addr: u32,
        /// Capacity of the machine's memory.
        capacity: u32,
    },

    /// Division or remainder by zero.
    #[error("division or remainder by zero")]
    ArithmeticFault,

    /// The value in `a7` names no known system call.
    #[error("unsupported system call {0}")]
    UnsupportedSystemCall(i32),

    /// An underlying file or console I/O operation failed.
    #[error("i/o failure: {0}")]
    IoFault(#[from] std::io::Error),
}

impl From<object::read::Error> for EmulatorError {
    fn from(err: object::read::Error) -> Self {
        Self::MalformedImage(err.to_string())
    }
}
