//! Global system constants.
//!
//! This module defines system-wide constants used across the emulator:
//! 1. **Memory constants:** Default capacity of the flat address space.
//! 2. **Instruction constants:** Width of an instruction word.

/// Default capacity of the flat guest address space in bytes (1 MiB).
///
/// The entire guest address space is one byte array of this size; the stack
/// pointer is initialized to this value and grows downward.
pub const DEFAULT_MEMORY_SIZE: usize = 1024 * 1024;

/// Size of a standard (32-bit) RISC-V instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;
