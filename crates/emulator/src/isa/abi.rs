//! RISC-V Application Binary Interface (ABI) register name constants.
//!
//! Defines the ABI register indices the emulator itself touches: the stack
//! pointer set up by the first fetch and the argument registers consumed by
//! the system-call trap.

/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x17 (system call number, a7).
pub const REG_A7: usize = 17;
