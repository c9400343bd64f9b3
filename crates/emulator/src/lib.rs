//! RV32IM functional emulator library.
//!
//! This crate interprets 32-bit RISC-V (RV32I + M-extension) binaries, one
//! instruction per cycle, with the following:
//! 1. **Core:** Machine state (register file, program counter, flat memory)
//!    behind a narrow capability trait, plus the system-call trap.
//! 2. **Pipeline:** The five execution stages (fetch, decode, execute,
//!    memory access, writeback) and the engine that drives them to a halt.
//! 3. **ISA:** Field extraction, immediate reassembly, and the integer ALU
//!    for the RV32I base set and the M-extension multiply/divide family.
//! 4. **Simulation:** ELF32 image loading, configuration, and statistics.

/// Common types (errors, system-wide constants).
pub mod common;
/// Emulator configuration (defaults, hierarchical config structures).
pub mod config;
/// Machine core (register file, memory, machine state, pipeline).
pub mod core;
/// Instruction set (field extraction, decoded record, ALU).
pub mod isa;
/// Executable-image loading.
pub mod sim;
/// Retired-instruction statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Library error type; one variant per fault taxonomy kind.
pub use crate::common::error::EmulatorError;
/// Machine capability surface consumed by the pipeline stages.
pub use crate::core::machine::Machine;
/// Concrete machine state; construct with `MachineState::new`.
pub use crate::core::machine::MachineState;
/// Run-loop driver; `Engine::run` executes until exit or fault.
pub use crate::core::pipeline::Engine;
