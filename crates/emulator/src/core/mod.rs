//! Machine core: architectural state and the execution pipeline.

/// General-purpose register file.
pub mod gpr;
/// Machine capability trait and concrete machine state.
pub mod machine;
/// Flat bounds-checked byte memory.
pub mod memory;
/// Five-stage pipeline and the run-loop engine.
pub mod pipeline;

pub use machine::{Machine, MachineState};
