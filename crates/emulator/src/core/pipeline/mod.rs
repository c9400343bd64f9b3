//! Execution pipeline and run-loop engine.
//!
//! One cycle is fetch → decode → execute → memory access → writeback, all
//! against a single exclusively borrowed machine. The [`Engine`] repeats
//! cycles until the guest's exit system call latches a code or a stage
//! reports a fatal fault; there is no iteration cap and no partial-failure
//! recovery within a cycle.

/// The five pipeline stages.
pub mod stages;

use crate::common::error::EmulatorError;
use crate::core::machine::Machine;
use crate::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, memory_stage, writeback_stage,
};
use crate::stats::SimStats;

/// Run-loop driver for one machine.
///
/// Owns the only cross-cycle stage state (fetch's one-shot stack-pointer
/// flag) and the retired-instruction statistics.
#[derive(Debug, Default)]
pub struct Engine {
    stack_initialized: bool,
    stats: SimStats,
}

impl Engine {
    /// Creates an engine ready to drive its first cycle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the statistics collected so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Runs the machine until it halts.
    ///
    /// Returns the exit code passed by the guest's exit system call.
    ///
    /// # Errors
    ///
    /// The first fatal fault from any stage; the machine is left as of the
    /// last completed memory write of the faulting cycle.
    pub fn run(&mut self, machine: &mut impl Machine) -> Result<i32, EmulatorError> {
        loop {
            self.cycle(machine)?;
            if let Some(code) = machine.take_exit() {
                return Ok(code);
            }
        }
    }

    /// Executes one full pipeline cycle.
    ///
    /// # Errors
    ///
    /// Propagates the first stage fault; the cycle is not retried.
    pub fn cycle(&mut self, machine: &mut impl Machine) -> Result<(), EmulatorError> {
        let mut inst = fetch_stage(machine, &mut self.stack_initialized)?;
        decode_stage(machine, &mut inst)?;
        execute_stage(&mut inst)?;
        memory_stage(machine, &mut inst)?;
        writeback_stage(machine, &inst)?;

        self.stats.record(&inst);
        Ok(())
    }
}
