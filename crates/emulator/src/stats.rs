//! Retired-instruction statistics.
//!
//! A functional emulator has no timing model, so the statistics are pure
//! instruction-mix counters: how many instructions retired and how they
//! break down across loads, stores, control flow, system calls, and plain
//! ALU work.

use crate::isa::instruction::{DecodedInstruction, InstructionBits};
use crate::isa::opcodes;

/// Instruction-mix counters for one run.
#[derive(Debug, Default)]
pub struct SimStats {
    /// Total instructions retired.
    pub instructions_retired: u64,
    /// Load instructions retired.
    pub inst_load: u64,
    /// Store instructions retired.
    pub inst_store: u64,
    /// Branch and jump instructions retired.
    pub inst_branch: u64,
    /// SYSTEM instructions retired.
    pub inst_system: u64,
    /// Integer ALU instructions retired.
    pub inst_alu: u64,
}

impl SimStats {
    /// Records one retired instruction by its opcode class.
    pub fn record(&mut self, inst: &DecodedInstruction) {
        self.instructions_retired += 1;
        match inst.raw.opcode() {
            opcodes::OP_LOAD => self.inst_load += 1,
            opcodes::OP_STORE => self.inst_store += 1,
            opcodes::OP_BRANCH | opcodes::OP_JAL | opcodes::OP_JALR => self.inst_branch += 1,
            opcodes::OP_SYSTEM => self.inst_system += 1,
            _ => self.inst_alu += 1,
        }
    }

    /// Prints the counters to stdout.
    pub fn print(&self) {
        println!("\n=========================================================");
        println!("\n[General]");
        println!("  Instructions Retired: {}", self.instructions_retired);
        println!("\n[Instruction Mix]");
        println!("  Loads:                {}", self.inst_load);
        println!("  Stores:               {}", self.inst_store);
        println!("  Branches/Jumps:       {}", self.inst_branch);
        println!("  System:               {}", self.inst_system);
        println!("  ALU:                  {}", self.inst_alu);
    }
}
