//! Writeback (WB) stage.
//!
//! This module implements the final stage of the pipeline. It performs, in
//! order:
//! 1. **Register commit:** The cycle's result (or the link value for
//!    jumps) into the destination register.
//! 2. **System-call dispatch:** The machine trap when the word is ECALL.
//! 3. **Next-PC resolution:** Jump targets, per-funct3 branch decisions
//!    against the comparison mask, or the already-advanced sequential PC.

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::EmulatorError;
use crate::core::machine::Machine;
use crate::isa::alu::{CMP_EQUAL, CMP_LESS_SIGNED, CMP_LESS_UNSIGNED};
use crate::isa::instruction::{DecodedInstruction, InstructionBits};
use crate::isa::{funct3, opcodes};

/// Executes the writeback stage.
///
/// JAL and JALR write the sequential return address (`pc + 4`) into their
/// destination; every other shape writes the record's `result`. Writes to
/// `x0` are discarded by the register file. JALR's next PC is the computed
/// target with the low bit cleared — its own case, never the sequential
/// default.
///
/// # Errors
///
/// [`EmulatorError::UnsupportedInstruction`] for a branch funct3 outside
/// the six defined conditions; system-call faults propagate from the
/// machine trap.
pub fn writeback_stage(
    machine: &mut impl Machine,
    inst: &DecodedInstruction,
) -> Result<(), EmulatorError> {
    let opcode = inst.raw.opcode();

    let value = match opcode {
        opcodes::OP_JAL | opcodes::OP_JALR => inst.pc.wrapping_add(INSTRUCTION_SIZE) as i32,
        _ => inst.result,
    };
    if inst.rd != 0 {
        machine.write_register(inst.rd, value)?;
        tracing::trace!("WB  pc={:#010x} x{} <= {value:#010x}", inst.pc, inst.rd);
    }

    if inst.raw == opcodes::ECALL {
        machine.system_call()?;
    }

    match opcode {
        opcodes::OP_JAL => {
            machine.write_pc(inst.pc.wrapping_add(inst.disp as u32));
        }
        opcodes::OP_JALR => {
            let target = (inst.left.wrapping_add(inst.right) as u32) & !1;
            machine.write_pc(target);
        }
        opcodes::OP_BRANCH => {
            let next = if branch_taken(inst)? {
                inst.pc.wrapping_add(inst.disp as u32)
            } else {
                inst.pc.wrapping_add(INSTRUCTION_SIZE)
            };
            machine.write_pc(next);
        }
        // Sequential shapes keep the PC fetch already advanced.
        _ => {}
    }

    Ok(())
}

/// Resolves a branch's taken / not-taken decision.
///
/// Tests the specific comparison-mask bit selected by the branch's funct3
/// rather than treating any nonzero mask as taken.
fn branch_taken(inst: &DecodedInstruction) -> Result<bool, EmulatorError> {
    let mask = inst.result;
    let taken = match inst.raw.funct3() {
        funct3::BEQ => mask & CMP_EQUAL != 0,
        funct3::BNE => mask & CMP_EQUAL == 0,
        funct3::BLT => mask & CMP_LESS_SIGNED != 0,
        funct3::BGE => mask & CMP_LESS_SIGNED == 0,
        funct3::BLTU => mask & CMP_LESS_UNSIGNED != 0,
        funct3::BGEU => mask & CMP_LESS_UNSIGNED == 0,
        _ => {
            return Err(EmulatorError::UnsupportedInstruction {
                pc: inst.pc,
                raw: inst.raw,
            });
        }
    };
    Ok(taken)
}
