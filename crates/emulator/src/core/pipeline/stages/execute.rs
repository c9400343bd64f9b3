//! Execute (EX) stage.
//!
//! This module implements the third stage of the pipeline. For load and
//! store instructions it computes the effective address; for everything
//! else it dispatches the decoded ALU operation on the two operands. The
//! result lands in the record's `result` slot.

use crate::common::error::EmulatorError;
use crate::isa::alu::Alu;
use crate::isa::instruction::{DecodedInstruction, MemOp};

/// Executes the execute stage.
///
/// Loads resolve their address as `left + right` (base register plus the
/// sign-extended I-immediate); stores as `left + disp` (base register plus
/// the sign-extended S-immediate). All other instructions run the decoded
/// ALU operation. Address arithmetic wraps, and the bounds check happens
/// at access time in the memory stage.
///
/// # Errors
///
/// [`EmulatorError::ArithmeticFault`] for division or remainder by zero.
pub fn execute_stage(inst: &mut DecodedInstruction) -> Result<(), EmulatorError> {
    inst.result = match inst.mem_op {
        MemOp::Load => inst.left.wrapping_add(inst.right),
        MemOp::Store => inst.left.wrapping_add(inst.disp),
        MemOp::None => Alu::execute(inst.alu_op, inst.left, inst.right)?,
    };

    tracing::trace!(
        "EX  pc={:#010x} {:?} -> {:#010x}",
        inst.pc,
        inst.alu_op,
        inst.result
    );

    Ok(())
}
