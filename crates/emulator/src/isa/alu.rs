//! Integer Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the execute stage. It
//! handles arithmetic, logical operations, shifts, and comparisons for
//! 32-bit operands, including the multiply/divide (M) extension.
//!
//! All arithmetic is 32-bit wrapping (modular) two's-complement; division
//! and remainder truncate toward zero. Division or remainder by zero is an
//! [`EmulatorError::ArithmeticFault`], not a sentinel result.

use crate::common::error::EmulatorError;

/// Bit mask for the shift amount (5 bits: 0-31).
const SHAMT_MASK: u32 = 0x1F;

/// Comparison-mask bit set when the operands are equal.
pub const CMP_EQUAL: i32 = 0b001;
/// Comparison-mask bit set when left < right as signed values.
pub const CMP_LESS_SIGNED: i32 = 0b010;
/// Comparison-mask bit set when left < right as unsigned values.
pub const CMP_LESS_UNSIGNED: i32 = 0b100;

/// Operation tag carried by a decoded instruction into the execute stage.
///
/// A closed set with no hidden state; the decode stage selects a variant
/// and [`Alu::execute`] dispatches on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// No operation; the result is zero.
    #[default]
    Nop,
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication (low 32 bits).
    Mul,
    /// Truncating signed division.
    Div,
    /// Unsigned division on the operand bit patterns.
    Divu,
    /// Truncating signed remainder.
    Rem,
    /// Unsigned remainder on the operand bit patterns.
    Remu,
    /// Logical left shift by the low 5 bits of the right operand.
    Sll,
    /// Arithmetic right shift by the low 5 bits of the right operand.
    Sra,
    /// Logical right shift by the low 5 bits of the right operand.
    Srl,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise AND.
    And,
    /// Signed less-than comparison producing 0 or 1.
    Slt,
    /// Unsigned less-than comparison producing 0 or 1.
    Sltu,
    /// Branch comparison producing the equal/less mask consumed by the
    /// writeback stage (see `CMP_EQUAL` and friends).
    Cmp,
}

/// Arithmetic Logic Unit for 32-bit integer operations.
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation to perform.
    /// * `a` - Left operand.
    /// * `b` - Right operand (also the shift amount or divisor).
    ///
    /// # Errors
    ///
    /// Returns [`EmulatorError::ArithmeticFault`] when `op` is a division
    /// or remainder and `b` is zero.
    pub fn execute(op: AluOp, a: i32, b: i32) -> Result<i32, EmulatorError> {
        let shamt = (b as u32) & SHAMT_MASK;
        let result = match op {
            AluOp::Nop => 0,
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mul => a.wrapping_mul(b),
            AluOp::Div => {
                if b == 0 {
                    return Err(EmulatorError::ArithmeticFault);
                }
                // i32::MIN / -1 wraps, per 32-bit modular semantics.
                a.wrapping_div(b)
            }
            AluOp::Divu => {
                if b == 0 {
                    return Err(EmulatorError::ArithmeticFault);
                }
                ((a as u32) / (b as u32)) as i32
            }
            AluOp::Rem => {
                if b == 0 {
                    return Err(EmulatorError::ArithmeticFault);
                }
                a.wrapping_rem(b)
            }
            AluOp::Remu => {
                if b == 0 {
                    return Err(EmulatorError::ArithmeticFault);
                }
                ((a as u32) % (b as u32)) as i32
            }
            AluOp::Sll => ((a as u32) << shamt) as i32,
            AluOp::Srl => ((a as u32) >> shamt) as i32,
            AluOp::Sra => a >> shamt,
            AluOp::Or => a | b,
            AluOp::Xor => a ^ b,
            AluOp::And => a & b,
            AluOp::Slt => i32::from(a < b),
            AluOp::Sltu => i32::from((a as u32) < (b as u32)),
            AluOp::Cmp => {
                let mut mask = 0;
                if a == b {
                    mask |= CMP_EQUAL;
                }
                if a < b {
                    mask |= CMP_LESS_SIGNED;
                }
                if (a as u32) < (b as u32) {
                    mask |= CMP_LESS_UNSIGNED;
                }
                mask
            }
        };
        Ok(result)
    }
}
