//! Instruction Decode (ID) stage.
//!
//! This module implements the second stage of the pipeline. It performs:
//! 1. **Classification:** The low 7 bits select one of the nine encoding
//!    shapes (R, I-arithmetic, I-load, S, B, U, J, JALR, SYSTEM).
//! 2. **Register read:** Source operands are read through the machine
//!    surface into the record's `left`/`right` slots.
//! 3. **Immediate reassembly:** Sign-extended immediates per shape, with
//!    the split S/B/J layouts reassembled bit-group by bit-group.
//! 4. **Operation selection:** The ALU operation and memory-operation tag
//!    per the opcode/funct3/funct7 tables.

use crate::common::error::EmulatorError;
use crate::core::machine::Machine;
use crate::isa::alu::AluOp;
use crate::isa::instruction::{DecodedInstruction, InstructionBits, MemOp};
use crate::isa::{funct3, funct7, opcodes, sign_extend};

/// Bit shift for extracting the I-type immediate field (bits 31-20).
const I_IMM_SHIFT: u32 = 20;

/// Bit index of the SRAI/SRLI selector inside the I-type immediate.
const SHIFT_ALT_BIT: u32 = 30;

/// Sign-bit index of the 12-bit I/S immediates.
const IMM12_SIGN_BIT: u32 = 11;

/// Sign-bit index of the 13-bit B immediate.
const B_IMM_SIGN_BIT: u32 = 12;

/// Sign-bit index of the 21-bit J immediate.
const J_IMM_SIGN_BIT: u32 = 20;

/// Bit mask for extracting the U-type immediate field (bits 31-12).
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// Executes the instruction decode stage.
///
/// Populates the record's operands, destination, displacement, memory
/// operation, and ALU operation from the raw word fetched this cycle.
/// Decode reads source registers through the machine surface and is
/// otherwise a pure function of the raw word.
///
/// # Errors
///
/// [`EmulatorError::UnsupportedInstruction`] for an opcode outside the
/// RV32IM subset or an invalid funct combination.
pub fn decode_stage<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    match inst.raw.opcode() {
        opcodes::OP_REG => decode_r_type(machine, inst),
        opcodes::OP_IMM => decode_i_type(machine, inst),
        opcodes::OP_LOAD => decode_load(machine, inst),
        opcodes::OP_STORE => decode_s_type(machine, inst),
        opcodes::OP_BRANCH => decode_b_type(machine, inst),
        opcodes::OP_LUI | opcodes::OP_AUIPC => {
            decode_u_type(inst);
            Ok(())
        }
        opcodes::OP_JAL => {
            decode_j_type(inst);
            Ok(())
        }
        opcodes::OP_JALR => decode_jalr(machine, inst),
        opcodes::OP_SYSTEM => decode_system(machine, inst),
        _ => Err(unsupported(inst)),
    }
}

fn unsupported(inst: &DecodedInstruction) -> EmulatorError {
    EmulatorError::UnsupportedInstruction {
        pc: inst.pc,
        raw: inst.raw,
    }
}

/// Decodes an R-type instruction (register-register arithmetic, including
/// the multiply/divide extension).
fn decode_r_type<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.rd = raw.rd();
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = machine.read_register(raw.rs2())?;

    inst.alu_op = match raw.funct3() {
        funct3::ADD_SUB => match raw.funct7() {
            funct7::ALT => AluOp::Sub,
            funct7::MULDIV => AluOp::Mul,
            _ => AluOp::Add,
        },
        funct3::SLL => AluOp::Sll,
        funct3::SLT => AluOp::Slt,
        funct3::SLTU => AluOp::Sltu,
        funct3::XOR => {
            if raw.funct7() == funct7::MULDIV {
                AluOp::Div
            } else {
                AluOp::Xor
            }
        }
        funct3::SRL_SRA => {
            if raw.funct7() == funct7::ALT {
                AluOp::Sra
            } else {
                AluOp::Srl
            }
        }
        funct3::OR => {
            if raw.funct7() == funct7::MULDIV {
                AluOp::Rem
            } else {
                AluOp::Or
            }
        }
        funct3::AND => match raw.funct7() {
            funct7::MULDIV => AluOp::Remu,
            funct7::ALT => AluOp::Divu,
            _ => AluOp::And,
        },
        _ => return Err(unsupported(inst)),
    };
    Ok(())
}

/// Decodes an I-type arithmetic instruction (ADDI, SLTI, shifts, ...).
fn decode_i_type<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.rd = raw.rd();
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = decode_i_imm(raw);

    inst.alu_op = match raw.funct3() {
        funct3::ADD_SUB => AluOp::Add,
        funct3::SLT => AluOp::Slt,
        funct3::SLTU => AluOp::Sltu,
        funct3::XOR => AluOp::Xor,
        funct3::OR => AluOp::Or,
        funct3::AND => AluOp::And,
        funct3::SLL => AluOp::Sll,
        funct3::SRL_SRA => {
            // Shift-immediates use only the low 5 bits of the immediate as
            // the shift amount; bit 30 selects the arithmetic variant.
            if (raw >> SHIFT_ALT_BIT) & 1 == 1 {
                AluOp::Sra
            } else {
                AluOp::Srl
            }
        }
        _ => return Err(unsupported(inst)),
    };
    Ok(())
}

/// Decodes a load instruction (I-type format).
///
/// The access width and sign handling are resolved later in the
/// memory-access stage from the raw funct3 bits; decode only validates the
/// encoding and computes the address operands.
fn decode_load<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.rd = raw.rd();
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = decode_i_imm(raw);

    match raw.funct3() {
        funct3::LB | funct3::LH | funct3::LW | funct3::LBU | funct3::LHU => {
            inst.mem_op = MemOp::Load;
            inst.alu_op = AluOp::Add;
            Ok(())
        }
        _ => Err(unsupported(inst)),
    }
}

/// Decodes an S-type store instruction.
///
/// `left` carries the base register value, `right` the value to store, and
/// `disp` the sign-extended S-immediate; the effective address is
/// `left + disp`, computed in the execute stage.
fn decode_s_type<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.disp = decode_s_imm(raw);
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = machine.read_register(raw.rs2())?;
    inst.mem_op = MemOp::Store;
    Ok(())
}

/// Decodes a B-type conditional branch.
///
/// The comparison runs in the execute stage (`AluOp::Cmp`); the taken /
/// not-taken decision is resolved per funct3 in the writeback stage.
fn decode_b_type<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.disp = decode_b_imm(raw);
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = machine.read_register(raw.rs2())?;
    inst.alu_op = AluOp::Cmp;
    Ok(())
}

/// Decodes a U-type instruction (LUI, AUIPC).
///
/// The upper immediate lands in `right`; `left` is the instruction's own
/// address for AUIPC and zero for LUI, so a plain addition produces the
/// result in either case.
fn decode_u_type(inst: &mut DecodedInstruction) {
    let raw = inst.raw;
    inst.rd = raw.rd();
    inst.right = (raw & U_IMM_MASK) as i32;
    inst.left = if raw.opcode() == opcodes::OP_AUIPC {
        inst.pc as i32
    } else {
        0
    };
    inst.alu_op = AluOp::Add;
}

/// Decodes a J-type instruction (JAL).
fn decode_j_type(inst: &mut DecodedInstruction) {
    inst.rd = inst.raw.rd();
    inst.disp = decode_j_imm(inst.raw);
    inst.alu_op = AluOp::Nop;
}

/// Decodes a JALR instruction (I-type format).
///
/// The target address is `left + right` with the low bit cleared, resolved
/// in the writeback stage.
fn decode_jalr<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    inst.rd = raw.rd();
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = decode_i_imm(raw);
    inst.alu_op = AluOp::Add;
    Ok(())
}

/// Decodes a SYSTEM instruction.
///
/// Only the canonical ECALL word is accepted; EBREAK and the CSR encodings
/// are outside this machine's instruction set.
fn decode_system<M: Machine>(
    machine: &M,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let raw = inst.raw;
    if raw != opcodes::ECALL {
        return Err(unsupported(inst));
    }
    inst.rd = raw.rd();
    inst.left = machine.read_register(raw.rs1())?;
    inst.right = decode_i_imm(raw);
    inst.alu_op = AluOp::Nop;
    Ok(())
}

/// Decodes the immediate value for I-type instructions.
///
/// I-type format: `imm[11:0] | rs1 | funct3 | rd | opcode`.
fn decode_i_imm(raw: u32) -> i32 {
    (raw as i32) >> I_IMM_SHIFT
}

/// Decodes the immediate value for S-type instructions.
///
/// S-type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
/// The immediate is split across two non-contiguous fields.
fn decode_s_imm(raw: u32) -> i32 {
    let low = (raw >> 7) & 0x1F;
    let high = (raw >> 25) & 0x7F;
    sign_extend((high << 5) | low, IMM12_SIGN_BIT)
}

/// Decodes the immediate value for B-type instructions.
///
/// B-type format: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] |
/// imm[11] | opcode`. The immediate is an even byte offset.
fn decode_b_imm(raw: u32) -> i32 {
    let bit_11 = (raw >> 7) & 1;
    let bits_4_1 = (raw >> 8) & 0xF;
    let bits_10_5 = (raw >> 25) & 0x3F;
    let bit_12 = (raw >> 31) & 1;

    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, B_IMM_SIGN_BIT)
}

/// Decodes the immediate value for J-type instructions.
///
/// J-type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd |
/// opcode`. The immediate is an even byte offset.
fn decode_j_imm(raw: u32) -> i32 {
    let bits_19_12 = (raw >> 12) & 0xFF;
    let bit_11 = (raw >> 20) & 1;
    let bits_10_1 = (raw >> 21) & 0x3FF;
    let bit_20 = (raw >> 31) & 1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, J_IMM_SIGN_BIT)
}
