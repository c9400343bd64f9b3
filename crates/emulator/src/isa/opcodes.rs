//! RV32 major opcodes.
//!
//! Defines the major opcodes (bits 6-0) handled by the decode stage, plus
//! the one full SYSTEM encoding the emulator dispatches on.

/// Load instructions (LB, LH, LW, LBU, LHU).
pub const OP_LOAD: u32 = 0b0000011;

/// Immediate arithmetic instructions (ADDI, ANDI, SLLI, etc.).
pub const OP_IMM: u32 = 0b0010011;

/// Add Upper Immediate to PC (AUIPC).
pub const OP_AUIPC: u32 = 0b0010111;

/// Store instructions (SB, SH, SW).
pub const OP_STORE: u32 = 0b0100011;

/// Register-Register arithmetic (ADD, SUB, SLL, and the M-extension).
pub const OP_REG: u32 = 0b0110011;

/// Load Upper Immediate (LUI).
pub const OP_LUI: u32 = 0b0110111;

/// Conditional Branch instructions (BEQ, BNE, etc.).
pub const OP_BRANCH: u32 = 0b1100011;

/// Jump and Link Register (JALR).
pub const OP_JALR: u32 = 0b1100111;

/// Jump and Link (JAL).
pub const OP_JAL: u32 = 0b1101111;

/// SYSTEM instructions (ECALL).
pub const OP_SYSTEM: u32 = 0b1110011;

/// Full encoding of the ECALL instruction.
///
/// The only SYSTEM word this machine accepts; it traps into the
/// system-call dispatch during writeback.
pub const ECALL: u32 = 0x0000_0073;
