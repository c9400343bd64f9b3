//! RV32 function codes (funct7).
//!
//! The `funct7` field (bits 31-25) selects between operations sharing an
//! opcode and funct3 slot: the default encoding, the alternate encoding
//! (SUB, SRA, and the unsigned-divide slot of this decode table), and the
//! multiply/divide extension.

/// Default R-type encoding (ADD, SRL, SLT, ...).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate R-type encoding (SUB, SRA, DIVU).
pub const ALT: u32 = 0b0100000;

/// Multiply/divide extension encoding (MUL, DIV, REM, REMU).
pub const MULDIV: u32 = 0b0000001;
