//! Memory Access (MEM) stage.
//!
//! This module implements the fourth stage of the pipeline. It is a no-op
//! unless the decoded record carries a load or store. The access width and
//! extension behavior come from the raw word's funct3 field:
//! byte/halfword/word stores, and signed (LB/LH), full-word (LW), or
//! zero-extended (LBU/LHU) loads. All multi-byte accesses are little-endian
//! and every byte is individually bounds-checked.

use crate::common::error::EmulatorError;
use crate::core::machine::Machine;
use crate::isa::funct3;
use crate::isa::instruction::{DecodedInstruction, InstructionBits, MemOp};

/// Executes the memory access stage.
///
/// Stores write the low bytes of `right` at the effective address computed
/// by execute; loads read from it and overwrite `result` with the
/// correctly extended value.
///
/// # Errors
///
/// [`EmulatorError::MemoryOutOfBounds`] when any accessed byte falls
/// outside memory; [`EmulatorError::UnsupportedInstruction`] for a funct3
/// width this subset does not define.
pub fn memory_stage(
    machine: &mut impl Machine,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    match inst.mem_op {
        MemOp::None => Ok(()),
        MemOp::Store => store_to_memory(machine, inst),
        MemOp::Load => load_from_memory(machine, inst),
    }
}

/// Writes the store value's low 1, 2, or 4 bytes little-endian.
fn store_to_memory(
    machine: &mut impl Machine,
    inst: &DecodedInstruction,
) -> Result<(), EmulatorError> {
    let addr = inst.result as u32;
    let value = inst.right;

    let width = match inst.raw.funct3() {
        funct3::SB => 1,
        funct3::SH => 2,
        funct3::SW => 4,
        _ => {
            return Err(EmulatorError::UnsupportedInstruction {
                pc: inst.pc,
                raw: inst.raw,
            });
        }
    };

    for i in 0..width {
        machine.store_byte(addr.wrapping_add(i), (value >> (8 * i)) as u8)?;
    }

    tracing::trace!("MEM pc={:#010x} store addr={addr:#010x}", inst.pc);
    Ok(())
}

/// Reads 1, 2, or 4 bytes little-endian and extends per funct3.
fn load_from_memory(
    machine: &impl Machine,
    inst: &mut DecodedInstruction,
) -> Result<(), EmulatorError> {
    let addr = inst.result as u32;

    let loaded = match inst.raw.funct3() {
        funct3::LB => i32::from(machine.load_byte(addr)? as i8),
        funct3::LH => i32::from(read_u16(machine, addr)? as i16),
        funct3::LW => read_u32(machine, addr)? as i32,
        funct3::LBU => i32::from(machine.load_byte(addr)?),
        funct3::LHU => i32::from(read_u16(machine, addr)?),
        _ => {
            return Err(EmulatorError::UnsupportedInstruction {
                pc: inst.pc,
                raw: inst.raw,
            });
        }
    };

    inst.result = loaded;

    tracing::trace!(
        "MEM pc={:#010x} load addr={addr:#010x} -> {loaded:#010x}",
        inst.pc
    );
    Ok(())
}

/// Reads a little-endian halfword byte-by-byte.
fn read_u16(machine: &impl Machine, addr: u32) -> Result<u16, EmulatorError> {
    let lo = machine.load_byte(addr)?;
    let hi = machine.load_byte(addr.wrapping_add(1))?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Reads a little-endian word byte-by-byte.
fn read_u32(machine: &impl Machine, addr: u32) -> Result<u32, EmulatorError> {
    let mut word = 0u32;
    for i in 0..4 {
        word |= u32::from(machine.load_byte(addr.wrapping_add(i))?) << (8 * i);
    }
    Ok(word)
}
