//! Instruction Fetch (IF) stage.
//!
//! This module implements the first stage of the pipeline. It reads the
//! 4-byte little-endian word at the current program counter, advances the
//! PC past it, and seeds the cycle's decoded record. On the very first
//! invocation it also establishes the initial stack pointer at the top of
//! the address space (the stack grows downward, per the ABI convention).

use crate::common::constants::INSTRUCTION_SIZE;
use crate::common::error::EmulatorError;
use crate::core::machine::Machine;
use crate::isa::abi;
use crate::isa::instruction::DecodedInstruction;

/// Executes the instruction fetch stage.
///
/// Reads the instruction word at the PC as little-endian bytes through the
/// machine surface, advances the PC by 4, and returns a fresh
/// [`DecodedInstruction`] carrying the fetch address and the raw word.
///
/// `stack_initialized` is the engine-owned one-shot flag: on the first call
/// the stack pointer (`x2`) is set to the memory capacity.
///
/// # Errors
///
/// [`EmulatorError::MemoryOutOfBounds`] when any byte of the instruction
/// window falls outside memory.
pub fn fetch_stage(
    machine: &mut impl Machine,
    stack_initialized: &mut bool,
) -> Result<DecodedInstruction, EmulatorError> {
    if !*stack_initialized {
        machine.write_register(abi::REG_SP, machine.memory_size() as i32)?;
        *stack_initialized = true;
    }

    let pc = machine.read_pc();

    let mut raw = 0u32;
    for i in 0..INSTRUCTION_SIZE {
        let byte = machine.load_byte(pc.wrapping_add(i))?;
        raw |= u32::from(byte) << (8 * i);
    }

    machine.write_pc(pc.wrapping_add(INSTRUCTION_SIZE));

    tracing::trace!("IF  pc={pc:#010x} inst={raw:#010x}");

    Ok(DecodedInstruction::new(pc, raw))
}
