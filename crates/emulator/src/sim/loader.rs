//! Executable-image loader.
//!
//! This module populates a machine from an ELF executable. It performs:
//! 1. **Validation:** The image must be a little-endian, 32-bit, RISC-V
//!    ELF; anything else is rejected before a byte is placed.
//! 2. **Segment placement:** Each `PT_LOAD` segment's file bytes are copied
//!    to its virtual address, and the region between the on-disk size and
//!    the in-memory size is zero-filled.
//! 3. **Entry point:** The header's entry address becomes the initial
//!    program counter.

use std::fs;

use object::elf;
use object::read::elf::FileHeader;
use object::Endianness;

use crate::common::error::EmulatorError;
use crate::core::machine::MachineState;

/// Loads an ELF image from disk into the machine.
///
/// # Arguments
///
/// * `machine` - The machine whose memory and PC to populate.
/// * `path` - Path of the executable image.
///
/// # Errors
///
/// [`EmulatorError::IoFault`] when the file cannot be read;
/// [`EmulatorError::MalformedImage`] when it is not a loadable
/// little-endian RV32 ELF or a segment does not fit the address space.
pub fn load_image(machine: &mut MachineState, path: &str) -> Result<(), EmulatorError> {
    let data = fs::read(path)?;
    load_image_bytes(machine, &data)
}

/// Loads an ELF image already resident in a byte buffer.
///
/// # Errors
///
/// As [`load_image`], minus the file read.
pub fn load_image_bytes(machine: &mut MachineState, data: &[u8]) -> Result<(), EmulatorError> {
    let header = elf::FileHeader32::<Endianness>::parse(data)?;

    let ident = header.e_ident();
    if ident.class != elf::ELFCLASS32 {
        return Err(EmulatorError::MalformedImage("not a 32-bit image".into()));
    }
    if ident.data != elf::ELFDATA2LSB {
        return Err(EmulatorError::MalformedImage("not little-endian".into()));
    }

    let endian = header.endian()?;
    if header.e_machine.get(endian) != elf::EM_RISCV {
        return Err(EmulatorError::MalformedImage("not a RISC-V image".into()));
    }

    let capacity = machine.memory.capacity() as u64;

    for segment in header.program_headers(endian, data)? {
        if segment.p_type.get(endian) != elf::PT_LOAD {
            continue;
        }

        let offset = segment.p_offset.get(endian) as usize;
        let filesz = segment.p_filesz.get(endian) as usize;
        let memsz = segment.p_memsz.get(endian) as usize;
        let vaddr = segment.p_vaddr.get(endian);

        if u64::from(vaddr) + memsz as u64 > capacity {
            return Err(EmulatorError::MalformedImage(format!(
                "segment at {vaddr:#010x} exceeds memory capacity"
            )));
        }
        if filesz > memsz {
            return Err(EmulatorError::MalformedImage(format!(
                "segment at {vaddr:#010x} has file size larger than memory size"
            )));
        }

        let bytes = data
            .get(offset..offset + filesz)
            .ok_or_else(|| {
                EmulatorError::MalformedImage(format!(
                    "segment at {vaddr:#010x} extends past the end of the file"
                ))
            })?;

        machine.memory.write_slice(vaddr, bytes)?;
        machine
            .memory
            .zero_fill(vaddr.wrapping_add(filesz as u32), memsz - filesz)?;

        tracing::debug!(
            "loaded segment vaddr={vaddr:#010x} filesz={filesz:#x} memsz={memsz:#x}"
        );
    }

    machine.pc = header.e_entry.get(endian);
    tracing::debug!("entry point {:#010x}", machine.pc);

    Ok(())
}
