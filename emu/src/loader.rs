//! Turns an ELF32 relocatable byte image into a running machine.
//!
//! The pipeline is validate → locate `main` → rewrite branch relocations →
//! copy the whole file image into RAM at
//! [`USER_RAM_START`](crate::memory_map::USER_RAM_START). Section bodies
//! keep their file offsets in RAM, which is why relocation arithmetic can
//! work purely in file offsets and why the entry point only needs the one
//! base adjustment at the end.

use std::collections::BTreeMap;

use logger::log;

use crate::cpu::armv3::Armv3;
use crate::cpu::instruction::{Instruction, InstructionType};
use crate::elf::{read_uint, FileHeader, Machine, ObjectType, SectionType};
use crate::error::LoadError;
use crate::memory_map::{
    MemoryMap, DEFAULT_SCREEN_BPP, DEFAULT_SCREEN_BUFFER, DEFAULT_SCREEN_HEIGHT,
    DEFAULT_SCREEN_WIDTH, TOTAL_RAM, USER_RAM_START,
};

/// A relocated image ready to be copied into RAM.
#[derive(Debug, PartialEq)]
pub struct LoadedImage {
    /// The full file image with branch relocations already rewritten.
    pub image: Vec<u8>,

    /// File offset of the `main` symbol, before any RAM base adjustment.
    pub entry_point: u32,

    /// Section name → file offset, for hosts that want to show where
    /// things landed.
    pub section_offsets: BTreeMap<String, u32>,
}

/// Parses and relocates `data`. Rejects anything that is not a 32-bit
/// little-endian ARM relocatable object with a `main` symbol.
pub fn load_object(data: &[u8]) -> Result<LoadedImage, LoadError> {
    let file_header = FileHeader::new(data)?;
    if !file_header.is_elf_file() {
        return Err(LoadError::BadMagic);
    }
    if !file_header.bits_32()
        || !file_header.little_endian()
        || file_header.machine() != Machine::Arm
        || file_header.object_type() != ObjectType::Relocatable
    {
        return Err(LoadError::UnsupportedImage);
    }

    let sh_string_table = file_header.sh_string_table();
    let mut section_offsets = BTreeMap::new();
    for header in file_header.section_headers() {
        let name = header.name(sh_string_table);
        log(format!(
            "section '{}' at file offset {:#x}, {} bytes",
            name,
            header.offset(),
            header.size()
        ));
        section_offsets.insert(name.to_owned(), header.offset() as u32);
    }

    let string_table = file_header.string_table();
    let main = file_header
        .section_headers()
        .find_map(|header| {
            header
                .symbol_table_entries()
                .find(|symbol| symbol.name(string_table) == "main")
        })
        .ok_or(LoadError::MissingEntrySymbol)?;

    let main_section = file_header
        .section_header(main.section_header_table_index())
        .ok_or(LoadError::BadSectionIndex {
            index: main.section_header_table_index(),
        })?;

    let mut image = data.to_vec();
    resolve_branches(&mut image, &file_header)?;

    let entry_point = (main_section.offset() + main.value()) as u32;
    log(format!(
        "`main` found in '{}' at file offset {entry_point:#x}",
        main_section.name(sh_string_table)
    ));

    Ok(LoadedImage {
        image,
        entry_point,
        section_offsets,
    })
}

/// Rewrites the PC-relative branch words named by every `.rel.*` section.
///
/// For each entry the rewritten offset is `((to − from) >> 2) − 2`: the
/// word distance between the relocation site and the symbol, less two
/// words for the prefetched PC the branch will see at execution time.
fn resolve_branches(image: &mut [u8], file_header: &FileHeader<'_>) -> Result<(), LoadError> {
    let sh_string_table = file_header.sh_string_table();

    for section_header in file_header.section_headers() {
        if section_header.section_type() != SectionType::Relocation {
            continue;
        }
        let name = section_header.name(sh_string_table);
        let Some(target_name) = name.strip_prefix(".rel") else {
            continue;
        };
        if !target_name.starts_with('.') {
            continue;
        }
        log(format!("resolving relocations of '{name}'"));

        let target_section = file_header
            .section_headers()
            .find(|header| header.name(sh_string_table) == target_name)
            .ok_or_else(|| LoadError::MissingTargetSection {
                name: name.to_owned(),
            })?;

        let symbol_table = file_header
            .symbol_table()
            .ok_or(LoadError::MissingEntrySymbol)?;

        for relocation in section_header.relocation_table_entries() {
            let symbol = symbol_table
                .symbol_table_entry(relocation.symbol())
                .ok_or(LoadError::BadSymbolIndex {
                    index: relocation.symbol(),
                })?;
            let symbol_section = file_header
                .section_header(symbol.section_header_table_index())
                .ok_or(LoadError::BadSectionIndex {
                    index: symbol.section_header_table_index(),
                })?;

            let from = (relocation.file_offset() as u64 + target_section.offset()) as u32;
            let to = (symbol.value() + symbol_section.offset()) as u32;

            let word = read_uint(image, from as usize, 4, true)
                .ok_or(LoadError::RelocationOutOfRange { from })? as u32;

            if InstructionType::decode(Instruction::from(word)) == InstructionType::Branch {
                let offset = ((to.wrapping_sub(from) as i32) >> 2).wrapping_sub(2);
                let patched = (word & 0xFF00_0000) | (offset as u32 & 0x00FF_FFFF);
                log(format!(
                    "branch at {from:#x} -> {to:#x}: {word:#010x} becomes {patched:#010x}"
                ));
                image[from as usize..from as usize + 4].copy_from_slice(&patched.to_le_bytes());
            } else if word == 0 {
                log(format!("word at {from:#x} is zero, nothing to link"));
            } else {
                return Err(LoadError::UnsupportedRelocation { from, word });
            }
        }
    }

    Ok(())
}

/// Loads `data`, places the image at
/// [`USER_RAM_START`](crate::memory_map::USER_RAM_START), seeds the
/// memory-mapped machine registers, and leaves the core ready for its
/// first tick.
pub fn boot(data: &[u8]) -> Result<Armv3, LoadError> {
    let loaded = load_object(data)?;
    let mut cpu = Armv3::new(&loaded.image, USER_RAM_START);

    let memory = cpu.memory_mut();
    memory.write_word(MemoryMap::RamSize as u32, TOTAL_RAM);
    memory.write_half_word(MemoryMap::ScreenWidth as u32, DEFAULT_SCREEN_WIDTH);
    memory.write_half_word(MemoryMap::ScreenHeight as u32, DEFAULT_SCREEN_HEIGHT);
    memory.write_byte(MemoryMap::ScreenBpp as u32, DEFAULT_SCREEN_BPP);
    memory.write_word(MemoryMap::ScreenBuffer as u32, DEFAULT_SCREEN_BUFFER);

    cpu.setup_run(loaded.entry_point.wrapping_add(USER_RAM_START));
    Ok(cpu)
}
