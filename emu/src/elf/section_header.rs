use crate::elf::relocation::RelocationEntry;
use crate::elf::symbol::SymbolTableEntry;
use crate::elf::{read_uint, string_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionType {
    Null,
    ProgramData,
    SymbolTable,
    StringTable,
    RelocationWithAddends,
    Hash,
    Dynamic,
    Note,
    NoBits,
    Relocation,
    SharedLibrary,
    DynamicSymbolTable,
    InitArray,
    FiniArray,
    PreInitArray,
    Group,
    ExtendedIndices,
    Unknown,
}

impl From<u64> for SectionType {
    fn from(value: u64) -> Self {
        match value {
            0x00 => Self::Null,
            0x01 => Self::ProgramData,
            0x02 => Self::SymbolTable,
            0x03 => Self::StringTable,
            0x04 => Self::RelocationWithAddends,
            0x05 => Self::Hash,
            0x06 => Self::Dynamic,
            0x07 => Self::Note,
            0x08 => Self::NoBits,
            0x09 => Self::Relocation,
            0x0A => Self::SharedLibrary,
            0x0B => Self::DynamicSymbolTable,
            0x0E => Self::InitArray,
            0x0F => Self::FiniArray,
            0x10 => Self::PreInitArray,
            0x11 => Self::Group,
            0x12 => Self::ExtendedIndices,
            _ => Self::Unknown,
        }
    }
}

/// View over one section-header record. `full_data` is the whole file so
/// [`SectionHeader::section_data`] can slice the section body out of it.
pub struct SectionHeader<'a> {
    bits_32: bool,
    little_endian: bool,
    full_data: &'a [u8],
    data: &'a [u8],
}

impl<'a> SectionHeader<'a> {
    pub(crate) fn new(
        bits_32: bool,
        little_endian: bool,
        full_data: &'a [u8],
        data: &'a [u8],
    ) -> Self {
        Self {
            bits_32,
            little_endian,
            full_data,
            data,
        }
    }

    fn read(&self, offset: usize, width: usize) -> u64 {
        read_uint(self.data, offset, width, self.little_endian).unwrap_or(0)
    }

    pub fn name_offset(&self) -> usize {
        self.read(0x00, 4) as usize
    }

    pub fn section_type(&self) -> SectionType {
        self.read(0x04, 4).into()
    }

    pub fn flags(&self) -> u64 {
        self.read(0x08, if self.bits_32 { 4 } else { 8 })
    }

    pub fn virtual_address(&self) -> u64 {
        self.read(if self.bits_32 { 0x0C } else { 0x10 }, if self.bits_32 { 4 } else { 8 })
    }

    /// Where the section body starts in the file.
    pub fn offset(&self) -> u64 {
        self.read(if self.bits_32 { 0x10 } else { 0x18 }, if self.bits_32 { 4 } else { 8 })
    }

    pub fn size(&self) -> u64 {
        self.read(if self.bits_32 { 0x14 } else { 0x20 }, if self.bits_32 { 4 } else { 8 })
    }

    pub fn name<'t>(&self, string_table: &'t [u8]) -> &'t str {
        string_at(string_table, self.name_offset())
    }

    /// The section body, or an empty slice when offset/size run outside
    /// the file.
    pub fn section_data(&self) -> &'a [u8] {
        let start = self.offset() as usize;
        start
            .checked_add(self.size() as usize)
            .and_then(|end| self.full_data.get(start..end))
            .unwrap_or(&[])
    }

    fn symbol_table_num_entries(&self) -> usize {
        if self.section_type() == SectionType::SymbolTable {
            self.size() as usize / SymbolTableEntry::entry_size(self.bits_32)
        } else {
            0
        }
    }

    /// The `index`-th symbol record of a symbol-table section.
    pub fn symbol_table_entry(&self, index: usize) -> Option<SymbolTableEntry<'a>> {
        if index >= self.symbol_table_num_entries() {
            return None;
        }
        let entry_size = SymbolTableEntry::entry_size(self.bits_32);
        let start = (self.offset() as usize).checked_add(entry_size.checked_mul(index)?)?;
        let data = self.full_data.get(start..start.checked_add(entry_size)?)?;

        Some(SymbolTableEntry::new(self.bits_32, self.little_endian, data))
    }

    pub fn symbol_table_entries(&self) -> impl Iterator<Item = SymbolTableEntry<'a>> + '_ {
        (0..self.symbol_table_num_entries()).filter_map(move |idx| self.symbol_table_entry(idx))
    }

    fn relocation_table_num_entries(&self) -> usize {
        if self.section_type() == SectionType::Relocation {
            self.size() as usize / RelocationEntry::ENTRY_SIZE
        } else {
            0
        }
    }

    /// The fixed-size relocation records of a REL section.
    pub fn relocation_table_entries(&self) -> impl Iterator<Item = RelocationEntry<'a>> + '_ {
        (0..self.relocation_table_num_entries()).filter_map(move |idx| {
            let start = (self.offset() as usize)
                .checked_add(RelocationEntry::ENTRY_SIZE.checked_mul(idx)?)?;
            let data = self
                .full_data
                .get(start..start.checked_add(RelocationEntry::ENTRY_SIZE)?)?;
            Some(RelocationEntry::new(self.little_endian, data))
        })
    }
}
